use crate::{Point3f, Vec3f, Float, INFINITY};
use cgmath::InnerSpace;

pub mod bounds;

pub use bounds::*;

pub fn distance(p1: Point3f, p2: Point3f) -> Float {
    (p1 - p2).magnitude()
}

pub fn min_point(a: Point3f, b: Point3f) -> Point3f {
    Point3f::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

pub fn max_point(a: Point3f, b: Point3f) -> Point3f {
    Point3f::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}

/// A ray with a shrinking upper bound on the hit distance.
///
/// `t_max` starts at infinity and is lowered by the intersector every time a closer hit is
/// accepted, so later tests only need to beat the best hit found so far. The direction is
/// expected to be normalized by whoever generates the ray but nothing here relies on it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3f,
    pub dir: Vec3f,
    pub t_max: Float,
}

impl Ray {
    pub fn new(origin: Point3f, dir: Vec3f) -> Self {
        Self {
            origin, dir, t_max: INFINITY
        }
    }

    pub fn at(&self, t: Float) -> Point3f {
        self.origin + (self.dir * t)
    }
}
