use crate::{Point3f, Vec3f, Float, Ray, INFINITY, NEG_INFINITY};
use crate::geometry::{min_point, max_point};

/// Relative slack applied to the far slab distance in `intersect_range`, 2 * gamma(3)
/// for f32. Keeps a box from rejecting a primitive that lies exactly on its far face.
const FAR_SLACK: Float = 2.0 * (3.0 * std::f32::EPSILON * 0.5) / (1.0 - 3.0 * std::f32::EPSILON * 0.5);

/// Axis-aligned bounding box
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    pub min: Point3f,
    pub max: Point3f,
}

impl Bounds3f {
    pub fn with_bounds(min: Point3f, max: Point3f) -> Self {
        Self { min, max }
    }

    /// The identity for `join`: min at +inf, max at -inf on every axis.
    pub fn empty() -> Self {
        Self::with_bounds(
            Point3f::new(INFINITY, INFINITY, INFINITY),
            Point3f::new(NEG_INFINITY, NEG_INFINITY, NEG_INFINITY),
        )
    }

    pub fn from_point(p: Point3f) -> Self {
        Self::with_bounds(p, p)
    }

    pub fn from_points(points: impl IntoIterator<Item = Point3f>) -> Self {
        points.into_iter().fold(Self::empty(), |b, p| b.join_point(p))
    }

    pub fn join(&self, other: &Bounds3f) -> Self {
        Self::with_bounds(min_point(self.min, other.min), max_point(self.max, other.max))
    }

    pub fn join_point(&self, p: Point3f) -> Self {
        Self::with_bounds(min_point(self.min, p), max_point(self.max, p))
    }

    /// True if no point has ever been added, i.e. min > max on some axis.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn diagonal(&self) -> Vec3f {
        self.max - self.min
    }

    pub fn centroid(&self) -> Point3f {
        self.min + self.diagonal() * 0.5
    }

    /// Index of the longest axis. Ties go to the earlier axis: y only beats x if strictly
    /// longer, and z only beats the current winner if strictly longer.
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        let mut axis = 0;
        if d.y > d.x {
            axis = 1;
        }
        if d.z > d[axis] {
            axis = 2;
        }
        axis
    }

    /// Whether `other` lies entirely inside this box (boundaries included).
    pub fn encloses(&self, other: &Bounds3f) -> bool {
        (0..3).all(|i| self.min[i] <= other.min[i] && other.max[i] <= self.max[i])
    }

    /// Slab test. Zero direction components divide to signed infinities (or NaN when the
    /// origin sits exactly on a slab plane) and `min`/`max` absorb them, so axis-aligned
    /// rays need no special casing. The ray's `t_max` is not consulted. An empty box is
    /// never hit.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        if self.is_empty() {
            return false;
        }
        let (t_enter, t_exit) = self.slabs(ray);
        t_exit >= t_enter
    }

    /// Parametric range `[t0, t1]` over which the ray is inside the box, clipped to
    /// `[0, ray.t_max]`. Used by the exhaustive descent to skip boxes behind the ray or
    /// beyond the best hit found so far.
    pub fn intersect_range(&self, ray: &Ray) -> Option<(Float, Float)> {
        if self.is_empty() {
            return None;
        }
        let (t_enter, t_exit) = self.slabs(ray);
        let t0 = t_enter.max(0.0);
        let t1 = (t_exit * (1.0 + FAR_SLACK)).min(ray.t_max);
        if t0 <= t1 { Some((t0, t1)) } else { None }
    }

    fn slabs(&self, ray: &Ray) -> (Float, Float) {
        let mut t_enter = NEG_INFINITY;
        let mut t_exit = INFINITY;
        for axis in 0..3 {
            let t1 = (self.min[axis] - ray.origin[axis]) / ray.dir[axis];
            let t2 = (self.max[axis] - ray.origin[axis]) / ray.dir[axis];
            t_enter = select_max(t_enter, select_min(t1, t2));
            t_exit = select_min(t_exit, select_max(t1, t2));
        }
        (t_enter, t_exit)
    }
}

// Comparison-based min/max: a NaN second operand loses and a NaN first operand wins, so a
// 0/0 slab distance is dropped by the accumulators instead of being preferred over
// infinities the way `f32::min`/`f32::max` would.
#[inline]
fn select_min(a: Float, b: Float) -> Float {
    if b < a { b } else { a }
}

#[inline]
fn select_max(a: Float, b: Float) -> Float {
    if a < b { b } else { a }
}

impl Default for Bounds3f {
    fn default() -> Self {
        Self::empty()
    }
}
