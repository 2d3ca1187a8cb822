use crate::{Float, Point3f, Vec3f};

/// The nearest geometric hit along a ray. A miss is represented by the absence of an
/// `Interaction` rather than a flag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interaction {
    /// Ray parameter of the hit.
    pub t: Float,

    pub p: Point3f,

    /// Face-averaged vertex normal of the triangle that was hit.
    pub n: Vec3f,
}

impl Interaction {
    pub fn new(t: Float, p: Point3f, n: Vec3f) -> Self {
        Self { t, p, n }
    }
}
