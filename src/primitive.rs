use crate::geometry::bounds::Bounds3f;
use crate::Float;

/// Anything a `Bvh` can partition.
pub trait Primitive {
    fn world_bound(&self) -> Bounds3f;

    /// Coordinate along `axis` used to order primitives when a node is split.
    fn split_key(&self, axis: usize) -> Float;
}

/// Scene-level tree entry: a surface referenced by its index in the scene, together with a
/// copy of that surface's box so the tree can be built and traversed without the surfaces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRef {
    pub shape: usize,
    pub bounds: Bounds3f,
}

impl Primitive for SurfaceRef {
    fn world_bound(&self) -> Bounds3f {
        self.bounds
    }

    /// Surfaces are ordered by the low corner of their box, not their centroid.
    fn split_key(&self, axis: usize) -> Float {
        self.bounds.min[axis]
    }
}
