use crate::bvh::Bvh;
use crate::camera::Camera;
use crate::error::LoadError;
use crate::loaders;
use crate::primitive::SurfaceRef;
use crate::shapes::Surface;
use crate::Bounds3f;
use std::path::Path;

/// Leaves of the scene-level tree hold at most this many surfaces.
pub const MAX_SURFACES_IN_LEAF: usize = 1;

#[derive(Debug)]
pub struct Scene {
    pub surfaces: Vec<Surface>,
    pub camera: Camera,
    pub resolution: (u32, u32),
    bvh: Bvh<SurfaceRef>,
}

impl Scene {
    /// Takes ownership of the surfaces and builds the scene-level tree over them. The tree
    /// only refers to surfaces by index, so it stays valid as long as `surfaces` is not
    /// reordered.
    pub fn new(surfaces: Vec<Surface>, camera: Camera, resolution: (u32, u32)) -> Self {
        let refs = surfaces
            .iter()
            .enumerate()
            .map(|(shape, s)| SurfaceRef { shape, bounds: s.bounds })
            .collect();
        let bvh = Bvh::build(refs, MAX_SURFACES_IN_LEAF);

        tracing::debug!(
            surfaces = surfaces.len(),
            triangles = surfaces.iter().map(Surface::n_triangles).sum::<usize>(),
            nodes = bvh.node_count(),
            depth = bvh.depth(),
            "built scene tree"
        );

        Self {
            surfaces,
            camera,
            resolution,
            bvh,
        }
    }

    /// Read a JSON scene description and every mesh it lists.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        loaders::load_scene(path.as_ref())
    }

    pub fn bvh(&self) -> &Bvh<SurfaceRef> {
        &self.bvh
    }

    pub fn surface(&self, r: &SurfaceRef) -> &Surface {
        &self.surfaces[r.shape]
    }

    pub fn world_bound(&self) -> Bounds3f {
        self.bvh.bounds()
    }

    /// The scene-level tree with each surface printed as its shape index.
    pub fn dump_bvh(&self) -> String {
        self.bvh.dump(|r| self.surfaces[r.shape].shape_idx.to_string())
    }
}
