use crate::texture::ImageTexture;
use crate::{Float, Vec3f};
use std::sync::Arc;

/// Surface appearance as imported from a mesh's material library. Nothing in the
/// intersection core reads it; it travels with the surface for whatever shades the hit.
#[derive(Clone, Debug)]
pub struct Material {
    pub diffuse: Vec3f,
    pub alpha: Float,
    pub diffuse_texture: Option<Arc<ImageTexture>>,
    pub alpha_texture: Option<Arc<ImageTexture>>,
}

impl Material {
    pub fn constant(diffuse: Vec3f) -> Self {
        Self {
            diffuse,
            ..Self::default()
        }
    }

    pub fn has_diffuse_texture(&self) -> bool {
        self.diffuse_texture.is_some()
    }

    pub fn has_alpha_texture(&self) -> bool {
        self.alpha_texture.is_some()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Vec3f::new(0.0, 0.0, 0.0),
            alpha: 1.0,
            diffuse_texture: None,
            alpha_texture: None,
        }
    }
}
