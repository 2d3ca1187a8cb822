use crate::error::LoadError;
use crate::{Float, Point2f};
use image::RgbaImage;
use std::path::Path;

/// An 8-bit RGBA image sampled with nearest-neighbour lookups and repeat wrapping.
#[derive(Debug)]
pub struct ImageTexture {
    image: RgbaImage,
}

impl ImageTexture {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| LoadError::Texture { path: path.to_path_buf(), source })?
            .to_rgba8();
        tracing::debug!(path = %path.display(), width = image.width(), height = image.height(), "loaded texture");
        Ok(Self { image })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// RGBA in `[0, 1]`. `uv` has its origin at the bottom left of the image, as in OBJ files.
    pub fn lookup(&self, uv: Point2f) -> [Float; 4] {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return [0.0; 4];
        }

        let u = uv.x - uv.x.floor();
        let v = uv.y - uv.y.floor();
        let x = ((u * w as Float) as u32).min(w - 1);
        let y = (((1.0 - v) * h as Float) as u32).min(h - 1);

        let px = self.image.get_pixel(x, y).0;
        [
            px[0] as Float / 255.0,
            px[1] as Float / 255.0,
            px[2] as Float / 255.0,
            px[3] as Float / 255.0,
        ]
    }
}
