use crate::{Float, Vec3f};
use std::path::Path;

/// Row-major grid of linear colours, one per pixel.
pub struct Film {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec3f>,
}

impl Film {
    pub fn new((width, height): (u32, u32)) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3f::new(0.0, 0.0, 0.0); width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    pub fn set(&mut self, x: u32, y: u32, color: Vec3f) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    pub fn get(&self, x: u32, y: u32) -> Vec3f {
        self.pixels[self.index(x, y)]
    }

    /// Rows of the film, top to bottom, for filling in parallel.
    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, Vec3f> {
        self.pixels.chunks_mut(self.width.max(1) as usize)
    }

    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| image::Rgb(to_rgb(self.get(x, y))))
    }

    /// Encode and write the film; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.to_image().save(path)
    }
}

/// Clamp each channel to [0, 1] and scale to 8 bits.
pub fn to_rgb(v: Vec3f) -> [u8; 3] {
    let c = |x: Float| (x.max(0.0).min(1.0) * 255.0) as u8;
    [c(v.x), c(v.y), c(v.z)]
}

/// Visualisation colour of a unit normal, each component mapped from [-1, 1] to [0, 1].
pub fn normal_color(n: Vec3f) -> Vec3f {
    0.5 * (n + Vec3f::new(1.0, 1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let mut film = Film::new((3, 2));
        film.set(2, 1, vec3f!(1, 0, 0));
        assert_eq!(film.pixels[5], vec3f!(1, 0, 0));
        assert_eq!(film.get(2, 1), vec3f!(1, 0, 0));
        assert_eq!(film.rows_mut().count(), 2);
    }

    #[test]
    fn test_to_rgb_clamps() {
        assert_eq!(to_rgb(vec3f!(-0.5, 0.5, 2)), [0, 127, 255]);
        assert_eq!(to_rgb(vec3f!(0, 0, 0)), [0, 0, 0]);
    }

    #[test]
    fn test_normal_color() {
        assert_eq!(normal_color(vec3f!(0, 0, 1)), vec3f!(0.5, 0.5, 1));
        assert_eq!(to_rgb(normal_color(vec3f!(0, 0, 1))), [127, 127, 255]);
    }

    #[test]
    fn test_to_image() {
        let mut film = Film::new((2, 2));
        film.set(1, 0, vec3f!(1, 1, 1));
        let img = film.to_image();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(1, 0).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(0, 1).0, [0, 0, 0]);
    }
}
