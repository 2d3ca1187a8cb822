use crate::{Float, Point3f, Ray, Vec3f};
use cgmath::InnerSpace;

/// Pinhole camera. Pixel (0, 0) is the upper left corner of the image and y grows downward.
#[derive(Clone, Debug)]
pub struct Camera {
    origin: Point3f,
    upper_left: Vec3f,
    pixel_delta_u: Vec3f,
    pixel_delta_v: Vec3f,
    resolution: (u32, u32),
}

impl Camera {
    const FOCUS_DIST: Float = 1.0;

    /// `vfov` is the vertical field of view in degrees.
    pub fn new(lookfrom: Point3f, lookat: Point3f, up: Vec3f, vfov: Float, resolution: (u32, u32)) -> Camera {
        let (width, height) = resolution;
        let aspect = width as Float / height as Float;

        let half_height = Float::tan(vfov.to_radians() / 2.0);
        let viewport_height = 2.0 * half_height * Self::FOCUS_DIST;
        let viewport_width = viewport_height * aspect;

        let w = (lookfrom - lookat).normalize(); // points away from the scene
        let u = up.cross(w).normalize();
        let v = w.cross(u).normalize();

        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        // relative to the eye
        let upper_left = -w * Self::FOCUS_DIST - viewport_u / 2.0 - viewport_v / 2.0;

        Camera {
            origin: lookfrom,
            upper_left,
            pixel_delta_u: viewport_u / width as Float,
            pixel_delta_v: viewport_v / height as Float,
            resolution,
        }
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    pub fn origin(&self) -> Point3f {
        self.origin
    }

    /// Ray from the eye through the centre of pixel `(x, y)`, with a normalized direction and
    /// an unbounded `t_max`.
    pub fn generate_ray(&self, x: u32, y: u32) -> Ray {
        let pixel_center = self.upper_left
            + (x as Float + 0.5) * self.pixel_delta_u
            + (y as Float + 0.5) * self.pixel_delta_v;
        Ray::new(self.origin, pixel_center.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn looking_down_z(resolution: (u32, u32)) -> Camera {
        Camera::new(point3f!(0, 0, 5), point3f!(0, 0, 0), vec3f!(0, 1, 0), 90.0, resolution)
    }

    #[test]
    fn test_center_ray_of_odd_resolution() {
        let cam = looking_down_z((3, 3));
        let ray = cam.generate_ray(1, 1);
        assert_eq!(ray.origin, point3f!(0, 0, 5));
        assert_abs_diff_eq!(ray.dir, vec3f!(0, 0, -1), epsilon = 1e-6);
    }

    #[test]
    fn test_directions_are_normalized() {
        let cam = looking_down_z((7, 5));
        for y in 0..5 {
            for x in 0..7 {
                let ray = cam.generate_ray(x, y);
                assert_abs_diff_eq!(ray.dir.magnitude(), 1.0, epsilon = 1e-6);
                assert_eq!(ray.origin, cam.origin());
            }
        }
    }

    #[test]
    fn test_image_orientation() {
        // 90 degrees at focus distance 1: the viewport spans [-1, 1] vertically
        let cam = looking_down_z((2, 2));
        let upper_left = cam.generate_ray(0, 0);
        assert!(upper_left.dir.x < 0.0 && upper_left.dir.y > 0.0);

        let lower_right = cam.generate_ray(1, 1);
        assert!(lower_right.dir.x > 0.0 && lower_right.dir.y < 0.0);

        // pixel centres at +-0.5 on the viewport plane one unit in front of the eye
        let expected = vec3f!(-0.5, 0.5, -1).normalize();
        assert_abs_diff_eq!(upper_left.dir, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_aspect_widens_horizontal_extent() {
        let cam = looking_down_z((4, 2));
        // horizontal viewport is 4 wide, so the first column centre sits at x = -1.5
        let ray = cam.generate_ray(0, 0);
        let on_plane = ray.dir / -ray.dir.z;
        assert_abs_diff_eq!(on_plane.x, -1.5, epsilon = 1e-5);
        assert_abs_diff_eq!(on_plane.y, 0.5, epsilon = 1e-5);
    }
}
