use crate::film::{normal_color, Film};
use crate::intersector::Intersector;
use crate::scene::Scene;
use crate::Vec3f;
use indicatif::ProgressBar;
use rayon::prelude::*;

/// Casts one camera ray per pixel and writes the normal of the nearest hit, or black.
pub struct Renderer {
    pub intersector: Intersector,
    pub parallel: bool,
}

impl Renderer {
    pub fn new(intersector: Intersector) -> Self {
        Self {
            intersector,
            parallel: true,
        }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Colour of pixel `(x, y)`. The ray and its `t_max` are local to this call, so pixels
    /// can be shaded from any thread against the shared, read-only scene.
    pub fn shade(&self, scene: &Scene, x: u32, y: u32) -> Vec3f {
        let mut ray = scene.camera.generate_ray(x, y);
        match self.intersector.intersect(scene, &mut ray) {
            Some(si) => normal_color(si.n),
            None => Vec3f::new(0.0, 0.0, 0.0),
        }
    }

    /// Render the whole image, ticking `progress` once per finished row.
    pub fn render(&self, scene: &Scene, progress: &ProgressBar) -> Film {
        let mut film = Film::new(scene.resolution);
        progress.set_length(scene.resolution.1 as u64);

        let render_row = |(y, row): (usize, &mut [Vec3f])| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = self.shade(scene, x as u32, y as u32);
            }
            progress.inc(1);
        };

        if self.parallel {
            film.pixels
                .par_chunks_mut(scene.resolution.0.max(1) as usize)
                .enumerate()
                .for_each(render_row);
        } else {
            film.rows_mut().enumerate().for_each(render_row);
        }

        progress.finish();
        film
    }

    /// Same as `render`, but on the threads of `pool` instead of the global pool.
    pub fn render_with_pool(&self, scene: &Scene, progress: &ProgressBar, pool: &rayon::ThreadPool) -> Film {
        pool.install(|| self.render(scene, progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::intersector::Strategy;
    use crate::material::Material;
    use crate::shapes::Surface;

    fn floor_scene() -> Scene {
        let vertices = vec![
            point3f!(-10, -10, 0), point3f!(10, -10, 0), point3f!(10, 10, 0),
            point3f!(-10, -10, 0), point3f!(10, 10, 0), point3f!(-10, 10, 0),
        ];
        let floor = Surface::new(vertices, vec![], vec![], Material::default(), false, 0).unwrap();
        // looking straight down, slightly off the floor's diagonal
        let camera = Camera::new(point3f!(0.3, 0, 5), point3f!(0.3, 0, 0), vec3f!(0, 1, 0), 20.0, (5, 3));
        Scene::new(vec![floor], camera, (5, 3))
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let scene = floor_scene();
        let progress = ProgressBar::hidden();
        let isect = Intersector::new(Strategy::TwoLevelBvh);

        let par = Renderer::new(isect).render(&scene, &progress);
        let seq = Renderer::new(isect).sequential().render(&scene, &progress);
        assert_eq!(par.pixels, seq.pixels);
        assert_eq!(par.pixels.len(), 15);
        assert!(par.pixels.iter().all(|&c| c == vec3f!(0.5, 0.5, 1)));
    }

    #[test]
    fn test_background_is_black() {
        let camera = Camera::new(point3f!(0, 0, 5), point3f!(0, 0, 0), vec3f!(0, 1, 0), 90.0, (2, 2));
        let scene = Scene::new(vec![], camera, (2, 2));
        let film = Renderer::new(Intersector::new(Strategy::Naive)).render(&scene, &ProgressBar::hidden());
        assert!(film.pixels.iter().all(|&c| c == vec3f!(0, 0, 0)));
    }
}
