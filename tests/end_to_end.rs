/*!
Loads the fixture scenes from disk and checks every pixel of a render under every intersection
strategy and both descents.
*/

use approx::assert_abs_diff_eq;
use cgmath::InnerSpace;
use indicatif::ProgressBar;
use meshtrace::film::normal_color;
use meshtrace::renderer::Renderer;
use meshtrace::{distance, Descent, Intersector, Scene, Strategy};
use std::path::Path;

fn load(name: &str) -> anyhow::Result<Scene> {
    Ok(Scene::load(Path::new(env!("CARGO_MANIFEST_DIR")).join("testscenes").join(name))?)
}

fn intersectors() -> impl Iterator<Item = Intersector> {
    Strategy::ALL.iter().flat_map(|&s| {
        vec![
            Intersector::with_descent(s, Descent::FirstFit),
            Intersector::with_descent(s, Descent::Exhaustive),
        ]
    })
}

#[test]
fn every_pixel_hits_the_quad() -> anyhow::Result<()> {
    let scene = load("quad.json")?;
    assert_eq!(scene.resolution, (4, 4));
    assert_eq!(scene.surfaces.len(), 1);
    assert_eq!(scene.surfaces[0].n_triangles(), 2);

    let (w, h) = scene.resolution;
    let eye = scene.camera.origin();
    for isect in intersectors() {
        for y in 0..h {
            for x in 0..w {
                let mut ray = scene.camera.generate_ray(x, y);
                let si = isect
                    .intersect(&scene, &mut ray)
                    .unwrap_or_else(|| panic!("{:?} missed pixel ({}, {})", isect, x, y));

                assert_eq!(si.n, vec3(0.0, 0.0, 1.0));
                assert_abs_diff_eq!(si.p.z, 0.0, epsilon = 1e-4);
                assert_abs_diff_eq!(si.t, distance(si.p, eye), epsilon = 1e-4);
                // the plane is 5 units in front of the eye along the view axis
                assert_abs_diff_eq!(si.t * -ray.dir.z, 5.0, epsilon = 1e-4);
                assert_eq!(ray.t_max, si.t);
            }
        }
    }
    Ok(())
}

#[test]
fn center_pixel_of_quad_is_five_away() -> anyhow::Result<()> {
    let scene = load("quad.json")?;
    // with an even resolution no pixel centre lies on the view axis, so aim one by hand
    let mut ray = meshtrace::Ray::new(scene.camera.origin(), vec3(0.0, 0.0, -1.0));
    let si = Intersector::new(Strategy::TwoLevelBvh)
        .intersect(&scene, &mut ray)
        .expect("should hit");
    assert_abs_diff_eq!(si.t, 5.0, epsilon = 1e-5);
    Ok(())
}

#[test]
fn quad_render_is_uniform() -> anyhow::Result<()> {
    let scene = load("quad.json")?;
    for &strategy in &Strategy::ALL {
        let film = Renderer::new(Intersector::new(strategy)).render(&scene, &ProgressBar::hidden());
        let expected = normal_color(vec3(0.0, 0.0, 1.0));
        assert!(film.pixels.iter().all(|&c| c == expected), "{}", strategy);

        let img = film.to_image();
        assert!(img.pixels().all(|p| p.0 == [127, 127, 255]));
    }
    Ok(())
}

#[test]
fn empty_scene_never_hits() -> anyhow::Result<()> {
    let scene = load("empty.json")?;
    assert!(scene.surfaces.is_empty());

    let (w, h) = scene.resolution;
    for isect in intersectors() {
        for y in 0..h {
            for x in 0..w {
                let mut ray = scene.camera.generate_ray(x, y);
                assert_eq!(isect.intersect(&scene, &mut ray), None);
                assert_eq!(ray.t_max, meshtrace::INFINITY);
            }
        }
        let film = Renderer::new(isect).render(&scene, &ProgressBar::hidden());
        assert!(film.pixels.iter().all(|&c| c == vec3(0.0, 0.0, 0.0)));
    }
    Ok(())
}

#[test]
fn written_image_matches_film() -> anyhow::Result<()> {
    let scene = load("quad.json")?;
    let film = Renderer::new(Intersector::new(Strategy::Bvh)).render(&scene, &ProgressBar::hidden());

    let out = std::env::temp_dir().join(format!("meshtrace-quad-{}.png", std::process::id()));
    film.save(&out)?;
    let read_back = image::open(&out)?.to_rgb8();
    std::fs::remove_file(&out)?;

    assert_eq!(read_back, film.to_image());
    Ok(())
}

#[test]
fn camera_rays_are_unit_length() -> anyhow::Result<()> {
    let scene = load("panels.json")?;
    let (w, h) = scene.resolution;
    for y in 0..h {
        for x in 0..w {
            assert_abs_diff_eq!(scene.camera.generate_ray(x, y).dir.magnitude(), 1.0, epsilon = 1e-6);
        }
    }
    Ok(())
}

fn vec3(x: f32, y: f32, z: f32) -> meshtrace::Vec3f {
    meshtrace::Vec3f::new(x, y, z)
}
