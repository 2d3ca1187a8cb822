use crate::camera::Camera;
use crate::error::LoadError;
use crate::scene::Scene;
use crate::{Float, Point3f, Vec3f};
use serde::Deserialize;
use std::path::Path;

pub mod obj;

pub use obj::load_obj;

/// Top level of a scene file. Fields other than these are ignored.
#[derive(Debug, Deserialize)]
pub struct SceneConfig {
    pub output: OutputConfig,
    pub camera: CameraConfig,
    /// Mesh files, relative to the directory of the scene file.
    pub surface: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub resolution: [u32; 2],
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    pub from: [Float; 3],
    pub to: [Float; 3],
    pub up: [Float; 3],
    #[serde(rename = "fieldOfView")]
    pub field_of_view: Float,
}

impl SceneConfig {
    pub fn parse(json: &str, path: &Path) -> Result<Self, LoadError> {
        let config: SceneConfig = serde_json::from_str(json)
            .map_err(|source| LoadError::Json { path: path.to_path_buf(), source })?;
        let [w, h] = config.output.resolution;
        if w == 0 || h == 0 {
            return Err(LoadError::Resolution(w, h));
        }
        Ok(config)
    }

    pub fn resolution(&self) -> (u32, u32) {
        let [w, h] = self.output.resolution;
        (w, h)
    }

    pub fn make_camera(&self) -> Camera {
        let cam = &self.camera;
        Camera::new(
            Point3f::from(cam.from),
            Point3f::from(cam.to),
            Vec3f::from(cam.up),
            cam.field_of_view,
            self.resolution(),
        )
    }
}

/// Read a scene file and every mesh it lists, then build the scene. Shape indices run on
/// across mesh files in the order they are listed.
pub fn load_scene(path: &Path) -> Result<Scene, LoadError> {
    let json = std::fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let config = SceneConfig::parse(&json, path)?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));

    let mut surfaces = Vec::new();
    match &config.surface {
        Some(files) => {
            for file in files {
                let next_idx = surfaces.len() as u32;
                surfaces.extend(load_obj(&dir.join(file), false, next_idx)?);
            }
        }
        None => tracing::info!(scene = %path.display(), "no surfaces defined"),
    }

    Ok(Scene::new(surfaces, config.make_camera(), config.resolution()))
}
