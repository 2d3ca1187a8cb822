use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unrecognized intersection strategy `{0}` (expected 0-3, naive, aabb, bvh or two-level-bvh)")]
pub struct UnknownStrategy(pub String);

#[derive(Debug, Error)]
#[error("unrecognized descent `{0}` (expected first-fit or exhaustive)")]
pub struct UnknownDescent(pub String);

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse scene file {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid resolution {0}x{1}, both dimensions must be positive")]
    Resolution(u32, u32),

    #[error("could not load mesh {path}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("{path}: face {face} of shape `{shape}` has {arity} vertices, not a triangle mesh")]
    NotTriangulated {
        path: PathBuf,
        shape: String,
        face: usize,
        arity: u32,
    },

    #[error("{path}: shape `{shape}` uses more than one material")]
    MultipleMaterials { path: PathBuf, shape: String },

    #[error("could not load texture {path}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("surface has {vertices} vertices, {normals} normals and {uvs} uvs; expected 3 of each per face")]
    MalformedSurface {
        vertices: usize,
        normals: usize,
        uvs: usize,
    },
}
