use crate::error::LoadError;
use crate::material::Material;
use crate::shapes::Surface;
use crate::texture::ImageTexture;
use crate::{Point2f, Point3f, Vec3f};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load every shape of an OBJ file as its own `Surface`, numbering them from
/// `first_shape_idx` in file order. Materials come from the `.mtl` files the OBJ references.
pub fn load_obj(path: &Path, is_light: bool, first_shape_idx: u32) -> Result<Vec<Surface>, LoadError> {
    let start = std::time::Instant::now();
    let span = tracing::debug_span!("load_obj", path = %path.display());
    let _enter = span.enter();

    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, materials) = tobj::load_obj(path, &options)
        .map_err(|source| LoadError::Obj { path: path.to_path_buf(), source })?;
    let materials = materials.unwrap_or_else(|e| {
        tracing::warn!("could not load material library: {}", e);
        Vec::new()
    });

    let models: Vec<tobj::Model> = models
        .into_iter()
        .filter(|m| !m.mesh.indices.is_empty())
        .collect();

    // the importer starts a new model with the same name whenever `usemtl` switches material
    // inside a shape
    for pair in models.windows(2) {
        if pair[0].name == pair[1].name && pair[0].mesh.material_id != pair[1].mesh.material_id {
            return Err(LoadError::MultipleMaterials {
                path: path.to_path_buf(),
                shape: pair[1].name.clone(),
            });
        }
    }

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let mut textures = TextureCache::default();
    let mut surfaces = Vec::with_capacity(models.len());

    for model in &models {
        let mesh = &model.mesh;

        if let Some((face, &arity)) = mesh.face_arities.iter().enumerate().find(|&(_, &a)| a != 3) {
            return Err(LoadError::NotTriangulated {
                path: path.to_path_buf(),
                shape: model.name.clone(),
                face,
                arity,
            });
        }

        let material = match mesh.material_id.and_then(|id| materials.get(id)) {
            Some(mat) => convert_material(mat, dir, &mut textures)?,
            None => {
                tracing::warn!(shape = %model.name, "shape has no material definition");
                Material::default()
            }
        };

        let (vertices, normals, uvs) = expand_faces(&model.name, mesh);
        let shape_idx = first_shape_idx + surfaces.len() as u32;
        surfaces.push(Surface::new(vertices, normals, uvs, material, is_light, shape_idx)?);
    }

    tracing::debug!(
        shapes = surfaces.len(),
        "Loaded in {} ms",
        start.elapsed().as_millis()
    );
    Ok(surfaces)
}

/// Unshare the indexed mesh: three fresh slots per face. Normals and uvs stay empty when the
/// file has none, or when only some faces of the shape carry them; the surface then falls back
/// to face normals and zero uvs.
fn expand_faces(name: &str, mesh: &tobj::Mesh) -> (Vec<Point3f>, Vec<Vec3f>, Vec<Point2f>) {
    let idx = |i: &u32| *i as usize;

    let vertices = mesh
        .indices
        .iter()
        .map(idx)
        .map(|i| Point3f::new(mesh.positions[3 * i], mesh.positions[3 * i + 1], mesh.positions[3 * i + 2]))
        .collect();

    let n_verts = mesh.positions.len() / 3;
    let normals = if mesh.normals.is_empty() {
        Vec::new()
    } else if mesh.normals.len() != 3 * n_verts {
        tracing::warn!(shape = %name, "only some faces have normals, using face normals");
        Vec::new()
    } else {
        mesh.indices
            .iter()
            .map(idx)
            .map(|i| Vec3f::new(mesh.normals[3 * i], mesh.normals[3 * i + 1], mesh.normals[3 * i + 2]))
            .collect()
    };

    let uvs = if mesh.texcoords.is_empty() {
        Vec::new()
    } else if mesh.texcoords.len() != 2 * n_verts {
        tracing::warn!(shape = %name, "only some faces have texture coordinates, ignoring them");
        Vec::new()
    } else {
        mesh.indices
            .iter()
            .map(idx)
            .map(|i| Point2f::new(mesh.texcoords[2 * i], mesh.texcoords[2 * i + 1]))
            .collect()
    };

    (vertices, normals, uvs)
}

fn convert_material(mat: &tobj::Material, dir: &Path, textures: &mut TextureCache) -> Result<Material, LoadError> {
    let diffuse = mat.diffuse.map_or(Vec3f::new(0.0, 0.0, 0.0), Vec3f::from);
    let alpha = mat.dissolve.unwrap_or(1.0);

    let diffuse_texture = match mat.diffuse_texture.as_deref() {
        Some(name) if !name.is_empty() => Some(textures.get(dir.join(name))?),
        _ => None,
    };
    let alpha_texture = match mat.dissolve_texture.as_deref() {
        Some(name) if !name.is_empty() => Some(textures.get(dir.join(name))?),
        _ => None,
    };

    Ok(Material {
        diffuse,
        alpha,
        diffuse_texture,
        alpha_texture,
    })
}

/// Textures shared between materials of one file are decoded once.
#[derive(Default)]
struct TextureCache {
    loaded: HashMap<PathBuf, Arc<ImageTexture>>,
}

impl TextureCache {
    fn get(&mut self, path: PathBuf) -> Result<Arc<ImageTexture>, LoadError> {
        if let Some(tex) = self.loaded.get(&path) {
            return Ok(Arc::clone(tex));
        }
        let tex = Arc::new(ImageTexture::load(&path)?);
        self.loaded.insert(path, Arc::clone(&tex));
        Ok(tex)
    }
}
