use crate::bvh::{Bvh, Descent};
use crate::error::LoadError;
use crate::material::Material;
use crate::primitive::Primitive;
use crate::shapes::triangle::Triangle;
use crate::{Bounds3f, Interaction, Point2f, Point3f, Ray, Vec3f};
use cgmath::InnerSpace;

/// Leaves of a surface's triangle tree hold at most this many triangles.
pub const MAX_TRIANGLES_IN_LEAF: usize = 4;

/// How a surface finds its candidate triangles for a ray.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriangleSearch {
    /// Test every triangle.
    Linear,

    /// Walk the surface's triangle tree and test only the triangles it yields, each one
    /// pre-filtered against its own box.
    Tree(Descent),
}

/// A triangle soup. Every face owns three consecutive vertex slots, nothing is shared
/// between faces, so `vertices`, `normals` and `uvs` all have `3 * indices.len()` entries.
pub struct Surface {
    pub vertices: Vec<Point3f>,
    pub normals: Vec<Vec3f>,
    pub indices: Vec<[usize; 3]>,
    pub uvs: Vec<Point2f>,

    pub bounds: Bounds3f,
    pub material: Material,
    pub is_light: bool,
    pub shape_idx: u32,

    bvh: Bvh<Triangle>,
}

impl Surface {
    /// Build a surface from per-face vertex slots. An empty `normals` is replaced by the
    /// geometric normal of each face and an empty `uvs` by zeros.
    pub fn new(
        vertices: Vec<Point3f>,
        normals: Vec<Vec3f>,
        uvs: Vec<Point2f>,
        material: Material,
        is_light: bool,
        shape_idx: u32,
    ) -> Result<Self, LoadError> {
        let normals = if normals.is_empty() {
            geometric_normals(&vertices)
        } else {
            normals
        };
        let uvs = if uvs.is_empty() {
            vec![Point2f::new(0.0, 0.0); vertices.len()]
        } else {
            uvs
        };

        if vertices.len() % 3 != 0 || normals.len() != vertices.len() || uvs.len() != vertices.len() {
            return Err(LoadError::MalformedSurface {
                vertices: vertices.len(),
                normals: normals.len(),
                uvs: uvs.len(),
            });
        }

        let indices: Vec<[usize; 3]> = (0..vertices.len() / 3)
            .map(|f| [3 * f, 3 * f + 1, 3 * f + 2])
            .collect();
        let bounds = Bounds3f::from_points(vertices.iter().copied());

        let triangles: Vec<Triangle> = indices
            .iter()
            .map(|&[a, b, c]| {
                Triangle::new(
                    [vertices[a], vertices[b], vertices[c]],
                    [normals[a], normals[b], normals[c]],
                )
            })
            .collect();
        let bvh = Bvh::build(triangles, MAX_TRIANGLES_IN_LEAF);

        Ok(Self {
            vertices,
            normals,
            indices,
            uvs,
            bounds,
            material,
            is_light,
            shape_idx,
            bvh,
        })
    }

    pub fn n_triangles(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle(&self, face: usize) -> Triangle {
        let [a, b, c] = self.indices[face];
        Triangle::new(
            [self.vertices[a], self.vertices[b], self.vertices[c]],
            [self.normals[a], self.normals[b], self.normals[c]],
        )
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.n_triangles()).map(move |f| self.triangle(f))
    }

    pub fn bvh(&self) -> &Bvh<Triangle> {
        &self.bvh
    }

    /// Nearest hit with `t <= ray.t_max`, or `None`. The ray itself is not modified; the
    /// caller decides whether to keep the hit and lower its `t_max`.
    pub fn intersect(&self, ray: &Ray, search: TriangleSearch) -> Option<Interaction> {
        match search {
            TriangleSearch::Linear => {
                let mut t_max = ray.t_max;
                let mut closest = None;
                for tri in self.triangles() {
                    if let Some(si) = tri.intersect(ray) {
                        if si.t <= t_max {
                            t_max = si.t;
                            closest = Some(si);
                        }
                    }
                }
                closest
            }
            TriangleSearch::Tree(descent) => {
                let mut ray = *ray;
                let mut closest = None;
                self.bvh.traverse(&mut ray, descent, |ray, tris| {
                    for tri in tris {
                        if !tri.world_bound().intersect_p(ray) {
                            continue;
                        }
                        if let Some(si) = tri.intersect(ray) {
                            if si.t <= ray.t_max {
                                ray.t_max = si.t;
                                closest = Some(si);
                            }
                        }
                    }
                });
                closest
            }
        }
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("shape_idx", &self.shape_idx)
            .field("n_triangles", &self.n_triangles())
            .field("bounds", &self.bounds)
            .field("is_light", &self.is_light)
            .finish()
    }
}

fn geometric_normals(vertices: &[Point3f]) -> Vec<Vec3f> {
    vertices
        .chunks(3)
        .flat_map(|face| {
            let n = if face.len() == 3 {
                (face[1] - face[0]).cross(face[2] - face[0]).normalize()
            } else {
                Vec3f::new(0.0, 0.0, 0.0)
            };
            std::iter::repeat(n).take(face.len())
        })
        .collect()
}
