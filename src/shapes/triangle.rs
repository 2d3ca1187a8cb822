use crate::{Point3f, Vec3f, Float, Ray, Bounds3f, Interaction};
use crate::primitive::Primitive;
use cgmath::{EuclideanSpace, InnerSpace};

/// A triangle carrying its own copy of its vertex positions and normals, as stored in the
/// leaves of a surface's triangle tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub p: [Point3f; 3],
    pub n: [Vec3f; 3],
}

impl Triangle {
    pub fn new(p: [Point3f; 3], n: [Vec3f; 3]) -> Self {
        Self { p, n }
    }

    /// Average of the three vertex normals, renormalized. This is the only normal
    /// interpolation done: the plane test and the reported hit normal both use it.
    pub fn face_normal(&self) -> Vec3f {
        (self.n[0] + self.n[1] + self.n[2]).normalize()
    }

    pub fn centroid(&self) -> Point3f {
        let sum = self.p[0].to_vec() + self.p[1].to_vec() + self.p[2].to_vec();
        Point3f::from_vec(sum / 3.0)
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Interaction> {
        ray_triangle_intersect(ray, self.p[0], self.p[1], self.p[2], self.face_normal())
    }
}

impl Primitive for Triangle {
    fn world_bound(&self) -> Bounds3f {
        Bounds3f::from_points(self.p.iter().copied())
    }

    fn split_key(&self, axis: usize) -> Float {
        self.centroid()[axis]
    }
}

/// Intersect a ray with the plane through `p` with normal `n`. Rays parallel to the plane
/// never hit, and neither do planes behind the origin. `t_max` is left to the caller.
pub fn ray_plane_intersect(ray: &Ray, p: Point3f, n: Vec3f) -> Option<Interaction> {
    let d_dot_n = ray.dir.dot(n);
    if d_dot_n == 0.0 {
        return None;
    }

    let t = -(ray.origin - p).dot(n) / d_dot_n;
    // written so that a NaN t is rejected too
    if t >= 0.0 {
        Some(Interaction::new(t, ray.at(t), n))
    } else {
        None
    }
}

/// Plane test followed by a same-side test on each edge: the hit point has to lie on the
/// same side of every edge as the opposite vertex. Points exactly on an edge are outside, so
/// a ray through an edge shared by two triangles misses both.
///
/// The plane is the one through `v1` with normal `n`. When `n` is not perpendicular to the
/// triangle (inconsistent vertex normals) the hit point is computed on that tilted plane.
pub fn ray_triangle_intersect(
    ray: &Ray,
    v1: Point3f,
    v2: Point3f,
    v3: Point3f,
    n: Vec3f,
) -> Option<Interaction> {
    let si = ray_plane_intersect(ray, v1, n)?;
    let p = si.p;

    let edge1 = {
        let n_ip = (p - v1).cross(v3 - v1);
        let n_tri = (v2 - v1).cross(v3 - v1);
        n_ip.dot(n_tri) > 0.0
    };

    let edge2 = {
        let n_ip = (p - v1).cross(v2 - v1);
        let n_tri = (v3 - v1).cross(v2 - v1);
        n_ip.dot(n_tri) > 0.0
    };

    let edge3 = {
        let n_ip = (p - v2).cross(v3 - v2);
        let n_tri = (v1 - v2).cross(v3 - v2);
        n_ip.dot(n_tri) > 0.0
    };

    if edge1 && edge2 && edge3 {
        Some(si)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_tri(n: Vec3f) -> Triangle {
        Triangle::new(
            [point3f!(0, 0, 0), point3f!(1, 0, 0), point3f!(0, 1, 0)],
            [n, n, n],
        )
    }

    #[test]
    fn test_hit_at_centroid_along_inverse_normal() {
        let tri = unit_tri(vec3f!(0, 0, 1));
        let c = tri.centroid();
        let ray = Ray::new(c + vec3f!(0, 0, 3), vec3f!(0, 0, -1));

        let si = tri.intersect(&ray).expect("should hit");
        assert_abs_diff_eq!(si.t, 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(si.p.z, 0.0, epsilon = 1e-6);
        assert_eq!(si.n, vec3f!(0, 0, 1));
    }

    #[test]
    fn test_parallel_ray_misses() {
        let tri = unit_tri(vec3f!(0, 0, 1));
        // d . n == 0, even though the ray lies in the triangle's plane
        let ray = Ray::new(point3f!(-1, 0.25, 0), vec3f!(1, 0, 0));
        assert_eq!(tri.intersect(&ray), None);
    }

    #[test]
    fn test_plane_behind_origin_misses() {
        let tri = unit_tri(vec3f!(0, 0, 1));
        let ray = Ray::new(point3f!(0.25, 0.25, -3), vec3f!(0, 0, -1));
        assert_eq!(tri.intersect(&ray), None);
    }

    #[test]
    fn test_outside_edges_misses() {
        let tri = unit_tri(vec3f!(0, 0, 1));
        let ray = Ray::new(point3f!(0.75, 0.75, 3), vec3f!(0, 0, -1));
        assert!(ray_plane_intersect(&ray, tri.p[0], tri.face_normal()).is_some());
        assert_eq!(tri.intersect(&ray), None);
    }

    #[test]
    fn test_reversed_normal_only_flips_reported_normal() {
        // The edge tests compare against the triangle's own edge cross products, so the
        // sign of the supplied normal does not change which side counts as inside.
        let front = unit_tri(vec3f!(0, 0, 1));
        let back = unit_tri(vec3f!(0, 0, -1));
        let ray = Ray::new(point3f!(0.25, 0.25, 3), vec3f!(0, 0, -1));

        let a = front.intersect(&ray).unwrap();
        let b = back.intersect(&ray).unwrap();
        assert_abs_diff_eq!(a.t, b.t, epsilon = 1e-6);
        assert_eq!(a.n, -b.n);
    }

    #[test]
    fn test_reversed_winding_still_hits() {
        let n = vec3f!(0, 0, 1);
        let tri = Triangle::new([point3f!(0, 0, 0), point3f!(0, 1, 0), point3f!(1, 0, 0)], [n, n, n]);
        let ray = Ray::new(point3f!(0.25, 0.25, 3), vec3f!(0, 0, -1));
        assert!(tri.intersect(&ray).is_some());
    }

    #[test]
    fn test_tilted_normal_moves_the_plane() {
        // the averaged normal is not perpendicular to the triangle, so the hit is computed
        // on a tilted plane through v1 rather than on the triangle's own plane
        let tri = unit_tri(vec3f!(0, 1, 1).normalize());
        let ray = Ray::new(point3f!(0.25, 0.25, 3), vec3f!(0, 0, -1));

        let si = tri.intersect(&ray).unwrap();
        assert_abs_diff_eq!(si.t, 3.25, epsilon = 1e-5);
    }

    #[test]
    fn test_shared_edge_misses_both_triangles() {
        let n = vec3f!(0, 0, 1);
        let lower = Triangle::new([point3f!(-1, -1, 0), point3f!(1, -1, 0), point3f!(1, 1, 0)], [n, n, n]);
        let upper = Triangle::new([point3f!(-1, -1, 0), point3f!(1, 1, 0), point3f!(-1, 1, 0)], [n, n, n]);
        let on_edge = Ray::new(point3f!(0.5, 0.5, 5), vec3f!(0, 0, -1));
        assert_eq!(lower.intersect(&on_edge), None);
        assert_eq!(upper.intersect(&on_edge), None);

        let off_edge = Ray::new(point3f!(0.5, 0.25, 5), vec3f!(0, 0, -1));
        assert!(lower.intersect(&off_edge).is_some());
        assert!(upper.intersect(&off_edge).is_none());
    }

    #[test]
    fn test_split_key_is_centroid() {
        let tri = unit_tri(vec3f!(0, 0, 1));
        assert_abs_diff_eq!(tri.split_key(0), 1.0 / 3.0);
        assert_abs_diff_eq!(tri.split_key(2), 0.0);
        assert_eq!(tri.world_bound(), bounds3f!((0, 0, 0), (1, 1, 0)));
    }
}
