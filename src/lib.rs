#[macro_use] pub mod macros; // must stay at the top
pub mod geometry;
pub mod interaction;
pub mod primitive;
pub mod bvh;
pub mod shapes;
pub mod texture;
pub mod material;
pub mod camera;
pub mod scene;
pub mod intersector;
pub mod film;
pub mod renderer;
pub mod loaders;
pub mod error;

pub use geometry::*;
pub use interaction::Interaction;
pub use intersector::{Descent, Intersector, Strategy};
pub use scene::Scene;

use cgmath::{Point2, Point3, Vector2, Vector3};

pub type Float = f32;

pub type Point2f = Point2<Float>;
pub type Point3f = Point3<Float>;
pub type Vec2f = Vector2<Float>;
pub type Vec3f = Vector3<Float>;

pub const INFINITY: Float = std::f32::INFINITY;
pub const NEG_INFINITY: Float = std::f32::NEG_INFINITY;
