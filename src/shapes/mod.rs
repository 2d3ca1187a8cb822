pub mod triangle;
pub mod surface;

pub use triangle::Triangle;
pub use surface::{Surface, TriangleSearch};
