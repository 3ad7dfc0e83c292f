pub mod mesh;
pub mod primitives;

pub use mesh::Mesh;
