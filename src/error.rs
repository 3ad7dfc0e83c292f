/// Validation errors raised while building pipeline inputs.
///
/// Every error here is produced synchronously by the setter or constructor
/// that received bad data. Once a `Mesh` and `Texture` exist, drawing cannot fail.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterizerError {
    #[error("{what}: expected {expected} elements, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("triangle {triangle} references vertex {index}, mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("texture bitmap has {actual} texels, expected {width}x{height}")]
    TextureSizeMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
    #[error("texture dimensions must be non-zero (got {width}x{height})")]
    EmptyTexture { width: usize, height: usize },
    #[error("{0} must be set first")]
    MissingAttribute(&'static str),
}

pub type Result<T> = std::result::Result<T, RasterizerError>;
