/// Tile-partitioned software rasterization pipeline
pub mod clipping;
pub mod color;
pub mod framebuffer;
pub mod rasterizer;
pub mod shading;
pub mod texture;
pub mod tile;
pub mod vertex;

pub use clipping::{clip_triangle, ClipResult};
pub use color::Bgra8;
pub use framebuffer::Framebuffer;
pub use rasterizer::{Rasterizer, RasterizerConfig};
pub use shading::ShadingConfig;
pub use texture::Texture;
pub use tile::{FaceCulling, Tile, TileBins, TILE_SIZE};
pub use vertex::{Triangle, Vertex};
