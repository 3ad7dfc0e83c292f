/// Tile Rasterizer - CPU triangle rasterization split into fixed-size screen tiles
/// Every stage is a data-parallel pass over plain buffers
pub mod camera;
pub mod error;
pub mod meshing;
pub mod perf;
pub mod rendering;

pub use camera::{MatrixState, SceneParameters};
pub use error::{RasterizerError, Result};
pub use meshing::Mesh;
pub use perf::{CounterSnapshot, FrameStats, FunctionCounters, FUNCTION_COUNTERS};
pub use rendering::{Bgra8, FaceCulling, Rasterizer, RasterizerConfig, ShadingConfig, Texture};
