/// Frame pipeline orchestrator
///
/// Every `draw` runs the whole pipeline as a sequence of parallel stages,
/// each one a barrier for the next:
///
/// 1. Setup: resize the tile grid, recompute projection/viewport, advance the scene
/// 2. Vertex: positions to clip space, normals to view space
/// 3. Clipping: homogeneous clipping against the frustum, output in submission order
/// 4. Viewport: perspective divide and NDC to pixel mapping
/// 5. Binning: per-worker tile bins merged in order
/// 6. Rasterization: one task per tile, into the tile's own G-buffer
/// 7. Gather: tiles into the screen-sized G-buffer
/// 8. Shadow and lighting: deferred, per pixel
/// 9. Encode: linear to gamma BGRA into the caller's buffer
use super::clipping::clip_triangle;
use super::color::Bgra8;
use super::framebuffer::Framebuffer;
use super::shading::{lighting_pass, shadow_pass, ShadingConfig};
use super::texture::Texture;
use super::tile::{FaceCulling, TileBins, TileUniforms};
use super::vertex::{Triangle, Vertex};
use crate::camera::{MatrixState, SceneParameters};
use crate::meshing::Mesh;
use crate::perf::{timed, FrameStats, FUNCTION_COUNTERS};
use crate::count_call;
use glam::{Mat4, Vec4, Vec4Swizzles};
use log::{debug, trace, warn};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Frames slower than this are reported at `warn` level.
const FRAME_BUDGET: Duration = Duration::from_millis(16);

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RasterizerConfig {
    pub face_culling: FaceCulling,
    /// Linear color of pixels no triangle covers.
    pub clear_color: Vec4,
    pub shading: ShadingConfig,
    pub scene: SceneParameters,
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            face_culling: FaceCulling::default(),
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            shading: ShadingConfig::default(),
            scene: SceneParameters::default(),
        }
    }
}

/// Clip space to `(pixel_x, pixel_y, ndc_z, clip_w)`.
#[inline]
pub fn viewport_transform(viewport: &Mat4, clip: Vec4) -> Vec4 {
    let ndc = clip.xyz() / clip.w;
    let screen = *viewport * ndc.extend(1.0);
    Vec4::new(screen.x, screen.y, ndc.z, clip.w)
}

pub struct Rasterizer {
    pub config: RasterizerConfig,
    mesh: Mesh,
    texture: Option<Texture>,
    framebuffer: Framebuffer,
    matrices: MatrixState,
    // Per-frame scratch, reused across frames
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
    lit: Vec<f32>,
    shaded: Vec<Vec4>,
    stats: FrameStats,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::with_config(RasterizerConfig::default())
    }

    pub fn with_config(config: RasterizerConfig) -> Self {
        Self {
            config,
            mesh: Mesh::default(),
            texture: None,
            framebuffer: Framebuffer::new(0, 0),
            matrices: MatrixState::default(),
            vertices: Vec::new(),
            triangles: Vec::new(),
            lit: Vec::new(),
            shaded: Vec::new(),
            stats: FrameStats::default(),
        }
    }

    /// Replace the mesh. An incomplete mesh is accepted but draws nothing.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        debug!(
            "mesh set: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        if !mesh.is_complete() {
            warn!("mesh is missing attributes; frames will contain no geometry");
        }
        self.mesh = mesh;
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Replace the texture. Without one, surfaces are white.
    pub fn set_texture(&mut self, texture: Texture) {
        debug!("texture set: {}x{}", texture.width(), texture.height());
        self.texture = Some(texture);
    }

    pub fn clear_texture(&mut self) {
        self.texture = None;
    }

    #[inline]
    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    #[inline]
    pub fn scene(&self) -> &SceneParameters {
        &self.config.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut SceneParameters {
        &mut self.config.scene
    }

    /// Matrices used by the most recent frame
    #[inline]
    pub fn matrices(&self) -> &MatrixState {
        &self.matrices
    }

    /// Tile grid and G-buffer of the most recent frame
    #[inline]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Post-clip triangles of the most recent frame, in screen space
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    #[inline]
    pub fn last_frame_stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Render one frame of `width * height` pixels into `out`.
    ///
    /// `out` is resized to exactly `width * height`, row 0 at the top. A zero
    /// dimension produces an empty buffer and skips the pipeline.
    pub fn draw(&mut self, width: usize, height: usize, out: &mut Vec<Bgra8>) {
        let frame_start = Instant::now();
        let mut stats = FrameStats {
            width,
            height,
            ..FrameStats::default()
        };

        if width == 0 || height == 0 {
            out.clear();
            self.stats = stats;
            return;
        }

        timed(&mut stats.setup, || self.setup(width, height));

        if self.mesh.is_complete() {
            stats.triangles_in = self.mesh.triangle_count();
            timed(&mut stats.vertex, || self.vertex_stage());
            timed(&mut stats.clipping, || self.clipping_stage());
            timed(&mut stats.viewport_transform, || self.viewport_stage());
        } else {
            self.triangles.clear();
        }
        stats.triangles_out = self.triangles.len();

        let bins = timed(&mut stats.binning, || TileBins::bin(&self.triangles, width, height));
        stats.bin_entries = bins.entry_count();

        timed(&mut stats.rasterization, || self.rasterization_stage(&bins));
        timed(&mut stats.gather, || self.framebuffer.gather());

        let viewport_projection = self.matrices.viewport_projection();
        timed(&mut stats.shadow, || {
            shadow_pass(
                &self.framebuffer.depth,
                width,
                height,
                &viewport_projection,
                &self.config.shading,
                &mut self.lit,
            )
        });
        timed(&mut stats.lighting, || {
            lighting_pass(
                &self.framebuffer.color,
                &self.framebuffer.normal,
                &self.framebuffer.depth,
                &self.lit,
                &self.config.shading,
                &mut self.shaded,
            )
        });
        timed(&mut stats.encode, || {
            self.shaded
                .par_iter()
                .map(|&color| Bgra8::from_linear(color))
                .collect_into_vec(out)
        });

        count_call!(FUNCTION_COUNTERS.frames_drawn);
        stats.total = frame_start.elapsed();
        trace!("{stats}");
        if stats.total > FRAME_BUDGET {
            warn!(
                "frame {}x{} took {:.2}ms",
                width,
                height,
                stats.total.as_secs_f64() * 1e3
            );
        }
        self.stats = stats;
    }

    fn setup(&mut self, width: usize, height: usize) {
        if self.framebuffer.resize(width, height) {
            debug!(
                "framebuffer resized to {}x{} ({}x{} tiles)",
                width, height, self.framebuffer.tiles_x, self.framebuffer.tiles_y
            );
        }
        self.matrices.reset_viewport(width, height, &self.config.scene);
        self.config.scene.advance();
        self.matrices.update_scene(&self.config.scene);
    }

    fn vertex_stage(&mut self) {
        let model_view_projection = self.matrices.model_view_projection();
        let normal_matrix = self.matrices.normal;
        let mesh = &self.mesh;

        mesh.positions()
            .par_iter()
            .zip(mesh.normals())
            .zip(mesh.tex_coords0())
            .map(|((&position, &normal), &tex_coord0)| {
                Vertex::new(model_view_projection * position.extend(1.0), normal_matrix * normal, tex_coord0)
            })
            .collect_into_vec(&mut self.vertices);
    }

    fn clipping_stage(&mut self) {
        let vertices = &self.vertices;
        self.triangles.clear();
        self.triangles.par_extend(self.mesh.triangles().par_iter().flat_map_iter(|&[i0, i1, i2]| {
            clip_triangle(&[vertices[i0 as usize], vertices[i1 as usize], vertices[i2 as usize]])
        }));
    }

    fn viewport_stage(&mut self) {
        let viewport = self.matrices.viewport;
        self.triangles.par_iter_mut().for_each(|triangle| {
            for vertex in triangle.iter_mut() {
                vertex.position = viewport_transform(&viewport, vertex.position);
            }
        });
    }

    fn rasterization_stage(&mut self, bins: &TileBins) {
        let uniforms = TileUniforms {
            texture: self.texture.as_ref(),
            face_culling: self.config.face_culling,
            clear_color: self.config.clear_color,
        };
        let triangles = &self.triangles;

        self.framebuffer
            .tiles_mut()
            .par_iter_mut()
            .zip(bins.bins().par_iter())
            .for_each(|(tile, bin)| {
                tile.reset(uniforms.clear_color);
                tile.schedule_all(bin);
                tile.rasterize(triangles, &uniforms);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::viewport_matrix;
    use crate::meshing::primitives;

    #[test]
    fn viewport_transform_keeps_depth_and_w() {
        let viewport = viewport_matrix(200.0, 100.0);
        let clip = Vec4::new(1.0, 1.0, 0.5, 2.0);

        let screen = viewport_transform(&viewport, clip);
        // NDC (0.5, 0.5) lands right of centre and above it
        assert_eq!(screen, Vec4::new(150.0, 25.0, 0.25, 2.0));
    }

    #[test]
    fn zero_sized_draw_clears_output() {
        let mut rasterizer = Rasterizer::new();
        let mut out = vec![Bgra8::WHITE; 10];
        rasterizer.draw(0, 10, &mut out);
        assert!(out.is_empty());
        rasterizer.draw(10, 0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn incomplete_mesh_draws_clear_color() {
        let mut rasterizer = Rasterizer::new();
        rasterizer.set_mesh(Mesh::new(3, 1));
        let mut out = Vec::new();
        rasterizer.draw(16, 8, &mut out);

        assert_eq!(out.len(), 16 * 8);
        assert!(out.iter().all(|&p| p == Bgra8::BLACK));
        assert_eq!(rasterizer.last_frame_stats().triangles_out, 0);
    }

    #[test]
    fn draw_records_stats_and_advances_scene() {
        let mut rasterizer = Rasterizer::new();
        rasterizer.set_mesh(primitives::cube().unwrap());
        let mut out = Vec::new();
        rasterizer.draw(96, 64, &mut out);

        let stats = rasterizer.last_frame_stats();
        assert_eq!((stats.width, stats.height), (96, 64));
        assert_eq!(stats.triangles_in, 12);
        assert!(stats.triangles_out > 0);
        assert!(stats.bin_entries >= stats.triangles_out);
        assert_eq!(rasterizer.scene().rotate_deg.y, -0.5);
        assert_eq!(rasterizer.triangles().len(), stats.triangles_out);
    }
}
