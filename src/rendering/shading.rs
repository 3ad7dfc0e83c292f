/// Deferred shading passes over the gathered G-buffer: screen-space shadows,
/// then a single directional diffuse term.
use super::tile::FAR_DEPTH;
use crate::{count_call, perf::FUNCTION_COUNTERS};
use glam::{Mat4, Vec2, Vec3, Vec4, Vec4Swizzles};
use rayon::prelude::*;

/// Directional light with screen-space shadows.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShadingConfig {
    /// Direction towards the light, in view space.
    pub light_dir: Vec3,
    /// Lowest diffuse factor; shadowed and back-facing pixels get this.
    pub ambient_floor: f32,
    pub shadows: bool,
    /// Ray-march steps per pixel.
    pub shadow_steps: u32,
    /// Length of the march in view-space units.
    pub shadow_distance: f32,
    /// Depth tolerance before a sample counts as occluded.
    pub shadow_bias: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            light_dir: Vec3::new(1.0, 1.0, -1.0).normalize(),
            ambient_floor: 0.01,
            shadows: true,
            shadow_steps: 32,
            shadow_distance: 2.0,
            shadow_bias: 0.0,
        }
    }
}

impl ShadingConfig {
    /// Lambert factor for one pixel. `lit` is 1 for lit pixels, 0 for shadowed.
    #[inline]
    pub fn diffuse(&self, normal: Vec3, lit: f32) -> f32 {
        (normal.normalize_or_zero().dot(self.light_dir) * lit).clamp(self.ambient_floor, 1.0)
    }
}

/// Screen-space shadow ray marcher over one frame's depth buffer.
pub struct ShadowTracer<'a> {
    depth: &'a [f32],
    width: usize,
    height: usize,
    viewport_projection: Mat4,
    inverse_viewport_projection: Mat4,
    step: Vec4,
    steps: u32,
    bias: f32,
}

impl<'a> ShadowTracer<'a> {
    /// `viewport_projection` maps view space to pixel coordinates (before the divide).
    pub fn new(depth: &'a [f32], width: usize, height: usize, viewport_projection: Mat4, config: &ShadingConfig) -> Self {
        let step_length = config.shadow_distance / config.shadow_steps.max(1) as f32;
        Self {
            depth,
            width,
            height,
            viewport_projection,
            inverse_viewport_projection: viewport_projection.inverse(),
            step: (config.light_dir * step_length).extend(0.0),
            steps: config.shadow_steps,
            bias: config.shadow_bias,
        }
    }

    /// Whether the pixel at `(x, y)` sees the light.
    ///
    /// The pixel centre is unprojected, marched towards the light and
    /// re-projected at every step. A step that lands behind geometry already
    /// in the depth buffer means shadow. Leaving the frustum (off screen,
    /// behind the camera or past the far plane) means lit, and background
    /// pixels never occlude.
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        let pixel_depth = self.depth[y * self.width + x];
        let fragment = self.inverse_viewport_projection * Vec4::new(x as f32 + 0.5, y as f32 + 0.5, pixel_depth, 1.0);
        let mut sample = fragment / fragment.w;
        let screen = Vec2::new(self.width as f32, self.height as f32);

        for _ in 0..self.steps {
            sample += self.step;

            let projected = self.viewport_projection * sample;
            if projected.w <= 0.0 {
                return true;
            }
            let pixel = projected.xy() / projected.w;
            if !(pixel.cmpge(Vec2::ZERO).all() && pixel.cmplt(screen).all()) {
                return true;
            }

            let sample_depth = projected.z / projected.w;
            if sample_depth > FAR_DEPTH {
                return true;
            }
            let scene_depth = self.depth[pixel.y as usize * self.width + pixel.x as usize];
            if scene_depth >= FAR_DEPTH {
                continue;
            }
            if scene_depth < sample_depth - self.bias {
                return false;
            }
        }
        true
    }
}

/// Fill `lit` with 1.0 for lit pixels and 0.0 for shadowed ones.
/// Background pixels (still at the far depth) are left lit.
pub fn shadow_pass(
    depth: &[f32],
    width: usize,
    height: usize,
    viewport_projection: &Mat4,
    config: &ShadingConfig,
    lit: &mut Vec<f32>,
) {
    lit.clear();
    lit.resize(width * height, 1.0);
    if !config.shadows || width == 0 {
        return;
    }

    let tracer = ShadowTracer::new(depth, width, height, *viewport_projection, config);
    lit.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            if depth[y * width + x] >= FAR_DEPTH {
                continue;
            }
            if !tracer.is_lit(x, y) {
                count_call!(FUNCTION_COUNTERS.pixels_shadowed);
                *out = 0.0;
            }
        }
    });
}

/// Apply the diffuse term to every covered pixel. Alpha is left untouched and
/// uncovered pixels keep their color (the clear color).
pub fn lighting_pass(
    color: &[Vec4],
    normal: &[Vec3],
    depth: &[f32],
    lit: &[f32],
    config: &ShadingConfig,
    out: &mut Vec<Vec4>,
) {
    color
        .par_iter()
        .zip(normal)
        .zip(depth)
        .zip(lit)
        .map(|(((&c, &n), &d), &l)| {
            if d >= FAR_DEPTH {
                return c;
            }
            let diffuse = config.diffuse(n, l);
            (c.xyz() * diffuse).extend(c.w)
        })
        .collect_into_vec(out);
}
