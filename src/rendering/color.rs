/// Gamma-encoded 8-bit storage color and the lookup tables that convert it
/// to and from linear floating point.
///
/// Lighting math runs on linear `Vec4` values. Texels arrive and pixels leave
/// as gamma-encoded `Bgra8`. Both conversions go through 256-entry tables so
/// no `powf` runs per texel or per pixel:
/// - decoding indexes `to_linear[code]`
/// - encoding binary-searches the 255 midpoints between consecutive decoded
///   codes, which makes `encode(decode(x)) == x` for every code
///
/// Alpha is treated as linear coverage in both directions.
use bytemuck::{Pod, Zeroable};
use glam::Vec4;
use std::sync::LazyLock;

/// Power-law exponent relating gamma-encoded and linear intensity.
pub const GAMMA: f32 = 2.2;

struct ColorTables {
    to_linear: [f32; 256],
    encode_midpoints: [f32; 255],
}

impl ColorTables {
    fn build() -> Self {
        let mut to_linear = [0.0f32; 256];
        for (code, value) in to_linear.iter_mut().enumerate() {
            *value = (code as f32 / 255.0).powf(GAMMA);
        }

        let mut encode_midpoints = [0.0f32; 255];
        for (i, mid) in encode_midpoints.iter_mut().enumerate() {
            *mid = 0.5 * (to_linear[i] + to_linear[i + 1]);
        }

        Self {
            to_linear,
            encode_midpoints,
        }
    }
}

static TABLES: LazyLock<ColorTables> = LazyLock::new(ColorTables::build);

/// Decode one gamma-encoded channel to linear intensity in [0, 1].
#[inline]
pub fn gamma_to_linear(code: u8) -> f32 {
    TABLES.to_linear[code as usize]
}

/// Encode one linear channel to the nearest gamma code.
/// Values outside [0, 1] saturate; NaN encodes as 0.
#[inline]
pub fn linear_to_gamma(value: f32) -> u8 {
    // Number of midpoints at or below `value` is the nearest code.
    let code = TABLES.encode_midpoints.partition_point(|&mid| mid <= value);
    code as u8
}

#[inline]
fn unorm_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Gamma-encoded pixel in B, G, R, A byte order.
///
/// `#[repr(C)]` + `Pod` lets hosts reinterpret a `&[Bgra8]` as raw bytes
/// with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Bgra8 {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Bgra8 {
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }

    /// Convert to linear RGBA.
    #[inline]
    pub fn to_linear(self) -> Vec4 {
        Vec4::new(
            gamma_to_linear(self.r),
            gamma_to_linear(self.g),
            gamma_to_linear(self.b),
            self.a as f32 / 255.0,
        )
    }

    /// Encode a linear RGBA color.
    #[inline]
    pub fn from_linear(color: Vec4) -> Self {
        Self {
            b: linear_to_gamma(color.z),
            g: linear_to_gamma(color.y),
            r: linear_to_gamma(color.x),
            a: unorm_to_u8(color.w),
        }
    }

    /// Pack as `0x00RRGGBB`, the layout softbuffer-style surfaces expect.
    #[inline]
    pub const fn to_xrgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }
}
