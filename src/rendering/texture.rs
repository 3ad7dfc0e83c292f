/// Linear-space texture with nearest-neighbour sampling.
///
/// The gamma-encoded bitmap is converted to linear texels once, at
/// construction. Sampling never wraps: coordinates clamp to [0, 1].
use super::color::Bgra8;
use crate::error::{RasterizerError, Result};
use glam::{Vec2, Vec4};
use rayon::prelude::*;

#[derive(Clone, Debug)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<Vec4>,
}

impl Texture {
    /// Build a texture from `width * height` gamma-encoded texels in row-major order.
    pub fn new(width: usize, height: usize, bitmap: &[Bgra8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterizerError::EmptyTexture { width, height });
        }
        if bitmap.len() != width * height {
            return Err(RasterizerError::TextureSizeMismatch {
                width,
                height,
                actual: bitmap.len(),
            });
        }

        let texels = bitmap.par_iter().map(|texel| texel.to_linear()).collect();

        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// 1×1 texture of a single color.
    pub fn solid(color: Bgra8) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![color.to_linear()],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Linear texel at integer coordinates.
    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> Vec4 {
        self.texels[y * self.width + x]
    }

    /// Nearest texel to `uv`, with `uv` clamped to [0, 1].
    #[inline]
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let uv = uv.clamp(Vec2::ZERO, Vec2::ONE);
        let x = (uv.x * (self.width - 1) as f32).round() as usize;
        let y = (uv.y * (self.height - 1) as f32).round() as usize;
        self.texel(x.min(self.width - 1), y.min(self.height - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Texture {
        let bitmap = [
            Bgra8::rgba(255, 0, 0, 255),
            Bgra8::rgba(0, 255, 0, 255),
            Bgra8::rgba(0, 0, 255, 255),
            Bgra8::WHITE,
        ];
        Texture::new(2, 2, &bitmap).unwrap()
    }

    #[test]
    fn rejects_wrong_bitmap_size() {
        let err = Texture::new(2, 2, &[Bgra8::WHITE; 3]).unwrap_err();
        assert_eq!(
            err,
            RasterizerError::TextureSizeMismatch {
                width: 2,
                height: 2,
                actual: 3
            }
        );
        assert!(matches!(
            Texture::new(0, 4, &[]),
            Err(RasterizerError::EmptyTexture { .. })
        ));
    }

    #[test]
    fn texels_are_converted_to_linear() {
        let tex = Texture::new(1, 1, &[Bgra8::rgba(128, 255, 0, 255)]).unwrap();
        let t = tex.texel(0, 0);
        assert!((t.x - (128.0f32 / 255.0).powf(2.2)).abs() < 1e-5);
        assert_eq!(t.y, 1.0);
        assert_eq!(t.z, 0.0);
    }

    #[test]
    fn sampling_picks_nearest_texel() {
        let tex = two_by_two();
        assert_eq!(tex.sample(Vec2::new(0.1, 0.2)), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(tex.sample(Vec2::new(0.9, 0.1)), Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(tex.sample(Vec2::new(0.2, 0.8)), Vec4::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(tex.sample(Vec2::new(0.7, 0.7)), Vec4::ONE);
    }

    #[test]
    fn sampling_clamps_instead_of_wrapping() {
        let tex = two_by_two();
        assert_eq!(tex.sample(Vec2::new(-5.0, -5.0)), tex.texel(0, 0));
        assert_eq!(tex.sample(Vec2::new(1.5, 0.0)), tex.texel(1, 0));
        assert_eq!(tex.sample(Vec2::new(3.0, 3.0)), tex.texel(1, 1));
    }
}
