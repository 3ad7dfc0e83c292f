/// Pipeline vertex carried from the vertex stage through clipping into tiles.
use glam::{Vec2, Vec3, Vec4};
use std::ops::{Add, Mul};

/// Position is homogeneous. Before the viewport transform it is clip space;
/// afterwards it holds `(screen_x, screen_y, ndc_z, clip_w)`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec4,
    pub normal: Vec3,
    pub tex_coord0: Vec2,
}

/// Three vertices of one triangle.
pub type Triangle = [Vertex; 3];

impl Vertex {
    #[inline]
    pub const fn new(position: Vec4, normal: Vec3, tex_coord0: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coord0,
        }
    }

    /// `self + (other - self) * t` over every attribute.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }
}

impl Mul<f32> for Vertex {
    type Output = Vertex;

    #[inline]
    fn mul(self, t: f32) -> Vertex {
        Vertex {
            position: self.position * t,
            normal: self.normal * t,
            tex_coord0: self.tex_coord0 * t,
        }
    }
}

impl Add for Vertex {
    type Output = Vertex;

    #[inline]
    fn add(self, rhs: Vertex) -> Vertex {
        Vertex {
            position: self.position + rhs.position,
            normal: self.normal + rhs.normal,
            tex_coord0: self.tex_coord0 + rhs.tex_coord0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_interpolates_every_attribute() {
        let a = Vertex::new(Vec4::new(0.0, 0.0, 0.0, 1.0), Vec3::X, Vec2::ZERO);
        let b = Vertex::new(Vec4::new(4.0, 2.0, 1.0, 3.0), Vec3::Y, Vec2::ONE);

        let m = a.lerp(b, 0.25);
        assert_eq!(m.position, Vec4::new(1.0, 0.5, 0.25, 1.5));
        assert_eq!(m.normal, Vec3::new(0.75, 0.25, 0.0));
        assert_eq!(m.tex_coord0, Vec2::splat(0.25));

        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }
}
