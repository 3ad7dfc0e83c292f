/// Indexed triangle mesh consumed by the rasterizer.
///
/// Vertex and triangle counts are fixed at construction. Each attribute is
/// installed by its own validating setter; until all four have succeeded the
/// mesh reports `is_complete() == false` and the pipeline draws nothing from it.
use crate::error::{RasterizerError, Result};
use glam::{Vec2, Vec3};
use rayon::prelude::*;

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertex_count: usize,
    triangle_count: usize,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords0: Vec<Vec2>,
    triangles: Vec<[u32; 3]>,
    has_positions: bool,
    has_normals: bool,
    has_tex_coords0: bool,
    has_triangles: bool,
}

impl Mesh {
    pub fn new(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertex_count,
            triangle_count,
            ..Self::default()
        }
    }

    fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected != actual {
            return Err(RasterizerError::SizeMismatch {
                what,
                expected,
                actual,
            });
        }
        Ok(())
    }

    pub fn set_positions(&mut self, positions: Vec<Vec3>) -> Result<()> {
        Self::check_len("positions", self.vertex_count, positions.len())?;
        self.positions = positions;
        self.has_positions = true;
        Ok(())
    }

    pub fn set_normals(&mut self, normals: Vec<Vec3>) -> Result<()> {
        Self::check_len("normals", self.vertex_count, normals.len())?;
        self.normals = normals;
        self.has_normals = true;
        Ok(())
    }

    pub fn set_tex_coords0(&mut self, tex_coords: Vec<Vec2>) -> Result<()> {
        Self::check_len("tex_coords0", self.vertex_count, tex_coords.len())?;
        self.tex_coords0 = tex_coords;
        self.has_tex_coords0 = true;
        Ok(())
    }

    pub fn set_triangles(&mut self, triangles: Vec<[u32; 3]>) -> Result<()> {
        Self::check_len("triangles", self.triangle_count, triangles.len())?;

        let vertex_count = self.vertex_count;
        let bad = triangles.iter().enumerate().find_map(|(triangle, indices)| {
            indices
                .iter()
                .find(|&&index| index as usize >= vertex_count)
                .map(|&index| RasterizerError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                })
        });
        if let Some(err) = bad {
            return Err(err);
        }

        self.triangles = triangles;
        self.has_triangles = true;
        Ok(())
    }

    /// Replace the normals with area-weighted averages of the adjacent face
    /// normals. Requires positions and triangles.
    pub fn compute_normals(&mut self) -> Result<()> {
        if !self.has_positions {
            return Err(RasterizerError::MissingAttribute("positions"));
        }
        if !self.has_triangles {
            return Err(RasterizerError::MissingAttribute("triangles"));
        }

        let vertex_count = self.vertex_count;
        let positions = &self.positions;

        // Each worker accumulates into its own buffer; buffers are summed at the end.
        let accumulated = self
            .triangles
            .par_iter()
            .fold(
                || vec![Vec3::ZERO; vertex_count],
                |mut acc, &[i0, i1, i2]| {
                    let a = positions[i0 as usize];
                    let b = positions[i1 as usize];
                    let c = positions[i2 as usize];
                    // Length is twice the face area, which gives the weighting.
                    let n = (c - a).cross(b - a);
                    acc[i0 as usize] += n;
                    acc[i1 as usize] += n;
                    acc[i2 as usize] += n;
                    acc
                },
            )
            .reduce(
                || vec![Vec3::ZERO; vertex_count],
                |mut lhs, rhs| {
                    for (l, r) in lhs.iter_mut().zip(rhs) {
                        *l += r;
                    }
                    lhs
                },
            );

        self.normals = accumulated.into_par_iter().map(Vec3::normalize_or_zero).collect();
        self.has_normals = true;
        Ok(())
    }

    /// Texture coordinates from projecting positions onto their XY bounding box.
    /// Used when a source mesh carries no UVs.
    pub fn planar_tex_coords(positions: &[Vec3]) -> Vec<Vec2> {
        let (min, max) = positions.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(p.truncate()), max.max(p.truncate())),
        );
        let size = (max - min).max(Vec2::splat(f32::EPSILON));
        positions.iter().map(|p| (p.truncate() - min) / size).collect()
    }

    /// True once all four attributes have been set.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.has_positions && self.has_normals && self.has_tex_coords0 && self.has_triangles
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[inline]
    pub fn tex_coords0(&self) -> &[Vec2] {
        &self.tex_coords0
    }

    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }
}
