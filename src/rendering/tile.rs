/// Tile-based rasterization
///
/// The screen is cut into `TILE_SIZE`×`TILE_SIZE` tiles. After the viewport
/// transform every triangle is binned into the tiles its bounding box touches;
/// each tile then scan-converts its own list with no shared mutable state, so
/// tiles rasterize in parallel.
///
/// Binning runs per worker into private `TileBins` that are merged in
/// triangle order, so a tile sees its triangles in submission order no matter
/// how the work was split.
use super::texture::Texture;
use super::vertex::Triangle;
use crate::{count_call, perf::FUNCTION_COUNTERS};
use glam::{Vec2, Vec3, Vec4};
use rayon::prelude::*;
use std::ops::{Add, Mul};

/// Tile edge length in pixels. 64×64 texels of color, normal and depth come
/// to 112KB per tile.
pub const TILE_SIZE: usize = 64;

/// Depth a tile is cleared to. Pixels still at this depth after
/// rasterization were not covered by any triangle.
pub const FAR_DEPTH: f32 = 1.0;

/// Index of a triangle in the frame's triangle arena.
pub type TriangleId = u32;

/// Which triangle windings produce fragments.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FaceCulling {
    /// Both windings are drawn.
    #[default]
    DoubleSided,
    /// Only faces whose `(c - a) × (b - a)` normal points at the camera are
    /// drawn. In y-down pixel space these have a negative signed area.
    BackFace,
}

impl FaceCulling {
    /// Whether a triangle with doubled signed area `area` survives.
    #[inline]
    pub fn accepts(self, area: f32) -> bool {
        match self {
            FaceCulling::DoubleSided => area != 0.0,
            FaceCulling::BackFace => area < 0.0,
        }
    }
}

/// Read-only state shared by every tile during one rasterization pass.
#[derive(Copy, Clone, Debug)]
pub struct TileUniforms<'a> {
    pub texture: Option<&'a Texture>,
    pub face_culling: FaceCulling,
    /// Linear color written to pixels no triangle covers.
    pub clear_color: Vec4,
}

/// `(b - a) × (p - a)`, the z component of the 2D cross product.
/// Positive when `p` is to the left of `a -> b` in y-up coordinates.
#[inline(always)]
pub fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Perspective-correct interpolation of a vertex attribute.
///
/// `bary` are screen-space barycentrics and `w` the clip-space w of each
/// vertex. Attributes vary linearly in `attr / w`, so the screen weights are
/// divided by w and renormalised.
#[inline]
pub fn perspective_interpolate<T>(bary: Vec3, w: Vec3, attrs: [T; 3]) -> T
where
    T: Copy + Mul<f32, Output = T> + Add<Output = T>,
{
    let bz = bary / w;
    let inv = 1.0 / (bz.x + bz.y + bz.z);
    (attrs[0] * bz.x + attrs[1] * bz.y + attrs[2] * bz.z) * inv
}

/// Inclusive pixel range whose centres `i + 0.5` fall inside `[min, max]`,
/// clamped to `0..extent`. `None` when no pixel centre is covered.
#[inline]
pub fn pixel_range(min: f32, max: f32, extent: usize) -> Option<(usize, usize)> {
    if extent == 0 {
        return None;
    }
    let lo = (min - 0.5).ceil().max(0.0);
    let hi = (max - 0.5).floor().min((extent - 1) as f32);
    // Also rejects NaN bounds
    if !(lo <= hi) {
        return None;
    }
    Some((lo as usize, hi as usize))
}

/// Number of tiles across and down for a screen of the given size.
#[inline]
pub fn grid_dim(width: usize, height: usize) -> (usize, usize) {
    (width.div_ceil(TILE_SIZE), height.div_ceil(TILE_SIZE))
}

/// Screen-space bounding box of a triangle's xy.
#[inline]
pub fn screen_bounds(triangle: &Triangle) -> (Vec2, Vec2) {
    let p = triangle.map(|v| v.position.truncate().truncate());
    (p[0].min(p[1]).min(p[2]), p[0].max(p[1]).max(p[2]))
}

/// One screen tile: its pending triangles and a small G-buffer.
pub struct Tile {
    /// Top-left pixel in framebuffer coordinates
    pub x0: usize,
    pub y0: usize,
    /// Actual size (smaller than TILE_SIZE on the right and bottom edges)
    pub width: usize,
    pub height: usize,
    color: Box<[Vec4]>,
    normal: Box<[Vec3]>,
    depth: Box<[f32]>,
    pending: Vec<TriangleId>,
}

impl Tile {
    pub fn new(x0: usize, y0: usize, width: usize, height: usize) -> Self {
        let capacity = width * height;
        Self {
            x0,
            y0,
            width,
            height,
            color: vec![Vec4::ZERO; capacity].into_boxed_slice(),
            normal: vec![Vec3::ZERO; capacity].into_boxed_slice(),
            depth: vec![FAR_DEPTH; capacity].into_boxed_slice(),
            pending: Vec::new(),
        }
    }

    /// Clear the pending list and all pixel buffers. Called once per frame.
    pub fn reset(&mut self, clear_color: Vec4) {
        self.pending.clear();
        self.color.fill(clear_color);
        self.normal.fill(Vec3::ZERO);
        self.depth.fill(FAR_DEPTH);
    }

    #[inline]
    pub fn schedule(&mut self, id: TriangleId) {
        self.pending.push(id);
    }

    pub fn schedule_all(&mut self, ids: &[TriangleId]) {
        self.pending.extend_from_slice(ids);
    }

    #[inline]
    pub fn pending(&self) -> &[TriangleId] {
        &self.pending
    }

    /// Scan-convert every pending triangle, in order, into this tile.
    ///
    /// `triangles` is the frame's arena in screen space: xy in pixels, z the
    /// NDC depth and w the clip-space w.
    pub fn rasterize(&mut self, triangles: &[Triangle], uniforms: &TileUniforms<'_>) {
        for &id in &self.pending {
            let triangle = &triangles[id as usize];
            Self::rasterize_triangle(
                triangle,
                uniforms,
                (self.x0, self.y0, self.width, self.height),
                &mut self.color,
                &mut self.normal,
                &mut self.depth,
            );
        }
    }

    fn rasterize_triangle(
        triangle: &Triangle,
        uniforms: &TileUniforms<'_>,
        (x0, y0, width, height): (usize, usize, usize, usize),
        color: &mut [Vec4],
        normal: &mut [Vec3],
        depth: &mut [f32],
    ) {
        let [v0, v1, v2] = triangle;
        let p0 = v0.position.truncate().truncate();
        let p1 = v1.position.truncate().truncate();
        let p2 = v2.position.truncate().truncate();

        let area = edge_function(p0, p1, p2);
        if !uniforms.face_culling.accepts(area) {
            count_call!(FUNCTION_COUNTERS.tile_triangles_culled);
            return;
        }
        let inv_area = 1.0 / area;

        // Triangle bounds intersected with this tile, in tile-local pixels
        let (min, max) = screen_bounds(triangle);
        let offset = Vec2::new(x0 as f32, y0 as f32);
        let (Some((min_x, max_x)), Some((min_y, max_y))) = (
            pixel_range(min.x - offset.x, max.x - offset.x, width),
            pixel_range(min.y - offset.y, max.y - offset.y, height),
        ) else {
            return;
        };

        let z = Vec3::new(v0.position.z, v1.position.z, v2.position.z);
        let w = Vec3::new(v0.position.w, v1.position.w, v2.position.w);

        for y in min_y..=max_y {
            let row = y * width;
            for x in min_x..=max_x {
                let p = offset + Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

                // Dividing by the signed area makes inside-ness winding independent
                let bary = Vec3::new(
                    edge_function(p1, p2, p),
                    edge_function(p2, p0, p),
                    edge_function(p0, p1, p),
                ) * inv_area;
                if !(bary.x >= 0.0 && bary.y >= 0.0 && bary.z >= 0.0) {
                    continue;
                }

                count_call!(FUNCTION_COUNTERS.pixels_tested);
                let idx = row + x;
                let fragment_depth = bary.dot(z);
                if fragment_depth > depth[idx] {
                    count_call!(FUNCTION_COUNTERS.depth_failed);
                    continue;
                }
                count_call!(FUNCTION_COUNTERS.depth_passed);
                depth[idx] = fragment_depth;

                let n = perspective_interpolate(bary, w, [v0.normal, v1.normal, v2.normal]);
                normal[idx] = n;

                color[idx] = match uniforms.texture {
                    Some(texture) => {
                        let uv = perspective_interpolate(bary, w, [v0.tex_coord0, v1.tex_coord0, v2.tex_coord0]);
                        texture.sample(uv)
                    }
                    None => Vec4::ONE,
                };
            }
        }
    }

    /// Tile-local accessors
    #[inline]
    pub fn color_at(&self, x: usize, y: usize) -> Vec4 {
        self.color[y * self.width + x]
    }

    #[inline]
    pub fn normal_at(&self, x: usize, y: usize) -> Vec3 {
        self.normal[y * self.width + x]
    }

    #[inline]
    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[y * self.width + x]
    }

    /// One local row of each buffer, for copying into the full-screen G-buffer.
    #[inline]
    pub fn row(&self, y: usize) -> (&[Vec4], &[Vec3], &[f32]) {
        let range = y * self.width..(y + 1) * self.width;
        (
            &self.color[range.clone()],
            &self.normal[range.clone()],
            &self.depth[range],
        )
    }
}

/// Per-tile triangle lists for one screen size.
#[derive(Clone, Debug)]
pub struct TileBins {
    pub fb_width: usize,
    pub fb_height: usize,
    pub tiles_x: usize,
    pub tiles_y: usize,
    bins: Vec<Vec<TriangleId>>,
}

impl TileBins {
    pub fn new(fb_width: usize, fb_height: usize) -> Self {
        let (tiles_x, tiles_y) = grid_dim(fb_width, fb_height);
        Self {
            fb_width,
            fb_height,
            tiles_x,
            tiles_y,
            bins: vec![Vec::new(); tiles_x * tiles_y],
        }
    }

    /// Clear all bins (reuse allocations)
    pub fn clear(&mut self) {
        for bin in &mut self.bins {
            bin.clear();
        }
    }

    /// Append `id` to every tile whose pixels overlap the box `[min, max]`.
    /// Returns false if the box covers no pixel centre on screen.
    pub fn add_bounds(&mut self, id: TriangleId, min: Vec2, max: Vec2) -> bool {
        let (Some((min_x, max_x)), Some((min_y, max_y))) = (
            pixel_range(min.x, max.x, self.fb_width),
            pixel_range(min.y, max.y, self.fb_height),
        ) else {
            return false;
        };

        for ty in min_y / TILE_SIZE..=max_y / TILE_SIZE {
            for tx in min_x / TILE_SIZE..=max_x / TILE_SIZE {
                self.bins[ty * self.tiles_x + tx].push(id);
                count_call!(FUNCTION_COUNTERS.bin_entries);
            }
        }
        true
    }

    #[inline]
    pub fn add_triangle(&mut self, id: TriangleId, triangle: &Triangle) -> bool {
        let (min, max) = screen_bounds(triangle);
        self.add_bounds(id, min, max)
    }

    /// Append every bin of `other` after the matching bin of `self`.
    pub fn merge(&mut self, other: &TileBins) {
        debug_assert_eq!(self.bins.len(), other.bins.len());
        for (dst, src) in self.bins.iter_mut().zip(&other.bins) {
            dst.extend_from_slice(src);
        }
    }

    /// Bin a whole arena in parallel. Each worker fills private bins; they are
    /// merged left to right so every list stays in ascending id order.
    pub fn bin(triangles: &[Triangle], fb_width: usize, fb_height: usize) -> Self {
        triangles
            .par_iter()
            .enumerate()
            .fold(
                || TileBins::new(fb_width, fb_height),
                |mut bins, (id, triangle)| {
                    bins.add_triangle(id as TriangleId, triangle);
                    bins
                },
            )
            .reduce(
                || TileBins::new(fb_width, fb_height),
                |mut left, right| {
                    left.merge(&right);
                    left
                },
            )
    }

    #[inline]
    pub fn get_bin(&self, tile_x: usize, tile_y: usize) -> &[TriangleId] {
        &self.bins[tile_y * self.tiles_x + tile_x]
    }

    /// Bins in row-major tile order
    #[inline]
    pub fn bins(&self) -> &[Vec<TriangleId>] {
        &self.bins
    }

    pub fn entry_count(&self) -> usize {
        self.bins.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::color::Bgra8;
    use crate::rendering::vertex::Vertex;

    fn screen_vertex(x: f32, y: f32, z: f32, w: f32) -> Vertex {
        Vertex::new(Vec4::new(x, y, z, w), Vec3::NEG_Z, Vec2::ZERO)
    }

    fn uniforms(face_culling: FaceCulling) -> TileUniforms<'static> {
        TileUniforms {
            texture: None,
            face_culling,
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    fn covered(tile: &Tile) -> usize {
        (0..tile.height)
            .flat_map(|y| (0..tile.width).map(move |x| (x, y)))
            .filter(|&(x, y)| tile.depth_at(x, y) < FAR_DEPTH)
            .count()
    }

    #[test]
    fn test_grid_dim() {
        assert_eq!(grid_dim(1280, 720), (20, 12));
        assert_eq!(grid_dim(64, 64), (1, 1));
        assert_eq!(grid_dim(65, 1), (2, 1));
        assert_eq!(grid_dim(0, 0), (0, 0));
    }

    #[test]
    fn test_pixel_range_uses_centres() {
        assert_eq!(pixel_range(0.0, 64.0, 128), Some((0, 63)));
        assert_eq!(pixel_range(0.6, 1.4, 128), None);
        assert_eq!(pixel_range(0.4, 1.6, 128), Some((0, 1)));
        assert_eq!(pixel_range(-50.0, 500.0, 128), Some((0, 127)));
        assert_eq!(pixel_range(200.0, 300.0, 128), None);
        assert_eq!(pixel_range(f32::NAN, 1.0, 128), None);
    }

    #[test]
    fn test_tile_reset() {
        let mut tile = Tile::new(0, 0, TILE_SIZE, TILE_SIZE);
        tile.schedule(3);
        tile.reset(Vec4::new(0.25, 0.5, 0.75, 1.0));

        assert!(tile.pending().is_empty());
        assert_eq!(tile.color_at(10, 10), Vec4::new(0.25, 0.5, 0.75, 1.0));
        assert_eq!(tile.normal_at(0, 0), Vec3::ZERO);
        assert_eq!(tile.depth_at(63, 63), FAR_DEPTH);
    }

    #[test]
    fn test_full_tile_coverage() {
        // Two triangles covering the whole tile
        let a = screen_vertex(0.0, 0.0, 0.5, 1.0);
        let b = screen_vertex(64.0, 0.0, 0.5, 1.0);
        let c = screen_vertex(64.0, 64.0, 0.5, 1.0);
        let d = screen_vertex(0.0, 64.0, 0.5, 1.0);
        let triangles = [[a, b, c], [a, c, d]];

        let mut tile = Tile::new(0, 0, TILE_SIZE, TILE_SIZE);
        tile.reset(Vec4::ZERO);
        tile.schedule_all(&[0, 1]);
        tile.rasterize(&triangles, &uniforms(FaceCulling::DoubleSided));

        assert_eq!(covered(&tile), TILE_SIZE * TILE_SIZE);
        assert_eq!(tile.color_at(5, 60), Vec4::ONE);
        assert!((tile.normal_at(30, 30) - Vec3::NEG_Z).length() < 1e-6);
        assert!((tile.depth_at(30, 30) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tile_offset_and_partial_size() {
        // Edge tile at (64, 0) that is only 10 pixels wide
        let triangles = [[
            screen_vertex(0.0, 0.0, 0.5, 1.0),
            screen_vertex(200.0, 0.0, 0.5, 1.0),
            screen_vertex(0.0, 200.0, 0.5, 1.0),
        ]];
        let mut tile = Tile::new(64, 0, 10, TILE_SIZE);
        tile.reset(Vec4::ZERO);
        tile.schedule(0);
        tile.rasterize(&triangles, &uniforms(FaceCulling::DoubleSided));

        // Local (0, 0) is screen pixel (64.5, 0.5), inside
        assert!(tile.depth_at(0, 0) < FAR_DEPTH);
        // Local (9, 63) is screen (73.5, 63.5), x + y < 200, inside
        assert!(tile.depth_at(9, 63) < FAR_DEPTH);
        assert_eq!(covered(&tile), 10 * TILE_SIZE);
    }

    #[test]
    fn test_backface_culling_keeps_camera_facing_winding() {
        // Counter-clockwise in y-down pixel space: negative area
        let front = [
            screen_vertex(0.0, 64.0, 0.5, 1.0),
            screen_vertex(64.0, 64.0, 0.5, 1.0),
            screen_vertex(0.0, 0.0, 0.5, 1.0),
        ];
        let back = [front[0], front[2], front[1]];
        assert!(edge_function(Vec2::new(0.0, 64.0), Vec2::new(64.0, 64.0), Vec2::ZERO) < 0.0);

        for (triangle, expect_drawn) in [(front, true), (back, false)] {
            let mut tile = Tile::new(0, 0, TILE_SIZE, TILE_SIZE);
            tile.reset(Vec4::ZERO);
            tile.schedule(0);
            tile.rasterize(&[triangle], &uniforms(FaceCulling::BackFace));
            assert_eq!(covered(&tile) > 0, expect_drawn);

            let mut tile = Tile::new(0, 0, TILE_SIZE, TILE_SIZE);
            tile.reset(Vec4::ZERO);
            tile.schedule(0);
            tile.rasterize(&[triangle], &uniforms(FaceCulling::DoubleSided));
            assert!(covered(&tile) > 0);
        }
    }

    #[test]
    fn test_degenerate_triangle_is_skipped() {
        let line = [
            screen_vertex(0.0, 0.0, 0.5, 1.0),
            screen_vertex(32.0, 32.0, 0.5, 1.0),
            screen_vertex(64.0, 64.0, 0.5, 1.0),
        ];
        let mut tile = Tile::new(0, 0, TILE_SIZE, TILE_SIZE);
        tile.reset(Vec4::ZERO);
        tile.schedule(0);
        tile.rasterize(&[line], &uniforms(FaceCulling::DoubleSided));
        assert_eq!(covered(&tile), 0);
    }

    #[test]
    fn test_depth_test_keeps_nearest_regardless_of_order() {
        let quad = |z: f32| {
            [
                screen_vertex(0.0, 0.0, z, 1.0),
                screen_vertex(128.0, 0.0, z, 1.0),
                screen_vertex(0.0, 128.0, z, 1.0),
            ]
        };
        let near = quad(0.25);
        let far = quad(0.75);

        for order in [[near, far], [far, near]] {
            let mut tile = Tile::new(0, 0, TILE_SIZE, TILE_SIZE);
            tile.reset(Vec4::ZERO);
            tile.schedule_all(&[0, 1]);
            tile.rasterize(&order, &uniforms(FaceCulling::DoubleSided));
            assert!((tile.depth_at(10, 10) - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_texture_is_sampled_with_perspective() {
        // Left half of the texture red, right half green
        let texture = Texture::new(2, 1, &[Bgra8::rgba(255, 0, 0, 255), Bgra8::rgba(0, 255, 0, 255)]).unwrap();
        let mut a = screen_vertex(0.0, 0.0, 0.5, 1.0);
        let mut b = screen_vertex(64.0, 0.0, 0.5, 4.0);
        let mut c = screen_vertex(0.0, 64.0, 0.5, 1.0);
        a.tex_coord0 = Vec2::new(0.0, 0.0);
        b.tex_coord0 = Vec2::new(1.0, 0.0);
        c.tex_coord0 = Vec2::new(0.0, 0.0);

        let mut tile = Tile::new(0, 0, TILE_SIZE, TILE_SIZE);
        tile.reset(Vec4::ZERO);
        tile.schedule(0);
        tile.rasterize(
            &[[a, b, c]],
            &TileUniforms {
                texture: Some(&texture),
                ..uniforms(FaceCulling::DoubleSided)
            },
        );

        // Screen-space halfway to b, but b is 4x further away, so u is only 0.2
        assert_eq!(tile.color_at(31, 0), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(tile.color_at(62, 0), Vec4::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_perspective_interpolate_constant_attribute() {
        let bary = Vec3::new(0.2, 0.3, 0.5);
        for w in [Vec3::ONE, Vec3::new(0.5, 3.0, 9.0), Vec3::new(100.0, 0.01, 1.0)] {
            let v = perspective_interpolate(bary, w, [Vec2::splat(0.7); 3]);
            assert!((v - Vec2::splat(0.7)).length() < 1e-5);
        }
        // With equal w it reduces to the affine blend
        let v = perspective_interpolate(bary, Vec3::splat(2.0), [0.0f32, 1.0, 2.0].map(Vec2::splat));
        assert!((v.x - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_binning_small_triangle() {
        let mut bins = TileBins::new(1280, 720);
        assert_eq!((bins.tiles_x, bins.tiles_y), (20, 12));

        assert!(bins.add_bounds(0, Vec2::new(2.0, 2.0), Vec2::new(40.0, 40.0)));
        assert_eq!(bins.get_bin(0, 0), &[0]);
        assert!(bins.get_bin(1, 0).is_empty());
        assert_eq!(bins.entry_count(), 1);
    }

    #[test]
    fn test_binning_boundary_uses_pixel_centres() {
        let mut bins = TileBins::new(256, 256);

        // Ends exactly on the tile edge: pixel 63 is the last covered centre
        bins.add_bounds(0, Vec2::new(10.0, 10.0), Vec2::new(64.0, 20.0));
        assert_eq!(bins.get_bin(0, 0), &[0]);
        assert!(bins.get_bin(1, 0).is_empty());

        // Reaches the centre of pixel 64
        bins.add_bounds(1, Vec2::new(10.0, 10.0), Vec2::new(64.6, 20.0));
        assert_eq!(bins.get_bin(0, 0), &[0, 1]);
        assert_eq!(bins.get_bin(1, 0), &[1]);
    }

    #[test]
    fn test_binning_crosses_tiles_and_rejects_offscreen() {
        let mut bins = TileBins::new(256, 256);
        assert!(bins.add_bounds(7, Vec2::new(32.0, 32.0), Vec2::new(96.0, 96.0)));
        for (tx, ty) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(bins.get_bin(tx, ty), &[7]);
        }
        assert!(bins.get_bin(2, 0).is_empty());

        assert!(!bins.add_bounds(8, Vec2::new(300.0, 10.0), Vec2::new(400.0, 20.0)));
        assert!(!bins.add_bounds(9, Vec2::new(-40.0, -40.0), Vec2::new(-1.0, -1.0)));
        assert_eq!(bins.entry_count(), 4);
    }

    #[test]
    fn test_parallel_binning_preserves_order() {
        let triangles: Vec<Triangle> = (0..500)
            .map(|i| {
                let x = (i % 7) as f32 * 30.0;
                [
                    screen_vertex(x, 0.0, 0.5, 1.0),
                    screen_vertex(x + 40.0, 0.0, 0.5, 1.0),
                    screen_vertex(x, 100.0, 0.5, 1.0),
                ]
            })
            .collect();

        let bins = TileBins::bin(&triangles, 256, 128);
        let mut sequential = TileBins::new(256, 128);
        for (id, t) in triangles.iter().enumerate() {
            sequential.add_triangle(id as TriangleId, t);
        }

        assert_eq!(bins.bins(), sequential.bins());
        for bin in bins.bins() {
            assert!(bin.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_merge_appends_in_order() {
        let mut left = TileBins::new(128, 64);
        let mut right = TileBins::new(128, 64);
        left.add_bounds(0, Vec2::ZERO, Vec2::new(10.0, 10.0));
        right.add_bounds(1, Vec2::ZERO, Vec2::new(100.0, 10.0));

        left.merge(&right);
        assert_eq!(left.get_bin(0, 0), &[0, 1]);
        assert_eq!(left.get_bin(1, 0), &[1]);
    }
}
