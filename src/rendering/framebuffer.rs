/// Tile grid and full-screen G-buffer
///
/// Tiles own the per-frame rasterization output. Once every tile is done the
/// framebuffer gathers their color, normal and depth into screen-sized buffers
/// that the deferred passes read.
///
/// Memory layout:
/// - Tiles are row-major, `tiles_x` per row
/// - G-buffer arrays are row-major, `width` per row, row 0 at the top
use super::tile::{grid_dim, Tile, FAR_DEPTH, TILE_SIZE};
use glam::{Vec3, Vec4};
use rayon::prelude::*;

pub struct Framebuffer {
    // Hot data: used for every bounds check and index calculation
    pub width: usize,
    pub height: usize,
    pub tiles_x: usize,
    pub tiles_y: usize,
    tiles: Vec<Tile>,
    // Separate buffers: the shadow pass only streams depth
    pub color: Vec<Vec4>,
    pub normal: Vec<Vec3>,
    pub depth: Vec<f32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let mut fb = Self {
            width: 0,
            height: 0,
            tiles_x: 0,
            tiles_y: 0,
            tiles: Vec::new(),
            color: Vec::new(),
            normal: Vec::new(),
            depth: Vec::new(),
        };
        fb.resize(width, height);
        fb
    }

    /// Rebuild the tile grid and G-buffer for a new size.
    /// Returns false (and touches nothing) if the size is unchanged.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if width == self.width && height == self.height && self.tiles.len() == self.tiles_x * self.tiles_y {
            return false;
        }

        let (tiles_x, tiles_y) = grid_dim(width, height);
        self.width = width;
        self.height = height;
        self.tiles_x = tiles_x;
        self.tiles_y = tiles_y;
        self.tiles = (0..tiles_y)
            .flat_map(|ty| (0..tiles_x).map(move |tx| (tx, ty)))
            .map(|(tx, ty)| {
                let x0 = tx * TILE_SIZE;
                let y0 = ty * TILE_SIZE;
                Tile::new(x0, y0, TILE_SIZE.min(width - x0), TILE_SIZE.min(height - y0))
            })
            .collect();

        let pixel_count = width * height;
        self.color = vec![Vec4::ZERO; pixel_count];
        self.normal = vec![Vec3::ZERO; pixel_count];
        self.depth = vec![FAR_DEPTH; pixel_count];
        true
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    #[inline]
    pub fn tile(&self, tile_x: usize, tile_y: usize) -> &Tile {
        &self.tiles[tile_y * self.tiles_x + tile_x]
    }

    /// Copy every tile into the screen-sized G-buffer.
    /// One task per row of tiles; each owns a disjoint band of rows.
    pub fn gather(&mut self) {
        if self.tiles_x == 0 {
            return;
        }
        let width = self.width;
        let band = width * TILE_SIZE;
        let tiles_x = self.tiles_x;

        self.color
            .par_chunks_mut(band)
            .zip(self.normal.par_chunks_mut(band))
            .zip(self.depth.par_chunks_mut(band))
            .zip(self.tiles.par_chunks(tiles_x))
            .for_each(|(((color, normal), depth), tile_row)| {
                for tile in tile_row {
                    for ly in 0..tile.height {
                        let dst = ly * width + tile.x0..ly * width + tile.x0 + tile.width;
                        let (c, n, d) = tile.row(ly);
                        color[dst.clone()].copy_from_slice(c);
                        normal[dst.clone()].copy_from_slice(n);
                        depth[dst].copy_from_slice(d);
                    }
                }
            });
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn color_at(&self, x: usize, y: usize) -> Vec4 {
        self.color[self.index(x, y)]
    }

    #[inline]
    pub fn normal_at(&self, x: usize, y: usize) -> Vec3 {
        self.normal[self.index(x, y)]
    }

    #[inline]
    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[self.index(x, y)]
    }
}
