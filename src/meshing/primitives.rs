//! Procedural meshes. Every face winds so that `(c - a) × (b - a)` points
//! outward, matching `Mesh::compute_normals`.

use super::mesh::Mesh;
use crate::error::Result;
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

fn build(positions: Vec<Vec3>, normals: Vec<Vec3>, tex_coords: Vec<Vec2>, triangles: Vec<[u32; 3]>) -> Result<Mesh> {
    let mut mesh = Mesh::new(positions.len(), triangles.len());
    mesh.set_positions(positions)?;
    mesh.set_normals(normals)?;
    mesh.set_tex_coords0(tex_coords)?;
    mesh.set_triangles(triangles)?;
    Ok(mesh)
}

/// Unit-radius UV sphere centred on the origin.
///
/// The seam column is duplicated so UVs run 0..=1 without wrapping; the pole
/// bands are emitted as single-triangle fans. `stacks` is clamped to at least
/// 2 and `slices` to at least 3.
pub fn sphere(stacks: u32, slices: u32) -> Result<Mesh> {
    let stacks = stacks.max(2);
    let slices = slices.max(3);
    let ring = slices + 1;

    let vertex_count = ((stacks + 1) * ring) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut tex_coords = Vec::with_capacity(vertex_count);

    for i in 0..=stacks {
        let v = i as f32 / stacks as f32;
        let (sin_theta, cos_theta) = (v * PI).sin_cos();
        for j in 0..=slices {
            let u = j as f32 / slices as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();
            positions.push(Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi));
            tex_coords.push(Vec2::new(u, v));
        }
    }

    let mut triangles = Vec::with_capacity((slices * (2 * stacks - 2)) as usize);
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * ring + j;
            let b = a + 1;
            let c = a + ring;
            let d = c + 1;
            // a and b coincide at the north pole, c and d at the south pole
            if i != 0 {
                triangles.push([a, c, b]);
            }
            if i != stacks - 1 {
                triangles.push([b, c, d]);
            }
        }
    }

    let normals = positions.clone();
    build(positions, normals, tex_coords, triangles)
}

/// Axis-aligned unit cube centred on the origin: 24 vertices so that each
/// face has its own flat normal and a full 0..1 UV square.
pub fn cube() -> Result<Mesh> {
    // (normal, u, v) with u × v = normal
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    const UVS: [Vec2; 4] = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut tex_coords = Vec::with_capacity(24);
    let mut triangles = Vec::with_capacity(12);

    for (face, &(n, u, v)) in FACES.iter().enumerate() {
        let base = (face * 4) as u32;
        for (&(su, sv), &uv) in CORNERS.iter().zip(UVS.iter()) {
            positions.push((n + u * su + v * sv) * 0.5);
            normals.push(n);
            tex_coords.push(uv);
        }
        triangles.push([base, base + 2, base + 1]);
        triangles.push([base, base + 3, base + 2]);
    }

    build(positions, normals, tex_coords, triangles)
}

/// Unit square in the z = 0 plane facing -Z, the direction of a camera
/// placed in front of it. UV (0, 0) is the top-left corner.
pub fn quad() -> Result<Mesh> {
    build(
        vec![
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
        ],
        vec![Vec3::NEG_Z; 4],
        vec![
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    )
}
