/// Frustum clipping over a deterministic sweep of triangles.
use glam::{Vec2, Vec3, Vec4};
use tile_rasterizer::rendering::clipping::{clip_against_plane, clip_triangle, is_inside_frustum, CLIP_PLANES};
use tile_rasterizer::rendering::{ClipResult, Triangle, Vertex};

fn vertex(position: Vec4) -> Vertex {
    Vertex::new(position, Vec3::Z, Vec2::new(position.x, position.y))
}

/// Screen-space signed area after the perspective divide.
fn projected_area(triangle: &Triangle) -> f32 {
    let [a, b, c] = triangle.map(|v| Vec2::new(v.position.x, v.position.y) / v.position.w);
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Triangles scattered in and around the frustum, all in front of the eye.
fn sweep() -> Vec<Triangle> {
    let mut triangles = Vec::new();
    for i in 0..12 {
        for j in 0..12 {
            let x = (i as f32 - 5.5) * 0.6;
            let y = (j as f32 - 5.5) * 0.6;
            let w = 0.5 + (i + j) as f32 * 0.2;
            let z = (j as f32 - 3.0) * 0.3;
            triangles.push([
                vertex(Vec4::new(x, y, z, w)),
                vertex(Vec4::new(x + 1.7, y - 0.4, z + 0.8, w + 0.3)),
                vertex(Vec4::new(x + 0.2, y + 1.9, z + 1.5, w + 0.1)),
            ]);
        }
    }
    triangles
}

#[test]
fn every_output_vertex_is_inside_the_frustum() {
    let eps = 1e-4;
    let mut emitted = 0;
    for triangle in sweep() {
        for clipped in clip_triangle(&triangle) {
            emitted += 1;
            for v in clipped {
                let slack = eps * v.position.w.abs().max(1.0);
                for plane in CLIP_PLANES {
                    assert!(plane.dot(v.position) >= -slack, "{:?} outside {plane}", v.position);
                }
            }
        }
    }
    assert!(emitted > 0);
}

#[test]
fn winding_survives_clipping() {
    for triangle in sweep() {
        let original = projected_area(&triangle);
        if original.abs() < 1e-3 {
            continue;
        }
        for clipped in clip_triangle(&triangle) {
            let area = projected_area(&clipped);
            if area.abs() > 1e-6 {
                assert_eq!(area.signum(), original.signum());
            }
        }
    }
}

#[test]
fn fully_inside_triangles_pass_through_unchanged() {
    let triangle = [
        vertex(Vec4::new(-0.5, -0.5, 0.5, 1.0)),
        vertex(Vec4::new(0.5, -0.5, 0.5, 1.0)),
        vertex(Vec4::new(0.0, 0.5, 0.5, 1.0)),
    ];
    assert!(triangle.iter().all(|v| is_inside_frustum(v.position)));
    for plane in CLIP_PLANES {
        assert_eq!(clip_against_plane(&triangle, plane), ClipResult::Triangle(triangle));
    }
    let out = clip_triangle(&triangle);
    assert_eq!(out.as_slice(), &[triangle]);
}

#[test]
fn attributes_are_interpolated_at_the_crossing() {
    // Edge from z = -1 to z = 1 crosses the near plane halfway
    let triangle = [
        vertex(Vec4::new(0.0, 0.0, -1.0, 2.0)),
        vertex(Vec4::new(0.2, 0.0, 1.0, 2.0)),
        vertex(Vec4::new(0.0, 0.2, 1.0, 2.0)),
    ];
    let ClipResult::Quad(quad) = clip_against_plane(&triangle, CLIP_PLANES[0]) else {
        panic!("two vertices inside should produce a quad");
    };
    for v in quad.iter().flatten() {
        assert!(v.position.z >= 0.0);
        // tex_coord0 was seeded from x, y so it must track the position
        assert!((v.tex_coord0 - Vec2::new(v.position.x, v.position.y)).length() < 1e-6);
    }
}
