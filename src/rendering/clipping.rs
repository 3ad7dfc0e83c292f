/// Homogeneous-space triangle clipping against the view frustum.
///
/// A vertex is inside a plane when `dot(plane, position) >= 0`. Each plane
/// either keeps a triangle as is, discards it, or splits it into one or two
/// triangles that are then clipped against the remaining planes. Winding is
/// preserved by every split, so face culling after clipping still works.
use super::vertex::Triangle;
use crate::{count_add, count_call, perf::FUNCTION_COUNTERS};
use glam::Vec4;
use smallvec::SmallVec;

/// Frustum planes for a [0, w] depth range, tested in this order:
/// near, far, right, left, top, bottom.
pub const CLIP_PLANES: [Vec4; 6] = [
    Vec4::new(0.0, 0.0, 1.0, 0.0),
    Vec4::new(0.0, 0.0, -1.0, 1.0),
    Vec4::new(-1.0, 0.0, 0.0, 1.0),
    Vec4::new(1.0, 0.0, 0.0, 1.0),
    Vec4::new(0.0, -1.0, 0.0, 1.0),
    Vec4::new(0.0, 1.0, 0.0, 1.0),
];

/// Output of clipping one triangle against all planes. Eight triangles stay
/// inline; heavier splits spill to the heap.
pub type ClippedTriangles = SmallVec<[Triangle; 8]>;

/// Outcome of clipping a triangle against a single plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClipResult {
    /// All three vertices outside.
    Discard,
    /// All three vertices inside (the input, unchanged) or one inside (a
    /// smaller triangle).
    Triangle(Triangle),
    /// Two vertices inside: the remaining quad, as two triangles.
    Quad([Triangle; 2]),
}

/// Parameter along `inside -> outside` where the edge crosses the plane.
#[inline]
fn crossing(d_inside: f32, d_outside: f32) -> f32 {
    d_inside / (d_inside - d_outside)
}

/// Clip `triangle` against a single `plane`.
pub fn clip_against_plane(triangle: &Triangle, plane: Vec4) -> ClipResult {
    let d = triangle.map(|v| plane.dot(v.position));

    let inside_count = d.iter().filter(|&&di| di >= 0.0).count();
    match inside_count {
        3 => ClipResult::Triangle(*triangle),
        0 => ClipResult::Discard,
        _ => {
            // `cur` is the vertex on the minority side of the plane.
            let cur = if inside_count == 1 {
                d.iter().rposition(|&di| di >= 0.0)
            } else {
                d.iter().rposition(|&di| di < 0.0)
            }
            .unwrap_or_else(|| unreachable!("one or two vertices inside"));
            let prev = (cur + 2) % 3;
            let next = (cur + 1) % 3;

            let prev_int = triangle[cur].lerp(triangle[prev], crossing(d[cur], d[prev]));
            let next_int = triangle[cur].lerp(triangle[next], crossing(d[cur], d[next]));

            if inside_count == 1 {
                ClipResult::Triangle([prev_int, triangle[cur], next_int])
            } else {
                let (p, n) = (triangle[prev], triangle[next]);
                ClipResult::Quad([[p, prev_int, next_int], [p, next_int, n]])
            }
        }
    }
}

fn clip_recursive(triangle: Triangle, planes: &[Vec4], out: &mut ClippedTriangles) {
    let Some((&plane, rest)) = planes.split_first() else {
        out.push(triangle);
        return;
    };
    match clip_against_plane(&triangle, plane) {
        ClipResult::Discard => {}
        ClipResult::Triangle(t) => clip_recursive(t, rest, out),
        ClipResult::Quad([a, b]) => {
            clip_recursive(a, rest, out);
            clip_recursive(b, rest, out);
        }
    }
}

/// Clip a clip-space triangle against every plane in `CLIP_PLANES`.
///
/// Output triangles keep the input's winding and are in a deterministic order.
/// A triangle entirely inside the frustum comes back unchanged.
pub fn clip_triangle(triangle: &Triangle) -> ClippedTriangles {
    count_call!(FUNCTION_COUNTERS.triangles_submitted);
    let mut out = ClippedTriangles::new();
    clip_recursive(*triangle, &CLIP_PLANES, &mut out);

    match out.as_slice() {
        [] => {
            count_call!(FUNCTION_COUNTERS.triangles_discarded);
        }
        [single] if single == triangle => {}
        _ => {
            count_call!(FUNCTION_COUNTERS.triangles_clipped);
        }
    }
    count_add!(FUNCTION_COUNTERS.triangles_emitted, out.len());
    out
}

/// Whether `position` lies inside all frustum planes.
#[inline]
pub fn is_inside_frustum(position: Vec4) -> bool {
    CLIP_PLANES.iter().all(|plane| plane.dot(position) >= 0.0)
}
