//! Planar polygon helpers used by the mask engine.
//!
//! All polygons are closed implicitly (last vertex connects to the first).
//! Tolerances scale with the extent of the input, so tiny but valid shapes
//! behave like large ones.

use glam::Vec2;

const RELATIVE_EPSILON: f32 = 1e-6;

/// Largest side of the axis-aligned bounds, zero for empty input.
fn extent(points: &[Vec2]) -> f32 {
    let Some(&first) = points.first() else {
        return 0.0;
    };
    let (min, max) = points
        .iter()
        .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
    (max - min).max_element()
}

/// Distance below which two points of `points` are considered equal.
fn length_tolerance(points: &[Vec2]) -> f32 {
    extent(points) * RELATIVE_EPSILON
}

/// Cross-product magnitude below which a turn of `points` is collinear.
fn area_tolerance(points: &[Vec2]) -> f32 {
    let extent = extent(points);
    extent * extent * RELATIVE_EPSILON
}

/// Twice the signed area; positive for counter-clockwise winding.
#[must_use]
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    let n = polygon.len();
    (0..n)
        .map(|i| polygon[i].perp_dot(polygon[(i + 1) % n]))
        .sum()
}

/// `true` when the polygon encloses no area relative to its own size.
#[must_use]
pub fn is_degenerate(polygon: &[Vec2]) -> bool {
    polygon.len() < 3 || signed_area(polygon).abs() <= area_tolerance(polygon)
}

pub fn make_counter_clockwise(polygon: &mut [Vec2]) {
    if signed_area(polygon) < 0.0 {
        polygon.reverse();
    }
}

/// Drops consecutive duplicates, including a closing copy of the first point.
pub fn dedup_closed(polygon: &mut Vec<Vec2>) {
    let tolerance = length_tolerance(polygon);
    polygon.dedup_by(|a, b| a.abs_diff_eq(*b, tolerance));
    while polygon.len() > 1 && polygon[0].abs_diff_eq(polygon[polygon.len() - 1], tolerance) {
        polygon.pop();
    }
}

/// Convexity test for a counter-clockwise polygon. Collinear runs count as
/// convex.
#[must_use]
pub fn is_convex(polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let tolerance = area_tolerance(polygon);
    (0..n).all(|i| {
        let prev = polygon[(i + n - 1) % n];
        let curr = polygon[i];
        let next = polygon[(i + 1) % n];
        (curr - prev).perp_dot(next - curr) >= -tolerance
    })
}

fn inside_or_on_triangle(p: Vec2, [a, b, c]: [Vec2; 3], tolerance: f32) -> bool {
    (b - a).perp_dot(p - a) >= -tolerance
        && (c - b).perp_dot(p - b) >= -tolerance
        && (a - c).perp_dot(p - c) >= -tolerance
}

/// Reflex test for the `k`-th vertex of the polygon `indices` into `polygon`.
fn is_reflex(polygon: &[Vec2], indices: &[usize], k: usize, tolerance: f32) -> bool {
    let m = indices.len();
    let prev = polygon[indices[(k + m - 1) % m]];
    let curr = polygon[indices[k]];
    let next = polygon[indices[(k + 1) % m]];
    (curr - prev).perp_dot(next - curr) < -tolerance
}

/// Ear-clipping triangulation of a simple counter-clockwise polygon.
///
/// Every output triangle is counter-clockwise and therefore convex.
/// Self-intersecting input stops early and yields the ears found so far.
#[must_use]
pub fn triangulate(polygon: &[Vec2]) -> Vec<[Vec2; 3]> {
    let mut remaining: Vec<usize> = (0..polygon.len()).collect();
    let mut triangles = Vec::with_capacity(polygon.len().saturating_sub(2));
    let (same_point, collinear) = (length_tolerance(polygon), area_tolerance(polygon));

    while remaining.len() > 3 {
        let m = remaining.len();
        let mut progressed = false;

        for i in 0..m {
            let (ia, ib, ic) = (remaining[(i + m - 1) % m], remaining[i], remaining[(i + 1) % m]);
            let (a, b, c) = (polygon[ia], polygon[ib], polygon[ic]);
            let turn = (b - a).perp_dot(c - b);

            if turn.abs() <= collinear {
                // Collinear vertex contributes no area.
                remaining.remove(i);
                progressed = true;
                break;
            }
            if turn < 0.0 {
                continue;
            }
            // Only reflex vertices can intrude; touching the ear counts.
            let blocked = (0..m).any(|k| {
                let j = remaining[k];
                let p = polygon[j];
                j != ia
                    && j != ib
                    && j != ic
                    && !p.abs_diff_eq(a, same_point)
                    && !p.abs_diff_eq(b, same_point)
                    && !p.abs_diff_eq(c, same_point)
                    && is_reflex(polygon, &remaining, k, collinear)
                    && inside_or_on_triangle(p, [a, b, c], collinear)
            });
            if blocked {
                continue;
            }

            triangles.push([a, b, c]);
            remaining.remove(i);
            progressed = true;
            break;
        }

        if !progressed {
            log::warn!(
                "Clip polygon is not simple; triangulated {} of {} expected triangles",
                triangles.len(),
                polygon.len() - 2
            );
            return triangles;
        }
    }

    if let &[ia, ib, ic] = remaining.as_slice() {
        let (a, b, c) = (polygon[ia], polygon[ib], polygon[ic]);
        if (b - a).perp_dot(c - a) > collinear {
            triangles.push([a, b, c]);
        }
    }
    triangles
}

/// Sutherland–Hodgman: clips `subject` against the convex, counter-clockwise
/// polygon `clip`. The result is written to `output`; `scratch` is reused
/// working storage.
pub fn clip_convex(subject: &[Vec2], clip: &[Vec2], output: &mut Vec<Vec2>, scratch: &mut Vec<Vec2>) {
    output.clear();
    output.extend_from_slice(subject);

    let n = clip.len();
    for e in 0..n {
        if output.is_empty() {
            return;
        }
        let edge_start = clip[e];
        let edge = clip[(e + 1) % n] - edge_start;
        let side = |p: Vec2| edge.perp_dot(p - edge_start);

        std::mem::swap(output, scratch);
        output.clear();

        let m = scratch.len();
        for j in 0..m {
            let current = scratch[j];
            let previous = scratch[(j + m - 1) % m];
            let (s_cur, s_prev) = (side(current), side(previous));

            if s_cur >= 0.0 {
                if s_prev < 0.0 {
                    output.push(previous + (current - previous) * (s_prev / (s_prev - s_cur)));
                }
                output.push(current);
            } else if s_prev >= 0.0 {
                output.push(previous + (current - previous) * (s_prev / (s_prev - s_cur)));
            }
        }
    }
}
