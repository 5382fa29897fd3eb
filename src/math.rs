//! Geometric math utilities — distances, cross products, intersections,
//! and the point-in-triangle predicate used by the tessellator.

/// Coinciding points maximal distance (epsilon). Two vertices closer than
/// this are treated as the same point when building stroke geometry.
pub const VERTEX_DIST_EPSILON: f64 = 1e-14;

/// Epsilon for intersection calculations.
pub const INTERSECTION_EPSILON: f64 = 1.0e-30;

/// Cross product of vectors (x2-x1, y2-y1) and (x-x2, y-y2).
/// The sign indicates which side of the line (x1,y1)→(x2,y2) the point
/// (x,y) is on.
#[inline]
pub fn cross_product(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    (x - x2) * (y2 - y1) - (y - y2) * (x2 - x1)
}

/// Test if point (x, y) is strictly inside or on the boundary of the
/// triangle (ax,ay), (bx,by), (cx,cy), independent of winding.
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn point_in_triangle(
    ax: f64,
    ay: f64,
    bx: f64,
    by: f64,
    cx: f64,
    cy: f64,
    x: f64,
    y: f64,
) -> bool {
    let d1 = cross_product(ax, ay, bx, by, x, y);
    let d2 = cross_product(bx, by, cx, cy, x, y);
    let d3 = cross_product(cx, cy, ax, ay, x, y);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Euclidean distance between two points.
#[inline]
pub fn calc_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Squared Euclidean distance between two points.
#[inline]
pub fn calc_sq_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy
}

/// Intersection of the infinite lines through a→b and c→d.
/// Returns `None` when the lines are (near) parallel.
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn calc_intersection(
    ax: f64,
    ay: f64,
    bx: f64,
    by: f64,
    cx: f64,
    cy: f64,
    dx: f64,
    dy: f64,
) -> Option<(f64, f64)> {
    let num = (ay - cy) * (dx - cx) - (ax - cx) * (dy - cy);
    let den = (bx - ax) * (dy - cy) - (by - ay) * (dx - cx);
    if den.abs() < INTERSECTION_EPSILON {
        return None;
    }
    let r = num / den;
    Some((ax + r * (bx - ax), ay + r * (by - ay)))
}

/// Signed area of a polygon (positive for counter-clockwise winding in a
/// y-up coordinate system).
pub fn polygon_area(points: &[crate::basics::PointD]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut j = n - 1;
    for i in 0..n {
        sum += (points[j].x - points[i].x) * (points[j].y + points[i].y);
        j = i;
    }
    sum * 0.5
}

// ============================================================================
// Tests
// ============================================================================
