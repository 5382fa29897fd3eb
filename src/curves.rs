//! Curve evaluation — cubic Bezier and Catmull-Rom splines.
//!
//! Provides point/tangent evaluation for both curve families, the
//! Catmull-Rom to cubic-Bezier basis conversion used when freeform vertex
//! shapes contain curve vertices, and fixed-detail flattening for the
//! WEBGL path (the 2D canvas path consumes curve control points natively).
//!
//! Evaluation works per scalar component: callers evaluate x and y
//! independently with the same `t`. `t` is not clamped here; passing a
//! value outside `[0, 1]` extrapolates and is the caller's business.

use crate::basics::PointD;

/// Evaluate a cubic Bezier at `t` over control values `a, b, c, d`.
/// `t = 0` returns `a`; `t = 1` returns `d`.
#[inline]
pub fn bezier_point(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * a + 3.0 * u * u * t * b + 3.0 * u * t * t * c + t * t * t * d
}

/// Derivative of [`bezier_point`] with respect to `t`.
#[inline]
pub fn bezier_tangent(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * (b - a) + 6.0 * u * t * (c - b) + 3.0 * t * t * (d - c)
}

/// Evaluate a Catmull-Rom spline at `t` over the four control values
/// `a, b, c, d`. The visible span runs from `b` (`t = 0`) to `c` (`t = 1`).
#[inline]
pub fn curve_point(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * b
        + (c - a) * t
        + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
        + (3.0 * b - a - 3.0 * c + d) * t3)
}

/// Derivative of [`curve_point`] with respect to `t`.
#[inline]
pub fn curve_tangent(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    let t2 = t * t;
    0.5 * ((c - a)
        + 2.0 * (2.0 * a - 5.0 * b + 4.0 * c - d) * t
        + 3.0 * (3.0 * b - a - 3.0 * c + d) * t2)
}

// ============================================================================
// Catmull-Rom -> cubic Bezier
// ============================================================================

/// One cubic Bezier span produced by the Catmull-Rom conversion: two
/// control points plus the on-path end point. The span's start point is
/// the previous span's end (or the conversion's anchor for the first span).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSpan {
    pub c1: PointD,
    pub c2: PointD,
    pub end: PointD,
}

/// Convert a run of Catmull-Rom control points to cubic Bezier spans, one
/// per interior span. Control-point scaling uses the standard tangent
/// factor `(1 - tightness) / 6`; tightness 0 is the canonical Catmull-Rom
/// spline and tightness 1 collapses to straight lines between the interior
/// points.
///
/// Needs a 4-point sliding window: fewer than 4 input points yields an
/// empty vector. The path anchor for the first span is `points[1]`.
pub fn catmull_rom_to_bezier(points: &[PointD], tightness: f64) -> Vec<CubicSpan> {
    if points.len() < 4 {
        return Vec::new();
    }
    let s = (1.0 - tightness) / 6.0;
    let mut spans = Vec::with_capacity(points.len() - 3);
    for w in points.windows(4) {
        let [p0, p1, p2, p3] = [w[0], w[1], w[2], w[3]];
        spans.push(CubicSpan {
            c1: PointD::new(p1.x + (p2.x - p0.x) * s, p1.y + (p2.y - p0.y) * s),
            c2: PointD::new(p2.x - (p3.x - p1.x) * s, p2.y - (p3.y - p1.y) * s),
            end: p2,
        });
    }
    spans
}

/// Lift a quadratic Bezier to the equivalent cubic (standard 2/3 control
/// promotion). Returns the two cubic control points.
pub fn quadratic_to_cubic(p0: PointD, ctrl: PointD, p1: PointD) -> (PointD, PointD) {
    let c1 = PointD::new(
        p0.x + 2.0 / 3.0 * (ctrl.x - p0.x),
        p0.y + 2.0 / 3.0 * (ctrl.y - p0.y),
    );
    let c2 = PointD::new(
        p1.x + 2.0 / 3.0 * (ctrl.x - p1.x),
        p1.y + 2.0 / 3.0 * (ctrl.y - p1.y),
    );
    (c1, c2)
}

/// Flatten a cubic Bezier into `detail` line segments, appending the
/// interior samples and the end point (never the start point) to `out`.
pub fn flatten_cubic(p0: PointD, c1: PointD, c2: PointD, p1: PointD, detail: u32, out: &mut Vec<PointD>) {
    let detail = detail.max(1);
    for i in 1..=detail {
        let t = i as f64 / detail as f64;
        out.push(PointD::new(
            bezier_point(p0.x, c1.x, c2.x, p1.x, t),
            bezier_point(p0.y, c1.y, c2.y, p1.y, t),
        ));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    #[test]
    fn test_bezier_endpoints() {
        assert_eq!(bezier_point(85.0, 10.0, 90.0, 15.0, 0.0), 85.0);
        assert_eq!(bezier_point(85.0, 10.0, 90.0, 15.0, 1.0), 15.0);
    }

    #[test]
    fn test_bezier_midpoint() {
        assert!((bezier_point(85.0, 10.0, 90.0, 15.0, 0.5) - 50.0).abs() < EPS);
    }

    #[test]
    fn test_bezier_tangent_straight_line() {
        // control points evenly spaced on a line: constant derivative 3*(step)
        let t = bezier_tangent(0.0, 1.0, 2.0, 3.0, 0.25);
        assert!((t - 3.0).abs() < EPS);
    }

    #[test]
    fn test_curve_point_concrete() {
        assert!((curve_point(5.0, 5.0, 73.0, 73.0, 0.5) - 39.0).abs() < EPS);
        // span endpoints hit the two interior control values
        assert!((curve_point(5.0, 5.0, 73.0, 73.0, 0.0) - 5.0).abs() < EPS);
        assert!((curve_point(5.0, 5.0, 73.0, 73.0, 1.0) - 73.0).abs() < EPS);
    }

    #[test]
    fn test_curve_tangent_concrete() {
        assert!((curve_tangent(95.0, 73.0, 73.0, 15.0, 0.5) - 10.0).abs() < EPS);
    }

    #[test]
    fn test_catmull_rom_window_requirement() {
        let pts = [
            PointD::new(0.0, 0.0),
            PointD::new(1.0, 0.0),
            PointD::new(2.0, 0.0),
        ];
        assert!(catmull_rom_to_bezier(&pts, 0.0).is_empty());
    }

    #[test]
    fn test_catmull_rom_span_count_and_continuity() {
        let pts = [
            PointD::new(0.0, 0.0),
            PointD::new(10.0, 0.0),
            PointD::new(10.0, 10.0),
            PointD::new(0.0, 10.0),
            PointD::new(0.0, 20.0),
        ];
        let spans = catmull_rom_to_bezier(&pts, 0.0);
        assert_eq!(spans.len(), 2);
        // each span ends on the corresponding interior control point
        assert_eq!(spans[0].end, pts[2]);
        assert_eq!(spans[1].end, pts[3]);
        // C1 continuity: the tangent out of span 0 equals the tangent into
        // span 1, both being (p3 - p1) / 6 scaled around pts[2]
        let out_dx = spans[1].c1.x - spans[0].end.x;
        let in_dx = spans[0].end.x - spans[0].c2.x;
        assert!((out_dx - in_dx).abs() < EPS);
    }

    #[test]
    fn test_catmull_rom_full_tightness_is_polyline() {
        let pts = [
            PointD::new(0.0, 0.0),
            PointD::new(10.0, 0.0),
            PointD::new(10.0, 10.0),
            PointD::new(0.0, 10.0),
        ];
        let spans = catmull_rom_to_bezier(&pts, 1.0);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].c1, pts[1]);
        assert_eq!(spans[0].c2, pts[2]);
    }

    #[test]
    fn test_quadratic_promotion_preserves_curve() {
        let p0 = PointD::new(0.0, 0.0);
        let ctrl = PointD::new(5.0, 10.0);
        let p1 = PointD::new(10.0, 0.0);
        let (c1, c2) = quadratic_to_cubic(p0, ctrl, p1);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let u = 1.0 - t;
            let quad_y = u * u * p0.y + 2.0 * u * t * ctrl.y + t * t * p1.y;
            let cubic_y = bezier_point(p0.y, c1.y, c2.y, p1.y, t);
            assert!((quad_y - cubic_y).abs() < EPS);
        }
    }

    #[test]
    fn test_flatten_cubic_hits_endpoint() {
        let mut out = Vec::new();
        flatten_cubic(
            PointD::new(0.0, 0.0),
            PointD::new(0.0, 10.0),
            PointD::new(10.0, 10.0),
            PointD::new(10.0, 0.0),
            8,
            &mut out,
        );
        assert_eq!(out.len(), 8);
        assert_eq!(*out.last().unwrap(), PointD::new(10.0, 0.0));
    }
}
