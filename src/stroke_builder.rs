//! Stroke builder — expands polylines into filled triangle geometry.
//!
//! Takes line geometry (either a plain polyline or a vertex/edge list) and
//! produces a triangle soup covering the stroked area: one quad per
//! segment, a join fan at each interior corner, and a cap fan at each open
//! endpoint. Edge lists are first split into maximal runs of consecutive
//! edges; a degenerate edge (endpoints closer than `VERTEX_DIST_EPSILON`)
//! is dropped without breaking the run it sits in.

use crate::basics::PointD;
use crate::math::{calc_distance, VERTEX_DIST_EPSILON};
use crate::stroke_math::{LineCap, StrokeMath};

// ============================================================================
// StrokeStats
// ============================================================================

/// Counts of the stroke features emitted by one build call.
///
/// An open run of N segments yields 2 caps and N-1 joins; a closed run
/// yields 0 caps and N joins. Butt caps and collinear joins are counted
/// even though they emit no triangles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrokeStats {
    pub segments: usize,
    pub caps: usize,
    pub joins: usize,
}

impl StrokeStats {
    fn add(&mut self, other: StrokeStats) {
        self.segments += other.segments;
        self.caps += other.caps;
        self.joins += other.joins;
    }
}

// ============================================================================
// StrokeBuilder
// ============================================================================

/// Polyline-to-triangles stroke expander.
pub struct StrokeBuilder {
    math: StrokeMath,
    scratch: Vec<PointD>,
    run: Vec<PointD>,
}

impl StrokeBuilder {
    pub fn new() -> Self {
        Self {
            math: StrokeMath::new(),
            scratch: Vec::new(),
            run: Vec::new(),
        }
    }

    pub fn math(&self) -> &StrokeMath {
        &self.math
    }

    pub fn math_mut(&mut self) -> &mut StrokeMath {
        &mut self.math
    }

    /// Expand a single polyline. Appends triangle vertices (three per
    /// triangle) to `out`.
    pub fn build_polyline(
        &mut self,
        pts: &[PointD],
        closed: bool,
        out: &mut Vec<PointD>,
    ) -> StrokeStats {
        self.run.clear();
        for &p in pts {
            self.push_run_point(p);
        }
        self.flush_run(closed, out)
    }

    /// Expand the runs described by a vertex/edge list. Consecutive edges
    /// (where one edge starts where the previous one ended, by index or by
    /// position) chain into a run; any break starts a new run.
    pub fn build_edges(
        &mut self,
        vertices: &[PointD],
        edges: &[(u32, u32)],
        out: &mut Vec<PointD>,
    ) -> StrokeStats {
        let mut stats = StrokeStats::default();
        self.run.clear();
        let mut last: Option<u32> = None;
        for &(a, b) in edges {
            let start = vertices[a as usize];
            let chained = last == Some(a)
                || self.run.last().is_some_and(|tail| {
                    calc_distance(tail.x, tail.y, start.x, start.y) < VERTEX_DIST_EPSILON
                });
            if !chained {
                stats.add(self.flush_run(false, out));
                self.run.push(start);
            }
            self.push_run_point(vertices[b as usize]);
            last = Some(b);
        }
        stats.add(self.flush_run(false, out));
        stats
    }

    /// Append a point to the current run, dropping it if it coincides
    /// with the run's last point.
    fn push_run_point(&mut self, p: PointD) {
        if let Some(&tail) = self.run.last() {
            if calc_distance(tail.x, tail.y, p.x, p.y) < VERTEX_DIST_EPSILON {
                return;
            }
        }
        self.run.push(p);
    }

    /// Emit the current run's stroke geometry and reset the run.
    fn flush_run(&mut self, closed: bool, out: &mut Vec<PointD>) -> StrokeStats {
        let mut pts = std::mem::take(&mut self.run);
        let mut stats = StrokeStats::default();

        // a run whose explicit last point returns to its start is closed
        let mut closed = closed;
        if pts.len() > 2 {
            let first = pts[0];
            let last = pts[pts.len() - 1];
            if calc_distance(first.x, first.y, last.x, last.y) < VERTEX_DIST_EPSILON {
                pts.pop();
                closed = true;
            }
        }
        if pts.len() < 2 {
            pts.clear();
            self.run = pts;
            return stats;
        }

        let n = pts.len();
        if closed && n >= 3 {
            for i in 0..n {
                let a = pts[i];
                let b = pts[(i + 1) % n];
                self.emit_segment(a, b, out);
            }
            for i in 0..n {
                let v0 = pts[(i + n - 1) % n];
                let v1 = pts[i];
                let v2 = pts[(i + 1) % n];
                self.emit_join(v0, v1, v2, out);
            }
            stats.segments = n;
            stats.joins = n;
        } else {
            for w in pts.windows(2) {
                self.emit_segment(w[0], w[1], out);
            }
            for w in pts.windows(3) {
                self.emit_join(w[0], w[1], w[2], out);
            }
            self.emit_cap(pts[0], pts[1], out);
            self.emit_cap(pts[n - 1], pts[n - 2], out);
            stats.segments = n - 1;
            stats.joins = n.saturating_sub(2);
            stats.caps = 2;
        }

        pts.clear();
        self.run = pts;
        stats
    }

    fn emit_segment(&self, a: PointD, b: PointD, out: &mut Vec<PointD>) {
        let len = calc_distance(a.x, a.y, b.x, b.y);
        let off = self.math.offset(a, b, len);
        let q0 = PointD::new(a.x + off.x, a.y + off.y);
        let q1 = PointD::new(b.x + off.x, b.y + off.y);
        let q2 = PointD::new(b.x - off.x, b.y - off.y);
        let q3 = PointD::new(a.x - off.x, a.y - off.y);
        out.extend_from_slice(&[q0, q1, q3, q1, q2, q3]);
    }

    fn emit_join(&mut self, v0: PointD, v1: PointD, v2: PointD, out: &mut Vec<PointD>) {
        let len1 = calc_distance(v0.x, v0.y, v1.x, v1.y);
        let len2 = calc_distance(v1.x, v1.y, v2.x, v2.y);
        let mut scratch = std::mem::take(&mut self.scratch);
        self.math.calc_join(&mut scratch, v0, v1, v2, len1, len2);
        fan(v1, &scratch, out);
        self.scratch = scratch;
    }

    fn emit_cap(&mut self, end: PointD, neighbor: PointD, out: &mut Vec<PointD>) {
        if self.math.line_cap() == LineCap::Butt {
            return;
        }
        let len = calc_distance(end.x, end.y, neighbor.x, neighbor.y);
        let mut scratch = std::mem::take(&mut self.scratch);
        self.math.calc_cap(&mut scratch, end, neighbor, len);
        fan(end, &scratch, out);
        self.scratch = scratch;
    }
}

impl Default for StrokeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fan an outline into triangles around a pivot.
fn fan(pivot: PointD, outline: &[PointD], out: &mut Vec<PointD>) {
    for w in outline.windows(2) {
        out.push(pivot);
        out.push(w[0]);
        out.push(w[1]);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke_math::LineJoin;

    fn p(x: f64, y: f64) -> PointD {
        PointD::new(x, y)
    }

    fn soup_area(tris: &[PointD]) -> f64 {
        tris.chunks(3)
            .map(|t| {
                0.5 * ((t[1].x - t[0].x) * (t[2].y - t[0].y)
                    - (t[2].x - t[0].x) * (t[1].y - t[0].y))
                    .abs()
            })
            .sum()
    }

    #[test]
    fn test_open_polyline_counts() {
        let mut sb = StrokeBuilder::new();
        let mut out = Vec::new();
        let stats = sb.build_polyline(
            &[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)],
            false,
            &mut out,
        );
        assert_eq!(
            stats,
            StrokeStats {
                segments: 2,
                caps: 2,
                joins: 1
            }
        );
        assert_eq!(out.len() % 3, 0);
    }

    #[test]
    fn test_closed_square_counts() {
        let mut sb = StrokeBuilder::new();
        let mut out = Vec::new();
        let stats = sb.build_polyline(
            &[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
            true,
            &mut out,
        );
        assert_eq!(
            stats,
            StrokeStats {
                segments: 4,
                caps: 0,
                joins: 4
            }
        );
    }

    #[test]
    fn test_explicit_return_to_start_closes_run() {
        let mut sb = StrokeBuilder::new();
        let mut out = Vec::new();
        let stats = sb.build_polyline(
            &[
                p(0.0, 0.0),
                p(10.0, 0.0),
                p(10.0, 10.0),
                p(0.0, 10.0),
                p(0.0, 0.0),
            ],
            false,
            &mut out,
        );
        assert_eq!(stats.caps, 0);
        assert_eq!(stats.segments, 4);
        assert_eq!(stats.joins, 4);
    }

    #[test]
    fn test_degenerate_point_dropped_without_breaking_run() {
        let mut sb = StrokeBuilder::new();
        let mut out = Vec::new();
        let stats = sb.build_polyline(
            &[
                p(0.0, 0.0),
                p(10.0, 0.0),
                p(10.0, 0.0),
                p(10.0, 10.0),
            ],
            false,
            &mut out,
        );
        // the repeated vertex collapses; still one continuous run
        assert_eq!(
            stats,
            StrokeStats {
                segments: 2,
                caps: 2,
                joins: 1
            }
        );
    }

    #[test]
    fn test_single_butt_segment_area() {
        let mut sb = StrokeBuilder::new();
        sb.math_mut().set_weight(4.0);
        sb.math_mut().set_line_cap(LineCap::Butt);
        let mut out = Vec::new();
        let stats = sb.build_polyline(&[p(0.0, 0.0), p(10.0, 0.0)], false, &mut out);
        assert_eq!(stats.segments, 1);
        assert_eq!(stats.caps, 2);
        // butt caps emit no triangles: only the segment quad
        assert_eq!(out.len(), 6);
        assert!((soup_area(&out) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_list_splits_into_runs() {
        let mut sb = StrokeBuilder::new();
        let verts = [
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 10.0),
            p(50.0, 50.0),
            p(60.0, 50.0),
        ];
        // two chained edges, then a disconnected one
        let edges = [(0u32, 1u32), (1, 2), (3, 4)];
        let mut out = Vec::new();
        let stats = sb.build_edges(&verts, &edges, &mut out);
        assert_eq!(
            stats,
            StrokeStats {
                segments: 3,
                caps: 4,
                joins: 1
            }
        );
    }

    #[test]
    fn test_two_disconnected_single_edges() {
        let mut sb = StrokeBuilder::new();
        let verts = [p(0.0, 0.0), p(10.0, 0.0), p(0.0, 20.0), p(10.0, 20.0)];
        let edges = [(0u32, 1u32), (2, 3)];
        let mut out = Vec::new();
        let stats = sb.build_edges(&verts, &edges, &mut out);
        assert_eq!(
            stats,
            StrokeStats {
                segments: 2,
                caps: 4,
                joins: 0
            }
        );
    }

    #[test]
    fn test_degenerate_edge_keeps_run_alive() {
        let mut sb = StrokeBuilder::new();
        let verts = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)];
        // middle edge has coincident endpoints
        let edges = [(0u32, 1u32), (1, 2), (2, 3)];
        let mut out = Vec::new();
        let stats = sb.build_edges(&verts, &edges, &mut out);
        assert_eq!(
            stats,
            StrokeStats {
                segments: 2,
                caps: 2,
                joins: 1
            }
        );
    }

    #[test]
    fn test_run_chains_across_duplicate_vertex_indices() {
        let mut sb = StrokeBuilder::new();
        // vertices 1 and 2 sit at the same position under distinct indices
        let verts = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)];
        // the degenerate edge ends at index 2 but the next edge restarts
        // from index 1; positional chaining must keep the run together
        let edges = [(0u32, 1u32), (1, 2), (1, 3)];
        let mut out = Vec::new();
        let stats = sb.build_edges(&verts, &edges, &mut out);
        assert_eq!(
            stats,
            StrokeStats {
                segments: 2,
                caps: 2,
                joins: 1
            }
        );
    }

    #[test]
    fn test_zero_and_one_point_runs_emit_nothing() {
        let mut sb = StrokeBuilder::new();
        let mut out = Vec::new();
        let s0 = sb.build_polyline(&[], false, &mut out);
        let s1 = sb.build_polyline(&[p(1.0, 1.0)], false, &mut out);
        assert_eq!(s0, StrokeStats::default());
        assert_eq!(s1, StrokeStats::default());
        assert!(out.is_empty());
    }
}
