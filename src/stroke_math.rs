//! Stroke math — cap and join outline calculations for wide lines.
//!
//! Converts a stroke weight plus cap/join styles into the boundary
//! vertices needed at polyline endpoints (caps) and interior corners
//! (joins). The stroke builder fans these outlines into triangles around
//! their pivot vertex. Round caps and joins use an adaptive segment count
//! driven by the approximation scale, so zoomed-in strokes stay smooth
//! without over-tessellating hairlines.

use crate::basics::{PointD, PI};
use crate::math::{calc_intersection, cross_product};

// ============================================================================
// Styles
// ============================================================================

/// Line cap style for path endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

/// Line join style at path corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Bevel,
    Round,
}

// ============================================================================
// StrokeMath
// ============================================================================

/// Stroke geometry calculator.
///
/// Holds the resolved stroke parameters and computes outline vertices for
/// caps and joins. Output vertices are pushed into a caller-owned
/// `Vec<PointD>` so the builder can reuse one scratch buffer.
#[derive(Debug, Clone)]
pub struct StrokeMath {
    half: f64,
    miter_limit: f64,
    approx_scale: f64,
    line_cap: LineCap,
    line_join: LineJoin,
}

impl StrokeMath {
    pub fn new() -> Self {
        Self {
            half: 0.5,
            miter_limit: 10.0,
            approx_scale: 1.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Miter,
        }
    }

    pub fn set_weight(&mut self, w: f64) {
        self.half = w.abs() * 0.5;
    }
    pub fn weight(&self) -> f64 {
        self.half * 2.0
    }

    pub fn set_line_cap(&mut self, lc: LineCap) {
        self.line_cap = lc;
    }
    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    pub fn set_line_join(&mut self, lj: LineJoin) {
        self.line_join = lj;
    }
    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    pub fn set_miter_limit(&mut self, ml: f64) {
        self.miter_limit = ml;
    }
    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    pub fn set_approximation_scale(&mut self, s: f64) {
        self.approx_scale = s;
    }
    pub fn approximation_scale(&self) -> f64 {
        self.approx_scale
    }

    /// Angular step for round caps/joins at the current weight and scale.
    fn round_step(&self) -> f64 {
        (self.half / (self.half + 0.125 / self.approx_scale)).acos() * 2.0
    }

    /// Perpendicular offset of half the stroke weight for the segment
    /// v0→v1 of length `len`.
    #[inline]
    pub fn offset(&self, v0: PointD, v1: PointD, len: f64) -> PointD {
        PointD::new(
            -(v1.y - v0.y) / len * self.half,
            (v1.x - v0.x) / len * self.half,
        )
    }

    /// Calculate cap outline vertices at endpoint `v0`, whose adjacent
    /// vertex is `v1` at distance `len`.
    ///
    /// The outline runs from the left offset point around the cap to the
    /// right offset point; a butt cap is just those two points.
    pub fn calc_cap(&self, out: &mut Vec<PointD>, v0: PointD, v1: PointD, len: f64) {
        out.clear();
        let off = self.offset(v0, v1, len);
        // direction away from the line, for square extension
        let ext_x = -(v1.x - v0.x) / len * self.half;
        let ext_y = -(v1.y - v0.y) / len * self.half;

        match self.line_cap {
            LineCap::Butt => {
                out.push(PointD::new(v0.x + off.x, v0.y + off.y));
                out.push(PointD::new(v0.x - off.x, v0.y - off.y));
            }
            LineCap::Square => {
                out.push(PointD::new(v0.x + off.x, v0.y + off.y));
                out.push(PointD::new(v0.x + off.x + ext_x, v0.y + off.y + ext_y));
                out.push(PointD::new(v0.x - off.x + ext_x, v0.y - off.y + ext_y));
                out.push(PointD::new(v0.x - off.x, v0.y - off.y));
            }
            LineCap::Round => {
                let da = self.round_step();
                let n = (PI / da) as i32;
                let da = PI / (n + 1) as f64;
                out.push(PointD::new(v0.x + off.x, v0.y + off.y));
                let mut a = off.y.atan2(off.x);
                for _ in 0..n {
                    a += da;
                    out.push(PointD::new(
                        v0.x + a.cos() * self.half,
                        v0.y + a.sin() * self.half,
                    ));
                }
                out.push(PointD::new(v0.x - off.x, v0.y - off.y));
            }
        }
    }

    /// Calculate join outline vertices at the corner `v1` between the
    /// segments v0→v1 (length `len1`) and v1→v2 (length `len2`).
    ///
    /// The outline runs along the outer side of the turn, from the end of
    /// the first segment's offset edge to the start of the second's. A
    /// straight (or degenerate) corner emits the shared offset point only.
    pub fn calc_join(
        &self,
        out: &mut Vec<PointD>,
        v0: PointD,
        v1: PointD,
        v2: PointD,
        len1: f64,
        len2: f64,
    ) {
        out.clear();
        let turn = cross_product(v0.x, v0.y, v1.x, v1.y, v2.x, v2.y);
        // cross_product < 0 means v2 lies left of v0→v1, so the outer side
        // of the corner is the right offset side
        let sign = if turn < 0.0 { -1.0 } else { 1.0 };
        let o1 = self.offset(v0, v1, len1);
        let o2 = self.offset(v1, v2, len2);
        let p1 = PointD::new(v1.x + sign * o1.x, v1.y + sign * o1.y);
        let p2 = PointD::new(v1.x + sign * o2.x, v1.y + sign * o2.y);

        if turn == 0.0 {
            out.push(p1);
            return;
        }

        match self.line_join {
            LineJoin::Bevel => {
                out.push(p1);
                out.push(p2);
            }
            LineJoin::Miter => {
                let hit = calc_intersection(
                    v0.x + sign * o1.x,
                    v0.y + sign * o1.y,
                    p1.x,
                    p1.y,
                    p2.x,
                    p2.y,
                    v2.x + sign * o2.x,
                    v2.y + sign * o2.y,
                );
                match hit {
                    Some((ix, iy))
                        if (ix - v1.x).hypot(iy - v1.y) <= self.miter_limit * self.half =>
                    {
                        out.push(p1);
                        out.push(PointD::new(ix, iy));
                        out.push(p2);
                    }
                    // limit exceeded or parallel edges: bevel fallback
                    _ => {
                        out.push(p1);
                        out.push(p2);
                    }
                }
            }
            LineJoin::Round => {
                out.push(p1);
                let a1 = (p1.y - v1.y).atan2(p1.x - v1.x);
                let a2 = (p2.y - v1.y).atan2(p2.x - v1.x);
                let mut sweep = a2 - a1;
                // walk the short way around the outer side
                while sweep > PI {
                    sweep -= 2.0 * PI;
                }
                while sweep < -PI {
                    sweep += 2.0 * PI;
                }
                let da = self.round_step();
                let n = (sweep.abs() / da) as i32;
                let da = sweep / (n + 1) as f64;
                let mut a = a1;
                for _ in 0..n {
                    a += da;
                    out.push(PointD::new(
                        v1.x + a.cos() * self.half,
                        v1.y + a.sin() * self.half,
                    ));
                }
                out.push(p2);
            }
        }
    }
}

impl Default for StrokeMath {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
