//! Freeform shape accumulation — the `Shape`/`Contour`/segment model
//! behind `begin_shape`/`vertex`/`end_shape` on the 2D path.
//!
//! A [`Shape`] is an ordered list of [`Contour`]s (first is the outer
//! boundary, the rest are holes or sub-paths). A contour is an ordered
//! list of [`ShapeSegment`]s: a closed tagged union over plain, bezier,
//! quadratic, and Catmull-Rom curve vertices. Rendering walks the
//! segments in order and emits against a [`PathSink`], threading the
//! current point forward explicitly as a fold accumulator rather than
//! hidden mutable state.
//!
//! Curve vertices are special: Catmull-Rom needs a 4-point bracketing
//! window, so the first three curve vertices of a run contribute only to
//! the lookback window and emit nothing visible. The window's second
//! point becomes the run's on-path anchor.

use smallvec::SmallVec;

use crate::basics::PointD;
use crate::curves::catmull_rom_to_bezier;
use crate::error::{GfxError, GfxResult};

// ============================================================================
// PathSink
// ============================================================================

/// Destination for path emission: the 2D drawing context collaborator
/// implements this, and so does the WEBGL flattener.
pub trait PathSink {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn bezier_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64);
    fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
    fn close_path(&mut self);
}

/// A recorded path command, for sinks that buffer instead of drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(PointD),
    LineTo(PointD),
    BezierTo { c1: PointD, c2: PointD, end: PointD },
    QuadTo { ctrl: PointD, end: PointD },
    Close,
}

/// A [`PathSink`] that records commands into a buffer.
#[derive(Debug, Default)]
pub struct PathRecorder {
    pub commands: SmallVec<[PathCmd; 16]>,
}

impl PathRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl PathSink for PathRecorder {
    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCmd::MoveTo(PointD::new(x, y)));
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCmd::LineTo(PointD::new(x, y)));
    }
    fn bezier_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.commands.push(PathCmd::BezierTo {
            c1: PointD::new(c1x, c1y),
            c2: PointD::new(c2x, c2y),
            end: PointD::new(x, y),
        });
    }
    fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.commands.push(PathCmd::QuadTo {
            ctrl: PointD::new(cx, cy),
            end: PointD::new(x, y),
        });
    }
    fn close_path(&mut self) {
        self.commands.push(PathCmd::Close);
    }
}

// ============================================================================
// Segments
// ============================================================================

/// One contour segment. Each variant carries its control-point data; the
/// previous current point is the implicit start of every curve variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeSegment {
    /// A plain on-path vertex (anchor).
    Vertex(PointD),
    /// Cubic Bezier to `end` with two control points.
    Bezier { c1: PointD, c2: PointD, end: PointD },
    /// Quadratic Bezier to `end` with one control point.
    Quadratic { ctrl: PointD, end: PointD },
    /// Catmull-Rom control point.
    Curve(PointD),
}

impl ShapeSegment {
    fn is_curve(&self) -> bool {
        matches!(self, ShapeSegment::Curve(_))
    }

    fn needs_anchor(&self) -> bool {
        matches!(
            self,
            ShapeSegment::Bezier { .. } | ShapeSegment::Quadratic { .. }
        )
    }

    fn kind_name(&self) -> &'static str {
        match self {
            ShapeSegment::Vertex(_) => "vertex",
            ShapeSegment::Bezier { .. } => "bezier",
            ShapeSegment::Quadratic { .. } => "quadratic",
            ShapeSegment::Curve(_) => "curve",
        }
    }
}

// ============================================================================
// Contour
// ============================================================================

/// One continuous sub-path of a [`Shape`].
#[derive(Debug, Clone, Default)]
pub struct Contour {
    segments: SmallVec<[ShapeSegment; 8]>,
    closed: bool,
}

impl Contour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the contour as closed; emission appends a `close_path`.
    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[ShapeSegment] {
        &self.segments
    }

    /// Append a segment.
    ///
    /// A bezier or quadratic segment consumes the current point as its
    /// implicit start, so appending one before any anchor exists is a
    /// usage error. A plain vertex always anchors; a curve run anchors
    /// itself once four curve points have accumulated.
    pub fn add_segment(&mut self, segment: ShapeSegment) -> GfxResult<()> {
        if segment.needs_anchor() && !self.has_anchor() {
            return Err(GfxError::MissingAnchor {
                segment: segment.kind_name(),
            });
        }
        self.segments.push(segment);
        Ok(())
    }

    fn has_anchor(&self) -> bool {
        let mut curve_run = 0usize;
        for seg in &self.segments {
            if seg.is_curve() {
                curve_run += 1;
                if curve_run >= 4 {
                    return true;
                }
            } else {
                // non-curve segments always leave an on-path point
                return true;
            }
        }
        false
    }

    /// Resolved on-path coordinate of the segment at `index`, or `None`
    /// when it is a curve vertex whose 4-point window has not filled yet.
    /// For a resolvable curve vertex the result is the point the visible
    /// path has reached after that call (the window's second-to-last
    /// point).
    pub fn coordinates(&self, index: usize) -> Option<PointD> {
        match self.segments.get(index)? {
            ShapeSegment::Vertex(p) => Some(*p),
            ShapeSegment::Bezier { end, .. } | ShapeSegment::Quadratic { end, .. } => Some(*end),
            ShapeSegment::Curve(_) => {
                // count the contiguous curve run ending at `index`
                let mut run = 0usize;
                for seg in self.segments[..=index].iter().rev() {
                    if seg.is_curve() {
                        run += 1;
                    } else {
                        break;
                    }
                }
                if run < 4 {
                    return None;
                }
                match self.segments[index - 1] {
                    ShapeSegment::Curve(p) => Some(p),
                    _ => None,
                }
            }
        }
    }

    /// Emit the contour against `sink`, threading the current point
    /// through the fold. Returns the final current point (None when the
    /// contour produced no geometry, e.g. fewer than four curve vertices).
    pub fn emit<S: PathSink>(&self, sink: &mut S, tightness: f64) -> GfxResult<Option<PointD>> {
        let mut current: Option<PointD> = None;
        let mut curve_window: Vec<PointD> = Vec::new();

        for segment in &self.segments {
            if !segment.is_curve() && !curve_window.is_empty() {
                current = flush_curve_window(sink, &mut curve_window, current, tightness);
            }
            match *segment {
                ShapeSegment::Vertex(p) => {
                    match current {
                        None => sink.move_to(p.x, p.y),
                        Some(_) => sink.line_to(p.x, p.y),
                    }
                    current = Some(p);
                }
                ShapeSegment::Bezier { c1, c2, end } => {
                    if current.is_none() {
                        return Err(GfxError::MissingAnchor { segment: "bezier" });
                    }
                    sink.bezier_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
                    current = Some(end);
                }
                ShapeSegment::Quadratic { ctrl, end } => {
                    if current.is_none() {
                        return Err(GfxError::MissingAnchor {
                            segment: "quadratic",
                        });
                    }
                    sink.quad_to(ctrl.x, ctrl.y, end.x, end.y);
                    current = Some(end);
                }
                ShapeSegment::Curve(p) => {
                    curve_window.push(p);
                }
            }
        }
        if !curve_window.is_empty() {
            current = flush_curve_window(sink, &mut curve_window, current, tightness);
        }
        if self.closed && current.is_some() {
            sink.close_path();
        }
        Ok(current)
    }
}

/// Convert an accumulated curve-vertex run into Bezier spans and emit
/// them. Runs shorter than four points emit nothing. The run's on-path
/// anchor is the window's second point. Returns the new current point.
fn flush_curve_window<S: PathSink>(
    sink: &mut S,
    window: &mut Vec<PointD>,
    current: Option<PointD>,
    tightness: f64,
) -> Option<PointD> {
    let spans = catmull_rom_to_bezier(window, tightness);
    if spans.is_empty() {
        window.clear();
        return current;
    }
    let anchor = window[1];
    window.clear();
    match current {
        None => sink.move_to(anchor.x, anchor.y),
        Some(_) => sink.line_to(anchor.x, anchor.y),
    }
    for span in &spans {
        sink.bezier_to(
            span.c1.x, span.c1.y, span.c2.x, span.c2.y, span.end.x, span.end.y,
        );
    }
    spans.last().map(|s| s.end)
}

// ============================================================================
// Shape
// ============================================================================

/// An ordered sequence of contours; insertion order is rendering order.
/// The first contour is the outer boundary, subsequent contours are holes
/// or sub-paths. A shape with zero contours renders nothing.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    contours: Vec<Contour>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contour; no validation of closure is performed.
    pub fn add_contour(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Emit every contour in order. A zero-contour shape is a no-op.
    pub fn emit<S: PathSink>(&self, sink: &mut S, tightness: f64) -> GfxResult<()> {
        for contour in &self.contours {
            contour.emit(sink, tightness)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> ShapeSegment {
        ShapeSegment::Vertex(PointD::new(x, y))
    }

    fn cv(x: f64, y: f64) -> ShapeSegment {
        ShapeSegment::Curve(PointD::new(x, y))
    }

    #[test]
    fn test_empty_shape_is_noop() {
        let shape = Shape::new();
        let mut rec = PathRecorder::new();
        shape.emit(&mut rec, 0.0).unwrap();
        assert!(rec.commands.is_empty());
    }

    #[test]
    fn test_vertex_emission() {
        let mut c = Contour::new();
        c.add_segment(v(0.0, 0.0)).unwrap();
        c.add_segment(v(10.0, 0.0)).unwrap();
        c.add_segment(v(10.0, 10.0)).unwrap();
        let mut rec = PathRecorder::new();
        let end = c.emit(&mut rec, 0.0).unwrap();
        assert_eq!(rec.commands.len(), 3);
        assert_eq!(rec.commands[0], PathCmd::MoveTo(PointD::new(0.0, 0.0)));
        assert_eq!(rec.commands[1], PathCmd::LineTo(PointD::new(10.0, 0.0)));
        assert_eq!(end, Some(PointD::new(10.0, 10.0)));
    }

    #[test]
    fn test_closed_contour_emits_close() {
        let mut c = Contour::new();
        c.add_segment(v(0.0, 0.0)).unwrap();
        c.add_segment(v(10.0, 0.0)).unwrap();
        c.set_closed(true);
        let mut rec = PathRecorder::new();
        c.emit(&mut rec, 0.0).unwrap();
        assert_eq!(*rec.commands.last().unwrap(), PathCmd::Close);
    }

    #[test]
    fn test_bezier_first_is_missing_anchor() {
        let mut c = Contour::new();
        let err = c
            .add_segment(ShapeSegment::Bezier {
                c1: PointD::new(1.0, 1.0),
                c2: PointD::new(2.0, 2.0),
                end: PointD::new(3.0, 3.0),
            })
            .unwrap_err();
        assert_eq!(err, GfxError::MissingAnchor { segment: "bezier" });
    }

    #[test]
    fn test_quadratic_after_short_curve_run_is_missing_anchor() {
        let mut c = Contour::new();
        c.add_segment(cv(0.0, 0.0)).unwrap();
        c.add_segment(cv(1.0, 0.0)).unwrap();
        let err = c
            .add_segment(ShapeSegment::Quadratic {
                ctrl: PointD::new(2.0, 2.0),
                end: PointD::new(3.0, 0.0),
            })
            .unwrap_err();
        assert_eq!(
            err,
            GfxError::MissingAnchor {
                segment: "quadratic"
            }
        );
    }

    #[test]
    fn test_bezier_after_vertex_is_allowed() {
        let mut c = Contour::new();
        c.add_segment(v(0.0, 0.0)).unwrap();
        c.add_segment(ShapeSegment::Bezier {
            c1: PointD::new(1.0, 1.0),
            c2: PointD::new(2.0, 2.0),
            end: PointD::new(3.0, 0.0),
        })
        .unwrap();
        let mut rec = PathRecorder::new();
        c.emit(&mut rec, 0.0).unwrap();
        assert_eq!(rec.commands.len(), 2);
    }

    #[test]
    fn test_three_curve_vertices_emit_nothing() {
        let mut c = Contour::new();
        c.add_segment(cv(0.0, 0.0)).unwrap();
        c.add_segment(cv(10.0, 0.0)).unwrap();
        c.add_segment(cv(10.0, 10.0)).unwrap();
        let mut rec = PathRecorder::new();
        let end = c.emit(&mut rec, 0.0).unwrap();
        assert!(rec.commands.is_empty());
        assert_eq!(end, None);
    }

    #[test]
    fn test_fourth_curve_vertex_emits_one_span() {
        let mut c = Contour::new();
        c.add_segment(cv(0.0, 0.0)).unwrap();
        c.add_segment(cv(10.0, 0.0)).unwrap();
        c.add_segment(cv(10.0, 10.0)).unwrap();
        c.add_segment(cv(0.0, 10.0)).unwrap();
        let mut rec = PathRecorder::new();
        c.emit(&mut rec, 0.0).unwrap();
        // move to the window's second point, then exactly one bezier span
        assert_eq!(rec.commands.len(), 2);
        assert_eq!(rec.commands[0], PathCmd::MoveTo(PointD::new(10.0, 0.0)));
        match rec.commands[1] {
            PathCmd::BezierTo { end, .. } => assert_eq!(end, PointD::new(10.0, 10.0)),
            other => panic!("expected bezier, got {other:?}"),
        }
    }

    #[test]
    fn test_fifth_curve_vertex_adds_continuous_span() {
        let pts = [
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 20.0),
        ];
        let mut c = Contour::new();
        for (x, y) in pts {
            c.add_segment(cv(x, y)).unwrap();
        }
        let mut rec = PathRecorder::new();
        c.emit(&mut rec, 0.0).unwrap();
        assert_eq!(rec.commands.len(), 3);
        let (end0, c1_1) = match (&rec.commands[1], &rec.commands[2]) {
            (
                PathCmd::BezierTo { c2, end, .. },
                PathCmd::BezierTo { c1, .. },
            ) => ((*c2, *end), *c1),
            other => panic!("unexpected commands: {other:?}"),
        };
        // tangent continuity at the shared point: (end - c2) == (c1_next - end)
        let (c2, end) = end0;
        assert!(((end.x - c2.x) - (c1_1.x - end.x)).abs() < 1e-10);
        assert!(((end.y - c2.y) - (c1_1.y - end.y)).abs() < 1e-10);
    }

    #[test]
    fn test_curve_coordinates_lookback() {
        let mut c = Contour::new();
        c.add_segment(cv(0.0, 0.0)).unwrap();
        c.add_segment(cv(10.0, 0.0)).unwrap();
        c.add_segment(cv(10.0, 10.0)).unwrap();
        assert_eq!(c.coordinates(0), None);
        assert_eq!(c.coordinates(2), None);
        c.add_segment(cv(0.0, 10.0)).unwrap();
        // window filled: path has reached the second-to-last point
        assert_eq!(c.coordinates(3), Some(PointD::new(10.0, 10.0)));
    }

    #[test]
    fn test_vertex_then_curve_run() {
        let mut c = Contour::new();
        c.add_segment(v(-5.0, -5.0)).unwrap();
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)] {
            c.add_segment(cv(x, y)).unwrap();
        }
        let mut rec = PathRecorder::new();
        c.emit(&mut rec, 0.0).unwrap();
        // move to vertex, line to the curve run's anchor, one span
        assert_eq!(rec.commands[0], PathCmd::MoveTo(PointD::new(-5.0, -5.0)));
        assert_eq!(rec.commands[1], PathCmd::LineTo(PointD::new(10.0, 0.0)));
        assert!(matches!(rec.commands[2], PathCmd::BezierTo { .. }));
    }

    #[test]
    fn test_shape_multiple_contours_in_order() {
        let mut outer = Contour::new();
        outer.add_segment(v(0.0, 0.0)).unwrap();
        outer.add_segment(v(100.0, 0.0)).unwrap();
        outer.add_segment(v(100.0, 100.0)).unwrap();
        outer.set_closed(true);
        let mut hole = Contour::new();
        hole.add_segment(v(20.0, 20.0)).unwrap();
        hole.add_segment(v(40.0, 20.0)).unwrap();
        hole.add_segment(v(40.0, 40.0)).unwrap();
        hole.set_closed(true);

        let mut shape = Shape::new();
        shape.add_contour(outer);
        shape.add_contour(hole);
        let mut rec = PathRecorder::new();
        shape.emit(&mut rec, 0.0).unwrap();
        let closes = rec
            .commands
            .iter()
            .filter(|c| matches!(c, PathCmd::Close))
            .count();
        assert_eq!(closes, 2);
        assert_eq!(rec.commands[0], PathCmd::MoveTo(PointD::new(0.0, 0.0)));
        assert_eq!(rec.commands[4], PathCmd::MoveTo(PointD::new(20.0, 20.0)));
    }
}
