//! 2D canvas renderer façade.
//!
//! [`Renderer2D`] resolves modes and styles, applies the active 2D
//! transform, and emits path construction against a [`Canvas2d`]
//! collaborator (the actual drawing context lives outside the crate).
//! Ellipses, arcs and rounded rectangle corners are converted to cubic
//! Bezier spans, splitting sweeps into quarter-circle chunks.

use tracing::trace;

use crate::basics::{PointD, PI, TWO_PI};
use crate::error::{GfxError, GfxResult};
use crate::matrix::Affine2D;
use crate::mode_adjust::{arc_mode_adjust, mode_adjust};
use crate::renderer::RendererCore;
use crate::shape::{Contour, PathSink, Shape, ShapeSegment};
use crate::style::Rgba8;

/// Sweeps smaller than this emit a straight chord instead of a curve.
const ARC_ANGLE_EPSILON: f64 = 0.01;

// ============================================================================
// Collaborator seam
// ============================================================================

/// The outbound 2D drawing context: path construction plus the fill and
/// stroke invocations that consume the current path.
pub trait Canvas2d: PathSink {
    /// Install the active transform for subsequent path coordinates, as
    /// the six-element affine `[a, b, c, d, e, f]`.
    fn set_transform(&mut self, m: [f64; 6]);
    /// Discard the current path and start a new one.
    fn begin_path(&mut self);
    /// Fill the current path.
    fn fill_path(&mut self, color: Rgba8);
    /// Stroke the current path with the given pen settings.
    fn stroke_path(
        &mut self,
        color: Rgba8,
        weight: f64,
        cap: crate::stroke_math::LineCap,
        join: crate::stroke_math::LineJoin,
        miter_limit: f64,
    );
}

// ============================================================================
// Arc-to-Bezier conversion
// ============================================================================

/// One cubic span of an elliptical arc: `[start, c1, c2, end]`.
type ArcSpan = [PointD; 4];

/// Convert a single arc chunk (sweep at most a quarter turn or so) to one
/// cubic Bezier span.
fn arc_chunk(cx: f64, cy: f64, rx: f64, ry: f64, start_angle: f64, sweep: f64) -> ArcSpan {
    let x0 = (sweep / 2.0).cos();
    let y0 = (sweep / 2.0).sin();
    let tx = (1.0 - x0) * 4.0 / 3.0;
    let ty = y0 - tx * x0 / y0;

    let px = [x0, x0 + tx, x0 + tx, x0];
    let py = [-y0, -ty, ty, y0];

    let (sn, cs) = (start_angle + sweep / 2.0).sin_cos();

    let mut out = [PointD::new(0.0, 0.0); 4];
    for i in 0..4 {
        out[i] = PointD::new(
            cx + rx * (px[i] * cs - py[i] * sn),
            cy + ry * (px[i] * sn + py[i] * cs),
        );
    }
    out
}

/// Convert an elliptical arc into consecutive cubic spans, none sweeping
/// more than a quarter turn. A sweep below `ARC_ANGLE_EPSILON` yields an
/// empty list (the caller draws the chord or nothing).
fn arc_spans(cx: f64, cy: f64, rx: f64, ry: f64, start_angle: f64, sweep_angle: f64) -> Vec<ArcSpan> {
    let mut spans = Vec::new();
    if sweep_angle.abs() < ARC_ANGLE_EPSILON {
        return spans;
    }
    let sweep = sweep_angle.clamp(-TWO_PI, TWO_PI);
    let mut start = start_angle;
    let mut remaining = sweep;
    while remaining.abs() > ARC_ANGLE_EPSILON {
        let local = remaining.clamp(-PI * 0.5, PI * 0.5);
        spans.push(arc_chunk(cx, cy, rx, ry, start, local));
        start += local;
        remaining -= local;
    }
    spans
}

fn emit_spans<S: PathSink>(sink: &mut S, spans: &[ArcSpan], start_new_path: bool) {
    let Some(first) = spans.first() else {
        return;
    };
    if start_new_path {
        sink.move_to(first[0].x, first[0].y);
    } else {
        sink.line_to(first[0].x, first[0].y);
    }
    for span in spans {
        sink.bezier_to(
            span[1].x, span[1].y, span[2].x, span[2].y, span[3].x, span[3].y,
        );
    }
}

// ============================================================================
// Arc closure modes
// ============================================================================

/// How an arc is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArcMode {
    /// Stroke follows the arc only; the fill still closes along the chord.
    #[default]
    Open,
    /// Straight line back to the arc's start point.
    Chord,
    /// Wedge through the ellipse center.
    Pie,
}

// ============================================================================
// Renderer2D
// ============================================================================

struct OpenShape {
    contours: Vec<Contour>,
    in_contour: bool,
}

/// The 2D renderer façade. Shape verbs resolve the active modes and
/// styles and paint through the canvas collaborator.
pub struct Renderer2D<C: Canvas2d> {
    core: RendererCore<Affine2D>,
    canvas: C,
    open_shape: Option<OpenShape>,
}

impl<C: Canvas2d> Renderer2D<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            core: RendererCore::new(),
            canvas,
            open_shape: None,
        }
    }

    /// Shared transform/style state and its setters.
    pub fn core(&self) -> &RendererCore<Affine2D> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut RendererCore<Affine2D> {
        &mut self.core
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    // ------------------------------------------------------------------
    // 2D-only transform verbs
    // ------------------------------------------------------------------

    pub fn shear_x(&mut self, angle: f64) {
        self.core.stack_mut().matrix_mut().shear_x(angle);
    }

    pub fn shear_y(&mut self, angle: f64) {
        self.core.stack_mut().matrix_mut().shear_y(angle);
    }

    /// Post-multiply the current matrix by a raw six-element affine.
    pub fn apply_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        let m = Affine2D::new_custom(a, b, c, d, e, f);
        self.core.stack_mut().matrix_mut().apply(&m);
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    /// Ellipse under the active ellipse mode. Negative sizes resolve to
    /// their absolute value here, at geometry generation.
    pub fn ellipse(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let mode = self.core.style().ellipse_mode;
        let p = mode_adjust(x1, y1, x2, y2, mode);
        let (w, h) = (p.w.abs(), p.h.abs());
        let (cx, cy) = (p.x + p.w / 2.0, p.y + p.h / 2.0);
        let spans = arc_spans(cx, cy, w / 2.0, h / 2.0, 0.0, TWO_PI);
        self.paint(|sink| {
            emit_spans(sink, &spans, true);
            sink.close_path();
        });
    }

    /// Axis-aligned rectangle under the active rect mode. A CORNER-mode
    /// rect with negative width or height is drawn flipped, exactly as
    /// given.
    pub fn rect(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let mode = self.core.style().rect_mode;
        let p = mode_adjust(x1, y1, x2, y2, mode);
        self.paint(|sink| {
            sink.move_to(p.x, p.y);
            sink.line_to(p.x + p.w, p.y);
            sink.line_to(p.x + p.w, p.y + p.h);
            sink.line_to(p.x, p.y + p.h);
            sink.close_path();
        });
    }

    /// Rectangle with per-corner radii (top-left, top-right,
    /// bottom-right, bottom-left). Radii are clamped to the half extents.
    pub fn rect_rounded(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        tl: f64,
        tr: f64,
        br: f64,
        bl: f64,
    ) {
        let mode = self.core.style().rect_mode;
        let p = mode_adjust(x1, y1, x2, y2, mode);
        let (w, h) = (p.w.abs(), p.h.abs());
        let (x, y) = (p.x.min(p.x + p.w), p.y.min(p.y + p.h));
        let cap = (w / 2.0).min(h / 2.0);
        let [tl, tr, br, bl] =
            [tl, tr, br, bl].map(|r| r.abs().min(cap));

        let quarter = PI / 2.0;
        let arcs = [
            // top-right corner, sweeping from -90° to 0°
            arc_spans(x + w - tr, y + tr, tr, tr, -quarter, quarter),
            arc_spans(x + w - br, y + h - br, br, br, 0.0, quarter),
            arc_spans(x + bl, y + h - bl, bl, bl, quarter, quarter),
            arc_spans(x + tl, y + tl, tl, tl, PI, quarter),
        ];
        self.paint(|sink| {
            sink.move_to(x + tl, y);
            sink.line_to(x + w - tr, y);
            emit_spans(sink, &arcs[0], false);
            sink.line_to(x + w, y + h - br);
            emit_spans(sink, &arcs[1], false);
            sink.line_to(x + bl, y + h);
            emit_spans(sink, &arcs[2], false);
            sink.line_to(x, y + tl);
            emit_spans(sink, &arcs[3], false);
            sink.close_path();
        });
    }

    /// Elliptical arc from `start` to `stop` radians. A sweep of a full
    /// turn or more draws the whole ellipse. The fill always closes
    /// (chord for Open/Chord, wedge for Pie); only the stroke
    /// distinguishes Open from Chord.
    pub fn arc(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, start: f64, stop: f64, mode: ArcMode) {
        let shape_mode = self.core.style().ellipse_mode;
        let p = arc_mode_adjust(x1, y1, x2, y2, shape_mode);
        let (cx, cy) = (p.x + p.w / 2.0, p.y + p.h / 2.0);
        let (rx, ry) = (p.w.abs() / 2.0, p.h.abs() / 2.0);

        let start = start.rem_euclid(TWO_PI);
        let mut stop = stop.rem_euclid(TWO_PI);
        if stop <= start {
            stop += TWO_PI;
        }
        let sweep = stop - start;
        if sweep >= TWO_PI - ARC_ANGLE_EPSILON {
            let spans = arc_spans(cx, cy, rx, ry, 0.0, TWO_PI);
            self.paint(|sink| {
                emit_spans(sink, &spans, true);
                sink.close_path();
            });
            return;
        }

        let spans = arc_spans(cx, cy, rx, ry, start, sweep);
        let style = self.core.style().clone();
        if style.is_invisible() || spans.is_empty() {
            return;
        }
        self.canvas.set_transform(self.core.matrix().to_array());
        if let Some(fill) = style.fill {
            self.canvas.begin_path();
            emit_spans(&mut self.canvas, &spans, true);
            if mode == ArcMode::Pie {
                self.canvas.line_to(cx, cy);
            }
            self.canvas.close_path();
            self.canvas.fill_path(fill);
        }
        if let Some(stroke) = style.stroke {
            self.canvas.begin_path();
            emit_spans(&mut self.canvas, &spans, true);
            match mode {
                ArcMode::Open => {}
                ArcMode::Chord => self.canvas.close_path(),
                ArcMode::Pie => {
                    self.canvas.line_to(cx, cy);
                    self.canvas.close_path();
                }
            }
            self.canvas.stroke_path(
                stroke,
                style.stroke_weight,
                style.line_cap,
                style.line_join,
                style.miter_limit,
            );
        }
    }

    pub fn triangle(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.paint(|sink| {
            sink.move_to(x1, y1);
            sink.line_to(x2, y2);
            sink.line_to(x3, y3);
            sink.close_path();
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn quad(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
        x4: f64,
        y4: f64,
    ) {
        self.paint(|sink| {
            sink.move_to(x1, y1);
            sink.line_to(x2, y2);
            sink.line_to(x3, y3);
            sink.line_to(x4, y4);
            sink.close_path();
        });
    }

    /// Straight stroked segment; fill does not apply.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let style = self.core.style().clone();
        let Some(stroke) = style.stroke else {
            return;
        };
        self.canvas.set_transform(self.core.matrix().to_array());
        self.canvas.begin_path();
        self.canvas.move_to(x1, y1);
        self.canvas.line_to(x2, y2);
        self.canvas.stroke_path(
            stroke,
            style.stroke_weight,
            style.line_cap,
            style.line_join,
            style.miter_limit,
        );
    }

    /// A dot of the current stroke weight: a zero-length stroked segment,
    /// visible under round and square caps.
    pub fn point(&mut self, x: f64, y: f64) {
        self.line(x, y, x, y);
    }

    // ------------------------------------------------------------------
    // Freeform shapes
    // ------------------------------------------------------------------

    pub fn begin_shape(&mut self) -> GfxResult<()> {
        if self.open_shape.is_some() {
            return Err(GfxError::NestedShape {
                call: "begin_shape",
                reason: "called while a shape is already open",
            });
        }
        self.open_shape = Some(OpenShape {
            contours: vec![Contour::new()],
            in_contour: false,
        });
        Ok(())
    }

    pub fn vertex(&mut self, x: f64, y: f64) -> GfxResult<()> {
        self.add_segment(ShapeSegment::Vertex(PointD::new(x, y)))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bezier_vertex(
        &mut self,
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    ) -> GfxResult<()> {
        self.add_segment(ShapeSegment::Bezier {
            c1: PointD::new(c1x, c1y),
            c2: PointD::new(c2x, c2y),
            end: PointD::new(x, y),
        })
    }

    pub fn quadratic_vertex(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> GfxResult<()> {
        self.add_segment(ShapeSegment::Quadratic {
            ctrl: PointD::new(cx, cy),
            end: PointD::new(x, y),
        })
    }

    pub fn curve_vertex(&mut self, x: f64, y: f64) -> GfxResult<()> {
        self.add_segment(ShapeSegment::Curve(PointD::new(x, y)))
    }

    pub fn begin_contour(&mut self) -> GfxResult<()> {
        let open = self.open_shape.as_mut().ok_or(GfxError::NestedShape {
            call: "begin_contour",
            reason: "called with no open shape",
        })?;
        if open.in_contour {
            return Err(GfxError::NestedShape {
                call: "begin_contour",
                reason: "called while a contour is already open",
            });
        }
        open.in_contour = true;
        open.contours.push(Contour::new());
        Ok(())
    }

    pub fn end_contour(&mut self) -> GfxResult<()> {
        let open = self.open_shape.as_mut().ok_or(GfxError::NestedShape {
            call: "end_contour",
            reason: "called with no open shape",
        })?;
        if !open.in_contour {
            return Err(GfxError::NestedShape {
                call: "end_contour",
                reason: "called with no open contour",
            });
        }
        open.in_contour = false;
        // interior contours always close
        if let Some(c) = open.contours.last_mut() {
            c.set_closed(true);
        }
        Ok(())
    }

    /// Finish the open shape and paint it. `close` closes the outer
    /// contour back to its first point.
    pub fn end_shape(&mut self, close: bool) -> GfxResult<()> {
        let mut open = self.open_shape.take().ok_or(GfxError::NestedShape {
            call: "end_shape",
            reason: "called with no open shape",
        })?;
        if let Some(first) = open.contours.first_mut() {
            if close {
                first.set_closed(true);
            }
        }
        let mut shape = Shape::new();
        for c in open.contours {
            if !c.is_empty() {
                shape.add_contour(c);
            }
        }
        self.draw_shape(&shape)
    }

    /// Paint an assembled shape. A shape with zero contours renders
    /// nothing.
    pub fn draw_shape(&mut self, shape: &Shape) -> GfxResult<()> {
        if shape.is_empty() {
            return Ok(());
        }
        let style = self.core.style().clone();
        if style.is_invisible() {
            return Ok(());
        }
        trace!(contours = shape.contours().len(), "painting shape");
        self.canvas.set_transform(self.core.matrix().to_array());
        if let Some(fill) = style.fill {
            self.canvas.begin_path();
            shape.emit(&mut self.canvas, style.curve_tightness)?;
            self.canvas.fill_path(fill);
        }
        if let Some(stroke) = style.stroke {
            self.canvas.begin_path();
            shape.emit(&mut self.canvas, style.curve_tightness)?;
            self.canvas.stroke_path(
                stroke,
                style.stroke_weight,
                style.line_cap,
                style.line_join,
                style.miter_limit,
            );
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Painting
    // ------------------------------------------------------------------

    fn add_segment(&mut self, segment: ShapeSegment) -> GfxResult<()> {
        let open = self.open_shape.as_mut().ok_or(GfxError::NestedShape {
            call: "vertex",
            reason: "called with no open shape",
        })?;
        match open.contours.last_mut() {
            Some(c) => c.add_segment(segment),
            None => Ok(()),
        }
    }

    /// Run a path-building closure for the fill pass and again for the
    /// stroke pass, under the active transform.
    fn paint<F: Fn(&mut C)>(&mut self, build: F) {
        let style = self.core.style().clone();
        if style.is_invisible() {
            return;
        }
        self.canvas.set_transform(self.core.matrix().to_array());
        if let Some(fill) = style.fill {
            self.canvas.begin_path();
            build(&mut self.canvas);
            self.canvas.fill_path(fill);
        }
        if let Some(stroke) = style.stroke {
            self.canvas.begin_path();
            build(&mut self.canvas);
            self.canvas.stroke_path(
                stroke,
                style.stroke_weight,
                style.line_cap,
                style.line_join,
                style.miter_limit,
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode_adjust::ShapeMode;
    use crate::stroke_math::{LineCap, LineJoin};

    const EPS: f64 = 1e-6;

    /// Canvas double that records every call.
    #[derive(Debug, Default)]
    struct RecordingCanvas {
        ops: Vec<String>,
        current: Vec<PointD>,
        fills: usize,
        strokes: usize,
    }

    impl PathSink for RecordingCanvas {
        fn move_to(&mut self, x: f64, y: f64) {
            self.current.push(PointD::new(x, y));
            self.ops.push(format!("M {x:.1} {y:.1}"));
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.current.push(PointD::new(x, y));
            self.ops.push(format!("L {x:.1} {y:.1}"));
        }
        fn bezier_to(&mut self, _c1x: f64, _c1y: f64, _c2x: f64, _c2y: f64, x: f64, y: f64) {
            self.current.push(PointD::new(x, y));
            self.ops.push(format!("C {x:.1} {y:.1}"));
        }
        fn quad_to(&mut self, _cx: f64, _cy: f64, x: f64, y: f64) {
            self.current.push(PointD::new(x, y));
            self.ops.push(format!("Q {x:.1} {y:.1}"));
        }
        fn close_path(&mut self) {
            self.ops.push("Z".into());
        }
    }

    impl Canvas2d for RecordingCanvas {
        fn set_transform(&mut self, _m: [f64; 6]) {}
        fn begin_path(&mut self) {
            self.current.clear();
            self.ops.push("begin".into());
        }
        fn fill_path(&mut self, _color: Rgba8) {
            self.fills += 1;
            self.ops.push("fill".into());
        }
        fn stroke_path(
            &mut self,
            _color: Rgba8,
            _weight: f64,
            _cap: LineCap,
            _join: LineJoin,
            _miter: f64,
        ) {
            self.strokes += 1;
            self.ops.push("stroke".into());
        }
    }

    fn renderer() -> Renderer2D<RecordingCanvas> {
        Renderer2D::new(RecordingCanvas::default())
    }

    #[test]
    fn test_rect_fill_and_stroke_passes() {
        let mut r = renderer();
        r.rect(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.canvas().fills, 1);
        assert_eq!(r.canvas().strokes, 1);
        // corner mode: top-left at (10, 20), size 30x40
        assert!(r.canvas().ops.contains(&"M 10.0 20.0".to_string()));
        assert!(r.canvas().ops.contains(&"L 40.0 60.0".to_string()));
    }

    #[test]
    fn test_rect_center_mode() {
        let mut r = renderer();
        r.core_mut().rect_mode(ShapeMode::Center);
        r.core_mut().no_stroke();
        r.rect(50.0, 50.0, 20.0, 10.0);
        assert!(r.canvas().ops.contains(&"M 40.0 45.0".to_string()));
    }

    #[test]
    fn test_no_fill_no_stroke_paints_nothing() {
        let mut r = renderer();
        r.core_mut().no_fill();
        r.core_mut().no_stroke();
        r.rect(0.0, 0.0, 10.0, 10.0);
        r.ellipse(0.0, 0.0, 10.0, 10.0);
        assert!(r.canvas().ops.is_empty());
    }

    #[test]
    fn test_ellipse_endpoint_accuracy() {
        let mut r = renderer();
        r.core_mut().no_stroke();
        // center mode default: center (50, 50), radii 20 and 10
        r.ellipse(50.0, 50.0, 40.0, 20.0);
        let pts = &r.canvas().current;
        assert!(!pts.is_empty());
        for p in pts {
            let dx = (p.x - 50.0) / 20.0;
            let dy = (p.y - 50.0) / 10.0;
            assert!((dx * dx + dy * dy - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_negative_ellipse_same_as_positive() {
        let mut a = renderer();
        a.core_mut().no_stroke();
        a.ellipse(50.0, 50.0, 40.0, 20.0);
        let mut b = renderer();
        b.core_mut().no_stroke();
        b.ellipse(50.0, 50.0, -40.0, -20.0);
        assert_eq!(a.canvas().ops, b.canvas().ops);
    }

    #[test]
    fn test_arc_open_vs_chord_vs_pie_stroke() {
        let mut open = renderer();
        open.core_mut().no_fill();
        open.arc(50.0, 50.0, 40.0, 40.0, 0.0, PI, ArcMode::Open);
        assert!(!open.canvas().ops.contains(&"Z".to_string()));

        let mut chord = renderer();
        chord.core_mut().no_fill();
        chord.arc(50.0, 50.0, 40.0, 40.0, 0.0, PI, ArcMode::Chord);
        assert!(chord.canvas().ops.contains(&"Z".to_string()));

        let mut pie = renderer();
        pie.core_mut().no_fill();
        pie.arc(50.0, 50.0, 40.0, 40.0, 0.0, PI, ArcMode::Pie);
        // wedge passes through the center
        assert!(pie.canvas().ops.contains(&"L 50.0 50.0".to_string()));
    }

    #[test]
    fn test_arc_full_turn_is_an_ellipse() {
        let mut r = renderer();
        r.core_mut().no_fill();
        r.arc(50.0, 50.0, 40.0, 40.0, 0.0, TWO_PI, ArcMode::Open);
        // full turn closes even in Open mode
        assert!(r.canvas().ops.contains(&"Z".to_string()));
        for p in &r.canvas().current {
            let d = ((p.x - 50.0).powi(2) + (p.y - 50.0).powi(2)).sqrt();
            assert!((d - 20.0).abs() < 0.05);
        }
    }

    #[test]
    fn test_arc_endpoints() {
        let mut r = renderer();
        r.core_mut().no_fill();
        r.arc(0.0, 0.0, 20.0, 20.0, 0.0, PI / 2.0, ArcMode::Open);
        let pts = &r.canvas().current;
        let first = pts.first().unwrap();
        let last = pts.last().unwrap();
        assert!((first.x - 10.0).abs() < EPS && first.y.abs() < EPS);
        assert!(last.x.abs() < EPS && (last.y - 10.0).abs() < EPS);
    }

    #[test]
    fn test_line_ignores_fill() {
        let mut r = renderer();
        r.line(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.canvas().fills, 0);
        assert_eq!(r.canvas().strokes, 1);
    }

    #[test]
    fn test_freeform_shape_with_hole() {
        let mut r = renderer();
        r.begin_shape().unwrap();
        r.vertex(0.0, 0.0).unwrap();
        r.vertex(100.0, 0.0).unwrap();
        r.vertex(100.0, 100.0).unwrap();
        r.begin_contour().unwrap();
        r.vertex(40.0, 40.0).unwrap();
        r.vertex(60.0, 40.0).unwrap();
        r.vertex(50.0, 60.0).unwrap();
        r.end_contour().unwrap();
        r.end_shape(true).unwrap();
        // two move_to per pass (outer + hole), two passes
        let moves = r
            .canvas()
            .ops
            .iter()
            .filter(|o| o.starts_with("M "))
            .count();
        assert_eq!(moves, 4);
        let closes = r.canvas().ops.iter().filter(|o| *o == "Z").count();
        assert_eq!(closes, 4);
    }

    #[test]
    fn test_shape_errors() {
        let mut r = renderer();
        assert!(r.vertex(0.0, 0.0).is_err());
        assert!(r.end_shape(false).is_err());
        r.begin_shape().unwrap();
        assert!(r.begin_shape().is_err());
        assert!(r.end_contour().is_err());
        // bezier vertex before any anchor
        assert!(matches!(
            r.bezier_vertex(1.0, 1.0, 2.0, 2.0, 3.0, 3.0),
            Err(GfxError::MissingAnchor { .. })
        ));
    }

    #[test]
    fn test_curve_shape_lookback() {
        let mut r = renderer();
        r.core_mut().no_fill();
        r.begin_shape().unwrap();
        for (x, y) in [(84.0, 91.0), (68.0, 19.0), (21.0, 17.0), (32.0, 91.0)] {
            r.curve_vertex(x, y).unwrap();
        }
        r.end_shape(false).unwrap();
        // the visible path starts at the window's second point
        assert!(r.canvas().ops.contains(&"M 68.0 19.0".to_string()));
        let curves = r
            .canvas()
            .ops
            .iter()
            .filter(|o| o.starts_with("C "))
            .count();
        assert_eq!(curves, 1);
    }

    #[test]
    fn test_rounded_rect_clamps_radii() {
        let mut r = renderer();
        r.core_mut().no_stroke();
        r.rect_rounded(0.0, 0.0, 20.0, 20.0, 500.0, 0.0, 0.0, 0.0);
        // radius clamps to 10, so the path starts at (10, 0)
        assert!(r.canvas().ops.contains(&"M 10.0 0.0".to_string()));
    }

    #[test]
    fn test_shear_and_apply_matrix() {
        let mut r = renderer();
        r.shear_x(PI / 4.0);
        let m = r.core().matrix().to_array();
        assert!((m[2] - 1.0).abs() < EPS);
        r.core_mut().reset_matrix();
        r.apply_matrix(2.0, 0.0, 0.0, 2.0, 10.0, 0.0);
        let mut x = 1.0;
        let mut y = 1.0;
        r.core().matrix().transform(&mut x, &mut y);
        assert!((x - 12.0).abs() < EPS);
        assert!((y - 2.0).abs() < EPS);
    }
}
