//! WEBGL renderer façade.
//!
//! [`RendererGl`] routes the shape verbs through the immediate-mode
//! builder, expands strokes into triangle geometry on the CPU, and
//! submits draw calls to a [`GlDevice`] collaborator together with the
//! current model-view matrix. Curved shape vertices (bezier, quadratic,
//! curve) are flattened to line segments at a fixed detail before
//! accumulation; a point is rendered as a round disc of the current
//! stroke weight.

use tracing::trace;

use crate::basics::{PointD, TWO_PI};
use crate::curves::{catmull_rom_to_bezier, flatten_cubic, quadratic_to_cubic};
use crate::error::{GfxError, GfxResult};
use crate::geometry::{Geometry, GpuVertex, ShapeKind};
use crate::immediate::ImmediateBuilder;
use crate::matrix::Mat4;
use crate::mode_adjust::{arc_mode_adjust, mode_adjust};
use crate::renderer::RendererCore;
use crate::renderer_canvas::ArcMode;
use crate::stroke_builder::StrokeBuilder;

/// Segments per flattened curve span and per quarter turn of an ellipse.
const CURVE_DETAIL: u32 = 20;

// ============================================================================
// Collaborator seam
// ============================================================================

/// The outbound GL-like context: consumes an uploaded vertex buffer, a
/// triangle index list, a flat color and the model-view matrix.
pub trait GlDevice {
    fn draw_triangles(
        &mut self,
        vertices: &[GpuVertex],
        indices: &[u32],
        color: [f32; 4],
        model_view: [f32; 16],
    );
}

// ============================================================================
// RendererGl
// ============================================================================

/// The WEBGL renderer façade.
pub struct RendererGl<G: GlDevice> {
    core: RendererCore<Mat4>,
    device: G,
    builder: ImmediateBuilder,
    stroke: StrokeBuilder,
    /// Last on-path point of the open shape, for curve flattening.
    current: Option<PointD>,
    curve_window: Vec<PointD>,
}

impl<G: GlDevice> RendererGl<G> {
    pub fn new(device: G) -> Self {
        Self {
            core: RendererCore::new(),
            device,
            builder: ImmediateBuilder::new(),
            stroke: StrokeBuilder::new(),
            current: None,
            curve_window: Vec::new(),
        }
    }

    pub fn core(&self) -> &RendererCore<Mat4> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut RendererCore<Mat4> {
        &mut self.core
    }

    pub fn device(&self) -> &G {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut G {
        &mut self.device
    }

    pub fn into_device(self) -> G {
        self.device
    }

    // ------------------------------------------------------------------
    // 3D-only transform verbs
    // ------------------------------------------------------------------

    pub fn rotate_x(&mut self, angle: f64) {
        self.core.stack_mut().matrix_mut().rotate(angle, 1.0, 0.0, 0.0);
    }

    pub fn rotate_y(&mut self, angle: f64) {
        self.core.stack_mut().matrix_mut().rotate(angle, 0.0, 1.0, 0.0);
    }

    pub fn rotate_axis(&mut self, angle: f64, ax: f64, ay: f64, az: f64) {
        self.core.stack_mut().matrix_mut().rotate(angle, ax, ay, az);
    }

    /// Post-multiply the current matrix by a raw column-major 4x4.
    pub fn apply_matrix(&mut self, m: [f64; 16]) {
        let m = Mat4::from_array(m);
        self.core.stack_mut().matrix_mut().apply(&m);
    }

    // ------------------------------------------------------------------
    // Immediate-mode shape verbs
    // ------------------------------------------------------------------

    pub fn begin_shape(&mut self, kind: ShapeKind) -> GfxResult<()> {
        self.builder.begin(kind)?;
        self.current = None;
        self.curve_window.clear();
        Ok(())
    }

    pub fn vertex(&mut self, x: f64, y: f64, z: f64) -> GfxResult<()> {
        self.curve_window.clear();
        self.builder.vertex(x, y, z)?;
        self.current = Some(PointD::new(x, y));
        Ok(())
    }

    /// Cubic segment from the current point, flattened to line segments.
    pub fn bezier_vertex(
        &mut self,
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    ) -> GfxResult<()> {
        let p0 = self.current.ok_or(GfxError::MissingAnchor { segment: "bezier" })?;
        self.flatten_into(
            p0,
            PointD::new(c1x, c1y),
            PointD::new(c2x, c2y),
            PointD::new(x, y),
        )
    }

    /// Quadratic segment, promoted to a cubic and flattened.
    pub fn quadratic_vertex(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> GfxResult<()> {
        let p0 = self.current.ok_or(GfxError::MissingAnchor {
            segment: "quadratic",
        })?;
        let end = PointD::new(x, y);
        let (c1, c2) = quadratic_to_cubic(p0, PointD::new(cx, cy), end);
        self.flatten_into(p0, c1, c2, end)
    }

    /// Catmull-Rom control point. The first three calls only feed the
    /// lookback window; the fourth emits the first visible span.
    pub fn curve_vertex(&mut self, x: f64, y: f64) -> GfxResult<()> {
        if !self.builder.is_open() {
            return Err(GfxError::NestedShape {
                call: "vertex",
                reason: "called with no open shape",
            });
        }
        self.curve_window.push(PointD::new(x, y));
        let n = self.curve_window.len();
        if n < 4 {
            return Ok(());
        }
        let window = &self.curve_window[n - 4..];
        let tightness = self.core.style().curve_tightness;
        let spans = catmull_rom_to_bezier(window, tightness);
        let anchor = window[1];
        // the visible run starts at the window's second point: walk there
        // first (straight from any preceding on-path point), then flatten
        // the span from the anchor itself
        if self.current != Some(anchor) {
            self.builder.vertex(anchor.x, anchor.y, 0.0)?;
            self.current = Some(anchor);
        }
        for span in &spans {
            let p0 = self.current.unwrap_or(anchor);
            self.flatten_into(p0, span.c1, span.c2, span.end)?;
        }
        Ok(())
    }

    pub fn begin_contour(&mut self) -> GfxResult<()> {
        self.curve_window.clear();
        self.current = None;
        self.builder.begin_contour()
    }

    pub fn end_contour(&mut self) -> GfxResult<()> {
        self.curve_window.clear();
        self.current = None;
        self.builder.end_contour()
    }

    /// Assemble the accumulated shape and draw it.
    pub fn end_shape(&mut self, close: bool) -> GfxResult<()> {
        let geom = self.builder.end(close)?;
        self.current = None;
        self.curve_window.clear();
        self.draw_geometry(&geom);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    pub fn ellipse(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> GfxResult<()> {
        let p = mode_adjust(x1, y1, x2, y2, self.core.style().ellipse_mode);
        let (rx, ry) = (p.w.abs() / 2.0, p.h.abs() / 2.0);
        let (cx, cy) = (p.x + p.w / 2.0, p.y + p.h / 2.0);
        self.begin_shape(ShapeKind::Polygon)?;
        let n = CURVE_DETAIL * 4;
        for i in 0..n {
            let a = TWO_PI * i as f64 / n as f64;
            self.vertex(cx + rx * a.cos(), cy + ry * a.sin(), 0.0)?;
        }
        self.end_shape(true)
    }

    pub fn rect(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> GfxResult<()> {
        let p = mode_adjust(x1, y1, x2, y2, self.core.style().rect_mode);
        self.begin_shape(ShapeKind::Polygon)?;
        self.vertex(p.x, p.y, 0.0)?;
        self.vertex(p.x + p.w, p.y, 0.0)?;
        self.vertex(p.x + p.w, p.y + p.h, 0.0)?;
        self.vertex(p.x, p.y + p.h, 0.0)?;
        self.end_shape(true)
    }

    /// Arc as a sampled polygon. Open leaves the outline unclosed (the
    /// fill still closes along the chord); Chord closes it; Pie wedges
    /// through the center.
    pub fn arc(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        start: f64,
        stop: f64,
        mode: ArcMode,
    ) -> GfxResult<()> {
        let p = arc_mode_adjust(x1, y1, x2, y2, self.core.style().ellipse_mode);
        let (cx, cy) = (p.x + p.w / 2.0, p.y + p.h / 2.0);
        let (rx, ry) = (p.w.abs() / 2.0, p.h.abs() / 2.0);

        let start = start.rem_euclid(TWO_PI);
        let mut stop = stop.rem_euclid(TWO_PI);
        if stop <= start {
            stop += TWO_PI;
        }
        let sweep = (stop - start).min(TWO_PI);
        if sweep >= TWO_PI - 1e-9 {
            return self.ellipse(x1, y1, x2, y2);
        }

        let n = ((sweep / TWO_PI) * (CURVE_DETAIL * 4) as f64).ceil().max(2.0) as u32;
        self.begin_shape(ShapeKind::Polygon)?;
        for i in 0..=n {
            let a = start + sweep * i as f64 / n as f64;
            self.vertex(cx + rx * a.cos(), cy + ry * a.sin(), 0.0)?;
        }
        if mode == ArcMode::Pie {
            self.vertex(cx, cy, 0.0)?;
        }
        self.end_shape(mode != ArcMode::Open)
    }

    pub fn triangle(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> GfxResult<()> {
        self.begin_shape(ShapeKind::Triangles)?;
        self.vertex(x1, y1, 0.0)?;
        self.vertex(x2, y2, 0.0)?;
        self.vertex(x3, y3, 0.0)?;
        self.end_shape(false)
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
    ) -> GfxResult<()> {
        self.begin_shape(ShapeKind::Quads)?;
        self.vertex(x1, y1, 0.0)?;
        self.vertex(x2, y2, 0.0)?;
        self.vertex(x3, y3, 0.0)?;
        self.vertex(x4, y4, 0.0)?;
        self.end_shape(false)
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> GfxResult<()> {
        self.begin_shape(ShapeKind::Lines)?;
        self.vertex(x1, y1, 0.0)?;
        self.vertex(x2, y2, 0.0)?;
        self.end_shape(false)
    }

    /// A point renders as a round disc of the current stroke weight,
    /// painted with the stroke color.
    pub fn point(&mut self, x: f64, y: f64) {
        let style = self.core.style();
        let Some(stroke) = style.stroke else {
            return;
        };
        let r = (style.stroke_weight / 2.0).max(0.5);
        let mv = self.model_view();
        let disc = point_disc(x, y, r);
        let indices: Vec<u32> = (1..CURVE_DETAIL)
            .flat_map(|i| [0, i, i + 1])
            .chain([0, CURVE_DETAIL, 1])
            .collect();
        self.device
            .draw_triangles(&disc, &indices, stroke.to_normalized(), mv);
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Draw assembled geometry: fill pass from the index list, stroke
    /// pass from CPU-expanded edge geometry, points as discs.
    pub fn draw_geometry(&mut self, geom: &Geometry) {
        if geom.is_empty() {
            return;
        }
        let style = self.core.style().clone();
        let mv = self.model_view();
        trace!(kind = ?geom.kind(), vertices = geom.vertices().len(), "drawing geometry");

        if geom.kind() == ShapeKind::Points {
            for v in geom.vertices() {
                self.point(v.x, v.y);
            }
            return;
        }

        if geom.kind().has_fill() && !geom.indices().is_empty() {
            if let Some(fill) = style.fill {
                self.device.draw_triangles(
                    &geom.gpu_vertices(),
                    geom.indices(),
                    fill.to_normalized(),
                    mv,
                );
            }
        }

        if let Some(stroke) = style.stroke {
            if !geom.edges().is_empty() {
                let sm = self.stroke.math_mut();
                sm.set_weight(style.stroke_weight);
                sm.set_line_cap(style.line_cap);
                sm.set_line_join(style.line_join);
                sm.set_miter_limit(style.miter_limit);

                let flat: Vec<PointD> = geom.vertices().iter().map(|v| v.xy()).collect();
                let mut soup: Vec<PointD> = Vec::new();
                self.stroke.build_edges(&flat, geom.edges(), &mut soup);
                if !soup.is_empty() {
                    let verts: Vec<GpuVertex> = soup
                        .iter()
                        .map(|p| GpuVertex {
                            position: [p.x as f32, p.y as f32, 0.0],
                        })
                        .collect();
                    let indices: Vec<u32> = (0..verts.len() as u32).collect();
                    self.device
                        .draw_triangles(&verts, &indices, stroke.to_normalized(), mv);
                }
            }
        }
    }

    fn model_view(&self) -> [f32; 16] {
        let m = &self.core.matrix().m;
        let mut out = [0.0f32; 16];
        for (dst, src) in out.iter_mut().zip(m.iter()) {
            *dst = *src as f32;
        }
        out
    }

    /// Flatten one cubic span into the open accumulation.
    fn flatten_into(&mut self, p0: PointD, c1: PointD, c2: PointD, end: PointD) -> GfxResult<()> {
        let mut samples = Vec::with_capacity(CURVE_DETAIL as usize);
        flatten_cubic(p0, c1, c2, end, CURVE_DETAIL, &mut samples);
        for s in &samples {
            self.builder.vertex(s.x, s.y, 0.0)?;
        }
        self.current = Some(end);
        Ok(())
    }
}

/// Disc outline vertices: center first, then the rim.
fn point_disc(x: f64, y: f64, r: f64) -> Vec<GpuVertex> {
    let mut verts = Vec::with_capacity(CURVE_DETAIL as usize + 1);
    verts.push(GpuVertex {
        position: [x as f32, y as f32, 0.0],
    });
    for i in 0..CURVE_DETAIL {
        let a = TWO_PI * i as f64 / CURVE_DETAIL as f64;
        verts.push(GpuVertex {
            position: [(x + r * a.cos()) as f32, (y + r * a.sin()) as f32, 0.0],
        });
    }
    verts
}

// ============================================================================
// Tests
// ============================================================================
