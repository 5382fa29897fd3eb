//! Immediate-mode geometry accumulation for the WEBGL path.
//!
//! [`ImmediateBuilder`] implements the `begin_shape` / `vertex` /
//! `end_shape` pattern: vertices accumulate into a scratch buffer and are
//! assembled into draw-ready [`Geometry`] when the shape ends. Each
//! primitive kind has its own index-assembly rule; the default polygon
//! kind runs the ear-clipping tessellator and supports interior contours
//! as holes.
//!
//! QUADS input lists each quad's four vertices in consistent perimeter
//! order, while QUAD_STRIP and TRIANGLE_STRIP share vertices in zig-zag
//! order. Both routes go through [`quad_indices`], which always splits a
//! quad along its b-d diagonal, so the same grid of points produces the
//! same triangles whichever mode carried it in.

use smallvec::SmallVec;
use tracing::trace;

use crate::basics::{Point3, PointD};
use crate::error::{GfxError, GfxResult};
use crate::geometry::{Geometry, ShapeKind};
use crate::tess;

// ============================================================================
// Quad splitting
// ============================================================================

/// Split the quad with perimeter indices a, b, c, d into two triangles
/// along the b-d diagonal. This is the same diagonal a zig-zag strip
/// produces, so quads and strips over the same points triangulate
/// identically.
#[inline]
pub(crate) fn quad_indices(a: u32, b: u32, c: u32, d: u32, out: &mut Vec<u32>) {
    out.extend_from_slice(&[a, b, d, b, c, d]);
}

// ============================================================================
// ImmediateBuilder
// ============================================================================

struct PendingShape {
    kind: ShapeKind,
    contours: SmallVec<[Vec<Point3>; 2]>,
    contour_open: bool,
}

/// Accumulates vertices between `begin` and `end` and assembles them
/// into a [`Geometry`]. Re-entrant `begin`, or `vertex`/`end` without an
/// open shape, fail with [`GfxError::NestedShape`]; they never corrupt a
/// later accumulation.
pub struct ImmediateBuilder {
    pending: Option<PendingShape>,
}

impl ImmediateBuilder {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a new accumulation.
    pub fn begin(&mut self, kind: ShapeKind) -> GfxResult<()> {
        if self.pending.is_some() {
            return Err(GfxError::NestedShape {
                call: "begin_shape",
                reason: "called while a shape is already open",
            });
        }
        let mut contours = SmallVec::new();
        contours.push(Vec::new());
        self.pending = Some(PendingShape {
            kind,
            contours,
            contour_open: false,
        });
        Ok(())
    }

    /// Append a vertex to the open shape (to the open interior contour
    /// if one is active).
    pub fn vertex(&mut self, x: f64, y: f64, z: f64) -> GfxResult<()> {
        let pending = self.pending.as_mut().ok_or(GfxError::NestedShape {
            call: "vertex",
            reason: "called with no open shape",
        })?;
        if let Some(contour) = pending.contours.last_mut() {
            contour.push(Point3::new(x, y, z));
        }
        Ok(())
    }

    /// Open an interior contour (hole). Only meaningful for the default
    /// polygon kind.
    pub fn begin_contour(&mut self) -> GfxResult<()> {
        let pending = self.pending.as_mut().ok_or(GfxError::NestedShape {
            call: "begin_contour",
            reason: "called with no open shape",
        })?;
        if pending.kind != ShapeKind::Polygon {
            return Err(GfxError::NestedShape {
                call: "begin_contour",
                reason: "is only valid for the default polygon kind",
            });
        }
        if pending.contour_open {
            return Err(GfxError::NestedShape {
                call: "begin_contour",
                reason: "called while a contour is already open",
            });
        }
        pending.contour_open = true;
        pending.contours.push(Vec::new());
        Ok(())
    }

    pub fn end_contour(&mut self) -> GfxResult<()> {
        let pending = self.pending.as_mut().ok_or(GfxError::NestedShape {
            call: "end_contour",
            reason: "called with no open shape",
        })?;
        if !pending.contour_open {
            return Err(GfxError::NestedShape {
                call: "end_contour",
                reason: "called with no open contour",
            });
        }
        pending.contour_open = false;
        Ok(())
    }

    /// Finish the accumulation and assemble the geometry. `close`
    /// appends the closing edge for open line kinds and marks the
    /// polygon outline closed.
    pub fn end(&mut self, close: bool) -> GfxResult<Geometry> {
        let pending = self.pending.take().ok_or(GfxError::NestedShape {
            call: "end_shape",
            reason: "called with no open shape",
        })?;
        trace!(
            kind = ?pending.kind,
            vertices = pending.contours.iter().map(Vec::len).sum::<usize>(),
            close,
            "assembling immediate geometry"
        );
        Ok(assemble(pending, close))
    }
}

impl Default for ImmediateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assembly
// ============================================================================

fn assemble(pending: PendingShape, close: bool) -> Geometry {
    let mut geom = Geometry::new(pending.kind);
    for c in &pending.contours {
        geom.vertices.extend_from_slice(c);
    }
    let n = geom.vertices.len() as u32;

    match pending.kind {
        // Points carry no fill indices or edges; the renderer draws a
        // disc per vertex
        ShapeKind::Points => {}
        ShapeKind::Lines => {
            // trailing unpaired vertex is dropped
            let mut i = 0;
            while i + 1 < n {
                geom.edges.push((i, i + 1));
                i += 2;
            }
        }
        ShapeKind::LineStrip => {
            for i in 0..n.saturating_sub(1) {
                geom.edges.push((i, i + 1));
            }
            if close && n > 2 {
                geom.edges.push((n - 1, 0));
            }
        }
        ShapeKind::LineLoop => {
            for i in 0..n.saturating_sub(1) {
                geom.edges.push((i, i + 1));
            }
            if n > 2 {
                geom.edges.push((n - 1, 0));
            }
        }
        ShapeKind::Triangles => {
            let mut i = 0;
            while i + 2 < n {
                geom.indices.extend_from_slice(&[i, i + 1, i + 2]);
                triangle_edges(i, i + 1, i + 2, &mut geom.edges);
                i += 3;
            }
        }
        ShapeKind::TriangleStrip => {
            for i in 0..n.saturating_sub(2) {
                // flip odd triangles so winding stays consistent
                let tri = if i % 2 == 0 {
                    [i, i + 1, i + 2]
                } else {
                    [i + 1, i, i + 2]
                };
                geom.indices.extend_from_slice(&tri);
                triangle_edges(tri[0], tri[1], tri[2], &mut geom.edges);
            }
        }
        ShapeKind::TriangleFan => {
            for i in 1..n.saturating_sub(1) {
                geom.indices.extend_from_slice(&[0, i, i + 1]);
                triangle_edges(0, i, i + 1, &mut geom.edges);
            }
        }
        ShapeKind::Quads => {
            let mut i = 0;
            while i + 3 < n {
                quad_indices(i, i + 1, i + 2, i + 3, &mut geom.indices);
                quad_edges(i, i + 1, i + 2, i + 3, &mut geom.edges);
                i += 4;
            }
        }
        ShapeKind::QuadStrip => {
            let mut k = 0;
            while 2 * k + 3 < n {
                let (a, b, c, d) = (2 * k, 2 * k + 1, 2 * k + 3, 2 * k + 2);
                quad_indices(a, b, c, d, &mut geom.indices);
                quad_edges(a, b, c, d, &mut geom.edges);
                k += 1;
            }
        }
        ShapeKind::Polygon => {
            let rings: Vec<Vec<PointD>> = pending
                .contours
                .iter()
                .map(|c| c.iter().map(|p| PointD::new(p.x, p.y)).collect())
                .collect();
            geom.indices = tess::triangulate(&rings);
            // outline edges per contour; interior contours always close
            let mut base = 0u32;
            for (ci, c) in pending.contours.iter().enumerate() {
                let len = c.len() as u32;
                for i in 0..len.saturating_sub(1) {
                    geom.edges.push((base + i, base + i + 1));
                }
                if len > 2 && (close || ci > 0) {
                    geom.edges.push((base + len - 1, base));
                }
                base += len;
            }
        }
    }
    geom
}

fn triangle_edges(a: u32, b: u32, c: u32, edges: &mut Vec<(u32, u32)>) {
    edges.push((a, b));
    edges.push((b, c));
    edges.push((c, a));
}

fn quad_edges(a: u32, b: u32, c: u32, d: u32, edges: &mut Vec<(u32, u32)>) {
    edges.push((a, b));
    edges.push((b, c));
    edges.push((c, d));
    edges.push((d, a));
}

// ============================================================================
// Tests
// ============================================================================
