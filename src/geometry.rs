//! Draw-ready geometry for the WEBGL path.
//!
//! [`Geometry`] is what the immediate-mode builder produces: vertex
//! positions, a triangle (or point) index array for fills, and an edge
//! list describing polyline connectivity for stroke expansion. Buffers
//! are immutable once built; the next `begin_shape` starts a fresh
//! accumulation.

use bytemuck::{Pod, Zeroable};

use crate::basics::Point3;

// ============================================================================
// Primitive kinds
// ============================================================================

/// Primitive mode accepted by `begin_shape`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    QuadStrip,
    /// Default: arbitrary simple polygon filled via tessellation, with
    /// optional interior contours as holes.
    #[default]
    Polygon,
}

impl ShapeKind {
    /// True for the modes that produce a fill (triangle indices).
    pub fn has_fill(&self) -> bool {
        !matches!(
            self,
            ShapeKind::Points | ShapeKind::Lines | ShapeKind::LineStrip | ShapeKind::LineLoop
        )
    }
}

// ============================================================================
// GPU vertex
// ============================================================================

/// Interleaved vertex as uploaded to the GL-like device: position only.
/// `Pod` so a `&[GpuVertex]` casts directly to the byte buffer the device
/// consumes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
}

impl From<Point3> for GpuVertex {
    fn from(p: Point3) -> Self {
        Self {
            position: [p.x as f32, p.y as f32, p.z as f32],
        }
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Assembled draw-ready geometry.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub(crate) kind: ShapeKind,
    pub(crate) vertices: Vec<Point3>,
    pub(crate) indices: Vec<u32>,
    pub(crate) edges: Vec<(u32, u32)>,
}

impl Geometry {
    pub(crate) fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            vertices: Vec::new(),
            indices: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Triangle-list indices for the fill pass. Every value is
    /// `< vertices().len()`.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Polyline connectivity consumed by stroke expansion.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Flat interleaved f32 buffer for upload.
    pub fn gpu_vertices(&self) -> Vec<GpuVertex> {
        self.vertices.iter().map(|p| GpuVertex::from(*p)).collect()
    }

    /// Check the index invariant. Assembly always upholds it; tests call
    /// this directly.
    pub fn indices_in_bounds(&self) -> bool {
        let n = self.vertices.len() as u32;
        self.indices.iter().all(|&i| i < n)
            && self.edges.iter().all(|&(a, b)| a < n && b < n)
    }
}

// ============================================================================
// Tests
// ============================================================================
