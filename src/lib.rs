//! # sketch-gfx
//!
//! Immediate-mode 2D/3D sketch rendering core: the transform/style stack,
//! shape assembly, and geometry generation behind a creative-coding
//! drawing API. The crate owns the math and the geometry; the actual
//! drawing surfaces (a 2D canvas context, a GL-like device) are external
//! collaborators reached through the [`renderer_canvas::Canvas2d`] and
//! [`renderer_gl::GlDevice`] traits.
//!
//! The pipeline, bottom up:
//!
//! 1. **Transforms** — [`matrix::Affine2D`] / [`matrix::Mat4`] composed
//!    in user call order, snapshotted by the stacks in
//!    [`transform_stack`].
//! 2. **Modes and styles** — [`mode_adjust`] normalizes rect/ellipse
//!    coordinates to a canonical corner form; [`style::StyleState`] holds
//!    everything `push`/`pop` must restore.
//! 3. **Shape assembly** — [`shape`] accumulates vertex, bezier,
//!    quadratic, and Catmull-Rom curve segments into contours and emits
//!    them as path commands; [`curves`] does the spline math.
//! 4. **Geometry generation** — [`immediate`] assembles accumulated
//!    vertices into indexed triangles per primitive kind (tessellating
//!    polygons through [`tess`]); [`stroke_builder`] expands polylines
//!    into stroke triangles with caps and joins from [`stroke_math`].
//! 5. **Façades** — [`renderer_canvas::Renderer2D`] paints through path
//!    emission, [`renderer_gl::RendererGl`] through vertex buffers and
//!    draw calls.

// Foundation types & math
pub mod basics;
pub mod error;
pub mod math;
pub mod matrix;

// State
pub mod mode_adjust;
pub mod style;
pub mod transform_stack;

// Shape & curve model
pub mod curves;
pub mod shape;

// Geometry generation
pub mod geometry;
pub mod immediate;
pub mod stroke_builder;
pub mod stroke_math;
pub mod tess;

// Renderer façades
pub mod renderer;
pub mod renderer_canvas;
pub mod renderer_gl;

pub use basics::{Point3, PointD};
pub use error::{GfxError, GfxResult};
pub use geometry::{Geometry, GpuVertex, ShapeKind};
pub use matrix::{Affine2D, Mat4};
pub use mode_adjust::ShapeMode;
pub use renderer_canvas::{ArcMode, Canvas2d, Renderer2D};
pub use renderer_gl::{GlDevice, RendererGl};
pub use shape::{Contour, PathSink, Shape, ShapeSegment};
pub use stroke_math::{LineCap, LineJoin};
pub use style::{Rgba8, StyleState};
