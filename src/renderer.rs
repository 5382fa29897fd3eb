//! Shared renderer core.
//!
//! [`RendererCore`] owns the transform/style stack and implements every
//! operation the 2D and WEBGL façades have in common: the transform verbs
//! both matrix types support, the mode and style setters, and the
//! combined `push`/`pop`. Backend-specific verbs (2D shears, 3D
//! axis rotations, `apply_matrix`) live on the façades themselves.

use tracing::warn;

use crate::error::GfxResult;
use crate::matrix::{Affine2D, Mat4};
use crate::mode_adjust::ShapeMode;
use crate::stroke_math::{LineCap, LineJoin};
use crate::style::{ColorMode, Rgba8, StyleState};
use crate::transform_stack::TransformStack;

// ============================================================================
// Matrix seam
// ============================================================================

/// The transform operations shared by both renderer matrix types.
///
/// The 2D matrix ignores `z` components and rotates about the implicit
/// z axis; the 4x4 matrix applies them fully.
pub trait MatrixOps: Clone + Default {
    fn translate3(&mut self, x: f64, y: f64, z: f64);
    fn rotate_z(&mut self, angle: f64);
    fn scale3(&mut self, x: f64, y: f64, z: f64);
}

impl MatrixOps for Affine2D {
    fn translate3(&mut self, x: f64, y: f64, _z: f64) {
        self.translate(x, y);
    }
    fn rotate_z(&mut self, angle: f64) {
        self.rotate(angle);
    }
    fn scale3(&mut self, x: f64, y: f64, _z: f64) {
        self.scale(x, y);
    }
}

impl MatrixOps for Mat4 {
    fn translate3(&mut self, x: f64, y: f64, z: f64) {
        self.translate(x, y, z);
    }
    fn rotate_z(&mut self, angle: f64) {
        self.rotate(angle, 0.0, 0.0, 1.0);
    }
    fn scale3(&mut self, x: f64, y: f64, z: f64) {
        self.scale(x, y, z);
    }
}

// ============================================================================
// RendererCore
// ============================================================================

/// Transform and style state shared by the renderer façades.
#[derive(Debug, Clone)]
pub struct RendererCore<M: MatrixOps> {
    stack: TransformStack<M>,
}

impl<M: MatrixOps> RendererCore<M> {
    pub fn new() -> Self {
        Self {
            stack: TransformStack::new(),
        }
    }

    pub fn stack(&self) -> &TransformStack<M> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut TransformStack<M> {
        &mut self.stack
    }

    pub fn matrix(&self) -> &M {
        self.stack.matrix()
    }

    pub fn style(&self) -> &StyleState {
        self.stack.style()
    }

    // ------------------------------------------------------------------
    // Transform verbs
    // ------------------------------------------------------------------

    pub fn translate(&mut self, x: f64, y: f64, z: f64) {
        self.stack.matrix_mut().translate3(x, y, z);
    }

    /// Rotate about the z axis (the only rotation 2D supports).
    pub fn rotate(&mut self, angle: f64) {
        self.stack.matrix_mut().rotate_z(angle);
    }

    pub fn scale(&mut self, x: f64, y: f64, z: f64) {
        self.stack.matrix_mut().scale3(x, y, z);
    }

    pub fn reset_matrix(&mut self) {
        self.stack.reset_matrix();
    }

    pub fn push_matrix(&mut self) {
        self.stack.push_matrix();
    }

    pub fn pop_matrix(&mut self) -> GfxResult<()> {
        self.stack.pop_matrix()
    }

    pub fn push_style(&mut self) {
        self.stack.push_style();
    }

    pub fn pop_style(&mut self) -> GfxResult<()> {
        self.stack.pop_style()
    }

    /// Combined matrix + style snapshot.
    pub fn push(&mut self) {
        self.stack.push();
    }

    /// Combined restore; errors on an unbalanced pop.
    pub fn pop(&mut self) -> GfxResult<()> {
        self.stack.pop()
    }

    // ------------------------------------------------------------------
    // Style setters
    // ------------------------------------------------------------------

    pub fn fill(&mut self, color: Rgba8) {
        self.stack.style_mut().fill = Some(color);
    }

    pub fn no_fill(&mut self) {
        self.stack.style_mut().fill = None;
    }

    pub fn stroke(&mut self, color: Rgba8) {
        self.stack.style_mut().stroke = Some(color);
    }

    pub fn no_stroke(&mut self) {
        self.stack.style_mut().stroke = None;
    }

    /// Negative weights are accepted and mapped to their magnitude.
    pub fn stroke_weight(&mut self, weight: f64) {
        if weight < 0.0 {
            warn!(weight, "negative stroke weight, using its magnitude");
        }
        self.stack.style_mut().stroke_weight = weight.abs();
    }

    pub fn stroke_cap(&mut self, cap: LineCap) {
        self.stack.style_mut().line_cap = cap;
    }

    pub fn stroke_join(&mut self, join: LineJoin) {
        self.stack.style_mut().line_join = join;
    }

    pub fn miter_limit(&mut self, limit: f64) {
        self.stack.style_mut().miter_limit = limit;
    }

    pub fn rect_mode(&mut self, mode: ShapeMode) {
        self.stack.style_mut().rect_mode = mode;
    }

    pub fn ellipse_mode(&mut self, mode: ShapeMode) {
        self.stack.style_mut().ellipse_mode = mode;
    }

    pub fn color_mode(&mut self, mode: ColorMode) {
        self.stack.style_mut().color_mode = mode;
    }

    /// Tightness fed to Catmull-Rom curve conversion; 0 is pure
    /// Catmull-Rom, 1 collapses curve vertices to straight lines.
    pub fn curve_tightness(&mut self, t: f64) {
        self.stack.style_mut().curve_tightness = t;
    }
}

impl<M: MatrixOps> Default for RendererCore<M> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
