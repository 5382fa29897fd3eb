//! Matrix and style stacks backing `push`/`pop`.
//!
//! The matrix stack and the style stack are independently usable
//! (`push_matrix` without `push_style` is legal); keeping low-level pairs
//! balanced across a scope is the caller's responsibility. The combined
//! [`push`](TransformStack::push)/[`pop`](TransformStack::pop)
//! convenience snapshots and restores both together, which is what the
//! sketch-facing `push()`/`pop()` delegate to.
//!
//! Popping an empty stack is a fatal usage error: it is surfaced
//! immediately rather than ignored, since it means user code is
//! unbalanced and every subsequent frame would render with corrupt state.

use crate::error::{GfxError, GfxResult};
use crate::style::StyleState;

/// A stack of matrix snapshots plus the associated style state.
///
/// Generic over the matrix type so the 2D renderer instantiates it with
/// `Affine2D` and the WEBGL renderer with `Mat4`.
#[derive(Debug, Clone)]
pub struct TransformStack<M> {
    matrix: M,
    matrix_stack: Vec<M>,
    style: StyleState,
    style_stack: Vec<StyleState>,
}

impl<M: Clone + Default> TransformStack<M> {
    pub fn new() -> Self {
        Self {
            matrix: M::default(),
            matrix_stack: Vec::new(),
            style: StyleState::default(),
            style_stack: Vec::new(),
        }
    }

    /// The active transformation matrix.
    pub fn matrix(&self) -> &M {
        &self.matrix
    }

    /// Mutable access for the transform operations.
    pub fn matrix_mut(&mut self) -> &mut M {
        &mut self.matrix
    }

    /// Replace the active matrix with the identity.
    pub fn reset_matrix(&mut self) {
        self.matrix = M::default();
    }

    /// The active style state.
    pub fn style(&self) -> &StyleState {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut StyleState {
        &mut self.style
    }

    /// Snapshot the current matrix.
    pub fn push_matrix(&mut self) {
        self.matrix_stack.push(self.matrix.clone());
    }

    /// Restore the matrix at the matching `push_matrix`.
    pub fn pop_matrix(&mut self) -> GfxResult<()> {
        match self.matrix_stack.pop() {
            Some(m) => {
                self.matrix = m;
                Ok(())
            }
            None => Err(GfxError::UnbalancedStack { what: "matrix" }),
        }
    }

    /// Snapshot the current style state.
    pub fn push_style(&mut self) {
        self.style_stack.push(self.style.clone());
    }

    /// Restore the style at the matching `push_style`. The restored state
    /// is bit-identical to the snapshot.
    pub fn pop_style(&mut self) -> GfxResult<()> {
        match self.style_stack.pop() {
            Some(s) => {
                self.style = s;
                Ok(())
            }
            None => Err(GfxError::UnbalancedStack { what: "style" }),
        }
    }

    /// Combined snapshot of matrix and style.
    pub fn push(&mut self) {
        self.push_matrix();
        self.push_style();
    }

    /// Combined restore. Pops style first so a failure in either pop
    /// leaves a diagnosable state; both stacks are popped exactly once on
    /// success.
    pub fn pop(&mut self) -> GfxResult<()> {
        self.pop_style()?;
        self.pop_matrix()
    }

    /// Number of outstanding matrix snapshots.
    pub fn matrix_depth(&self) -> usize {
        self.matrix_stack.len()
    }

    /// Number of outstanding style snapshots.
    pub fn style_depth(&self) -> usize {
        self.style_stack.len()
    }
}

impl<M: Clone + Default> Default for TransformStack<M> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
