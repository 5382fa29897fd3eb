//! Error taxonomy for call-sequencing mistakes.
//!
//! Every variant here is a programmer-usage error, not a recoverable
//! runtime condition: unbalanced pops and mis-sequenced shape calls fail
//! fast so they cannot silently corrupt later frames. Numeric edge cases
//! (zero or negative dimensions, degenerate edges) are defined behaviors
//! and never produce an error.

use thiserror::Error;

/// Result alias used by the fallible renderer operations.
pub type GfxResult<T> = Result<T, GfxError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GfxError {
    /// `pop_matrix`/`pop_style`/`pop` called with an empty stack.
    #[error("unbalanced stack: {what} popped with no matching push")]
    UnbalancedStack { what: &'static str },

    /// `begin_shape` while a shape is already open, or `vertex`/`end_shape`
    /// with no open shape.
    #[error("shape sequencing error: {call} {reason}")]
    NestedShape {
        call: &'static str,
        reason: &'static str,
    },

    /// A bezier or quadratic vertex was appended as the first segment of a
    /// contour, so there is no current point to start the curve from.
    #[error("{segment} vertex requires a preceding anchor vertex in the contour")]
    MissingAnchor { segment: &'static str },

    /// An unrecognized raw mode constant was passed at the API boundary.
    #[error("invalid mode constant {mode}")]
    InvalidMode { mode: u32 },
}
