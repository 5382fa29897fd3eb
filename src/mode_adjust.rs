//! Positioning-mode normalization.
//!
//! Sketch-facing shape calls take four raw numbers whose meaning depends
//! on the active mode (CORNER, CORNERS, CENTER, RADIUS). The functions
//! here normalize them into a canonical CORNER-equivalent `{x, y, w, h}`
//! so downstream renderers never need to know which mode was active.

use crate::error::{GfxError, GfxResult};

/// Raw mode constants accepted at the sketch-facing boundary.
pub const MODE_CORNER: u32 = 0;
pub const MODE_CORNERS: u32 = 1;
pub const MODE_RADIUS: u32 = 2;
pub const MODE_CENTER: u32 = 3;

/// Interpretation of a shape's four numeric parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeMode {
    /// x, y is the top-left corner; the remaining pair is width/height.
    Corner,
    /// The two pairs are opposite corners, in either order.
    Corners,
    /// x, y is the center; the remaining pair is radii.
    Radius,
    /// x, y is the center; the remaining pair is width/height.
    Center,
}

impl ShapeMode {
    /// Parse a raw mode constant. Unrecognized values fail loudly rather
    /// than defaulting.
    pub fn from_u32(mode: u32) -> GfxResult<Self> {
        match mode {
            MODE_CORNER => Ok(ShapeMode::Corner),
            MODE_CORNERS => Ok(ShapeMode::Corners),
            MODE_RADIUS => Ok(ShapeMode::Radius),
            MODE_CENTER => Ok(ShapeMode::Center),
            _ => Err(GfxError::InvalidMode { mode }),
        }
    }
}

/// Canonical CORNER-equivalent shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectParams {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Normalize `(x1, y1, x2, y2)` under `mode` into CORNER form.
///
/// CORNERS output is always top-left anchored with non-negative size,
/// regardless of which corner was passed first. The other modes pass
/// values through arithmetically: a CORNER-mode rect with negative
/// width/height intentionally describes a flipped rectangle, and
/// negative CENTER/RADIUS sizes are resolved by the renderer (absolute
/// value at geometry-generation time), never clamped here.
pub fn mode_adjust(x1: f64, y1: f64, x2: f64, y2: f64, mode: ShapeMode) -> RectParams {
    match mode {
        ShapeMode::Corner => RectParams {
            x: x1,
            y: y1,
            w: x2,
            h: y2,
        },
        ShapeMode::Corners => RectParams {
            x: x1.min(x2),
            y: y1.min(y2),
            w: (x2 - x1).abs(),
            h: (y2 - y1).abs(),
        },
        ShapeMode::Radius => RectParams {
            x: x1 - x2,
            y: y1 - y2,
            w: 2.0 * x2,
            h: 2.0 * y2,
        },
        ShapeMode::Center => RectParams {
            x: x1 - x2 / 2.0,
            y: y1 - y2 / 2.0,
            w: x2,
            h: y2,
        },
    }
}

/// Ellipse-equivalent normalization for the arc renderer.
///
/// Produces the arc's bounding parameters in CORNER-equivalent terms while
/// preserving sign and center semantics: the arc renderer derives a
/// consistent center (`x + w/2`, `y + h/2`) and radii from the result to
/// compute start/stop angles against. CORNERS resolves corner order like
/// [`mode_adjust`]; the other modes pass signs through unchanged.
pub fn arc_mode_adjust(x1: f64, y1: f64, x2: f64, y2: f64, mode: ShapeMode) -> RectParams {
    mode_adjust(x1, y1, x2, y2, mode)
}

// ============================================================================
// Tests
// ============================================================================
