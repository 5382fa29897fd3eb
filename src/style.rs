//! Drawing style state — colors, stroke attributes, positioning modes,
//! and text attributes.
//!
//! [`StyleState`] is the record snapshotted by `push_style` and restored
//! verbatim by `pop_style`. Every field has a renderable default so a
//! freshly popped (or freshly created) state can always draw.

use crate::mode_adjust::ShapeMode;
use crate::stroke_math::{LineCap, LineJoin};

// ============================================================================
// Color
// ============================================================================

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray.
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v, 255)
    }

    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);

    /// Components as normalized f32, in RGBA order, for GPU upload.
    pub fn to_normalized(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Interpretation of raw color components in sketch-facing color calls.
/// Stored here so push/pop restores it; the actual component conversion
/// happens in the style-management collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Rgb,
    Hsb,
    Hsl,
}

// ============================================================================
// Text attributes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    Normal,
    Italic,
    Bold,
    BoldItalic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignH {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignV {
    #[default]
    Baseline,
    Top,
    Center,
    Bottom,
}

// ============================================================================
// StyleState
// ============================================================================

/// The full drawing style record.
///
/// `fill` and `stroke` are `None` when disabled (`no_fill`/`no_stroke`).
#[derive(Debug, Clone, PartialEq)]
pub struct StyleState {
    pub fill: Option<Rgba8>,
    pub stroke: Option<Rgba8>,
    pub stroke_weight: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub rect_mode: ShapeMode,
    pub ellipse_mode: ShapeMode,
    pub color_mode: ColorMode,
    pub curve_tightness: f64,
    pub text_font: String,
    pub text_size: f64,
    pub text_leading: f64,
    pub text_style: TextStyle,
    pub text_align_h: TextAlignH,
    pub text_align_v: TextAlignV,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            fill: Some(Rgba8::WHITE),
            stroke: Some(Rgba8::BLACK),
            stroke_weight: 1.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            rect_mode: ShapeMode::Corner,
            ellipse_mode: ShapeMode::Center,
            color_mode: ColorMode::Rgb,
            curve_tightness: 0.0,
            text_font: String::from("sans-serif"),
            text_size: 12.0,
            text_leading: 15.0,
            text_style: TextStyle::Normal,
            text_align_h: TextAlignH::Left,
            text_align_v: TextAlignV::Baseline,
        }
    }
}

impl StyleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when neither fill nor stroke would produce visible output.
    pub fn is_invisible(&self) -> bool {
        self.fill.is_none() && self.stroke.is_none()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_renderable() {
        let s = StyleState::new();
        assert_eq!(s.fill, Some(Rgba8::WHITE));
        assert_eq!(s.stroke, Some(Rgba8::BLACK));
        assert_eq!(s.rect_mode, ShapeMode::Corner);
        assert_eq!(s.ellipse_mode, ShapeMode::Center);
        assert!(s.stroke_weight > 0.0);
        assert!(!s.is_invisible());
    }

    #[test]
    fn test_color_normalization() {
        let c = Rgba8::new(255, 0, 51, 255);
        let n = c.to_normalized();
        assert_eq!(n[0], 1.0);
        assert_eq!(n[1], 0.0);
        assert!((n[2] - 0.2).abs() < 1e-6);
    }
}
