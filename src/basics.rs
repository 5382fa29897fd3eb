//! Foundation value types and constants shared by every other module.

pub const PI: f64 = std::f64::consts::PI;
pub const TWO_PI: f64 = 2.0 * std::f64::consts::PI;
pub const HALF_PI: f64 = std::f64::consts::FRAC_PI_2;

/// Convert degrees to radians.
#[inline]
pub fn deg2rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Convert radians to degrees.
#[inline]
pub fn rad2deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Approximate equality with an absolute epsilon.
#[inline]
pub fn is_equal_eps(v1: f64, v2: f64, epsilon: f64) -> bool {
    (v1 - v2).abs() <= epsilon
}

// ============================================================================
// Points
// ============================================================================

/// A 2D point with f64 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointD {
    pub x: f64,
    pub y: f64,
}

impl PointD {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 3D point with f64 coordinates. The immediate-mode builder accepts
/// 2D vertices by fixing `z = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn from_2d(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn xy(&self) -> PointD {
        PointD::new(self.x, self.y)
    }
}

impl From<PointD> for Point3 {
    fn from(p: PointD) -> Self {
        Self::from_2d(p.x, p.y)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_conversion() {
        assert!((deg2rad(180.0) - PI).abs() < 1e-12);
        assert!((rad2deg(PI / 2.0) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_equal_eps() {
        assert!(is_equal_eps(1.0, 1.0 + 1e-12, 1e-10));
        assert!(!is_equal_eps(1.0, 2.0, 1e-10));
    }

    #[test]
    fn test_point3_from_2d() {
        let p = Point3::from_2d(3.0, 4.0);
        assert_eq!(p.z, 0.0);
        assert_eq!(p.xy(), PointD::new(3.0, 4.0));
    }
}
