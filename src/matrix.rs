//! Transformation matrices for the 2D and WEBGL render paths.
//!
//! Two value types:
//!
//! - [`Affine2D`] — six-component 2D affine transform in the canvas
//!   `(a, b, c, d, e, f)` convention.
//! - [`Mat4`] — sixteen-component column-major homogeneous transform for
//!   the WEBGL path, with axis-angle rotation and full inversion for
//!   camera math.
//!
//! Both compose by post-multiplication: `m.mult(&t)` applies `t` in the
//! local space established by `m`, so transforms take effect in the order
//! the user wrote them (translate, then rotate, then scale means the
//! point is scaled first). No renormalization is performed; drift from
//! long chains of rotations is accepted.

use crate::basics::is_equal_eps;

/// Epsilon for affine matrix comparisons.
pub const AFFINE_EPSILON: f64 = 1e-14;

// ============================================================================
// Affine2D
// ============================================================================

/// 2D affine transformation matrix.
///
/// Stores six components matching the canvas `setTransform(a, b, c, d, e, f)`
/// layout:
///
/// ```text
///   | a  c  e |
///   | b  d  f |
///   | 0  0  1 |
/// ```
///
/// Transform: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy)]
pub struct Affine2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine2D {
    /// Identity matrix.
    pub fn new() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Custom matrix from six components.
    pub fn new_custom(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Construct from a `[6]` array: `[a, b, c, d, e, f]`.
    pub fn from_array(m: &[f64; 6]) -> Self {
        Self::new_custom(m[0], m[1], m[2], m[3], m[4], m[5])
    }

    /// Rotation matrix.
    pub fn new_rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new_custom(c, s, -s, c, 0.0, 0.0)
    }

    /// Non-uniform scaling matrix.
    pub fn new_scaling(x: f64, y: f64) -> Self {
        Self::new_custom(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// Translation matrix.
    pub fn new_translation(x: f64, y: f64) -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Reset to identity.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Post-multiply by `other`: `self = self × other`. The newly applied
    /// transform affects geometry first, in local space.
    pub fn mult(&mut self, other: &Affine2D) -> &mut Self {
        let a = self.a * other.a + self.c * other.b;
        let b = self.b * other.a + self.d * other.b;
        let c = self.a * other.c + self.c * other.d;
        let d = self.b * other.c + self.d * other.d;
        let e = self.a * other.e + self.c * other.f + self.e;
        let f = self.b * other.e + self.d * other.f + self.f;
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self
    }

    /// Alias for [`mult`](Self::mult) — composes in drawing order.
    pub fn apply(&mut self, other: &Affine2D) -> &mut Self {
        self.mult(other)
    }

    /// Translate in the current local space.
    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.e += self.a * x + self.c * y;
        self.f += self.b * x + self.d * y;
        self
    }

    /// Rotate about the current local origin.
    pub fn rotate(&mut self, angle: f64) -> &mut Self {
        self.mult(&Self::new_rotation(angle))
    }

    /// Scale in the current local space.
    pub fn scale(&mut self, x: f64, y: f64) -> &mut Self {
        self.a *= x;
        self.b *= x;
        self.c *= y;
        self.d *= y;
        self
    }

    /// Shear along the local x axis by `angle`.
    pub fn shear_x(&mut self, angle: f64) -> &mut Self {
        self.mult(&Self::new_custom(1.0, 0.0, angle.tan(), 1.0, 0.0, 0.0))
    }

    /// Shear along the local y axis by `angle`.
    pub fn shear_y(&mut self, angle: f64) -> &mut Self {
        self.mult(&Self::new_custom(1.0, angle.tan(), 0.0, 1.0, 0.0, 0.0))
    }

    /// Determinant of the 2x2 linear part.
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Invert in place. A degenerate (zero-determinant) matrix inverts to
    /// non-finite components; callers that care check `determinant` first.
    pub fn invert(&mut self) -> &mut Self {
        let d = 1.0 / self.determinant();
        let a = self.d * d;
        let b = -self.b * d;
        let c = -self.c * d;
        let dd = self.a * d;
        let e = (self.c * self.f - self.d * self.e) * d;
        let f = (self.b * self.e - self.a * self.f) * d;
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = dd;
        self.e = e;
        self.f = f;
        self
    }

    /// A copy of this matrix.
    pub fn copy(&self) -> Self {
        *self
    }

    /// Transform a point.
    #[inline]
    pub fn transform(&self, x: &mut f64, y: &mut f64) {
        let tx = *x;
        *x = self.a * tx + self.c * *y + self.e;
        *y = self.b * tx + self.d * *y + self.f;
    }

    /// Components as a `[6]` array: `[a, b, c, d, e, f]`.
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.is_equal(&Self::new(), epsilon)
    }

    pub fn is_equal(&self, other: &Self, epsilon: f64) -> bool {
        is_equal_eps(self.a, other.a, epsilon)
            && is_equal_eps(self.b, other.b, epsilon)
            && is_equal_eps(self.c, other.c, epsilon)
            && is_equal_eps(self.d, other.d, epsilon)
            && is_equal_eps(self.e, other.e, epsilon)
            && is_equal_eps(self.f, other.f, epsilon)
    }
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Affine2D {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other, AFFINE_EPSILON)
    }
}

impl std::ops::Mul for Affine2D {
    type Output = Affine2D;
    fn mul(self, rhs: Affine2D) -> Affine2D {
        let mut result = self;
        result.mult(&rhs);
        result
    }
}

// ============================================================================
// Mat4
// ============================================================================

/// 4x4 homogeneous transformation matrix, column-major.
///
/// `m[col * 4 + row]`; translation lives in elements 12..15.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [f64; 16],
}

#[rustfmt::skip]
const MAT4_IDENTITY: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

impl Mat4 {
    /// Identity matrix.
    pub fn new() -> Self {
        Self { m: MAT4_IDENTITY }
    }

    /// Custom matrix from a column-major `[16]` array.
    pub fn from_array(m: [f64; 16]) -> Self {
        Self { m }
    }

    /// Reset to identity.
    pub fn reset(&mut self) {
        self.m = MAT4_IDENTITY;
    }

    /// A copy of this matrix.
    pub fn copy(&self) -> Self {
        *self
    }

    /// Post-multiply by `other`: `self = self × other`.
    pub fn mult(&mut self, other: &Mat4) -> &mut Self {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.m[k * 4 + row] * other.m[col * 4 + k];
                }
                out[col * 4 + row] = sum;
            }
        }
        self.m = out;
        self
    }

    /// Alias for [`mult`](Self::mult) — composes in drawing order.
    pub fn apply(&mut self, other: &Mat4) -> &mut Self {
        self.mult(other)
    }

    /// Translate in the current local space.
    pub fn translate(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        for row in 0..4 {
            self.m[12 + row] +=
                self.m[row] * x + self.m[4 + row] * y + self.m[8 + row] * z;
        }
        self
    }

    /// Scale in the current local space.
    pub fn scale(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        for row in 0..4 {
            self.m[row] *= x;
            self.m[4 + row] *= y;
            self.m[8 + row] *= z;
        }
        self
    }

    /// Rotate by `angle` radians about the axis `(ax, ay, az)` using the
    /// Rodrigues rotation formula. A zero-length axis leaves the matrix
    /// unchanged.
    pub fn rotate(&mut self, angle: f64, ax: f64, ay: f64, az: f64) -> &mut Self {
        let len = (ax * ax + ay * ay + az * az).sqrt();
        if len < AFFINE_EPSILON {
            return self;
        }
        let (x, y, z) = (ax / len, ay / len, az / len);
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        #[rustfmt::skip]
        let r = Mat4::from_array([
            t * x * x + c,     t * x * y + s * z, t * x * z - s * y, 0.0,
            t * x * y - s * z, t * y * y + c,     t * y * z + s * x, 0.0,
            t * x * z + s * y, t * y * z - s * x, t * z * z + c,     0.0,
            0.0,               0.0,               0.0,               1.0,
        ]);
        self.mult(&r)
    }

    /// Transform a point, including the perspective divide.
    pub fn transform_point(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let m = &self.m;
        let tx = m[0] * x + m[4] * y + m[8] * z + m[12];
        let ty = m[1] * x + m[5] * y + m[9] * z + m[13];
        let tz = m[2] * x + m[6] * y + m[10] * z + m[14];
        let tw = m[3] * x + m[7] * y + m[11] * z + m[15];
        if tw != 0.0 && tw != 1.0 {
            (tx / tw, ty / tw, tz / tw)
        } else {
            (tx, ty, tz)
        }
    }

    /// Invert in place. Returns `false` and leaves the matrix unchanged
    /// when the determinant is zero.
    pub fn invert(&mut self) -> bool {
        let m = &self.m;
        let mut inv = [0.0; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14]
            + m[13] * m[6] * m[11]
            - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14]
            - m[12] * m[6] * m[11]
            + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13]
            + m[12] * m[5] * m[11]
            - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13]
            - m[12] * m[5] * m[10]
            + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14]
            - m[13] * m[2] * m[11]
            + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14]
            + m[12] * m[2] * m[11]
            - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13]
            - m[12] * m[1] * m[11]
            + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13]
            + m[12] * m[1] * m[10]
            - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14]
            + m[13] * m[2] * m[7]
            - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14]
            - m[12] * m[2] * m[7]
            + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13]
            + m[12] * m[1] * m[7]
            - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13]
            - m[12] * m[1] * m[6]
            + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10]
            - m[9] * m[2] * m[7]
            + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10]
            + m[8] * m[2] * m[7]
            - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9]
            - m[8] * m[1] * m[7]
            + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9]
            + m[8] * m[1] * m[6]
            - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if det == 0.0 {
            return false;
        }
        let det = 1.0 / det;
        for (dst, src) in self.m.iter_mut().zip(inv.iter()) {
            *dst = src * det;
        }
        true
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut result = self;
        result.mult(&rhs);
        result
    }
}

// ============================================================================
// Tests
// ============================================================================
