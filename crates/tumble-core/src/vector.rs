use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// 3D vector used for positions, normals and Euler angles.
///
/// # Example
/// ```
/// use tumble_core::vector::Vec3;
/// let v = Vec3::new(3.0, 4.0, 0.0);
/// assert!((v.length() - 5.0).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Same value on all three axes.
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    #[inline(always)]
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction. The zero vector is returned unchanged.
    ///
    /// # Example
    /// ```
    /// use tumble_core::vector::Vec3;
    /// let n = Vec3::new(0.0, 1.0, -1.0).normalized();
    /// assert!((n.length() - 1.0).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return self;
        }
        Self::new(self.x / len, self.y / len, self.z / len)
    }

    /// Rotate by Euler `angles` (radians): X first, then Y, then Z.
    ///
    /// The combined matrix is `Rz(angles.z) · Ry(angles.y) · Rx(angles.x)`.
    /// Normals go through the same matrix as positions; cubes are only ever
    /// rotated and translated, never scaled or sheared.
    ///
    /// # Example
    /// ```
    /// use tumble_core::vector::Vec3;
    /// use std::f32::consts::FRAC_PI_2;
    /// let p = Vec3::new(1.0, 0.0, 0.0).rotate(Vec3::new(0.0, 0.0, FRAC_PI_2));
    /// assert!(p.x.abs() < 1e-6 && (p.y - 1.0).abs() < 1e-6);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn rotate(self, angles: Self) -> Self {
        Rotation::new(angles).apply(self)
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Precomputed rotation matrix for one set of Euler angles.
///
/// A cube keeps the same orientation for every sample of a tick, so the
/// sines and cosines are evaluated once per cube instead of once per point.
#[derive(Clone, Copy, Debug)]
pub struct Rotation {
    rows: [[f32; 3]; 3],
}

impl Rotation {
    #[must_use]
    pub fn new(angles: Vec3) -> Self {
        let (sa, ca) = angles.x.sin_cos();
        let (sb, cb) = angles.y.sin_cos();
        let (sc, cc) = angles.z.sin_cos();

        Self {
            rows: [
                [cb * cc, sa * sb * cc - ca * sc, ca * sb * cc + sa * sc],
                [cb * sc, sa * sb * sc + ca * cc, ca * sb * sc - sa * cc],
                [-sb, sa * cb, ca * cb],
            ],
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn apply(&self, p: Vec3) -> Vec3 {
        let [r0, r1, r2] = self.rows;
        Vec3::new(
            p.x * r0[0] + p.y * r0[1] + p.z * r0[2],
            p.x * r1[0] + p.y * r1[1] + p.z * r1[2],
            p.x * r2[0] + p.y * r2[1] + p.z * r2[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5 && (a.z - b.z).abs() < 1e-5
    }

    #[test]
    fn rotation_preserves_length() {
        let points = [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-12.5, 12.5, -12.5),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(7.25, -0.5, 100.0),
        ];
        let angles = [
            Vec3::ZERO,
            Vec3::new(0.3, 1.7, -2.2),
            Vec3::new(6.0, 6.0, 6.0),
            Vec3::new(-40.0, 13.0, 0.01),
        ];
        for p in points {
            for a in angles {
                let r = p.rotate(a);
                let rel = (r.length() - p.length()).abs() / p.length().max(1.0);
                assert!(rel < 1e-5, "|rotate({p:?}, {a:?})| = {} != {}", r.length(), p.length());
            }
        }
    }

    #[test]
    fn zero_angles_is_identity() {
        let p = Vec3::new(1.5, -2.0, 3.25);
        assert!(approx(p.rotate(Vec3::ZERO), p));
    }

    #[test]
    fn single_axis_rotations() {
        // Rx(90°): y -> z
        let p = Vec3::new(0.0, 1.0, 0.0).rotate(Vec3::new(FRAC_PI_2, 0.0, 0.0));
        assert!(approx(p, Vec3::new(0.0, 0.0, 1.0)), "{p:?}");
        // Ry(90°): z -> x
        let p = Vec3::new(0.0, 0.0, 1.0).rotate(Vec3::new(0.0, FRAC_PI_2, 0.0));
        assert!(approx(p, Vec3::new(1.0, 0.0, 0.0)), "{p:?}");
        // Rz(90°): x -> y
        let p = Vec3::new(1.0, 0.0, 0.0).rotate(Vec3::new(0.0, 0.0, FRAC_PI_2));
        assert!(approx(p, Vec3::new(0.0, 1.0, 0.0)), "{p:?}");
    }

    #[test]
    fn x_is_applied_before_z() {
        // Rx(90°) sends y to z, which Rz leaves alone.
        let p = Vec3::new(0.0, 1.0, 0.0).rotate(Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        assert!(approx(p, Vec3::new(0.0, 0.0, 1.0)), "{p:?}");
    }

    #[test]
    fn angles_wrap_through_periodicity() {
        let p = Vec3::new(3.0, -1.0, 2.0);
        let a = Vec3::new(0.4, 1.1, -0.7);
        let wrapped = Vec3::new(a.x + 2.0 * PI, a.y - 2.0 * PI, a.z + 4.0 * PI);
        assert!(approx(p.rotate(a), p.rotate(wrapped)));
    }

    #[test]
    fn normalized_zero_stays_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }
}
