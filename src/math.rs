//! Types, aliases and helper operations for doing math with `ultraviolet`.
pub use ultraviolet as uv;

pub type Vec2 = uv::DVec2;

/// A wrapper type to indicate a vector should always be normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Unit<T>(T);

impl Unit<Vec2> {
    pub fn new_normalize(v: Vec2) -> Self {
        Unit(v.normalized())
    }

    pub const fn new_unchecked(v: Vec2) -> Self {
        Unit(v)
    }

    pub fn unit_x() -> Self {
        Unit(Vec2::unit_x())
    }

    pub fn unit_y() -> Self {
        Unit(Vec2::unit_y())
    }

    /// Rotate the vector counterclockwise by an angle in radians.
    /// Rotation preserves length, so the result is still normalized.
    #[inline]
    pub fn rotated(self, angle: f64) -> Self {
        Unit(rotate(self.0, angle))
    }

    #[inline]
    pub fn into_inner(self) -> Vec2 {
        self.0
    }
}

impl<T> std::ops::Deref for Unit<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::Neg for Unit<T>
where
    T: std::ops::Neg,
{
    type Output = Unit<<T as std::ops::Neg>::Output>;

    fn neg(self) -> Self::Output {
        Unit(-self.0)
    }
}

// Vec2 utils

#[inline]
pub fn left_normal(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}
#[inline]
pub fn right_normal(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// The z component of the 3D cross product of two vectors on the xy plane.
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Cross product of a scalar (the z component of a vector perpendicular to the plane)
/// and a vector. This is how an angular velocity turns an offset into a linear velocity.
#[inline]
pub fn cross_scalar(s: f64, v: Vec2) -> Vec2 {
    left_normal(v) * s
}

/// Rotate a vector counterclockwise by an angle in radians.
#[inline]
pub fn rotate(v: Vec2, angle: f64) -> Vec2 {
    if angle == 0.0 {
        return v;
    }
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rotate_quarter_turn() {
        let r = rotate(Vec2::unit_x(), FRAC_PI_2);
        assert!(r.x.abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cross_products() {
        assert_eq!(cross(Vec2::unit_x(), Vec2::unit_y()), 1.0);
        assert_eq!(cross(Vec2::unit_y(), Vec2::unit_x()), -1.0);
        assert_eq!(cross_scalar(2.0, Vec2::unit_x()), Vec2::new(0.0, 2.0));
    }
}
