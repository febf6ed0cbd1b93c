//! SO(3) rotation utilities

use crate::{Mat3, Vec3};

/// Skew-symmetric matrix from vector (hat operator)
///
/// For v = [x, y, z]^T:
/// ```text
/// [v]× = [ 0  -z   y]
///        [ z   0  -x]
///        [-y   x   0]
/// ```
///
/// so that `skew(v) * u == v.cross(&u)` for every `u`.
pub fn skew(v: &Vec3) -> Mat3 {
    Mat3::new(
        0.0, -v.z, v.y,
        v.z, 0.0, -v.x,
        -v.y, v.x, 0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_skew_symmetric() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let s = skew(&v);

        // Skew symmetric: S^T = -S
        assert_relative_eq!(s, -s.transpose(), epsilon = 1e-12);

        // Diagonal should be zero
        assert_eq!(s[(0, 0)], 0.0);
        assert_eq!(s[(1, 1)], 0.0);
        assert_eq!(s[(2, 2)], 0.0);
    }

    #[test]
    fn test_skew_matches_cross_product() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let c = skew(&a) * b;

        assert_relative_eq!(c, Vec3::new(-3.0, 6.0, -3.0), epsilon = 1e-12);
        assert_relative_eq!(c, a.cross(&b), epsilon = 1e-12);
    }

    #[test]
    fn test_skew_unit_axes() {
        let x = Vec3::x();
        let y = Vec3::y();

        // x × y = z
        assert_relative_eq!(skew(&x) * y, Vec3::z(), epsilon = 1e-12);
        // v × v = 0
        assert_relative_eq!(skew(&x) * x, Vec3::zeros(), epsilon = 1e-12);
    }
}
