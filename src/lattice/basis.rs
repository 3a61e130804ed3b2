/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Reciprocal and direct lattice bases

use super::vector::Vector3D;
use crate::utils::constants::TWO_PI;
use crate::utils::errors::{Result, UtilsError};

/// Volumes with a smaller magnitude are treated as a singular basis
const SINGULAR_VOLUME: f64 = 1e-12;

/// A pair of dual lattice bases satisfying `a_i · b_j = 2π δ_ij`
///
/// `b` are the reciprocal vectors and `a` the real-space vectors. Units are
/// whatever the caller stores: charge files carry `b` in units of `2π/alat`,
/// in which case the derived `a` come out in units of `alat` scaled by `2π`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeBasis {
    b: [Vector3D; 3],
    a: [Vector3D; 3],
}

impl LatticeBasis {
    /// Build the basis from reciprocal vectors, deriving the real-space duals
    pub fn from_reciprocal(b1: Vector3D, b2: Vector3D, b3: Vector3D) -> Result<Self> {
        let a = dual_vectors(b1, b2, b3)?;
        Ok(Self {
            b: [b1, b2, b3],
            a,
        })
    }

    /// Build the basis from real-space vectors, deriving the reciprocal duals
    pub fn from_direct(a1: Vector3D, a2: Vector3D, a3: Vector3D) -> Result<Self> {
        let b = dual_vectors(a1, a2, a3)?;
        Ok(Self {
            b,
            a: [a1, a2, a3],
        })
    }

    /// Reciprocal vectors `b1, b2, b3`
    pub fn reciprocal(&self) -> &[Vector3D; 3] {
        &self.b
    }

    /// Real-space vectors `a1, a2, a3`
    pub fn direct(&self) -> &[Vector3D; 3] {
        &self.a
    }

    /// Signed triple product `b1 · (b2 × b3)`
    pub fn reciprocal_volume(&self) -> f64 {
        triple_product(&self.b)
    }

    /// Unsigned triple product `|a1 · (a2 × a3)|`
    pub fn direct_volume(&self) -> f64 {
        triple_product(&self.a).abs()
    }

    /// Reciprocal vector for integer coordinates `g0·b1 + g1·b2 + g2·b3`
    pub fn g_vector(&self, g: [i64; 3]) -> Vector3D {
        self.b[0] * g[0] as f64 + self.b[1] * g[1] as f64 + self.b[2] * g[2] as f64
    }
}

fn triple_product(v: &[Vector3D; 3]) -> f64 {
    v[0].dot(&v[1].cross(&v[2]))
}

fn dual_vectors(v1: Vector3D, v2: Vector3D, v3: Vector3D) -> Result<[Vector3D; 3]> {
    for v in [&v1, &v2, &v3] {
        if !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()) {
            return Err(UtilsError::NonFinite(v.to_string()));
        }
    }

    let volume = v1.dot(&v2.cross(&v3));
    if volume.abs() < SINGULAR_VOLUME {
        return Err(UtilsError::SingularLattice {
            vectors: format!("{}, {}, {}", v1, v2, v3),
            volume,
        });
    }

    let scale = TWO_PI / volume;
    Ok([
        v2.cross(&v3) * scale,
        v3.cross(&v1) * scale,
        v1.cross(&v2) * scale,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_duality_identity() {
        let basis = LatticeBasis::from_reciprocal(
            Vector3D::new(1.0, 0.0, 0.0),
            Vector3D::new(0.5, 0.866, 0.0),
            Vector3D::new(0.1, 0.2, 1.3),
        )
        .unwrap();

        for (i, a) in basis.direct().iter().enumerate() {
            for (j, b) in basis.reciprocal().iter().enumerate() {
                let expected = if i == j { TWO_PI } else { 0.0 };
                assert_relative_eq!(a.dot(b), expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_direct_and_reciprocal_agree() {
        let a = [
            Vector3D::new(-0.5, 0.0, 0.5),
            Vector3D::new(0.0, 0.5, 0.5),
            Vector3D::new(-0.5, 0.5, 0.0),
        ];
        let from_a = LatticeBasis::from_direct(a[0], a[1], a[2]).unwrap();
        let b = from_a.reciprocal();
        let from_b = LatticeBasis::from_reciprocal(b[0], b[1], b[2]).unwrap();

        for (lhs, rhs) in from_b.direct().iter().zip(a.iter()) {
            assert_relative_eq!(lhs.x, rhs.x, epsilon = 1e-12);
            assert_relative_eq!(lhs.y, rhs.y, epsilon = 1e-12);
            assert_relative_eq!(lhs.z, rhs.z, epsilon = 1e-12);
        }
        assert_relative_eq!(from_a.direct_volume(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_basis() {
        let v = Vector3D::new(1.0, 0.0, 0.0);
        let w = Vector3D::new(2.0, 0.0, 0.0);
        let err = LatticeBasis::from_reciprocal(v, w, Vector3D::new(0.0, 1.0, 0.0)).unwrap_err();
        assert!(matches!(err, UtilsError::SingularLattice { .. }));

        let nan = Vector3D::new(f64::NAN, 0.0, 0.0);
        let err = LatticeBasis::from_direct(nan, w, v).unwrap_err();
        assert!(matches!(err, UtilsError::NonFinite(_)));
    }

    #[test]
    fn test_g_vector() {
        let basis = LatticeBasis::from_reciprocal(
            Vector3D::new(1.0, 0.0, 0.0),
            Vector3D::new(0.0, 2.0, 0.0),
            Vector3D::new(0.0, 0.0, 3.0),
        )
        .unwrap();
        assert_eq!(basis.g_vector([1, -1, 2]), Vector3D::new(1.0, -2.0, 6.0));
        assert_relative_eq!(basis.reciprocal_volume(), 6.0, epsilon = 1e-12);
    }
}
