/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Reciprocal vectors on the FFT mesh and the energy cutoff
//!
//! Every mesh point `(x, y, z)` corresponds to the integer frequency
//! `(fold(x), fold(y), fold(z))`, using the same convention as the
//! rasterizer's storage order. Points beyond the cutoff and the origin get a
//! sentinel G² so that `ρ(G)/G²` vanishes there.

use super::Mesh;
use crate::lattice::{LatticeBasis, Vector3D};
use crate::utils::constants::TWO_PI;
use ndarray::{Array3, Zip};

/// G vectors and cutoff-filtered G² on a mesh
#[derive(Debug, Clone)]
pub struct GVectorMesh {
    /// Reciprocal vector at every mesh point
    pub g: Array3<Vector3D>,
    /// Squared norm, replaced by the sentinel at the origin and past the cutoff
    pub g_squared: Array3<f64>,
}

/// Largest retained G², in the units of the reciprocal basis (`2π/alat`)
pub fn cutoff_threshold(ecutrho: f64, alat: f64) -> f64 {
    2.0 * ecutrho / (TWO_PI / alat).powi(2)
}

fn frequency(mesh: &Mesh, (x, y, z): (usize, usize, usize)) -> [i64; 3] {
    [mesh.fold(x, 0), mesh.fold(y, 1), mesh.fold(z, 2)]
}

/// G vector at every mesh point
pub fn compute_g(basis: &LatticeBasis, mesh: Mesh) -> Array3<Vector3D> {
    let mut g = Array3::from_elem(mesh.shape(), Vector3D::origin());
    Zip::indexed(&mut g).par_for_each(|index, value| {
        *value = basis.g_vector(frequency(&mesh, index));
    });
    g
}

/// Cutoff-filtered G² at every mesh point
pub fn compute_g_squared(
    basis: &LatticeBasis,
    mesh: Mesh,
    ecutrho: f64,
    alat: f64,
    sentinel: f64,
) -> Array3<f64> {
    let ecutm = cutoff_threshold(ecutrho, alat);
    let mut g_squared = Array3::zeros(mesh.shape());
    Zip::indexed(&mut g_squared).par_for_each(|index, value| {
        let g2 = basis.g_vector(frequency(&mesh, index)).norm_squared();
        *value = filter(g2, ecutm, sentinel);
    });
    g_squared
}

/// G vectors and cutoff-filtered G² in a single sweep
pub fn compute_gs(
    basis: &LatticeBasis,
    mesh: Mesh,
    ecutrho: f64,
    alat: f64,
    sentinel: f64,
) -> GVectorMesh {
    let ecutm = cutoff_threshold(ecutrho, alat);
    let mut g = Array3::from_elem(mesh.shape(), Vector3D::origin());
    let mut g_squared = Array3::zeros(mesh.shape());
    Zip::indexed(&mut g)
        .and(&mut g_squared)
        .par_for_each(|index, g_value, g2_value| {
            *g_value = basis.g_vector(frequency(&mesh, index));
            *g2_value = filter(g_value.norm_squared(), ecutm, sentinel);
        });
    GVectorMesh { g, g_squared }
}

/// Number of mesh points that survived the cutoff
pub fn count_within_cutoff(g_squared: &Array3<f64>, sentinel: f64) -> usize {
    g_squared.iter().filter(|&&g2| g2 < sentinel).count()
}

#[inline]
fn filter(g2: f64, ecutm: f64, sentinel: f64) -> f64 {
    if g2 > ecutm || g2 == 0.0 {
        sentinel
    } else {
        g2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::G2_SENTINEL;
    use approx::assert_relative_eq;

    fn cubic() -> LatticeBasis {
        LatticeBasis::from_reciprocal(
            Vector3D::new(1.0, 0.0, 0.0),
            Vector3D::new(0.0, 1.0, 0.0),
            Vector3D::new(0.0, 0.0, 1.0),
        )
        .unwrap()
    }

    #[test]
    fn test_g_vectors_fold() {
        let mesh = Mesh::new(4, 3, 1).unwrap();
        let g = compute_g(&cubic(), mesh);
        assert_eq!(g[[1, 0, 0]], Vector3D::new(1.0, 0.0, 0.0));
        assert_eq!(g[[2, 0, 0]], Vector3D::new(-2.0, 0.0, 0.0));
        assert_eq!(g[[3, 2, 0]], Vector3D::new(-1.0, -1.0, 0.0));
        assert_eq!(g[[0, 1, 0]], Vector3D::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_origin_and_cutoff_use_sentinel() {
        let mesh = Mesh::new(5, 5, 5).unwrap();
        // alat = 2π makes the threshold 2·ecutrho
        let g2 = compute_g_squared(&cubic(), mesh, 1.0, TWO_PI, G2_SENTINEL);
        assert_eq!(g2[[0, 0, 0]], G2_SENTINEL);
        assert_relative_eq!(g2[[1, 1, 0]], 2.0, epsilon = 1e-12);
        assert_eq!(g2[[1, 1, 1]], G2_SENTINEL);
        assert_eq!(g2[[2, 0, 0]], G2_SENTINEL);
        // |G|² ∈ {1, 2}: 6 + 12 points
        assert_eq!(count_within_cutoff(&g2, G2_SENTINEL), 18);
    }

    #[test]
    fn test_compute_gs_matches_parts() {
        let mesh = Mesh::new(4, 4, 4).unwrap();
        let basis = cubic();
        let both = compute_gs(&basis, mesh, 3.0, 5.0, G2_SENTINEL);
        assert_eq!(both.g, compute_g(&basis, mesh));
        assert_eq!(both.g_squared, compute_g_squared(&basis, mesh, 3.0, 5.0, G2_SENTINEL));
    }
}
