/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Hartree potential of a charge density
//!
//! Poisson's equation is solved in reciprocal space: `V(G) = 4π e² ρ(G)/|G|²`.
//! With `G` measured in units of `2π/alat` and `e² = 2`, the prefactor
//! becomes `(2/π)·alat²`, giving the potential in Rydberg.

use super::config::KernelConfig;
use super::errors::Result;
use crate::grid::fft::to_complex;
use crate::grid::{compute_g_squared, scatter, Fft3, GridError, Mesh};
use crate::lattice::LatticeBasis;
use ndarray::{Array3, Zip};
use num_complex::Complex64;
use std::f64::consts::PI;

/// `(2/π)·alat²`, converting `ρ(G)/G²` in units of `2π/alat` to Rydberg
pub fn hartree_prefactor(alat: f64) -> f64 {
    2.0 / PI * alat * alat
}

/// Hartree potential of a real-space density
///
/// The density is transformed to reciprocal space, divided by the
/// cutoff-filtered G² (the sentinel suppresses the origin and the
/// frequencies beyond the cutoff) and transformed back.
pub fn hartree_potential(
    charge: &Array3<f64>,
    basis: &LatticeBasis,
    ecutrho: f64,
    alat: f64,
    config: &KernelConfig,
) -> Result<Array3<f64>> {
    let (nr1, nr2, nr3) = charge.dim();
    let mesh = Mesh::new(nr1, nr2, nr3)?;
    let fft = Fft3::new(mesh);

    let mut rho_g = to_complex(charge);
    fft.forward(&mut rho_g)?;

    let g_squared = compute_g_squared(basis, mesh, ecutrho, alat, config.g2_sentinel);
    Zip::from(&mut rho_g)
        .and(&g_squared)
        .par_for_each(|value, &g2| *value /= g2);

    fft.inverse_normalized(&mut rho_g)?;
    let scale = hartree_prefactor(alat);
    Ok(rho_g.mapv(|v| v.re * scale))
}

/// Hartree potential straight from sparse reciprocal coefficients
///
/// Each coefficient is divided by its `|G|²`; the `G = 0` term is dropped.
/// The result is scattered with the usual wrap-around policy and transformed
/// without normalisation, as the coefficients already carry it.
pub fn hartree_from_coefficients(
    miller: &[[i32; 3]],
    coefficients: &[Complex64],
    basis: &LatticeBasis,
    mesh: Mesh,
    alat: f64,
) -> Result<Array3<f64>> {
    if miller.len() != coefficients.len() {
        return Err(GridError::LengthMismatch {
            field: "coefficients".to_string(),
            expected: miller.len(),
            found: coefficients.len(),
        }
        .into());
    }

    let potential_g: Vec<Complex64> = miller
        .iter()
        .zip(coefficients)
        .map(|(m, c)| {
            let g2 = basis
                .g_vector([m[0] as i64, m[1] as i64, m[2] as i64])
                .norm_squared();
            if g2 > 0.0 {
                *c / g2
            } else {
                Complex64::new(0.0, 0.0)
            }
        })
        .collect();

    let (mut dense, _) = scatter(miller, &potential_g, mesh)?;
    Fft3::new(mesh).inverse(&mut dense)?;
    let scale = hartree_prefactor(alat);
    Ok(dense.mapv(|v| v.re * scale))
}
