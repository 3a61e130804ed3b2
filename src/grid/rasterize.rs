/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Scattering sparse reciprocal data onto a dense mesh

use super::errors::{GridError, Result};
use super::fft::Fft3;
use super::reciprocal::{FieldKind, ReciprocalGrid};
use super::Mesh;
use log::{debug, warn};
use ndarray::Array3;
use num_complex::Complex64;

/// Relative imaginary residue above which a reconstructed density is reported
const IMAGINARY_TOLERANCE: f64 = 1e-8;

/// Outcome of scattering coefficients onto a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScatterStats {
    /// Coefficients placed on the mesh
    pub written: usize,
    /// Coefficients whose frequency does not fit the mesh
    pub dropped: usize,
}

/// Place each coefficient at the wrapped position of its Miller index
///
/// Frequencies finer than the mesh are discarded and counted in
/// [`ScatterStats::dropped`].
pub fn scatter(
    miller: &[[i32; 3]],
    coefficients: &[Complex64],
    mesh: Mesh,
) -> Result<(Array3<Complex64>, ScatterStats)> {
    if miller.len() != coefficients.len() {
        return Err(GridError::LengthMismatch {
            field: "coefficients".to_string(),
            expected: miller.len(),
            found: coefficients.len(),
        });
    }

    let mut dense = Array3::<Complex64>::zeros(mesh.shape());
    let mut stats = ScatterStats::default();
    for (m, c) in miller.iter().zip(coefficients) {
        match mesh.wrap_index(*m) {
            Some(position) => {
                dense[position] = *c;
                stats.written += 1;
            }
            None => stats.dropped += 1,
        }
    }

    if stats.dropped > 0 {
        debug!(
            "{} of {} coefficients do not fit the {} mesh and were dropped",
            stats.dropped,
            miller.len(),
            mesh
        );
    }
    Ok((dense, stats))
}

/// Real-space density from sparse coefficients
///
/// Scatters the coefficients, applies the unnormalised inverse transform
/// (the density is `Σ_G ρ(G) exp(iG·r)`) and keeps the real part.
pub fn rasterize(miller: &[[i32; 3]], coefficients: &[Complex64], fft: &Fft3) -> Result<Array3<f64>> {
    let (mut dense, _) = scatter(miller, coefficients, fft.mesh())?;
    fft.inverse(&mut dense)?;

    let (max_re, max_im) = dense.iter().fold((0.0f64, 0.0f64), |(re, im), v| {
        (re.max(v.re.abs()), im.max(v.im.abs()))
    });
    if max_im > IMAGINARY_TOLERANCE * max_re.max(1.0) {
        warn!(
            "reconstructed density has an imaginary residue of {:.3e} (max real part {:.3e}); is the input conjugate-symmetric?",
            max_im, max_re
        );
    }

    Ok(dense.mapv(|v| v.re))
}

/// Rasterize one field of a reciprocal grid
pub fn rasterize_field(grid: &ReciprocalGrid, kind: FieldKind, fft: &Fft3) -> Result<Array3<f64>> {
    let coefficients = grid
        .field(kind)
        .ok_or_else(|| GridError::MissingField(kind.to_string()))?;
    rasterize(grid.miller(), coefficients, fft)
}
