/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Bare (local pseudopotential) potential of the ions

use super::errors::{PotentialError, Result};
use crate::context::{AtomicPosition, AtomicSpecies, StructureContext};
use crate::grid::{Fft3, Mesh};
use crate::lattice::{LatticeBasis, Vector3D};
use crate::utils::constants::{E2, FOUR_PI};
use log::debug;
use ndarray::{Array3, Zip};
use num_complex::Complex64;
use std::path::Path;

/// Everything a local-potential evaluator may need
#[derive(Debug, Clone)]
pub struct LocalPotentialRequest<'a> {
    /// Lattice parameter in bohr
    pub alat: f64,
    /// Direct lattice vectors in units of `alat`
    pub direct: [Vector3D; 3],
    pub mesh: Mesh,
    pub atomic_positions: &'a [AtomicPosition],
    pub atomic_species: &'a [AtomicSpecies],
    pub pseudo_dir: &'a Path,
    /// Largest |G|² (bohr⁻²) to include
    pub ecut: f64,
}

impl<'a> LocalPotentialRequest<'a> {
    /// Request for `mesh` with the cell and atoms of `context`
    pub fn from_context(context: &'a StructureContext, mesh: Mesh) -> Self {
        Self {
            alat: context.alat,
            direct: context.direct_vectors(),
            mesh,
            atomic_positions: &context.atomic_positions,
            atomic_species: &context.atomic_species,
            pseudo_dir: &context.pseudo_dir,
            ecut: 2.0 * context.ecutrho,
        }
    }
}

/// Evaluates the local part of the ionic pseudopotential on a mesh
pub trait LocalPotentialEvaluator: Send + Sync {
    /// Real-space potential in Rydberg with the request's mesh shape
    fn evaluate(&self, request: &LocalPotentialRequest<'_>) -> Result<Array3<f64>>;
}

/// Bare potential of the ions in `context` on `mesh`
pub fn bare_potential(
    context: &StructureContext,
    mesh: Mesh,
    evaluator: &dyn LocalPotentialEvaluator,
) -> Result<Array3<f64>> {
    let request = LocalPotentialRequest::from_context(context, mesh);
    let potential = evaluator.evaluate(&request)?;
    if potential.dim() != mesh.shape() {
        return Err(PotentialError::ShapeMismatch(format!(
            "local potential has shape {:?}, expected the {} mesh",
            potential.dim(),
            mesh
        )));
    }
    Ok(potential)
}

/// Ions as Gaussian-smeared point charges of their valence
///
/// `V(G) = -4π e² Zv exp(-|G|²/4) / (Ω |G|²)` times the structure factor,
/// for `0 < |G|² ≤ ecut`. The `G = 0` term is left out, as it cancels
/// against the Hartree one.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianIonPotential;

impl LocalPotentialEvaluator for GaussianIonPotential {
    fn evaluate(&self, request: &LocalPotentialRequest<'_>) -> Result<Array3<f64>> {
        let [a1, a2, a3] = request.direct;
        let basis = LatticeBasis::from_direct(a1, a2, a3)?;
        let alat = request.alat;
        let volume = basis.direct_volume() * alat.powi(3);

        let ions = request
            .atomic_positions
            .iter()
            .map(|atom| -> Result<(Vector3D, f64)> {
                let zv = request
                    .atomic_species
                    .iter()
                    .find(|s| s.name == atom.species)
                    .and_then(|s| s.valence_charge)
                    .ok_or_else(|| {
                        PotentialError::InvalidStructure(format!(
                            "no valence charge for species '{}'",
                            atom.species
                        ))
                    })?;
                Ok((Vector3D::from(atom.position) * alat, zv))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("gaussian ion potential for {} ions, cell volume {:.4}", ions.len(), volume);

        let mesh = request.mesh;
        let inv_alat = 1.0 / alat;
        let mut potential_g = Array3::<Complex64>::zeros(mesh.shape());
        Zip::indexed(&mut potential_g).par_for_each(|(x, y, z), value| {
            let g = basis.g_vector([mesh.fold(x, 0), mesh.fold(y, 1), mesh.fold(z, 2)]) * inv_alat;
            let g2 = g.norm_squared();
            if g2 == 0.0 || g2 > request.ecut {
                return;
            }
            let form = -FOUR_PI * E2 * (-g2 / 4.0).exp() / (volume * g2);
            let structure: Complex64 = ions
                .iter()
                .map(|(tau, zv)| Complex64::from_polar(*zv, -g.dot(tau)))
                .sum();
            *value = structure * form;
        });

        Fft3::new(mesh).inverse(&mut potential_g)?;
        Ok(potential_g.mapv(|v| v.re))
    }
}
