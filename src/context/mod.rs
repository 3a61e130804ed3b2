/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Structure metadata accompanying a charge density
//!
//! The context carries what the reconstruction pipeline needs beyond the
//! charge file itself: the lattice parameter, the cell, the density cutoff,
//! the functional and the atoms. It is read-only once loaded and is usually
//! shared between a charge and the potentials derived from it.
//!
//! ```json
//! {
//!   "alat": 10.2,
//!   "a": [[-0.5, 0.0, 0.5], [0.0, 0.5, 0.5], [-0.5, 0.5, 0.0]],
//!   "ecutrho": 120.0,
//!   "functional": "SLA PZ NOGX NOGC",
//!   "atomic_species": [{"name": "Si", "mass": 28.086, "pseudo_file": "Si.pz-vbc.UPF", "valence_charge": 4.0}],
//!   "atomic_positions": [{"species": "Si", "position": [0.0, 0.0, 0.0]}]
//! }
//! ```

mod errors;

pub use errors::{ContextError, Result};

use crate::lattice::{LatticeBasis, Vector3D};
use crate::utils::constants::TWO_PI;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_functional() -> String {
    "PZ".to_string()
}

fn default_nspin() -> i32 {
    1
}

/// One atom of the cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicPosition {
    /// Label of the species this atom belongs to
    pub species: String,
    /// Cartesian position in units of `alat`
    pub position: [f64; 3],
}

/// One atomic species and its pseudopotential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicSpecies {
    pub name: String,
    #[serde(default)]
    pub mass: f64,
    #[serde(default)]
    pub pseudo_file: String,
    /// Valence charge `Zv` of the pseudo-ion, when known
    #[serde(default)]
    pub valence_charge: Option<f64>,
}

/// Cell, cutoff and atoms of a calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureContext {
    /// Lattice parameter in bohr
    pub alat: f64,
    /// Direct lattice vectors in units of `alat`, one per row
    pub a: [[f64; 3]; 3],
    /// Reciprocal lattice vectors in units of `2π/alat`; derived from `a` when absent
    #[serde(default)]
    pub b: Option<[[f64; 3]; 3]>,
    /// Charge-density cutoff in Rydberg
    pub ecutrho: f64,
    /// Exchange-correlation functional identifier
    #[serde(default = "default_functional")]
    pub functional: String,
    #[serde(default)]
    pub atomic_positions: Vec<AtomicPosition>,
    #[serde(default)]
    pub atomic_species: Vec<AtomicSpecies>,
    /// Directory holding the pseudopotential files
    #[serde(default)]
    pub pseudo_dir: PathBuf,
    #[serde(default = "default_nspin")]
    pub nspin: i32,
}

impl StructureContext {
    /// Load and validate a context from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a context from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let context: Self = serde_json::from_str(text)?;
        context.validate()?;
        Ok(context)
    }

    /// Check the invariants the kernels rely on
    pub fn validate(&self) -> Result<()> {
        if !(self.alat > 0.0) {
            return Err(ContextError::Invalid(format!(
                "alat must be positive, got {}",
                self.alat
            )));
        }
        if !(self.ecutrho > 0.0) {
            return Err(ContextError::Invalid(format!(
                "ecutrho must be positive, got {}",
                self.ecutrho
            )));
        }
        if !matches!(self.nspin, 1 | 2 | 4) {
            return Err(ContextError::Invalid(format!(
                "nspin must be 1, 2 or 4, got {}",
                self.nspin
            )));
        }
        for atom in &self.atomic_positions {
            if self.species(&atom.species).is_none() {
                return Err(ContextError::Invalid(format!(
                    "atom refers to unknown species '{}'",
                    atom.species
                )));
            }
        }

        self.direct_basis()?;
        self.reciprocal_basis()?;
        Ok(())
    }

    /// Direct lattice vectors in units of `alat`
    pub fn direct_vectors(&self) -> [Vector3D; 3] {
        self.a.map(Vector3D::from)
    }

    /// Reciprocal lattice vectors in units of `2π/alat`
    pub fn reciprocal_vectors(&self) -> Result<[Vector3D; 3]> {
        match self.b {
            Some(b) => Ok(b.map(Vector3D::from)),
            None => {
                let b = *self.direct_basis()?.reciprocal();
                Ok(b.map(|v| v * (1.0 / TWO_PI)))
            }
        }
    }

    /// Basis built from the direct vectors; its reciprocal side is in units of `1/alat`
    pub fn direct_basis(&self) -> Result<LatticeBasis> {
        let [a1, a2, a3] = self.direct_vectors();
        Ok(LatticeBasis::from_direct(a1, a2, a3)?)
    }

    /// Basis built from the reciprocal vectors in units of `2π/alat`,
    /// the convention used by charge files and the cutoff engine
    pub fn reciprocal_basis(&self) -> Result<LatticeBasis> {
        let [b1, b2, b3] = self.reciprocal_vectors()?;
        Ok(LatticeBasis::from_reciprocal(b1, b2, b3)?)
    }

    /// Cell volume in bohr³
    pub fn cell_volume(&self) -> f64 {
        let [a1, a2, a3] = self.direct_vectors();
        a1.dot(&a2.cross(&a3)).abs() * self.alat.powi(3)
    }

    /// Look up a species by label
    pub fn species(&self, name: &str) -> Option<&AtomicSpecies> {
        self.atomic_species.iter().find(|s| s.name == name)
    }
}
