/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Sparse reciprocal-space data and Gamma-point completion

use super::errors::{GridError, Result};
use num_complex::Complex64;
use std::collections::HashSet;
use std::fmt;

/// Kind of density stored as Fourier coefficients in a charge file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    /// Total charge density
    Total,
    /// Spin-up minus spin-down density (collinear magnetism)
    SpinDifference,
    /// x component of the magnetization (noncollinear)
    MagnetizationX,
    /// y component of the magnetization (noncollinear)
    MagnetizationY,
    /// z component of the magnetization (noncollinear)
    MagnetizationZ,
}

impl FieldKind {
    /// All kinds in file order
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Total,
        FieldKind::SpinDifference,
        FieldKind::MagnetizationX,
        FieldKind::MagnetizationY,
        FieldKind::MagnetizationZ,
    ];

    /// Dataset name in hierarchical charge files
    pub fn dataset_name(&self) -> &'static str {
        match self {
            FieldKind::Total => "rhotot_g",
            FieldKind::SpinDifference => "rhodiff_g",
            FieldKind::MagnetizationX => "m_x",
            FieldKind::MagnetizationY => "m_y",
            FieldKind::MagnetizationZ => "m_z",
        }
    }

    /// Fields stored in a flat charge file for a given spin count
    pub fn for_nspin(nspin: i32) -> Option<&'static [FieldKind]> {
        const UNPOLARIZED: &[FieldKind] = &[FieldKind::Total];
        const COLLINEAR: &[FieldKind] = &[FieldKind::Total, FieldKind::SpinDifference];
        const NONCOLLINEAR: &[FieldKind] = &[
            FieldKind::Total,
            FieldKind::MagnetizationX,
            FieldKind::MagnetizationY,
            FieldKind::MagnetizationZ,
        ];

        match nspin {
            1 => Some(UNPOLARIZED),
            2 => Some(COLLINEAR),
            4 => Some(NONCOLLINEAR),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dataset_name())
    }
}

/// Mirror of a Miller index stored in the Gamma-only half space
///
/// Indices outside the canonical half space (including the origin) have no
/// stored partner and are returned unchanged.
pub fn mirror_index(m: [i32; 3]) -> [i32; 3] {
    let [i, j, k] = m;
    if i > 0 {
        [-i, -j, -k]
    } else if i == 0 && j > 0 {
        [0, -j, -k]
    } else if i == 0 && j == 0 && k > 0 {
        [0, 0, -k]
    } else {
        m
    }
}

/// Miller indices paired with one or more coefficient arrays
#[derive(Debug, Clone, PartialEq)]
pub struct ReciprocalGrid {
    miller: Vec<[i32; 3]>,
    fields: Vec<(FieldKind, Vec<Complex64>)>,
}

impl ReciprocalGrid {
    /// Create a grid with no fields, checking that indices are unique
    pub fn new(miller: Vec<[i32; 3]>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(miller.len());
        for m in &miller {
            if !seen.insert(*m) {
                return Err(GridError::DuplicateIndex(*m));
            }
        }
        Ok(Self {
            miller,
            fields: Vec::new(),
        })
    }

    /// Attach (or replace) the coefficients of one field
    pub fn insert_field(&mut self, kind: FieldKind, coefficients: Vec<Complex64>) -> Result<()> {
        if coefficients.len() != self.miller.len() {
            return Err(GridError::LengthMismatch {
                field: kind.to_string(),
                expected: self.miller.len(),
                found: coefficients.len(),
            });
        }

        match self.fields.iter_mut().find(|(k, _)| *k == kind) {
            Some(slot) => slot.1 = coefficients,
            None => {
                self.fields.push((kind, coefficients));
                self.fields.sort_by_key(|(k, _)| *k);
            }
        }
        Ok(())
    }

    /// Builder form of [`ReciprocalGrid::insert_field`]
    pub fn with_field(mut self, kind: FieldKind, coefficients: Vec<Complex64>) -> Result<Self> {
        self.insert_field(kind, coefficients)?;
        Ok(self)
    }

    /// Miller indices in storage order
    pub fn miller(&self) -> &[[i32; 3]] {
        &self.miller
    }

    /// Number of stored index/coefficient pairs
    pub fn len(&self) -> usize {
        self.miller.len()
    }

    /// True when no indices are stored
    pub fn is_empty(&self) -> bool {
        self.miller.is_empty()
    }

    /// Coefficients of one field, if present
    pub fn field(&self, kind: FieldKind) -> Option<&[Complex64]> {
        self.fields
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, c)| c.as_slice())
    }

    /// Kinds of the fields present, in file order
    pub fn field_kinds(&self) -> impl Iterator<Item = FieldKind> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }

    /// Expand Gamma-only data to the full conjugate-symmetric set
    ///
    /// Every stored pair is followed by its mirror with the conjugated
    /// coefficient. Self-mirrored entries appear once.
    pub fn complete_gamma(&self) -> Self {
        let mirrors: Vec<Option<[i32; 3]>> = self
            .miller
            .iter()
            .map(|&m| {
                let mirrored = mirror_index(m);
                (mirrored != m).then_some(mirrored)
            })
            .collect();

        let capacity = self.miller.len() + mirrors.iter().flatten().count();
        let mut miller = Vec::with_capacity(capacity);
        for (m, mirrored) in self.miller.iter().zip(&mirrors) {
            miller.push(*m);
            if let Some(mirrored) = mirrored {
                miller.push(*mirrored);
            }
        }

        let fields = self
            .fields
            .iter()
            .map(|(kind, coefficients)| {
                let mut completed = Vec::with_capacity(capacity);
                for (c, mirrored) in coefficients.iter().zip(&mirrors) {
                    completed.push(*c);
                    if mirrored.is_some() {
                        completed.push(c.conj());
                    }
                }
                (*kind, completed)
            })
            .collect();

        Self { miller, fields }
    }
}
