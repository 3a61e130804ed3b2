/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Kinds of potential derived from a charge density

use super::errors::{PotentialError, Result};
use std::fmt;

/// Which potential to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PotentialKind {
    /// Local pseudopotential of the ions
    Bare,
    /// Electrostatic potential of the electrons
    Hartree,
    /// Exchange-correlation potential
    Xc,
    /// Sum of the three above
    Total,
}

impl PotentialKind {
    pub const ALL: [PotentialKind; 4] = [
        PotentialKind::Bare,
        PotentialKind::Hartree,
        PotentialKind::Xc,
        PotentialKind::Total,
    ];

    /// Parse a kind from its short label or name, case-insensitively
    pub fn from_string(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "v_bare" | "bare" => Ok(PotentialKind::Bare),
            "v_h" | "hartree" => Ok(PotentialKind::Hartree),
            "v_xc" | "xc" => Ok(PotentialKind::Xc),
            "v_tot" | "total" => Ok(PotentialKind::Total),
            _ => Err(PotentialError::UnsupportedOption(format!(
                "unknown potential kind '{}', expected one of v_bare, v_h, v_xc, v_tot",
                name
            ))),
        }
    }

    /// Short label used in file headers
    pub fn label(&self) -> &'static str {
        match self {
            PotentialKind::Bare => "v_bare",
            PotentialKind::Hartree => "v_h",
            PotentialKind::Xc => "v_xc",
            PotentialKind::Total => "v_tot",
        }
    }
}

impl fmt::Display for PotentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PotentialKind {
    type Err = PotentialError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}
