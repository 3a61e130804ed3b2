/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Numerical settings shared by the potential kernels

use crate::utils::constants::{E2, G2_SENTINEL, VANISHING_CHARGE};
use serde::{Deserialize, Serialize};

/// Constants the kernels use, passed explicitly instead of read from globals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Densities with a magnitude at or below this produce no xc potential
    pub vanishing_charge: f64,
    /// G² stand-in at the origin and beyond the cutoff
    pub g2_sentinel: f64,
    /// Squared electron charge; 2 gives Rydberg units
    pub e2: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            vanishing_charge: VANISHING_CHARGE,
            g2_sentinel: G2_SENTINEL,
            e2: E2,
        }
    }
}
