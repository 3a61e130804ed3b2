/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Numeric constants shared by the reconstruction pipeline and the kernels

/// 2π
pub const TWO_PI: f64 = 2.0 * std::f64::consts::PI;

/// 4π
pub const FOUR_PI: f64 = 4.0 * std::f64::consts::PI;

/// Squared electron charge in Rydberg atomic units
pub const E2: f64 = 2.0;

/// Densities with a magnitude at or below this value produce no xc potential
pub const VANISHING_CHARGE: f64 = 1.0e-10;

/// Stand-in for G² at the origin and beyond the cutoff, so that ρ(G)/G² ≈ 0
pub const G2_SENTINEL: f64 = 1.0e16;

/// Bohr radius in Angstroms
pub const BOHR_RADIUS: f64 = 0.529177;

/// Rydberg energy in eV
pub const RYDBERG: f64 = 13.6057;
