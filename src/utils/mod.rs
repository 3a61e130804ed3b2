/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Utility functions shared across the crate
//!
//! Physical and numerical constants plus the unit conversions used when
//! exporting fields for external viewers.

pub mod constants;
pub mod errors;

pub use errors::{Result, UtilsError};

/// Convert from Bohr radii to Angstroms
pub fn bohr_to_angstrom(bohr: f64) -> f64 {
    bohr * constants::BOHR_RADIUS
}

/// Convert energy from Rydberg to eV
pub fn rydberg_to_ev(rydberg: f64) -> f64 {
    rydberg * constants::RYDBERG
}
