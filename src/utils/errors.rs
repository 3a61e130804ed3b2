/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Numeric errors raised while building lattice bases

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UtilsError {
    /// Three vectors that do not span a volume have no dual basis
    #[error("Singular lattice: vectors {vectors} span a volume of {volume:e}")]
    SingularLattice { vectors: String, volume: f64 },

    /// Non-finite component in a lattice vector
    #[error("Non-finite lattice vector: {0}")]
    NonFinite(String),
}

pub type Result<T> = std::result::Result<T, UtilsError>;
