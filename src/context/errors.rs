/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Error types for loading a structure context

use std::io;
use thiserror::Error;

/// Errors that can occur while loading or validating a structure context
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid structure context: {0}")]
    Invalid(String),

    #[error("Lattice error: {0}")]
    LatticeError(#[from] crate::utils::UtilsError),
}

/// Result type for structure-context operations
pub type Result<T> = std::result::Result<T, ContextError>;
