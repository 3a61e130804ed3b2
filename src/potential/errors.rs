/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Error types for potential calculations

use thiserror::Error;

/// Result type for potential calculations
pub type Result<T> = std::result::Result<T, PotentialError>;

/// Error type for potential-related operations
#[derive(Error, Debug)]
pub enum PotentialError {
    /// Atoms or species that an evaluator cannot handle
    #[error("Invalid atomic structure: {0}")]
    InvalidStructure(String),

    /// Invalid exchange-correlation functional
    #[error("Invalid exchange-correlation functional: {0}")]
    InvalidExchangeCorrelation(String),

    /// Unknown potential kind or option
    #[error("Unsupported option: {0}")]
    UnsupportedOption(String),

    /// Arrays that should share a mesh do not
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Propagation of error from grid module
    #[error("Grid error: {0}")]
    GridError(#[from] crate::grid::GridError),

    /// Propagation of error from context module
    #[error("Context error: {0}")]
    ContextError(#[from] crate::context::ContextError),

    /// Propagation of error from utils module
    #[error("Utils error: {0}")]
    UtilsError(#[from] crate::utils::errors::UtilsError),
}
