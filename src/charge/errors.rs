/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Error types for charge and potential containers

use std::io;
use thiserror::Error;

/// Errors that can occur while using a charge or potential container
#[derive(Error, Debug)]
pub enum ChargeError {
    #[error("No data loaded: {0}")]
    NotLoaded(String),

    #[error("Missing structure context: {0}")]
    MissingContext(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Unsupported option: {0}")]
    UnsupportedOption(String),

    /// Failure reported by a [`FieldPlotter`](super::FieldPlotter) backend
    #[error("Plot error: {0}")]
    PlotError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Charge file error: {0}")]
    FileError(#[from] crate::io::ChargeFileError),

    #[error("Grid error: {0}")]
    GridError(#[from] crate::grid::GridError),

    #[error("Potential error: {0}")]
    PotentialError(#[from] crate::potential::PotentialError),

    #[error("Context error: {0}")]
    ContextError(#[from] crate::context::ContextError),
}

/// Result type for container operations
pub type Result<T> = std::result::Result<T, ChargeError>;
