/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Error types for reading charge-density files

use std::io;
use thiserror::Error;

/// Errors that can occur while reading a charge-density file
#[derive(Error, Debug)]
pub enum ChargeFileError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Malformed record {record}: {message}")]
    MalformedRecord { record: usize, message: String },

    #[error("Missing dataset: {0}")]
    MissingDataset(String),

    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("HDF5 error: {0}")]
    Hdf5Error(String),

    #[error("Grid error: {0}")]
    GridError(#[from] crate::grid::GridError),

    #[error("Lattice error: {0}")]
    LatticeError(#[from] crate::utils::UtilsError),
}

#[cfg(feature = "hdf5")]
impl From<hdf5::Error> for ChargeFileError {
    fn from(err: hdf5::Error) -> Self {
        ChargeFileError::Hdf5Error(err.to_string())
    }
}

/// Result type for charge-file operations
pub type Result<T> = std::result::Result<T, ChargeFileError>;
