/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Error types for grid construction and reconstruction

use thiserror::Error;

/// Result type for grid operations
pub type Result<T> = std::result::Result<T, GridError>;

/// Error type for grid-related operations
#[derive(Error, Debug)]
pub enum GridError {
    /// Mesh dimensions that cannot hold any data
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// A coefficient array whose length differs from the index list
    #[error("Field {field} has {found} coefficients but the grid has {expected} Miller indices")]
    LengthMismatch {
        field: String,
        expected: usize,
        found: usize,
    },

    /// The same Miller index stored twice
    #[error("Duplicate Miller index ({}, {}, {})", .0[0], .0[1], .0[2])]
    DuplicateIndex([i32; 3]),

    /// A field that was never loaded into the grid
    #[error("Field not present: {0}")]
    MissingField(String),

    /// Dense arrays whose shapes disagree
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}
