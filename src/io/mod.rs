/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Charge-density file input and real-space field output
//!
//! Two on-disk encodings of the reciprocal-space density are understood: the
//! flat Fortran sequential stream and, with the `hdf5` feature, the HDF5
//! container. Both produce a [`ChargeFileData`].

mod errors;
pub mod flat;
#[cfg(feature = "hdf5")]
pub mod hdf5_file;
pub mod text;

pub use errors::{ChargeFileError, Result};
pub use flat::{read_flat, read_flat_file, FortranRecordReader};
pub use text::{field_header, format_value, write_field, write_field_file};

use crate::grid::{FieldKind, Mesh, ReciprocalGrid};
use crate::lattice::LatticeBasis;
use log::debug;
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// On-disk encoding of a charge file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeFormat {
    /// Fortran unformatted sequential records
    Flat,
    /// HDF5 container
    Hdf5,
}

impl ChargeFormat {
    /// Guess the encoding from the file extension
    pub fn detect(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("hdf5") | Some("h5") => ChargeFormat::Hdf5,
            _ => ChargeFormat::Flat,
        }
    }

    /// Parse a format name as given on the command line
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "flat" | "dat" | "fortran" => Ok(ChargeFormat::Flat),
            "hdf5" | "h5" => Ok(ChargeFormat::Hdf5),
            _ => Err(ChargeFileError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ChargeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeFormat::Flat => write!(f, "flat"),
            ChargeFormat::Hdf5 => write!(f, "hdf5"),
        }
    }
}

/// Contents of a charge-density file
#[derive(Debug, Clone)]
pub struct ChargeFileData {
    /// Only the half space of frequencies is stored
    pub gamma_only: bool,
    /// Number of stored coefficients per field
    pub ngm: usize,
    /// Spin treatment: 1 unpolarised, 2 collinear, 4 noncollinear
    pub nspin: i32,
    /// Reciprocal basis and its real-space dual
    pub basis: LatticeBasis,
    /// Miller indices and all stored fields
    pub grid: ReciprocalGrid,
    /// Smallest mesh that holds every stored frequency
    pub min_mesh: Mesh,
}

impl ChargeFileData {
    /// Assemble file contents, deriving the minimal mesh
    pub fn new(gamma_only: bool, nspin: i32, basis: LatticeBasis, grid: ReciprocalGrid) -> Result<Self> {
        let min_mesh = Mesh::from_miller_extrema(grid.miller())?;
        Ok(Self {
            gamma_only,
            ngm: grid.len(),
            nspin,
            basis,
            grid,
            min_mesh,
        })
    }

    /// Grid with the full conjugate-symmetric set of frequencies
    pub fn completed_grid(&self) -> Cow<'_, ReciprocalGrid> {
        if self.gamma_only {
            Cow::Owned(self.grid.complete_gamma())
        } else {
            Cow::Borrowed(&self.grid)
        }
    }

    /// Whether a spin-difference density was stored
    pub fn has_spin_difference(&self) -> bool {
        self.grid.field(FieldKind::SpinDifference).is_some()
    }
}

/// Read a charge file, choosing the encoding from its extension
pub fn read_charge_file<P: AsRef<Path>>(path: P) -> Result<ChargeFileData> {
    let path = path.as_ref();
    read_charge_file_as(path, ChargeFormat::detect(path))
}

/// Read a charge file in the given encoding
pub fn read_charge_file_as<P: AsRef<Path>>(path: P, format: ChargeFormat) -> Result<ChargeFileData> {
    let path = path.as_ref();
    let data = match format {
        ChargeFormat::Flat => read_flat_file(path)?,
        ChargeFormat::Hdf5 => read_hdf5(path)?,
    };

    debug!(
        "read {} charge file {}: ngm={} nspin={} gamma_only={} mesh={}",
        format,
        path.display(),
        data.ngm,
        data.nspin,
        data.gamma_only,
        data.min_mesh
    );
    Ok(data)
}

#[cfg(feature = "hdf5")]
fn read_hdf5(path: &Path) -> Result<ChargeFileData> {
    hdf5_file::read_hdf5_file(path)
}

#[cfg(not(feature = "hdf5"))]
fn read_hdf5(path: &Path) -> Result<ChargeFileData> {
    Err(ChargeFileError::UnsupportedFormat(format!(
        "{} is an HDF5 file but HDF5 support was not compiled in",
        path.display()
    )))
}
