/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Reader for charge files written as Fortran unformatted sequential records
//!
//! Each record is framed by a little-endian 4-byte length marker before and
//! after the payload. The layout is:
//!
//! 1. `gamma_only`, `ngm`, `nspin` as 4-byte integers
//! 2. the reciprocal basis as nine 8-byte floats, one row per vector
//! 3. `3·ngm` 4-byte integers, the Miller indices point by point
//! 4. one record of `2·ngm` floats (`re, im` pairs) per stored field

use super::errors::{ChargeFileError, Result};
use super::ChargeFileData;
use crate::grid::{FieldKind, ReciprocalGrid};
use crate::lattice::{LatticeBasis, Vector3D};
use num_complex::Complex64;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Sequential reader over length-framed records
#[derive(Debug)]
pub struct FortranRecordReader<R: Read> {
    inner: R,
    record: usize,
}

impl<R: Read> FortranRecordReader<R> {
    /// Wrap a byte source positioned at the first record
    pub fn new(inner: R) -> Self {
        Self { inner, record: 0 }
    }

    /// Number of records consumed so far
    pub fn records_read(&self) -> usize {
        self.record
    }

    /// Read the payload of the next record
    pub fn read_record(&mut self) -> Result<Vec<u8>> {
        self.record += 1;

        let leading = self.read_marker("leading length marker")?;
        if leading < 0 {
            return Err(self.malformed(format!("negative record length {}", leading)));
        }

        let expected = leading as usize;
        let mut payload = Vec::new();
        (&mut self.inner)
            .take(expected as u64)
            .read_to_end(&mut payload)?;
        if payload.len() != expected {
            return Err(self.malformed(format!(
                "payload truncated after {} of {} bytes",
                payload.len(),
                expected
            )));
        }

        let trailing = self.read_marker("trailing length marker")?;
        if trailing != leading {
            return Err(self.malformed(format!(
                "leading marker {} does not match trailing marker {}",
                leading, trailing
            )));
        }
        Ok(payload)
    }

    /// Read a record holding exactly `count` 4-byte integers
    pub fn read_i32s(&mut self, count: usize) -> Result<Vec<i32>> {
        let payload = self.read_sized_record(count, 4)?;
        Ok(payload
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    /// Read a record holding exactly `count` 8-byte floats
    pub fn read_f64s(&mut self, count: usize) -> Result<Vec<f64>> {
        let payload = self.read_sized_record(count, 8)?;
        Ok(payload
            .chunks_exact(8)
            .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect())
    }

    fn read_sized_record(&mut self, count: usize, width: usize) -> Result<Vec<u8>> {
        let payload = self.read_record()?;
        if payload.len() != count * width {
            return Err(self.malformed(format!(
                "expected {} values of {} bytes, found {} bytes",
                count,
                width,
                payload.len()
            )));
        }
        Ok(payload)
    }

    fn read_marker(&mut self, what: &str) -> Result<i32> {
        let mut marker = [0u8; 4];
        match self.inner.read_exact(&mut marker) {
            Ok(()) => Ok(i32::from_le_bytes(marker)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(self.malformed(format!("end of file while reading the {}", what)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn malformed(&self, message: String) -> ChargeFileError {
        ChargeFileError::MalformedRecord {
            record: self.record,
            message,
        }
    }
}

/// Parse a flat charge file from any byte source
pub fn read_flat<R: Read>(source: R) -> Result<ChargeFileData> {
    let mut records = FortranRecordReader::new(source);

    let header = records.read_i32s(3)?;
    let (gamma_flag, ngm, nspin) = (header[0], header[1], header[2]);
    if ngm <= 0 {
        return Err(ChargeFileError::InvalidHeader(format!(
            "coefficient count must be positive, got {}",
            ngm
        )));
    }
    let ngm = ngm as usize;
    let kinds = FieldKind::for_nspin(nspin).ok_or_else(|| {
        ChargeFileError::InvalidHeader(format!("unsupported spin count {}", nspin))
    })?;

    let bg = records.read_f64s(9)?;
    let row = |i: usize| Vector3D::new(bg[3 * i], bg[3 * i + 1], bg[3 * i + 2]);
    let basis = LatticeBasis::from_reciprocal(row(0), row(1), row(2))?;

    let indices = records.read_i32s(3 * ngm)?;
    let miller = indices
        .chunks_exact(3)
        .map(|m| [m[0], m[1], m[2]])
        .collect();
    let mut grid = ReciprocalGrid::new(miller)?;

    for &kind in kinds {
        let values = records.read_f64s(2 * ngm)?;
        grid.insert_field(kind, complex_pairs(&values))?;
    }

    ChargeFileData::new(gamma_flag != 0, nspin, basis, grid)
}

/// Open and parse a flat charge file
pub fn read_flat_file(path: &Path) -> Result<ChargeFileData> {
    let file = File::open(path)?;
    read_flat(BufReader::new(file))
}

/// Combine interleaved `(re, im)` pairs into complex values
pub(crate) fn complex_pairs(values: &[f64]) -> Vec<Complex64> {
    values
        .chunks_exact(2)
        .map(|pair| Complex64::new(pair[0], pair[1]))
        .collect()
}
