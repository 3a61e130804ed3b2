/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Reader for charge files stored in an HDF5 container

use super::errors::{ChargeFileError, Result};
use super::flat::complex_pairs;
use super::ChargeFileData;
use crate::grid::{FieldKind, ReciprocalGrid};
use crate::lattice::{LatticeBasis, Vector3D};
use hdf5::types::{FixedAscii, VarLenAscii, VarLenUnicode};
use hdf5::{Attribute, File};
use std::path::Path;

const MILLER_DATASET: &str = "MillerIndices";

/// Open and parse an HDF5 charge file
pub fn read_hdf5_file(path: &Path) -> Result<ChargeFileData> {
    let file = File::open(path)?;

    let gamma_only = match file.attr("gamma_only") {
        Ok(attr) => read_string(&attr)?.to_uppercase().contains("TRUE"),
        Err(_) => false,
    };

    let ngm = file
        .attr("ngm_g")
        .map_err(|_| ChargeFileError::MissingAttribute("ngm_g".to_string()))?
        .read_scalar::<i64>()?;
    if ngm <= 0 {
        return Err(ChargeFileError::InvalidHeader(format!(
            "coefficient count must be positive, got {}",
            ngm
        )));
    }
    let ngm = ngm as usize;

    if !file.link_exists(MILLER_DATASET) {
        return Err(ChargeFileError::MissingDataset(MILLER_DATASET.to_string()));
    }
    let dataset = file.dataset(MILLER_DATASET)?;
    let indices = dataset.read_raw::<i32>()?;
    if indices.len() != 3 * ngm {
        return Err(ChargeFileError::InvalidHeader(format!(
            "{} holds {} integers, expected {}",
            MILLER_DATASET,
            indices.len(),
            3 * ngm
        )));
    }

    let mut rows = [Vector3D::origin(); 3];
    for (i, row) in rows.iter_mut().enumerate() {
        let name = format!("bg{}", i + 1);
        let attr = dataset
            .attr(&name)
            .map_err(|_| ChargeFileError::MissingAttribute(name.clone()))?;
        let values = attr.read_raw::<f64>()?;
        if values.len() != 3 {
            return Err(ChargeFileError::InvalidHeader(format!(
                "attribute {} holds {} values, expected 3",
                name,
                values.len()
            )));
        }
        *row = Vector3D::new(values[0], values[1], values[2]);
    }
    let basis = LatticeBasis::from_reciprocal(rows[0], rows[1], rows[2])?;

    let miller = indices
        .chunks_exact(3)
        .map(|m| [m[0], m[1], m[2]])
        .collect();
    let mut grid = ReciprocalGrid::new(miller)?;

    for kind in FieldKind::ALL {
        let name = kind.dataset_name();
        if !file.link_exists(name) {
            if kind == FieldKind::Total {
                return Err(ChargeFileError::MissingDataset(name.to_string()));
            }
            continue;
        }
        let values = file.dataset(name)?.read_raw::<f64>()?;
        if values.len() != 2 * ngm {
            return Err(ChargeFileError::InvalidHeader(format!(
                "dataset {} holds {} values, expected {}",
                name,
                values.len(),
                2 * ngm
            )));
        }
        grid.insert_field(kind, complex_pairs(&values))?;
    }

    let nspin = match file.attr("nspin") {
        Ok(attr) => attr.read_scalar::<i32>()?,
        Err(_) => nspin_from_fields(&grid),
    };

    ChargeFileData::new(gamma_only, nspin, basis, grid)
}

fn nspin_from_fields(grid: &ReciprocalGrid) -> i32 {
    if grid.field(FieldKind::MagnetizationX).is_some() {
        4
    } else if grid.field(FieldKind::SpinDifference).is_some() {
        2
    } else {
        1
    }
}

/// Read a scalar string attribute in any of the encodings writers use
fn read_string(attr: &Attribute) -> Result<String> {
    if let Ok(value) = attr.read_scalar::<VarLenUnicode>() {
        return Ok(value.as_str().to_string());
    }
    if let Ok(value) = attr.read_scalar::<VarLenAscii>() {
        return Ok(value.as_str().to_string());
    }
    let value = attr.read_scalar::<FixedAscii<64>>()?;
    Ok(value.as_str().to_string())
}
