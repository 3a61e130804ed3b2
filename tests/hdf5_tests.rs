/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Tests for the HDF5 charge reader against files written in a temporary directory

#![cfg(feature = "hdf5")]

use approx::assert_relative_eq;
use hdf5::types::VarLenUnicode;
use hdf5::File;
use num_complex::Complex64;
use postqe::grid::FieldKind;
use postqe::io::hdf5_file::read_hdf5_file;
use postqe::io::{read_charge_file, ChargeFileError};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const MILLER: [[i32; 3]; 3] = [[0, 0, 0], [1, 0, 0], [0, -2, 0]];

/// Builder for a small HDF5 charge file with the attribute and dataset layout the reader expects
struct Hdf5ChargeFile {
    gamma_only: Option<&'static str>,
    nspin: Option<i32>,
    miller: Vec<[i32; 3]>,
    bg: [[f64; 3]; 3],
    fields: Vec<(&'static str, Vec<f64>)>,
}

impl Hdf5ChargeFile {
    fn new() -> Self {
        Self {
            gamma_only: None,
            nspin: None,
            miller: MILLER.to_vec(),
            bg: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            fields: Vec::new(),
        }
    }

    fn gamma_only(mut self, flag: &'static str) -> Self {
        self.gamma_only = Some(flag);
        self
    }

    fn nspin(mut self, nspin: i32) -> Self {
        self.nspin = Some(nspin);
        self
    }

    fn bg(mut self, bg: [[f64; 3]; 3]) -> Self {
        self.bg = bg;
        self
    }

    /// Add a dataset of interleaved `(re, im)` pairs
    fn field(mut self, name: &'static str, pairs: &[f64]) -> Self {
        self.fields.push((name, pairs.to_vec()));
        self
    }

    fn write(&self, dir: &Path, name: &str) -> hdf5::Result<PathBuf> {
        let path = dir.join(name);
        let file = File::create(&path)?;

        if let Some(flag) = self.gamma_only {
            let value: VarLenUnicode = flag.parse().unwrap();
            file.new_attr::<VarLenUnicode>()
                .shape(())
                .create("gamma_only")?
                .write_scalar(&value)?;
        }
        file.new_attr::<i64>()
            .shape(())
            .create("ngm_g")?
            .write_scalar(&(self.miller.len() as i64))?;
        if let Some(nspin) = self.nspin {
            file.new_attr::<i32>().shape(()).create("nspin")?.write_scalar(&nspin)?;
        }

        let flat: Vec<i32> = self.miller.iter().flatten().copied().collect();
        let miller = file
            .new_dataset_builder()
            .with_data(&flat)
            .create("MillerIndices")?;
        for (i, row) in self.bg.iter().enumerate() {
            miller
                .new_attr_builder()
                .with_data(&row.to_vec())
                .create(format!("bg{}", i + 1).as_str())?;
        }

        for (name, pairs) in &self.fields {
            file.new_dataset_builder().with_data(pairs).create(*name)?;
        }
        Ok(path)
    }
}

fn total() -> [f64; 6] {
    [1.0, 0.0, 0.25, -0.5, 0.1, 0.2]
}

#[test]
fn test_read_unpolarized() {
    let dir = tempdir().unwrap();
    let path = Hdf5ChargeFile::new()
        .field("rhotot_g", &total())
        .write(dir.path(), "charge-density.hdf5")
        .unwrap();
    let data = read_hdf5_file(&path).unwrap();

    assert!(!data.gamma_only);
    assert_eq!(data.ngm, 3);
    assert_eq!(data.nspin, 1);
    assert_eq!(data.grid.miller(), MILLER.as_slice());
    assert_eq!(data.min_mesh.dims(), [3, 5, 1]);
    assert_eq!(
        data.grid.field(FieldKind::Total).unwrap()[1],
        Complex64::new(0.25, -0.5)
    );
    assert!(data.grid.field(FieldKind::SpinDifference).is_none());
    assert!(data.grid.field(FieldKind::MagnetizationX).is_none());
}

#[test]
fn test_gamma_flag_is_case_insensitive_substring() {
    let dir = tempdir().unwrap();
    let flags = [(".TRUE.", true), ("true", true), ("True ", true), ("F", false)];
    for (i, (flag, expected)) in flags.into_iter().enumerate() {
        let path = Hdf5ChargeFile::new()
            .gamma_only(flag)
            .field("rhotot_g", &total())
            .write(dir.path(), &format!("gamma-{}.hdf5", i))
            .unwrap();
        assert_eq!(read_hdf5_file(&path).unwrap().gamma_only, expected, "flag {:?}", flag);
    }
}

#[test]
fn test_reciprocal_basis_read_from_miller_attributes() {
    let dir = tempdir().unwrap();
    let path = Hdf5ChargeFile::new()
        .bg([[-1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]])
        .field("rhotot_g", &total())
        .write(dir.path(), "fcc.hdf5")
        .unwrap();
    let data = read_hdf5_file(&path).unwrap();

    let b = data.basis.reciprocal();
    assert_relative_eq!(b[0].x, -1.0);
    assert_relative_eq!(b[1].z, 1.0);
    assert_relative_eq!(b[2].y, 1.0);
    for (i, a) in data.basis.direct().iter().enumerate() {
        for (j, b) in b.iter().enumerate() {
            let expected = if i == j { 2.0 * std::f64::consts::PI } else { 0.0 };
            assert_relative_eq!(a.dot(b), expected, epsilon = 1e-10);
        }
    }
}

#[test]
fn test_missing_total_density() {
    let dir = tempdir().unwrap();
    let path = Hdf5ChargeFile::new()
        .field("rhodiff_g", &total())
        .write(dir.path(), "no-total.hdf5")
        .unwrap();
    assert!(matches!(
        read_hdf5_file(&path),
        Err(ChargeFileError::MissingDataset(name)) if name == "rhotot_g"
    ));
}

#[test]
fn test_spin_count_inferred_from_fields() {
    let dir = tempdir().unwrap();
    let collinear = Hdf5ChargeFile::new()
        .field("rhotot_g", &total())
        .field("rhodiff_g", &[0.5, 0.0, 0.0, 0.0, -0.1, 0.0])
        .write(dir.path(), "collinear.hdf5")
        .unwrap();
    let data = read_hdf5_file(&collinear).unwrap();
    assert_eq!(data.nspin, 2);
    assert_eq!(
        data.grid.field(FieldKind::SpinDifference).unwrap()[2],
        Complex64::new(-0.1, 0.0)
    );

    let noncollinear = Hdf5ChargeFile::new()
        .field("rhotot_g", &total())
        .field("m_x", &[0.1; 6])
        .field("m_y", &[0.2; 6])
        .field("m_z", &[0.3; 6])
        .write(dir.path(), "noncollinear.hdf5")
        .unwrap();
    assert_eq!(read_hdf5_file(&noncollinear).unwrap().nspin, 4);
}

#[test]
fn test_explicit_spin_attribute_wins() {
    let dir = tempdir().unwrap();
    let path = Hdf5ChargeFile::new()
        .nspin(2)
        .field("rhotot_g", &total())
        .write(dir.path(), "explicit.hdf5")
        .unwrap();
    let data = read_hdf5_file(&path).unwrap();
    assert_eq!(data.nspin, 2);
    assert!(data.grid.field(FieldKind::SpinDifference).is_none());
}

#[test]
fn test_field_length_must_match_coefficient_count() {
    let dir = tempdir().unwrap();
    let path = Hdf5ChargeFile::new()
        .field("rhotot_g", &total()[..4])
        .write(dir.path(), "short.hdf5")
        .unwrap();
    assert!(matches!(
        read_hdf5_file(&path),
        Err(ChargeFileError::InvalidHeader(_))
    ));

    let optional = Hdf5ChargeFile::new()
        .field("rhotot_g", &total())
        .field("rhodiff_g", &[0.0; 8])
        .write(dir.path(), "long-optional.hdf5")
        .unwrap();
    assert!(matches!(
        read_hdf5_file(&optional),
        Err(ChargeFileError::InvalidHeader(_))
    ));
}

#[test]
fn test_dispatch_by_extension() {
    let dir = tempdir().unwrap();
    let path = Hdf5ChargeFile::new()
        .gamma_only("true")
        .field("rhotot_g", &total())
        .write(dir.path(), "charge-density.h5")
        .unwrap();
    let data = read_charge_file(&path).unwrap();
    assert_eq!(data.ngm, 3);
    assert!(data.gamma_only);
}
