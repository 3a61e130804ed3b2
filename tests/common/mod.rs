/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Helpers shared by the integration tests

#![allow(dead_code)]

use num_complex::Complex64;
use postqe::context::{AtomicPosition, AtomicSpecies, StructureContext};
use std::fs;
use std::path::{Path, PathBuf};

/// Frame a payload as a Fortran unformatted sequential record
pub fn fortran_record(payload: &[u8]) -> Vec<u8> {
    let marker = (payload.len() as i32).to_le_bytes();
    let mut record = marker.to_vec();
    record.extend_from_slice(payload);
    record.extend_from_slice(&marker);
    record
}

pub fn i32_payload(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn f64_payload(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// In-memory description of a flat charge file
#[derive(Debug, Clone)]
pub struct FlatChargeFile {
    pub gamma_only: bool,
    pub nspin: i32,
    pub bg: [[f64; 3]; 3],
    pub miller: Vec<[i32; 3]>,
    pub fields: Vec<Vec<Complex64>>,
}

impl FlatChargeFile {
    /// Unit cubic reciprocal basis, no fields yet
    pub fn new(nspin: i32, miller: Vec<[i32; 3]>) -> Self {
        Self {
            gamma_only: false,
            nspin,
            bg: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            miller,
            fields: Vec::new(),
        }
    }

    pub fn gamma_only(mut self) -> Self {
        self.gamma_only = true;
        self
    }

    pub fn with_field(mut self, field: Vec<Complex64>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = fortran_record(&i32_payload(&[
            self.gamma_only as i32,
            self.miller.len() as i32,
            self.nspin,
        ]));
        let bg: Vec<f64> = self.bg.iter().flatten().copied().collect();
        bytes.extend(fortran_record(&f64_payload(&bg)));
        let indices: Vec<i32> = self.miller.iter().flatten().copied().collect();
        bytes.extend(fortran_record(&i32_payload(&indices)));
        for field in &self.fields {
            let values: Vec<f64> = field.iter().flat_map(|c| [c.re, c.im]).collect();
            bytes.extend(fortran_record(&f64_payload(&values)));
        }
        bytes
    }

    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, self.to_bytes()).unwrap();
        path
    }
}

pub fn real(values: &[f64]) -> Vec<Complex64> {
    values.iter().map(|&v| Complex64::new(v, 0.0)).collect()
}

/// Density `ρ0 + 2a·cos(2π x/alat)` of a cubic cell, as Gamma-only coefficients
pub fn cosine_density(rho0: f64, amplitude: f64) -> FlatChargeFile {
    FlatChargeFile::new(1, vec![[0, 0, 0], [1, 0, 0]])
        .gamma_only()
        .with_field(real(&[rho0, amplitude]))
}

/// Simple cubic cell with one hydrogen-like ion at the origin
pub fn cubic_context(alat: f64, ecutrho: f64) -> StructureContext {
    StructureContext {
        alat,
        a: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        b: None,
        ecutrho,
        functional: "SLA PZ NOGX NOGC".to_string(),
        atomic_positions: vec![AtomicPosition {
            species: "H".to_string(),
            position: [0.0, 0.0, 0.0],
        }],
        atomic_species: vec![AtomicSpecies {
            name: "H".to_string(),
            mass: 1.008,
            pseudo_file: "H.pz-vbc.UPF".to_string(),
            valence_charge: Some(1.0),
        }],
        pseudo_dir: PathBuf::from("pseudo"),
        nspin: 1,
    }
}
