/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! # postqe
//!
//! Post-processing of plane-wave electronic-structure output.
//!
//! Reads the reciprocal-space charge density written by a plane-wave code
//! (flat Fortran records or HDF5), rebuilds the real-space density on an FFT
//! mesh and derives the bare, Hartree, exchange-correlation and total
//! potentials from it. Results are written as text for visualization tools.
//!
//! ```no_run
//! use postqe::charge::Writable;
//! use postqe::potential::PotentialKind;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let context = Arc::new(postqe::context::StructureContext::from_json_file("si.json")?);
//! let mut v = postqe::get_potential("charge-density.dat", None, context, PotentialKind::Hartree)?;
//! v.write(Path::new("v_h.dat"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod charge;
pub mod cli;
pub mod context;
pub mod grid;
pub mod io;
pub mod lattice;
pub mod potential;
pub mod utils;

use charge::{Charge, Potential};
use context::StructureContext;
use grid::Mesh;
use potential::{PotentialKernels, PotentialKind};
use std::path::Path;
use std::sync::Arc;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

/// Read a charge file into a loaded [`Charge`]
///
/// Without an explicit mesh, the smallest mesh holding every stored
/// frequency is used.
pub fn get_charge<P: AsRef<Path>>(path: P, mesh: Option<Mesh>) -> charge::Result<Charge> {
    let data = io::read_charge_file(path)?;
    let mut charge = Charge::new(mesh.unwrap_or(data.min_mesh));
    charge.load(&data)?;
    Ok(charge)
}

/// Read a charge file and prepare a potential of `kind` with the default kernels
pub fn get_potential<P: AsRef<Path>>(
    path: P,
    mesh: Option<Mesh>,
    context: Arc<StructureContext>,
    kind: PotentialKind,
) -> charge::Result<Potential> {
    let charge = get_charge(path, mesh)?.with_context(context);
    Ok(Potential::new(charge, kind, Arc::new(PotentialKernels::default())))
}
