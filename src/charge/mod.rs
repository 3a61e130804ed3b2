/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Charge and potential containers
//!
//! A [`Charge`] holds a real-space density read from a charge file; a
//! [`Potential`] owns a charge and computes one kind of potential from it
//! on demand. Both can be read, written as text and handed to a plotter.

mod density;
mod derived;
mod errors;
mod plot;

pub use density::{Charge, ChargeState};
pub use derived::{Potential, PotentialState};
pub use errors::{ChargeError, Result};
pub use plot::{ExportFormat, FieldPlotter, PlotGeometry, PlotMethod, PlotRequest, SpinChannel};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Containers that can be filled from a charge file
pub trait Readable {
    fn read(&mut self, path: &Path) -> Result<()>;
}

/// Containers that can be written as text
pub trait Writable {
    fn write(&mut self, path: &Path) -> Result<()>;
}

/// Containers that can be handed to a [`FieldPlotter`]
pub trait Plottable {
    fn plot<P: FieldPlotter + ?Sized>(&mut self, plotter: &P, request: &PlotRequest) -> Result<P::Output>;
}

/// `path` with `suffix` appended to its final component
pub(crate) fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
