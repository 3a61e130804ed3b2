/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Real-space charge density container

use super::errors::{ChargeError, Result};
use super::plot::{plot_field, FieldPlotter, PlotRequest, SpinChannel};
use super::{suffixed_path, Plottable, Readable, Writable};
use crate::context::StructureContext;
use crate::grid::{rasterize_field, FieldKind, Fft3, Mesh};
use crate::io::{field_header, read_charge_file, read_charge_file_as, write_field_file, ChargeFileData, ChargeFormat};
use log::{debug, info};
use ndarray::Array3;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

/// What a [`Charge`] currently holds
#[derive(Debug, Clone, Default)]
pub enum ChargeState {
    /// No density read yet
    #[default]
    Uninitialized,
    /// Total density and, for spin-polarised data, the spin difference
    Loaded {
        total: Array3<f64>,
        diff: Option<Array3<f64>>,
    },
}

/// Charge density on a real-space mesh
#[derive(Debug, Clone)]
pub struct Charge {
    mesh: Mesh,
    state: ChargeState,
    context: Option<Arc<StructureContext>>,
    format: Option<ChargeFormat>,
}

impl Charge {
    /// Empty container for densities on `mesh`
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            state: ChargeState::Uninitialized,
            context: None,
            format: None,
        }
    }

    /// Loaded container from real-space arrays
    pub fn from_arrays(mesh: Mesh, total: Array3<f64>, diff: Option<Array3<f64>>) -> Result<Self> {
        check_shape(mesh, &total, "total density")?;
        if let Some(diff) = &diff {
            check_shape(mesh, diff, "spin difference")?;
        }
        Ok(Self {
            state: ChargeState::Loaded { total, diff },
            ..Self::new(mesh)
        })
    }

    /// Attach the structure the density belongs to
    pub fn with_context(mut self, context: Arc<StructureContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Read files in this encoding instead of guessing it from the extension
    pub fn with_format(mut self, format: ChargeFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn mesh(&self) -> Mesh {
        self.mesh
    }

    pub fn state(&self) -> &ChargeState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ChargeState::Loaded { .. })
    }

    pub fn context(&self) -> Option<&StructureContext> {
        self.context.as_deref()
    }

    pub(crate) fn context_or_err(&self) -> Result<&StructureContext> {
        self.context()
            .ok_or_else(|| ChargeError::MissingContext("no structure context attached".to_string()))
    }

    /// Total density
    pub fn total(&self) -> Result<&Array3<f64>> {
        match &self.state {
            ChargeState::Loaded { total, .. } => Ok(total),
            ChargeState::Uninitialized => Err(not_loaded()),
        }
    }

    /// Spin difference `ρ↑ - ρ↓`, if the data is spin-polarised
    pub fn diff(&self) -> Result<Option<&Array3<f64>>> {
        match &self.state {
            ChargeState::Loaded { diff, .. } => Ok(diff.as_ref()),
            ChargeState::Uninitialized => Err(not_loaded()),
        }
    }

    pub fn is_spin_polarized(&self) -> bool {
        matches!(self.state, ChargeState::Loaded { diff: Some(_), .. })
    }

    /// Spin-up density `(total + diff)/2`; half the total without a spin difference
    pub fn up(&self) -> Result<Array3<f64>> {
        self.spin_density(1.0)
    }

    /// Spin-down density `(total - diff)/2`; half the total without a spin difference
    pub fn down(&self) -> Result<Array3<f64>> {
        self.spin_density(-1.0)
    }

    fn spin_density(&self, sign: f64) -> Result<Array3<f64>> {
        let total = self.total()?;
        Ok(match self.diff()? {
            Some(diff) => (total + &(diff * sign)) * 0.5,
            None => total * 0.5,
        })
    }

    /// Density of one spin channel; up and down fall back to the total for unpolarised data
    pub fn channel(&self, spin: SpinChannel) -> Result<Cow<'_, Array3<f64>>> {
        if !self.is_spin_polarized() && spin != SpinChannel::Total {
            debug!("{:?} channel requested for unpolarised data, using the total density", spin);
            return Ok(Cow::Borrowed(self.total()?));
        }
        match spin {
            SpinChannel::Total => Ok(Cow::Borrowed(self.total()?)),
            SpinChannel::Up => Ok(Cow::Owned(self.up()?)),
            SpinChannel::Down => Ok(Cow::Owned(self.down()?)),
        }
    }

    /// Rasterize the density stored in `data` on this container's mesh
    pub fn load(&mut self, data: &ChargeFileData) -> Result<()> {
        let grid = data.completed_grid();
        let fft = Fft3::new(self.mesh);

        let total = rasterize_field(&grid, FieldKind::Total, &fft)?;
        let diff = if data.has_spin_difference() {
            Some(rasterize_field(&grid, FieldKind::SpinDifference, &fft)?)
        } else {
            None
        };
        if data.nspin == 4 {
            debug!("noncollinear data: magnetization densities are not kept");
        }

        self.state = ChargeState::Loaded { total, diff };
        Ok(())
    }

    pub fn header(&self) -> String {
        field_header("Charge file", self.mesh)
    }
}

impl Readable for Charge {
    fn read(&mut self, path: &Path) -> Result<()> {
        let data = match self.format {
            Some(format) => read_charge_file_as(path, format)?,
            None => read_charge_file(path)?,
        };
        if data.min_mesh != self.mesh {
            debug!("file needs a {} mesh, rasterizing on {}", data.min_mesh, self.mesh);
        }
        self.load(&data)
    }
}

impl Writable for Charge {
    fn write(&mut self, path: &Path) -> Result<()> {
        let header = self.header();
        let total = self.total()?;
        write_field_file(path, total, &header)?;
        info!("charge written to {}", path.display());

        if self.is_spin_polarized() {
            write_field_file(&suffixed_path(path, "_up"), &self.up()?, &header)?;
            write_field_file(&suffixed_path(path, "_down"), &self.down()?, &header)?;
        }
        Ok(())
    }
}

impl Plottable for Charge {
    fn plot<P: FieldPlotter + ?Sized>(&mut self, plotter: &P, request: &PlotRequest) -> Result<P::Output> {
        let context = self.context_or_err()?;
        let field = self.channel(request.spin)?;
        plot_field(plotter, &field, context, request, "charge")
    }
}

fn not_loaded() -> ChargeError {
    ChargeError::NotLoaded("charge density has not been read".to_string())
}

fn check_shape(mesh: Mesh, field: &Array3<f64>, what: &str) -> Result<()> {
    if field.dim() != mesh.shape() {
        return Err(ChargeError::ShapeMismatch(format!(
            "{} has shape {:?}, expected the {} mesh",
            what,
            field.dim(),
            mesh
        )));
    }
    Ok(())
}
