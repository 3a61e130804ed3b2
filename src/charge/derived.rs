/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Potentials derived from a charge density, computed on first use

use super::density::Charge;
use super::errors::{ChargeError, Result};
use super::plot::{plot_field, FieldPlotter, PlotRequest};
use super::{Plottable, Readable, Writable};
use crate::io::{field_header, write_field_file};
use crate::potential::{PotentialKernels, PotentialKind};
use log::{debug, info};
use ndarray::Array3;
use std::path::Path;
use std::sync::Arc;

/// Whether a [`Potential`] has been evaluated
#[derive(Debug, Clone, Default)]
pub enum PotentialState {
    #[default]
    Pending,
    Computed(Array3<f64>),
}

/// A potential of a given kind, owning the charge it is derived from
///
/// The values are computed the first time they are needed and cached.
/// Reading a new charge afterwards does not refresh the cache.
#[derive(Debug, Clone)]
pub struct Potential {
    charge: Charge,
    kind: PotentialKind,
    kernels: Arc<PotentialKernels>,
    state: PotentialState,
}

impl Potential {
    pub fn new(charge: Charge, kind: PotentialKind, kernels: Arc<PotentialKernels>) -> Self {
        Self {
            charge,
            kind,
            kernels,
            state: PotentialState::Pending,
        }
    }

    pub fn kind(&self) -> PotentialKind {
        self.kind
    }

    pub fn charge(&self) -> &Charge {
        &self.charge
    }

    pub fn state(&self) -> &PotentialState {
        &self.state
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.state, PotentialState::Computed(_))
    }

    /// Potential values, computing them on first access
    pub fn values(&mut self) -> Result<&Array3<f64>> {
        self.ensure_computed()?;
        match &self.state {
            PotentialState::Computed(values) => Ok(values),
            PotentialState::Pending => Err(ChargeError::NotLoaded(format!(
                "{} has not been computed",
                self.kind
            ))),
        }
    }

    pub fn header(&self) -> String {
        field_header(&format!("Potential file {}", self.kind.label()), self.charge.mesh())
    }

    fn ensure_computed(&mut self) -> Result<()> {
        if let PotentialState::Pending = self.state {
            let total = self.charge.total()?;
            let context = self.charge.context_or_err()?;
            let values = self.kernels.compute(self.kind, total, context)?;
            debug!("{} computed on the {} mesh", self.kind, self.charge.mesh());
            self.state = PotentialState::Computed(values);
        }
        Ok(())
    }
}

impl Readable for Potential {
    fn read(&mut self, path: &Path) -> Result<()> {
        self.charge.read(path)?;
        if self.is_computed() {
            debug!("{} keeps its cached values after reading {}", self.kind, path.display());
        }
        Ok(())
    }
}

impl Writable for Potential {
    fn write(&mut self, path: &Path) -> Result<()> {
        let header = self.header();
        let values = self.values()?;
        write_field_file(path, values, &header)?;
        info!("{} written to {}", self.kind, path.display());
        Ok(())
    }
}

impl Plottable for Potential {
    fn plot<P: FieldPlotter + ?Sized>(&mut self, plotter: &P, request: &PlotRequest) -> Result<P::Output> {
        self.ensure_computed()?;
        let context = self.charge.context_or_err()?;
        let values = match &self.state {
            PotentialState::Computed(values) => values,
            PotentialState::Pending => {
                return Err(ChargeError::NotLoaded(format!("{} has not been computed", self.kind)))
            }
        };
        plot_field(plotter, values, context, request, self.kind.label())
    }
}
