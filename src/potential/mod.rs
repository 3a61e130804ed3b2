/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Potential calculation module
//!
//! Turns a real-space charge density into the potentials felt by an
//! electron: the bare ionic potential, the Hartree potential, the
//! exchange-correlation potential and their sum. The ionic pseudopotential
//! and the xc functional are evaluated by injected [`LocalPotentialEvaluator`]
//! and [`XcEvaluator`] implementations.

mod bare;
mod config;
mod errors;
mod exchange_correlation;
mod hartree;
mod kind;

pub use bare::{bare_potential, GaussianIonPotential, LocalPotentialEvaluator, LocalPotentialRequest};
pub use config::KernelConfig;
pub use errors::{PotentialError, Result};
pub use exchange_correlation::{
    pz_correlation, slater_exchange, xc_potential, ExchangeCorrelationType, LocalDensityXc,
    XcComponents, XcEvaluator,
};
pub use hartree::{hartree_from_coefficients, hartree_potential, hartree_prefactor};
pub use kind::PotentialKind;

use crate::context::StructureContext;
use crate::grid::Mesh;
use log::debug;
use ndarray::Array3;
use std::fmt;
use std::sync::Arc;

/// The evaluators and constants used to compute potentials
#[derive(Clone)]
pub struct PotentialKernels {
    local: Arc<dyn LocalPotentialEvaluator>,
    xc: Arc<dyn XcEvaluator>,
    config: KernelConfig,
}

impl PotentialKernels {
    /// Kernels with the given evaluators and the default configuration
    pub fn new(local: Arc<dyn LocalPotentialEvaluator>, xc: Arc<dyn XcEvaluator>) -> Self {
        Self {
            local,
            xc,
            config: KernelConfig::default(),
        }
    }

    /// Replace the numerical configuration
    pub fn with_config(mut self, config: KernelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Potential of the given kind for a real-space charge density
    pub fn compute(
        &self,
        kind: PotentialKind,
        charge: &Array3<f64>,
        context: &StructureContext,
    ) -> Result<Array3<f64>> {
        debug!("computing {} on a {:?} mesh", kind, charge.dim());
        match kind {
            PotentialKind::Bare => self.bare(charge, context),
            PotentialKind::Hartree => self.hartree(charge, context),
            PotentialKind::Xc => self.xc(charge, context),
            PotentialKind::Total => {
                let (bare, (hartree, xc)) = rayon::join(
                    || self.bare(charge, context),
                    || {
                        rayon::join(
                            || self.hartree(charge, context),
                            || self.xc(charge, context),
                        )
                    },
                );
                Ok(bare? + &hartree? + &xc?)
            }
        }
    }

    fn bare(&self, charge: &Array3<f64>, context: &StructureContext) -> Result<Array3<f64>> {
        let (nr1, nr2, nr3) = charge.dim();
        let mesh = Mesh::new(nr1, nr2, nr3)?;
        bare_potential(context, mesh, self.local.as_ref())
    }

    fn hartree(&self, charge: &Array3<f64>, context: &StructureContext) -> Result<Array3<f64>> {
        let basis = context.reciprocal_basis()?;
        hartree_potential(charge, &basis, context.ecutrho, context.alat, &self.config)
    }

    /// The core charge is taken as zero
    fn xc(&self, charge: &Array3<f64>, context: &StructureContext) -> Result<Array3<f64>> {
        let core = Array3::zeros(charge.dim());
        xc_potential(charge, &core, &context.functional, self.xc.as_ref(), &self.config)
    }
}

impl Default for PotentialKernels {
    fn default() -> Self {
        Self::new(Arc::new(GaussianIonPotential), Arc::new(LocalDensityXc))
    }
}

impl fmt::Debug for PotentialKernels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PotentialKernels")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
