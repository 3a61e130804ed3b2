/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Exchange-correlation functionals and the xc potential on a mesh

use super::config::KernelConfig;
use super::errors::{PotentialError, Result};
use ndarray::{Array3, Zip};

const T13: f64 = 1.0 / 3.0;

/// Exchange-correlation functional types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeCorrelationType {
    /// Slater exchange with Perdew-Zunger correlation
    LDA,
    /// Slater exchange only
    Slater,
}

impl ExchangeCorrelationType {
    /// Create a new exchange-correlation functional type from string
    pub fn from_string(name: &str) -> Result<Self> {
        const LDA_ALIASES: [&str; 6] = ["PZ", "LDA", "SLA-PZ", "SLA+PZ", "SLA PZ", "SLA PZ NOGX NOGC"];
        const SLATER_ALIASES: [&str; 3] = ["SLA", "SLATER", "SLA NOC NOGX NOGC"];

        let name = name.trim();
        if LDA_ALIASES.iter().any(|a| a.eq_ignore_ascii_case(name)) {
            Ok(ExchangeCorrelationType::LDA)
        } else if SLATER_ALIASES.iter().any(|a| a.eq_ignore_ascii_case(name)) {
            Ok(ExchangeCorrelationType::Slater)
        } else {
            Err(PotentialError::InvalidExchangeCorrelation(format!(
                "Unknown exchange-correlation functional: {}",
                name
            )))
        }
    }

    /// Get a string representation of the exchange-correlation type
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeCorrelationType::LDA => "SLA-PZ",
            ExchangeCorrelationType::Slater => "SLA",
        }
    }
}

/// Energy densities and potentials at one point, in Hartree
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XcComponents {
    pub ex: f64,
    pub ec: f64,
    pub vx: f64,
    pub vc: f64,
}

/// Evaluates an exchange-correlation functional at a single density
pub trait XcEvaluator: Send + Sync {
    /// Reject functionals this evaluator does not know before any point is evaluated
    fn validate(&self, functional: &str) -> Result<()>;

    /// Components at density `rho > 0`
    fn evaluate(&self, rho: f64, functional: &str) -> Result<XcComponents>;
}

/// Local density approximation: Slater exchange and Perdew-Zunger correlation
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDensityXc;

impl XcEvaluator for LocalDensityXc {
    fn validate(&self, functional: &str) -> Result<()> {
        ExchangeCorrelationType::from_string(functional).map(|_| ())
    }

    fn evaluate(&self, rho: f64, functional: &str) -> Result<XcComponents> {
        let kind = ExchangeCorrelationType::from_string(functional)?;
        let (vx, ex) = slater_exchange(rho);
        let (vc, ec) = match kind {
            ExchangeCorrelationType::LDA => pz_correlation(rho),
            ExchangeCorrelationType::Slater => (0.0, 0.0),
        };
        Ok(XcComponents { ex, ec, vx, vc })
    }
}

/// Slater exchange potential and energy density `(vx, ex)`
///
/// `vx = -(3/π)^(1/3) ρ^(1/3)`, `ex = 3/4 vx`.
pub fn slater_exchange(rho: f64) -> (f64, f64) {
    let cx = -(3.0 / std::f64::consts::PI).powf(T13);
    let vx = cx * rho.powf(T13);
    (vx, 0.75 * vx)
}

/// Perdew-Zunger correlation potential and energy density `(vc, ec)`
///
/// Uses the Padé form for `rs > 1` and the logarithmic expansion otherwise,
/// with the unpolarised Ceperley-Alder fit parameters.
pub fn pz_correlation(rho: f64) -> (f64, f64) {
    // Low-density parameters
    let gamma = -0.1423;
    let beta1 = 1.0529;
    let beta2 = 0.3334;
    // High-density parameters
    let a = 0.0311;
    let b = -0.048;
    let c = 0.0020;
    let d = -0.0116;

    let rs = (3.0 / (4.0 * std::f64::consts::PI * rho)).powf(T13);

    if rs > 1.0 {
        let root = rs.sqrt();
        let dt = 1.0 + beta1 * root + beta2 * rs;
        let ec = gamma / dt;
        let nt = 1.0 + 7.0 / 6.0 * beta1 * root + 4.0 / 3.0 * beta2 * rs;
        (ec * nt / dt, ec)
    } else {
        let ln_rs = rs.ln();
        let ec = a * ln_rs + b + c * rs * ln_rs + d * rs;
        let vc = a * ln_rs + (b - a * T13) + 2.0 * T13 * c * rs * ln_rs + T13 * (2.0 * d - c) * rs;
        (vc, ec)
    }
}

/// Exchange-correlation potential on a mesh, in Rydberg
///
/// At every point `ρ = charge + core`. Where `|ρ|` exceeds
/// [`KernelConfig::vanishing_charge`] the potential is `e2·(vx + vc)` of
/// `|ρ|`, elsewhere it is zero.
pub fn xc_potential(
    charge: &Array3<f64>,
    core_charge: &Array3<f64>,
    functional: &str,
    evaluator: &dyn XcEvaluator,
    config: &KernelConfig,
) -> Result<Array3<f64>> {
    if charge.dim() != core_charge.dim() {
        return Err(PotentialError::ShapeMismatch(format!(
            "charge has shape {:?} but core charge has shape {:?}",
            charge.dim(),
            core_charge.dim()
        )));
    }
    evaluator.validate(functional)?;

    let values = Zip::from(charge)
        .and(core_charge)
        .par_map_collect(|&rho, &core| -> Result<f64> {
            let rho = rho + core;
            if rho.abs() > config.vanishing_charge {
                let xc = evaluator.evaluate(rho.abs(), functional)?;
                Ok(config.e2 * (xc.vx + xc.vc))
            } else {
                Ok(0.0)
            }
        });

    let mut potential = Array3::zeros(charge.dim());
    for (dst, value) in potential.iter_mut().zip(values) {
        *dst = value?;
    }
    Ok(potential)
}
