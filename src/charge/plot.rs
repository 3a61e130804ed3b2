/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Plot requests handed to an external plotter
//!
//! The crate does not draw anything. A [`FieldPlotter`] receives the field,
//! the geometry of the cell and a validated [`PlotRequest`], and produces
//! whatever it produces: a figure, an exported file, a section of values.

use super::errors::{ChargeError, Result};
use crate::context::{AtomicPosition, AtomicSpecies, StructureContext};
use crate::grid::{compute_g, Mesh};
use crate::lattice::Vector3D;
use ndarray::Array3;
use std::path::PathBuf;

/// Which spin density to plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinChannel {
    #[default]
    Total,
    Up,
    Down,
}

impl SpinChannel {
    pub fn from_string(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "total" => Ok(SpinChannel::Total),
            "up" => Ok(SpinChannel::Up),
            "down" => Ok(SpinChannel::Down),
            _ => Err(ChargeError::UnsupportedOption(format!("spin channel '{}'", name))),
        }
    }
}

/// How values off the mesh are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotMethod {
    /// Fourier interpolation
    #[default]
    Fft,
    /// 2D polar plot on a sphere
    Polar,
    /// 1D spherical average
    Spherical,
}

impl PlotMethod {
    pub fn from_string(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "fft" => Ok(PlotMethod::Fft),
            "polar" => Ok(PlotMethod::Polar),
            "spherical" => Ok(PlotMethod::Spherical),
            _ => Err(ChargeError::UnsupportedOption(format!("plot method '{}'", name))),
        }
    }

    /// Section dimensions the method can produce
    fn supports(&self, dim: usize) -> bool {
        match self {
            PlotMethod::Fft => (1..=3).contains(&dim),
            PlotMethod::Polar => dim == 2,
            PlotMethod::Spherical => dim == 1,
        }
    }
}

/// File format of an exported plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Gnuplot,
    /// XCrySDen structure file
    Xsf,
    /// Gaussian cube
    Cube,
    Contour,
    PlotRho,
}

impl ExportFormat {
    pub fn from_string(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "gnuplot" => Ok(ExportFormat::Gnuplot),
            "xsf" => Ok(ExportFormat::Xsf),
            "cube" => Ok(ExportFormat::Cube),
            "contour" => Ok(ExportFormat::Contour),
            "plotrho" => Ok(ExportFormat::PlotRho),
            _ => Err(ChargeError::UnsupportedOption(format!("export format '{}'", name))),
        }
    }

    fn supports(&self, dim: usize) -> bool {
        match self {
            ExportFormat::Gnuplot => dim == 1 || dim == 2,
            ExportFormat::Xsf => dim == 2 || dim == 3,
            ExportFormat::Cube => dim == 3,
            ExportFormat::Contour | ExportFormat::PlotRho => dim == 2,
        }
    }
}

/// A 1D, 2D or 3D section through a field
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    /// 1, 2 or 3
    pub dim: usize,
    /// Origin of the section, in units of `alat`
    pub x0: Vector3D,
    pub e1: Vector3D,
    pub e2: Vector3D,
    pub e3: Vector3D,
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    /// Sphere radius for the polar method
    pub radius: f64,
    pub spin: SpinChannel,
    pub method: PlotMethod,
    pub format: ExportFormat,
    /// Where the plotter should export its data, if anywhere
    pub output: Option<PathBuf>,
}

impl Default for PlotRequest {
    fn default() -> Self {
        Self {
            dim: 1,
            x0: Vector3D::origin(),
            e1: Vector3D::new(1.0, 0.0, 0.0),
            e2: Vector3D::new(0.0, 1.0, 0.0),
            e3: Vector3D::new(0.0, 0.0, 1.0),
            nx: 50,
            ny: 50,
            nz: 50,
            radius: 1.0,
            spin: SpinChannel::Total,
            method: PlotMethod::Fft,
            format: ExportFormat::Gnuplot,
            output: None,
        }
    }
}

impl PlotRequest {
    /// Reject combinations no plotter can honour
    pub fn validate(&self) -> Result<()> {
        if !(1..=3).contains(&self.dim) {
            return Err(ChargeError::UnsupportedOption(format!(
                "plot dimension {} (expected 1, 2 or 3)",
                self.dim
            )));
        }
        if !self.method.supports(self.dim) {
            return Err(ChargeError::UnsupportedOption(format!(
                "method {:?} for a {}D section",
                self.method, self.dim
            )));
        }
        if !self.format.supports(self.dim) {
            return Err(ChargeError::UnsupportedOption(format!(
                "format {:?} for a {}D section",
                self.format, self.dim
            )));
        }

        let counts = [self.nx, self.ny, self.nz];
        if counts[..self.dim].iter().any(|&n| n == 0) {
            return Err(ChargeError::UnsupportedOption(
                "every section axis needs at least one point".to_string(),
            ));
        }
        let axes = [self.e1, self.e2, self.e3];
        if axes[..self.dim].iter().any(|e| e.norm_squared() == 0.0) {
            return Err(ChargeError::UnsupportedOption(
                "section axes must be non-zero".to_string(),
            ));
        }
        if self.method == PlotMethod::Polar && !(self.radius > 0.0) {
            return Err(ChargeError::UnsupportedOption(format!(
                "polar radius must be positive, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}

/// Cell geometry handed to a plotter
#[derive(Debug, Clone)]
pub struct PlotGeometry<'a> {
    pub alat: f64,
    /// Direct lattice vectors in units of `alat`
    pub direct: [Vector3D; 3],
    /// Reciprocal lattice vectors in units of `2π/alat`
    pub reciprocal: [Vector3D; 3],
    /// G vector of every mesh point
    pub g: Array3<Vector3D>,
    pub atomic_positions: &'a [AtomicPosition],
    pub atomic_species: &'a [AtomicSpecies],
}

impl<'a> PlotGeometry<'a> {
    pub fn new(context: &'a StructureContext, mesh: Mesh) -> Result<Self> {
        let basis = context.reciprocal_basis()?;
        Ok(Self {
            alat: context.alat,
            direct: context.direct_vectors(),
            reciprocal: *basis.reciprocal(),
            g: compute_g(&basis, mesh),
            atomic_positions: &context.atomic_positions,
            atomic_species: &context.atomic_species,
        })
    }
}

/// External plotting or export backend
pub trait FieldPlotter {
    type Output;

    fn plot(
        &self,
        field: &Array3<f64>,
        geometry: &PlotGeometry<'_>,
        request: &PlotRequest,
        label: &str,
    ) -> Result<Self::Output>;
}

/// Validate the request, build the geometry and call the plotter
pub(crate) fn plot_field<P: FieldPlotter + ?Sized>(
    plotter: &P,
    field: &Array3<f64>,
    context: &StructureContext,
    request: &PlotRequest,
    label: &str,
) -> Result<P::Output> {
    request.validate()?;
    let (nr1, nr2, nr3) = field.dim();
    let geometry = PlotGeometry::new(context, Mesh::new(nr1, nr2, nr3)?)?;
    plotter.plot(field, &geometry, request, label)
}
