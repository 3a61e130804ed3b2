/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Three-dimensional discrete Fourier transforms on a [`Mesh`]
//!
//! The transform is separable: a 1D FFT is applied along every lane of each
//! axis in turn. Lanes of one axis are independent and are processed in
//! parallel.

use super::errors::{GridError, Result};
use super::Mesh;
use ndarray::{Array3, Axis, Zip};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Planned forward and inverse transforms for one mesh
pub struct Fft3 {
    mesh: Mesh,
    forward: [Arc<dyn Fft<f64>>; 3],
    inverse: [Arc<dyn Fft<f64>>; 3],
}

impl Fft3 {
    /// Plan the transforms for `mesh`
    pub fn new(mesh: Mesh) -> Self {
        let mut planner = FftPlanner::new();
        let dims = mesh.dims();
        let forward = dims.map(|n| planner.plan_fft_forward(n));
        let inverse = dims.map(|n| planner.plan_fft_inverse(n));
        Self {
            mesh,
            forward,
            inverse,
        }
    }

    /// Mesh the transforms were planned for
    pub fn mesh(&self) -> Mesh {
        self.mesh
    }

    /// Unnormalised forward transform, kernel `exp(-i G·r)`
    pub fn forward(&self, data: &mut Array3<Complex64>) -> Result<()> {
        self.check_shape(data)?;
        transform(data, self.mesh.dims(), &self.forward);
        Ok(())
    }

    /// Unnormalised inverse transform, kernel `exp(+i G·r)`
    ///
    /// Equivalent to a normalised inverse followed by multiplication with the
    /// number of mesh points.
    pub fn inverse(&self, data: &mut Array3<Complex64>) -> Result<()> {
        self.check_shape(data)?;
        transform(data, self.mesh.dims(), &self.inverse);
        Ok(())
    }

    /// Inverse transform divided by the number of mesh points
    pub fn inverse_normalized(&self, data: &mut Array3<Complex64>) -> Result<()> {
        self.inverse(data)?;
        let scale = 1.0 / self.mesh.len() as f64;
        data.par_mapv_inplace(|v| v * scale);
        Ok(())
    }

    fn check_shape(&self, data: &Array3<Complex64>) -> Result<()> {
        if data.dim() != self.mesh.shape() {
            return Err(GridError::ShapeMismatch(format!(
                "array of shape {:?} does not match the {} mesh",
                data.dim(),
                self.mesh
            )));
        }
        Ok(())
    }
}

fn transform(data: &mut Array3<Complex64>, dims: [usize; 3], plans: &[Arc<dyn Fft<f64>>; 3]) {
    for (axis, plan) in plans.iter().enumerate() {
        if dims[axis] < 2 {
            continue;
        }
        Zip::from(data.lanes_mut(Axis(axis))).par_for_each(|mut lane| {
            let mut buffer = lane.to_vec();
            plan.process(&mut buffer);
            for (dst, src) in lane.iter_mut().zip(buffer) {
                *dst = src;
            }
        });
    }
}

/// Promote a real field to complex values
pub fn to_complex(field: &Array3<f64>) -> Array3<Complex64> {
    field.mapv(|v| Complex64::new(v, 0.0))
}
