/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Dense and sparse grids in real and reciprocal space
//!
//! The reciprocal data read from charge files is a sparse list of
//! `(Miller index, coefficient)` pairs. This module completes Gamma-only
//! data, scatters the pairs onto a dense FFT mesh, transforms them to real
//! space and computes the G vectors and cutoff-filtered G² on the mesh.

pub mod cutoff;
mod errors;
pub mod fft;
pub mod rasterize;
pub mod reciprocal;

pub use cutoff::{compute_g, compute_g_squared, compute_gs, count_within_cutoff, GVectorMesh};
pub use errors::{GridError, Result};
pub use fft::Fft3;
pub use rasterize::{rasterize, rasterize_field, scatter, ScatterStats};
pub use reciprocal::{mirror_index, FieldKind, ReciprocalGrid};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest number of points a mesh may hold (2^28 complex values, 4 GiB)
pub const MAX_MESH_POINTS: usize = 1 << 28;

/// Dimensions `nr1 × nr2 × nr3` of a real-space FFT mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[usize; 3]", into = "[usize; 3]")]
pub struct Mesh {
    nr: [usize; 3],
}

impl Mesh {
    /// Create a mesh, rejecting zero dimensions and meshes above [`MAX_MESH_POINTS`]
    pub fn new(nr1: usize, nr2: usize, nr3: usize) -> Result<Self> {
        if nr1 == 0 || nr2 == 0 || nr3 == 0 {
            return Err(GridError::InvalidMesh(format!(
                "dimensions must be positive, got {} x {} x {}",
                nr1, nr2, nr3
            )));
        }
        let points = nr1.checked_mul(nr2).and_then(|p| p.checked_mul(nr3));
        if !points.is_some_and(|p| p <= MAX_MESH_POINTS) {
            return Err(GridError::InvalidMesh(format!(
                "{} x {} x {} exceeds the limit of {} points",
                nr1, nr2, nr3, MAX_MESH_POINTS
            )));
        }
        Ok(Self {
            nr: [nr1, nr2, nr3],
        })
    }

    /// Smallest mesh holding every stored frequency: `2·max|m| + 1` per axis
    pub fn from_miller_extrema(miller: &[[i32; 3]]) -> Result<Self> {
        if miller.is_empty() {
            return Err(GridError::InvalidMesh(
                "cannot size a mesh from an empty index list".to_string(),
            ));
        }

        let mut max_abs = [0usize; 3];
        for m in miller {
            for (axis, &value) in m.iter().enumerate() {
                max_abs[axis] = max_abs[axis].max(value.unsigned_abs() as usize);
            }
        }
        let [n1, n2, n3] = max_abs.map(|m| m.checked_mul(2).and_then(|n| n.checked_add(1)));
        match (n1, n2, n3) {
            (Some(n1), Some(n2), Some(n3)) => Self::new(n1, n2, n3),
            _ => Err(GridError::InvalidMesh(format!(
                "Miller extrema {:?} overflow the mesh size",
                max_abs
            ))),
        }
    }

    /// Dimensions as an array
    pub fn dims(&self) -> [usize; 3] {
        self.nr
    }

    /// Dimensions as an `ndarray` shape
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nr[0], self.nr[1], self.nr[2])
    }

    /// Total number of mesh points
    pub fn len(&self) -> usize {
        self.nr.iter().product()
    }

    /// Always false: meshes have positive dimensions
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Dense position of Miller component `m` along `axis`
    ///
    /// Negative components wrap to `nr + m`. Components that do not fit the
    /// mesh after wrapping return `None`.
    pub fn wrap(&self, m: i32, axis: usize) -> Option<usize> {
        let n = self.nr[axis] as i64;
        let m = m as i64;
        let position = if m < 0 { n + m } else { m };
        if (0..n).contains(&position) {
            Some(position as usize)
        } else {
            None
        }
    }

    /// Dense position of a full Miller triple
    pub fn wrap_index(&self, m: [i32; 3]) -> Option<(usize, usize, usize)> {
        Some((self.wrap(m[0], 0)?, self.wrap(m[1], 1)?, self.wrap(m[2], 2)?))
    }

    /// Signed frequency of dense position `x` along `axis`
    ///
    /// Inverse of [`Mesh::wrap`] for every mesh size: positions in the lower
    /// half map to themselves, the rest to `x - nr`.
    pub fn fold(&self, x: usize, axis: usize) -> i64 {
        let n = self.nr[axis];
        if 2 * x < n {
            x as i64
        } else {
            x as i64 - n as i64
        }
    }
}

impl TryFrom<[usize; 3]> for Mesh {
    type Error = GridError;

    fn try_from(nr: [usize; 3]) -> Result<Self> {
        Self::new(nr[0], nr[1], nr[2])
    }
}

impl From<Mesh> for [usize; 3] {
    fn from(mesh: Mesh) -> Self {
        mesh.nr
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} x {}", self.nr[0], self.nr[1], self.nr[2])
    }
}
