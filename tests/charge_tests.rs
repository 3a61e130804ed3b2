/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

mod common;

use approx::assert_relative_eq;
use common::{real, FlatChargeFile};
use ndarray::Array3;
use postqe::charge::{
    Charge, ChargeError, ChargeState, FieldPlotter, PlotGeometry, PlotRequest, Plottable, Potential,
    PotentialState, Readable, SpinChannel, Writable,
};
use postqe::grid::Mesh;
use postqe::io::write_field;
use postqe::potential::{
    GaussianIonPotential, PotentialKernels, PotentialKind, XcComponents, XcEvaluator,
};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

fn spin_file() -> FlatChargeFile {
    FlatChargeFile::new(2, vec![[0, 0, 0], [1, 0, 0], [0, 0, 1]])
        .gamma_only()
        .with_field(real(&[1.0, 0.2, 0.1]))
        .with_field(real(&[0.4, 0.05, -0.02]))
}

#[test]
fn test_spin_decomposition() {
    let dir = tempdir().unwrap();
    let path = spin_file().write_to(dir.path(), "charge-density.dat");

    let mut charge = Charge::new(Mesh::new(4, 3, 5).unwrap());
    charge.read(&path).unwrap();
    assert!(charge.is_spin_polarized());

    let total = charge.total().unwrap();
    let diff = charge.diff().unwrap().unwrap();
    let up = charge.up().unwrap();
    let down = charge.down().unwrap();
    for i in 0..total.len() {
        let (t, d, u, w) = (
            total.as_slice().unwrap()[i],
            diff.as_slice().unwrap()[i],
            up.as_slice().unwrap()[i],
            down.as_slice().unwrap()[i],
        );
        assert_relative_eq!(u + w, t, epsilon = 1e-12);
        assert_relative_eq!(u - w, d, epsilon = 1e-12);
    }
    // Every completed coefficient contributes fully at the origin
    assert_relative_eq!(total[[0, 0, 0]], 1.0 + 2.0 * 0.2 + 2.0 * 0.1, epsilon = 1e-12);
}

#[test]
fn test_text_layout() {
    let field = Array3::from_shape_fn((2, 2, 2), |(x, y, z)| (x + 10 * y + 100 * z) as f64);
    let mut out = Vec::new();
    write_field(&mut out, &field, "X\n").unwrap();
    let text = String::from_utf8(out).unwrap();

    let expected = "X\n\
        \x20 0.000000000E+00  1.000000000E+00  1.000000000E+01  1.100000000E+01  1.000000000E+02\n\
        \x20 1.010000000E+02  1.100000000E+02  1.110000000E+02\n";
    assert_eq!(text, expected);
}

#[test]
fn test_charge_write_produces_spin_files() {
    let dir = tempdir().unwrap();
    let input = spin_file().write_to(dir.path(), "charge-density.dat");
    let output = dir.path().join("rho.txt");

    let mut charge = Charge::new(Mesh::new(3, 1, 3).unwrap());
    charge.read(&input).unwrap();
    charge.write(&output).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("# Charge file\n# nr1= 3 nr2= 1 nr3= 3\n"));
    assert_eq!(text.lines().count(), 2 + 2);
    assert!(dir.path().join("rho.txt_up").exists());
    assert!(dir.path().join("rho.txt_down").exists());
}

#[test]
fn test_unpolarized_write_has_no_spin_files() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("rho.txt");
    let mesh = Mesh::new(2, 2, 2).unwrap();
    let mut charge = Charge::from_arrays(mesh, Array3::from_elem((2, 2, 2), 0.5), None).unwrap();
    charge.write(&output).unwrap();

    assert!(output.exists());
    assert!(!dir.path().join("rho.txt_up").exists());
}

#[test]
fn test_uninitialized_charge_cannot_be_written() {
    let dir = tempdir().unwrap();
    let mut charge = Charge::new(Mesh::new(2, 2, 2).unwrap());
    assert!(matches!(charge.state(), ChargeState::Uninitialized));
    assert!(matches!(
        charge.write(&dir.path().join("rho.txt")),
        Err(ChargeError::NotLoaded(_))
    ));
    assert!(!dir.path().join("rho.txt").exists());
}

/// Records what it was asked to plot
#[derive(Default)]
struct Recorder {
    calls: AtomicUsize,
}

impl FieldPlotter for Recorder {
    type Output = (String, (usize, usize, usize), f64);

    fn plot(
        &self,
        field: &Array3<f64>,
        geometry: &PlotGeometry<'_>,
        _request: &PlotRequest,
        label: &str,
    ) -> postqe::charge::Result<Self::Output> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(geometry.g.dim(), field.dim());
        Ok((label.to_string(), field.dim(), field[[0, 0, 0]]))
    }
}

#[test]
fn test_plot_needs_context_and_valid_request() {
    let mesh = Mesh::new(2, 2, 2).unwrap();
    let total = Array3::from_elem((2, 2, 2), 1.0);
    let diff = Array3::from_elem((2, 2, 2), 0.5);
    let mut charge = Charge::from_arrays(mesh, total, Some(diff)).unwrap();
    let plotter = Recorder::default();

    assert!(matches!(
        charge.plot(&plotter, &PlotRequest::default()),
        Err(ChargeError::MissingContext(_))
    ));

    let mut charge = charge.with_context(Arc::new(common::cubic_context(5.0, 30.0)));
    let bad = PlotRequest {
        dim: 0,
        ..Default::default()
    };
    assert!(matches!(
        charge.plot(&plotter, &bad),
        Err(ChargeError::UnsupportedOption(_))
    ));
    assert_eq!(plotter.calls.load(Ordering::SeqCst), 0);

    let up = PlotRequest {
        spin: SpinChannel::Up,
        ..Default::default()
    };
    let (label, dims, first) = charge.plot(&plotter, &up).unwrap();
    assert_eq!(label, "charge");
    assert_eq!(dims, (2, 2, 2));
    assert_relative_eq!(first, 0.75);
    assert_eq!(plotter.calls.load(Ordering::SeqCst), 1);
}

/// LDA-like evaluator that counts how often a sweep starts
struct Counting {
    sweeps: Arc<AtomicUsize>,
}

impl XcEvaluator for Counting {
    fn validate(&self, _functional: &str) -> postqe::potential::Result<()> {
        self.sweeps.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn evaluate(&self, rho: f64, _functional: &str) -> postqe::potential::Result<XcComponents> {
        Ok(XcComponents {
            vx: -rho,
            ..Default::default()
        })
    }
}

#[test]
fn test_potential_is_computed_once() {
    let dir = tempdir().unwrap();
    let sweeps = Arc::new(AtomicUsize::new(0));
    let kernels = Arc::new(PotentialKernels::new(
        Arc::new(GaussianIonPotential),
        Arc::new(Counting { sweeps: sweeps.clone() }),
    ));

    let mesh = Mesh::new(3, 3, 3).unwrap();
    let charge = Charge::from_arrays(mesh, Array3::from_elem((3, 3, 3), 0.2), None)
        .unwrap()
        .with_context(Arc::new(common::cubic_context(5.0, 30.0)));
    let mut potential = Potential::new(charge, PotentialKind::Xc, kernels);
    assert!(matches!(potential.state(), PotentialState::Pending));

    let first = potential.values().unwrap().clone();
    let second = potential.values().unwrap().clone();
    potential.write(&dir.path().join("v_xc.txt")).unwrap();

    assert_eq!(first, second);
    assert_relative_eq!(first[[1, 1, 1]], -0.4, epsilon = 1e-14);
    assert_eq!(sweeps.load(Ordering::SeqCst), 1);
    assert!(potential.is_computed());
}

#[test]
fn test_cached_potential_survives_a_new_charge() {
    let dir = tempdir().unwrap();
    let path = spin_file().write_to(dir.path(), "charge-density.dat");
    let context = Arc::new(common::cubic_context(5.0, 30.0));
    let mesh = Mesh::new(3, 1, 3).unwrap();
    let charge = Charge::from_arrays(mesh, Array3::from_elem((3, 1, 3), 0.2), None)
        .unwrap()
        .with_context(context);

    let mut potential = Potential::new(charge, PotentialKind::Hartree, Arc::new(PotentialKernels::default()));
    let before = potential.values().unwrap().clone();
    potential.read(&path).unwrap();
    assert!(potential.charge().is_spin_polarized());
    assert_eq!(potential.values().unwrap(), &before);
}

#[test]
fn test_potential_write_header() {
    let dir = tempdir().unwrap();
    let input = common::cosine_density(0.2, 0.05).write_to(dir.path(), "charge-density.dat");
    let output = dir.path().join("v_h.txt");
    let context = Arc::new(common::cubic_context(6.0, 40.0));

    let mut potential =
        postqe::get_potential(&input, Some(Mesh::new(4, 2, 2).unwrap()), context, PotentialKind::Hartree).unwrap();
    potential.write(&output).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("# Potential file v_h\n# nr1= 4 nr2= 2 nr3= 2\n"));
    let values: Vec<f64> = text
        .lines()
        .skip(2)
        .flat_map(|line| line.split_whitespace().map(|v| v.parse::<f64>().unwrap()).collect::<Vec<_>>())
        .collect();
    assert_eq!(values.len(), 16);
    // 2·(2/π)·alat²·a·cos(2πx/4): x = 0 is the maximum, x = 2 the minimum
    let peak = 2.0 / std::f64::consts::PI * 36.0 * 2.0 * 0.05;
    assert_relative_eq!(values[0], peak, epsilon = 1e-8);
    assert_relative_eq!(values[2], -peak, epsilon = 1e-8);
}

#[test]
fn test_potential_requires_context() {
    let mesh = Mesh::new(2, 2, 2).unwrap();
    let charge = Charge::from_arrays(mesh, Array3::from_elem((2, 2, 2), 0.1), None).unwrap();
    let mut potential = Potential::new(charge, PotentialKind::Total, Arc::new(PotentialKernels::default()));
    assert!(matches!(potential.values(), Err(ChargeError::MissingContext(_))));
    assert!(!potential.is_computed());
}

#[test]
fn test_get_charge_uses_minimal_mesh() {
    let dir = tempdir().unwrap();
    let path = spin_file().write_to(dir.path(), "charge-density.dat");
    let charge = postqe::get_charge(&path, None).unwrap();
    assert_eq!(charge.mesh().dims(), [3, 1, 3]);
    assert!(charge.is_loaded());
}
