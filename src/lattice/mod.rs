/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Lattice geometry
//!
//! Plain 3-vectors and the pair of dual bases (direct/reciprocal) that the
//! reader, the cutoff engine and the kernels share.

mod basis;
mod vector;

pub use basis::LatticeBasis;
pub use vector::Vector3D;
