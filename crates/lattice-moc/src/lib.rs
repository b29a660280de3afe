// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Lattice MOC
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Method-of-Characteristics transport engine.
//!
//! The pipeline, leaves first: azimuthal quadrature → track layout →
//! segmentation against the geometry → boundary linking → exponential
//! evaluation → transport sweep with k-eff power iteration. The
//! [`MocSolver`] ties the stages together behind `draw_tracks` /
//! `solve_keff`.

pub mod azimuthal;
pub mod exponential;
pub mod polar;
pub mod region;
pub mod solver;
pub mod track;

mod boundary;
mod tracer;

pub use azimuthal::AngleInfo;
pub use exponential::ExponentialEvaluator;
pub use polar::PolarQuadrature;
pub use region::FlatSourceRegion;
pub use solver::{MocSolver, SimulationMode, SolveResult, SolverState};
pub use track::{Edge, Segment, Track};
