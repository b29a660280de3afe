// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Lattice Geometry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cartesian tiling geometry for 2-D lattice transport.
//!
//! A [`CartesianLattice`] is a rectangular array of rectangular tiles in
//! local coordinates [0, W] × [0, H]. Each tile holds one [`Cell`]: a
//! homogeneous region, a set of concentric annuli (a pin), or a nested
//! lattice. The transport core only ever asks two questions of this crate:
//! which leaf region contains a point (with a travel direction to break
//! ties on surfaces), and how far along that direction the next surface
//! lies.

pub mod cell;
pub mod lattice;
pub mod vector;

pub use cell::Cell;
pub use lattice::{CartesianLattice, Probe};
pub use vector::{Direction, Vector};
