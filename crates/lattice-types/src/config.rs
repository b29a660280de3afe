// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::boundary::BoundaryCondition;
use serde::{Deserialize, Serialize};

/// Top-level run configuration for a lattice transport solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeConfig {
    pub assembly_name: String,
    pub tracks: TrackParams,
    #[serde(default)]
    pub polar: PolarParams,
    #[serde(default)]
    pub solver: SolverParams,
    #[serde(default)]
    pub boundaries: BoundaryParams,
}

/// Azimuthal track layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackParams {
    /// Total azimuthal angle count over [0, 2π); must be divisible by 4.
    pub n_azimuthal: usize,
    /// Nominal perpendicular track spacing [cm].
    pub spacing: f64,
}

/// Polar quadrature selection (a named data table, resolved at run time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolarParams {
    /// "yamamoto-tabuchi" or "gauss-legendre".
    #[serde(default = "default_polar_family")]
    pub family: String,
    /// Total polar point count over [0, π]; supported orders are 2, 4, 6.
    #[serde(default = "default_polar_order")]
    pub order: usize,
}

/// Outer-iteration controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverParams {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_flux_tolerance")]
    pub flux_tolerance: f64,
    #[serde(default = "default_keff_tolerance")]
    pub keff_tolerance: f64,
    /// Use the interpolated exponential table instead of direct exp_m1.
    #[serde(default = "default_exponential_table")]
    pub exponential_table: bool,
}

/// Per-edge boundary conditions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundaryParams {
    #[serde(default)]
    pub x_min: BoundaryCondition,
    #[serde(default)]
    pub x_max: BoundaryCondition,
    #[serde(default)]
    pub y_min: BoundaryCondition,
    #[serde(default)]
    pub y_max: BoundaryCondition,
}

fn default_polar_family() -> String {
    "yamamoto-tabuchi".to_string()
}
fn default_polar_order() -> usize {
    6
}
fn default_max_iterations() -> usize {
    600
}
fn default_flux_tolerance() -> f64 {
    1e-5
}
fn default_keff_tolerance() -> f64 {
    1e-5
}
fn default_exponential_table() -> bool {
    true
}

impl Default for PolarParams {
    fn default() -> Self {
        PolarParams {
            family: default_polar_family(),
            order: default_polar_order(),
        }
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            max_iterations: default_max_iterations(),
            flux_tolerance: default_flux_tolerance(),
            keff_tolerance: default_keff_tolerance(),
            exponential_table: default_exponential_table(),
        }
    }
}

impl LatticeConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> crate::error::LatticeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}
