// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Polar Quadrature
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Polar quadrature data tables.
//!
//! Each set is a plain (sin θ, weight) table picked at run time; weights
//! sum to one over the upper hemisphere and the ±z symmetry factor is
//! applied by the sweep. The Yamamoto–Tabuchi sets follow:
//!
//! A. Yamamoto, M. Tabuchi, N. Sugimura, T. Ushio, and M. Mori,
//! "Derivation of Optimum Polar Angle Quadrature Set for the Method of
//! Characteristics Based on Approximation Error for the Bickley Function,"
//! J. Nucl. Sci. Technol., vol. 44, no. 2, pp. 129–136, 2007.

use lattice_types::error::{LatticeError, LatticeResult};

const YT2_SIN: [f64; 1] = [0.798184];
const YT2_WGT: [f64; 1] = [1.000000];

const YT4_SIN: [f64; 2] = [0.363900, 0.899900];
const YT4_WGT: [f64; 2] = [0.212854, 0.787146];

const YT6_SIN: [f64; 3] = [0.166648, 0.537707, 0.932954];
const YT6_WGT: [f64; 3] = [0.046233, 0.283619, 0.670148];

// Gauss–Legendre nodes on μ = cos θ ∈ [0, 1] (half range), weights
// normalized to one.
const GL2_MU: [f64; 1] = [0.5];
const GL2_WGT: [f64; 1] = [1.0];

const GL4_MU: [f64; 2] = [0.211_324_865_405_187_1, 0.788_675_134_594_812_9];
const GL4_WGT: [f64; 2] = [0.5, 0.5];

const GL6_MU: [f64; 3] = [0.112_701_665_379_258_3, 0.5, 0.887_298_334_620_741_7];
const GL6_WGT: [f64; 3] = [5.0 / 18.0, 4.0 / 9.0, 5.0 / 18.0];

/// A named polar abscissae/weight table, supplied to the transport core at
/// configuration time.
#[derive(Debug, Clone)]
pub struct PolarQuadrature {
    name: String,
    sin_theta: Vec<f64>,
    weight: Vec<f64>,
}

impl PolarQuadrature {
    /// Yamamoto–Tabuchi optimum set of total order 2, 4 or 6.
    pub fn yamamoto_tabuchi(order: usize) -> LatticeResult<Self> {
        let (sin_theta, weight): (&[f64], &[f64]) = match order {
            2 => (&YT2_SIN, &YT2_WGT),
            4 => (&YT4_SIN, &YT4_WGT),
            6 => (&YT6_SIN, &YT6_WGT),
            other => {
                return Err(LatticeError::ConfigError(format!(
                    "Yamamoto-Tabuchi order must be 2, 4 or 6, got {other}"
                )))
            }
        };
        Ok(PolarQuadrature {
            name: format!("yamamoto-tabuchi-{order}"),
            sin_theta: sin_theta.to_vec(),
            weight: weight.to_vec(),
        })
    }

    /// Half-range Gauss–Legendre set over the polar cosine, total order
    /// 2, 4 or 6.
    pub fn gauss_legendre(order: usize) -> LatticeResult<Self> {
        let (mu, weight): (&[f64], &[f64]) = match order {
            2 => (&GL2_MU, &GL2_WGT),
            4 => (&GL4_MU, &GL4_WGT),
            6 => (&GL6_MU, &GL6_WGT),
            other => {
                return Err(LatticeError::ConfigError(format!(
                    "Gauss-Legendre order must be 2, 4 or 6, got {other}"
                )))
            }
        };
        let sin_theta = mu.iter().map(|&m| (1.0 - m * m).sqrt()).collect();
        Ok(PolarQuadrature {
            name: format!("gauss-legendre-{order}"),
            sin_theta,
            weight: weight.to_vec(),
        })
    }

    /// Resolve a family name from configuration.
    pub fn from_name(family: &str, order: usize) -> LatticeResult<Self> {
        match family {
            "yamamoto-tabuchi" => Self::yamamoto_tabuchi(order),
            "gauss-legendre" => Self::gauss_legendre(order),
            other => Err(LatticeError::ConfigError(format!(
                "unknown polar quadrature family '{other}'"
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of polar points per hemisphere.
    pub fn len(&self) -> usize {
        self.sin_theta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sin_theta.is_empty()
    }

    pub fn sin_theta(&self) -> &[f64] {
        &self.sin_theta
    }

    pub fn weights(&self) -> &[f64] {
        &self.weight
    }
}
