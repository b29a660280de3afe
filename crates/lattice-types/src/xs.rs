// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Cross Sections
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Multigroup macroscopic cross-section container.
//!
//! This is the boundary object with the nuclear-data library: the library
//! performs nuclide mixing and temperature/dilution interpolation and hands
//! the transport core one immutable `CrossSection` per material. The core
//! only ever reads it.

use crate::error::{LatticeError, LatticeResult};
use ndarray::{Array1, Array2};

/// Relative tolerance on the χ normalization of a fissile material.
const CHI_NORM_TOL: f64 = 1e-6;

/// Immutable multigroup macroscopic cross sections for one material.
///
/// Groups are ordered fast → thermal. The scattering matrix is indexed
/// `[g_from, g_to]`. Totals must be strictly positive in every group so the
/// sweep can divide by Σt without void guards.
#[derive(Debug, Clone)]
pub struct CrossSection {
    name: String,
    total: Array1<f64>,
    absorption: Array1<f64>,
    scatter: Array2<f64>,
    fission: Array1<f64>,
    nu: Array1<f64>,
    chi: Array1<f64>,
    fissile: bool,
}

impl CrossSection {
    /// Non-fissile material from Σt, Σa and the scattering matrix.
    pub fn new(
        total: Array1<f64>,
        absorption: Array1<f64>,
        scatter: Array2<f64>,
        name: impl Into<String>,
    ) -> LatticeResult<Self> {
        let ng = total.len();
        let zeros = Array1::zeros(ng);
        Self::with_fission(
            total,
            absorption,
            scatter,
            zeros.clone(),
            zeros.clone(),
            zeros,
            name,
        )
    }

    /// Full constructor with fission data (Σf, ν, χ).
    pub fn with_fission(
        total: Array1<f64>,
        absorption: Array1<f64>,
        scatter: Array2<f64>,
        fission: Array1<f64>,
        nu: Array1<f64>,
        chi: Array1<f64>,
        name: impl Into<String>,
    ) -> LatticeResult<Self> {
        let name = name.into();
        let ng = total.len();
        if ng == 0 {
            return Err(LatticeError::DataError(format!(
                "material '{name}': group count must be > 0"
            )));
        }
        for (label, arr) in [
            ("absorption", &absorption),
            ("fission", &fission),
            ("nu", &nu),
            ("chi", &chi),
        ] {
            if arr.len() != ng {
                return Err(LatticeError::DataError(format!(
                    "material '{name}': {label} has {} groups, expected {ng}",
                    arr.len()
                )));
            }
        }
        if scatter.dim() != (ng, ng) {
            return Err(LatticeError::DataError(format!(
                "material '{name}': scattering matrix is {:?}, expected ({ng}, {ng})",
                scatter.dim()
            )));
        }
        for (g, &st) in total.iter().enumerate() {
            if !st.is_finite() || st <= 0.0 {
                return Err(LatticeError::DataError(format!(
                    "material '{name}': total xs must be finite and > 0, got {st} in group {g}"
                )));
            }
        }
        for arr in [&absorption, &fission, &nu, &chi] {
            if arr.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(LatticeError::DataError(format!(
                    "material '{name}': negative or non-finite cross-section entry"
                )));
            }
        }
        if scatter.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(LatticeError::DataError(format!(
                "material '{name}': negative or non-finite scattering entry"
            )));
        }

        let fissile = fission
            .iter()
            .zip(nu.iter())
            .any(|(&f, &n)| f > 0.0 && n > 0.0);
        if fissile {
            let chi_sum: f64 = chi.sum();
            if (chi_sum - 1.0).abs() > CHI_NORM_TOL {
                return Err(LatticeError::DataError(format!(
                    "material '{name}': fission spectrum sums to {chi_sum}, expected 1"
                )));
            }
        }

        Ok(CrossSection {
            name,
            total,
            absorption,
            scatter,
            fission,
            nu,
            chi,
            fissile,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ngroups(&self) -> usize {
        self.total.len()
    }

    pub fn fissile(&self) -> bool {
        self.fissile
    }

    pub fn total(&self) -> &Array1<f64> {
        &self.total
    }

    pub fn absorption(&self) -> &Array1<f64> {
        &self.absorption
    }

    /// Scattering Σs g→g′.
    pub fn scatter(&self, g_from: usize, g_to: usize) -> f64 {
        self.scatter[[g_from, g_to]]
    }

    pub fn chi(&self, g: usize) -> f64 {
        self.chi[g]
    }

    /// Fission production νΣf in group g.
    pub fn nu_fission(&self, g: usize) -> f64 {
        self.nu[g] * self.fission[g]
    }
}
