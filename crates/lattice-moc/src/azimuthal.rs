// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Azimuthal Quadrature
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cyclic azimuthal quadrature.
//!
//! Track counts are rounded to integers first, then the effective angle
//! and spacing are recomputed from those integers so that every track's
//! far endpoint lands exactly on a half-offset boundary grid shared with
//! the mirrored angle. Reflective and periodic stitching rely on this
//! exactness.

use lattice_types::error::{LatticeError, LatticeResult};
use std::f64::consts::{FRAC_PI_2, PI};

/// One tracked azimuthal family. The angles φ and φ+π share the family's
/// tracks, traversed in opposite directions.
#[derive(Debug, Clone)]
pub struct AngleInfo {
    /// Effective azimuthal angle in (0, π).
    pub phi: f64,
    /// Effective perpendicular track spacing [cm].
    pub spacing: f64,
    /// Angular sector width this family represents within its quadrant.
    /// Sectors tile [0, π/2], so quadrant weights sum to π/2.
    pub weight: f64,
    /// Tracks entering on the y-min edge.
    pub nx: usize,
    /// Tracks entering on the x-min (first quadrant) or x-max (second
    /// quadrant) edge.
    pub ny: usize,
}

/// Generate the tracked families over [0, π) for a W×H domain.
///
/// `n_angles` is the total azimuthal count over [0, 2π); families come
/// back ordered by increasing φ, first-quadrant families first, and
/// family `i` mirrors family `n/2 − 1 − i`.
pub fn generate_azimuthal_quadrature(
    n_angles: usize,
    spacing: f64,
    width: f64,
    height: f64,
) -> LatticeResult<Vec<AngleInfo>> {
    if n_angles < 4 || n_angles % 4 != 0 {
        return Err(LatticeError::ConfigError(format!(
            "azimuthal angle count must be a positive multiple of 4, got {n_angles}"
        )));
    }
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(LatticeError::ConfigError(format!(
            "track spacing must be finite and > 0, got {spacing}"
        )));
    }

    let n_q = n_angles / 4;
    let delta = FRAC_PI_2 / n_q as f64;

    let mut quadrant = Vec::with_capacity(n_q);
    for i in 0..n_q {
        let phi_nominal = (i as f64 + 0.5) * delta;
        let nx = ((width * phi_nominal.sin() / spacing).round() as usize).max(1);
        let ny = ((height * phi_nominal.cos() / spacing).round() as usize).max(1);
        // Effective angle closing the cyclic track layout exactly.
        let phi = (height * nx as f64).atan2(width * ny as f64);
        let spacing_eff = width * phi.sin() / nx as f64;
        quadrant.push(AngleInfo {
            phi,
            spacing: spacing_eff,
            weight: 0.0,
            nx,
            ny,
        });
    }

    // Sector weights from half-angles to the neighbouring effective
    // angles; the first and last sectors extend to 0 and π/2.
    let phis: Vec<f64> = quadrant.iter().map(|a| a.phi).collect();
    for i in 0..n_q {
        let lo = if i == 0 { 0.0 } else { (phis[i] + phis[i - 1]) / 2.0 };
        let hi = if i == n_q - 1 {
            FRAC_PI_2
        } else {
            (phis[i] + phis[i + 1]) / 2.0
        };
        if hi <= lo {
            return Err(LatticeError::ConfigError(format!(
                "track spacing {spacing} is too coarse for {n_angles} azimuthal angles: \
                 effective angles are not strictly increasing"
            )));
        }
        quadrant[i].weight = hi - lo;
    }

    // Mirror into the second quadrant so that family i and family
    // n_half−1−i are complements with identical track geometry.
    let mut families = quadrant.clone();
    for info in quadrant.iter().rev() {
        families.push(AngleInfo {
            phi: PI - info.phi,
            ..info.clone()
        });
    }
    Ok(families)
}

/// Index of the mirrored (π−φ) family.
pub fn complement(family: usize, n_half: usize) -> usize {
    n_half - 1 - family
}
