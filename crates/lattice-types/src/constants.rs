// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Solid angle of the full unit sphere.
pub const FOUR_PI: f64 = 4.0 * std::f64::consts::PI;

/// 1/4π — converts an isotropic emission density to a per-steradian source.
pub const INV_FOUR_PI: f64 = 1.0 / FOUR_PI;
