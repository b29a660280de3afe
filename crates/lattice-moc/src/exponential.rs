// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Exponential Evaluator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Segment attenuation factors 1 − exp(−τ).
//!
//! Evaluated for every (segment × group × polar angle) triple of every
//! sweep, so the table path trades one transcendental for a linear
//! interpolation. Optical depth is never negative; anything below zero is
//! floating-point noise and clamps to zero, and the table never
//! extrapolates on either side.

/// Upper edge of the tabulated optical-depth domain.
const TABLE_MAX_TAU: f64 = 10.0;
/// Table step. Linear-interpolation error is bounded by step²/8.
const TABLE_STEP: f64 = 1e-3;

/// Attenuation-factor evaluation strategy.
#[derive(Debug, Clone)]
pub enum ExponentialEvaluator {
    /// Exact `exp_m1` per call.
    Direct,
    /// Precomputed linear-interpolation table with exact fallback outside
    /// its domain.
    Table(ExponentialTable),
}

impl ExponentialEvaluator {
    pub fn direct() -> Self {
        ExponentialEvaluator::Direct
    }

    pub fn table() -> Self {
        ExponentialEvaluator::Table(ExponentialTable::new(TABLE_MAX_TAU, TABLE_STEP))
    }

    /// 1 − exp(−τ) for τ ≥ 0 (negatives clamp to 0).
    #[inline]
    pub fn eval(&self, tau: f64) -> f64 {
        match self {
            ExponentialEvaluator::Direct => exact(tau),
            ExponentialEvaluator::Table(table) => table.eval(tau),
        }
    }
}

#[inline]
fn exact(tau: f64) -> f64 {
    if tau <= 0.0 {
        return 0.0;
    }
    -(-tau).exp_m1()
}

/// Uniform-grid table of 1 − exp(−τ) over [0, max_tau].
#[derive(Debug, Clone)]
pub struct ExponentialTable {
    step: f64,
    inv_step: f64,
    max_tau: f64,
    values: Vec<f64>,
}

impl ExponentialTable {
    pub fn new(max_tau: f64, step: f64) -> Self {
        let n = (max_tau / step).ceil() as usize + 2;
        let values = (0..n).map(|i| exact(i as f64 * step)).collect();
        ExponentialTable {
            step,
            inv_step: 1.0 / step,
            max_tau,
            values,
        }
    }

    #[inline]
    pub fn eval(&self, tau: f64) -> f64 {
        if tau <= 0.0 {
            return 0.0;
        }
        // Below one step the relative interpolation error is at its
        // worst; above the table edge we would extrapolate. Exact in both
        // cases.
        if tau < self.step || tau >= self.max_tau {
            return exact(tau);
        }
        let x = tau * self.inv_step;
        let i = x as usize;
        let f = x - i as f64;
        self.values[i] + f * (self.values[i + 1] - self.values[i])
    }
}
