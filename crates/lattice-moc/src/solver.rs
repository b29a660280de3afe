// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Transport Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! MocSolver — transport sweep and k-eff power iteration.
//!
//! Algorithm per outer iteration:
//! 1. Per-region isotropic source from the previous flux (fission/k +
//!    scatter + external), per steradian.
//! 2. Parallel sweep over tracks, both travel senses, all polar angles:
//!    segment-by-segment exponential attenuation, scalar-flux
//!    accumulation, outgoing end fluxes delivered to their linked
//!    traversals.
//! 3. Scalar-flux update against the track-derived region volumes;
//!    negative values clip to zero with a counted warning.
//! 4. k ← k · (fission production / previous production) in k-eff mode.
//! 5. Converged when the L2 relative flux change and |Δk| are both under
//!    tolerance; hitting the iteration cap is reported, not an error.
//!
//! Boundary coupling is Jacobi: incoming fluxes are read from the
//! previous iteration's buffer and outgoing fluxes written to the next
//! one, so the sweep is order-independent and race-free.

use crate::azimuthal::{generate_azimuthal_quadrature, AngleInfo};
use crate::boundary::{build_endpoint_tables, build_links, traversal, FamilyEndpoints};
use crate::exponential::ExponentialEvaluator;
use crate::polar::PolarQuadrature;
use crate::region::{FlatSourceRegion, FsrRegistry};
use crate::tracer::trace_track;
use crate::track::{generate_tracks, Edge, Segment, Track};
use lattice_geometry::{CartesianLattice, Direction, Vector};
use lattice_types::boundary::BoundaryCondition;
use lattice_types::config::LatticeConfig;
use lattice_types::constants::{FOUR_PI, INV_FOUR_PI};
use lattice_types::error::{LatticeError, LatticeResult};
use lattice_types::xs::CrossSection;
use log::{debug, info, warn};
use ndarray::Array2;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Default outer-iteration cap.
const DEFAULT_MAX_ITERATIONS: usize = 600;
/// Default L2 relative flux convergence tolerance.
const DEFAULT_FLUX_TOLERANCE: f64 = 1e-5;
/// Default |Δk| convergence tolerance.
const DEFAULT_KEFF_TOLERANCE: f64 = 1e-5;
/// Floor on the previous flux when forming relative changes.
const FLUX_FLOOR: f64 = 1e-30;

/// Lifecycle of a solver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Uninitialized,
    Drawn,
    Converged,
    MaxIterExceeded,
}

/// What the outer iteration drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationMode {
    /// Eigenvalue iteration: fission divided by k, k updated per sweep.
    Keff,
    /// Fixed external source, k frozen.
    FixedSource,
}

/// Outcome of a solve — also returned when the iteration cap is hit, with
/// `converged` false and the last state retained on the solver.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub keff: f64,
    pub iterations: usize,
    pub converged: bool,
    pub flux_residual: f64,
    pub keff_delta: f64,
    pub residual_history: Vec<f64>,
    pub solve_time_ms: f64,
}

/// The MOC transport solver for one Cartesian lattice.
#[derive(Debug)]
pub struct MocSolver {
    geometry: CartesianLattice,
    materials: Vec<CrossSection>,
    polar: PolarQuadrature,
    ngroups: usize,
    bcs: [BoundaryCondition; 4],

    angles: Vec<AngleInfo>,
    tracks: Vec<Track>,
    tables: Vec<FamilyEndpoints>,
    links: Vec<Option<usize>>,
    regions: FsrRegistry,

    flux: Array2<f64>,
    source: Array2<f64>,
    extern_src: Array2<f64>,
    /// Double-buffered incoming angular flux per traversal,
    /// `[2·n_tracks × n_polar·n_groups]` each.
    boundary: [Vec<f64>; 2],
    /// Per family, per polar point: 2·wgt_azim·wgt_polar·sinθ·spacing.
    sweep_weights: Vec<Vec<f64>>,
    inv_sin: Vec<f64>,
    expo: ExponentialEvaluator,

    keff: f64,
    state: SolverState,
    mode: SimulationMode,

    pub max_iterations: usize,
    pub flux_tolerance: f64,
    pub keff_tolerance: f64,
}

impl MocSolver {
    /// New solver over a geometry, its material table and a polar set.
    /// All four boundaries default to reflective.
    pub fn new(
        geometry: CartesianLattice,
        materials: Vec<CrossSection>,
        polar: PolarQuadrature,
    ) -> LatticeResult<Self> {
        if materials.is_empty() {
            return Err(LatticeError::ConfigError(
                "at least one material is required".to_string(),
            ));
        }
        let ngroups = materials[0].ngroups();
        for xs in &materials {
            if xs.ngroups() != ngroups {
                return Err(LatticeError::DataError(format!(
                    "material '{}' has {} groups, expected {ngroups}",
                    xs.name(),
                    xs.ngroups()
                )));
            }
        }
        geometry.validate_materials(materials.len())?;

        let inv_sin = polar.sin_theta().iter().map(|&s| 1.0 / s).collect();
        Ok(MocSolver {
            geometry,
            materials,
            polar,
            ngroups,
            bcs: [BoundaryCondition::Reflective; 4],
            angles: Vec::new(),
            tracks: Vec::new(),
            tables: Vec::new(),
            links: Vec::new(),
            regions: FsrRegistry::new(),
            flux: Array2::zeros((0, 0)),
            source: Array2::zeros((0, 0)),
            extern_src: Array2::zeros((0, 0)),
            boundary: [Vec::new(), Vec::new()],
            sweep_weights: Vec::new(),
            inv_sin,
            expo: ExponentialEvaluator::table(),
            keff: 1.0,
            state: SolverState::Uninitialized,
            mode: SimulationMode::Keff,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            flux_tolerance: DEFAULT_FLUX_TOLERANCE,
            keff_tolerance: DEFAULT_KEFF_TOLERANCE,
        })
    }

    /// Construct, configure and draw in one step from a [`LatticeConfig`].
    pub fn from_config(
        geometry: CartesianLattice,
        materials: Vec<CrossSection>,
        config: &LatticeConfig,
    ) -> LatticeResult<Self> {
        let polar = PolarQuadrature::from_name(&config.polar.family, config.polar.order)?;
        let mut solver = MocSolver::new(geometry, materials, polar)?;
        solver.max_iterations = config.solver.max_iterations;
        solver.flux_tolerance = config.solver.flux_tolerance;
        solver.keff_tolerance = config.solver.keff_tolerance;
        solver.expo = if config.solver.exponential_table {
            ExponentialEvaluator::table()
        } else {
            ExponentialEvaluator::direct()
        };
        solver.set_boundary_conditions(
            config.boundaries.x_min,
            config.boundaries.x_max,
            config.boundaries.y_min,
            config.boundaries.y_max,
        )?;
        solver.draw_tracks(config.tracks.n_azimuthal, config.tracks.spacing)?;
        Ok(solver)
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn keff(&self) -> f64 {
        self.keff
    }

    pub fn ngroups(&self) -> usize {
        self.ngroups
    }

    /// Number of discovered flat source regions (0 before drawing).
    pub fn nfsr(&self) -> usize {
        self.regions.len()
    }

    pub fn polar_quadrature(&self) -> &PolarQuadrature {
        &self.polar
    }

    pub fn boundary_condition(&self, edge: Edge) -> BoundaryCondition {
        self.bcs[edge.index()]
    }

    /// Set all four edge conditions at once. Periodic edges must pair up
    /// with their opposites. On a drawn solver the link table is rebuilt
    /// and the boundary flux buffers are reset.
    pub fn set_boundary_conditions(
        &mut self,
        x_min: BoundaryCondition,
        x_max: BoundaryCondition,
        y_min: BoundaryCondition,
        y_max: BoundaryCondition,
    ) -> LatticeResult<()> {
        let bcs = [x_min, x_max, y_min, y_max];
        validate_periodic_pairing(&bcs)?;
        if self.state != SolverState::Uninitialized {
            self.links = build_links(&self.tracks, &self.tables, self.angles.len(), &bcs)?;
            for buf in &mut self.boundary {
                buf.iter_mut().for_each(|v| *v = 0.0);
            }
        }
        self.bcs = bcs;
        Ok(())
    }

    /// Cross sections of one flat source region.
    pub fn xs(&self, fsr: usize) -> &CrossSection {
        &self.materials[self.regions.fsrs()[fsr].material]
    }

    /// Scalar flux of one region and group.
    pub fn flux(&self, fsr: usize, group: usize) -> f64 {
        self.flux[[fsr, group]]
    }

    /// Generate quadrature, tracks, segments, links and solver state.
    ///
    /// `n_angles` is the total azimuthal count over [0, 2π). Re-invoking
    /// on a drawn solver is a configuration error; build a new solver to
    /// re-trace.
    pub fn draw_tracks(&mut self, n_angles: usize, spacing: f64) -> LatticeResult<()> {
        if self.state != SolverState::Uninitialized {
            return Err(LatticeError::ConfigError(
                "tracks are already drawn; build a new solver to re-trace".to_string(),
            ));
        }
        let width = self.geometry.width();
        let height = self.geometry.height();

        self.angles = generate_azimuthal_quadrature(n_angles, spacing, width, height)?;
        let mut tracks = generate_tracks(&self.angles, width, height);

        let mut registry = FsrRegistry::new();
        for track in tracks.iter_mut() {
            let fam = &self.angles[track.family];
            let volume_weight = fam.weight * fam.spacing / PI;
            trace_track(&self.geometry, track, &mut registry, volume_weight)?;
        }

        self.tables = build_endpoint_tables(&tracks, &self.angles)?;
        self.links = build_links(&tracks, &self.tables, self.angles.len(), &self.bcs)?;

        let nfsr = registry.len();
        let ng = self.ngroups;
        self.flux = Array2::from_elem((nfsr, ng), 1.0);
        self.source = Array2::zeros((nfsr, ng));
        self.extern_src = Array2::zeros((nfsr, ng));
        let stride = self.polar.len() * ng;
        self.boundary = [
            vec![0.0; 2 * tracks.len() * stride],
            vec![0.0; 2 * tracks.len() * stride],
        ];
        self.sweep_weights = self
            .angles
            .iter()
            .map(|fam| {
                self.polar
                    .weights()
                    .iter()
                    .zip(self.polar.sin_theta())
                    .map(|(&wp, &sp)| 2.0 * fam.weight * wp * sp * fam.spacing)
                    .collect()
            })
            .collect();

        let n_segments: usize = tracks.iter().map(|t| t.segments.len()).sum();
        info!(
            "drew {} tracks in {} azimuthal families: {} segments, {} flat source regions",
            tracks.len(),
            self.angles.len(),
            n_segments,
            nfsr
        );

        self.tracks = tracks;
        self.regions = registry;
        self.state = SolverState::Drawn;
        Ok(())
    }

    /// External isotropic emission density for one region and group
    /// [n/(cm³·s)], used by fixed-source solves.
    pub fn set_extern_src(&mut self, fsr: usize, group: usize, q: f64) -> LatticeResult<()> {
        self.require_drawn()?;
        if fsr >= self.regions.len() || group >= self.ngroups {
            return Err(LatticeError::ConfigError(format!(
                "external source index ({fsr}, {group}) out of range ({} regions, {} groups)",
                self.regions.len(),
                self.ngroups
            )));
        }
        if !q.is_finite() || q < 0.0 {
            return Err(LatticeError::DataError(format!(
                "external source must be finite and >= 0, got {q}"
            )));
        }
        self.extern_src[[fsr, group]] = q;
        Ok(())
    }

    /// Power iteration to the dominant eigenpair (k-eff, flux).
    pub fn solve_keff(&mut self) -> LatticeResult<SolveResult> {
        self.mode = SimulationMode::Keff;
        self.solve()
    }

    /// Fixed-source iteration: scatter + fission (k frozen at its current
    /// value) + the external source set via [`Self::set_extern_src`].
    pub fn solve_fixed_source(&mut self) -> LatticeResult<SolveResult> {
        self.mode = SimulationMode::FixedSource;
        self.solve()
    }

    /// The flat source region containing `r`, with `u` breaking
    /// on-surface ties. Read-only: no solver state changes.
    pub fn get_fsr(&self, r: Vector, u: Direction) -> LatticeResult<&FlatSourceRegion> {
        Ok(&self.regions.fsrs()[self.get_fsr_index(r, u)?])
    }

    pub fn get_fsr_index(&self, r: Vector, u: Direction) -> LatticeResult<usize> {
        self.require_drawn()?;
        let (region, _material) = self.geometry.resolve(r, u)?;
        self.regions.lookup(region).ok_or_else(|| {
            LatticeError::GeometryError(format!(
                "region at ({}, {}) was never crossed by a track; refine the track layout",
                r.x, r.y
            ))
        })
    }

    /// Scalar flux at a spatial point.
    pub fn flux_at(&self, r: Vector, u: Direction, group: usize) -> LatticeResult<f64> {
        if group >= self.ngroups {
            return Err(LatticeError::ConfigError(format!(
                "group {group} out of range ({} groups)",
                self.ngroups
            )));
        }
        let fsr = self.get_fsr_index(r, u)?;
        Ok(self.flux[[fsr, group]])
    }

    fn require_drawn(&self) -> LatticeResult<()> {
        if self.state == SolverState::Uninitialized {
            return Err(LatticeError::ConfigError(
                "draw_tracks must be called first".to_string(),
            ));
        }
        Ok(())
    }

    fn solve(&mut self) -> LatticeResult<SolveResult> {
        self.require_drawn()?;
        let start = std::time::Instant::now();

        let mut k = self.keff;
        let mut production_prev = match self.mode {
            SimulationMode::Keff => {
                let p = self.production();
                if p <= 0.0 {
                    return Err(LatticeError::ConfigError(
                        "k-eff solve requires fissile material in the lattice".to_string(),
                    ));
                }
                p
            }
            SimulationMode::FixedSource => 0.0,
        };

        let mut residual_history = Vec::new();
        let mut converged = false;
        let mut iterations = 0;
        let mut flux_residual = f64::MAX;
        let mut keff_delta = 0.0;

        for it in 0..self.max_iterations {
            iterations = it + 1;
            self.update_source(k);

            let previous = self.flux.clone();
            let clipped = self.sweep_iteration(it);
            if clipped > 0 {
                warn!("clipped {clipped} negative scalar flux values to zero");
            }

            flux_residual = relative_l2(&self.flux, &previous);
            if self.mode == SimulationMode::Keff {
                let production = self.production();
                let k_new = k * production / production_prev;
                keff_delta = (k_new - k).abs();
                k = k_new;
                production_prev = production;
            }
            residual_history.push(flux_residual);
            debug!("iteration {iterations}: k = {k:.6}, flux residual = {flux_residual:.3e}");

            let flux_ok = flux_residual < self.flux_tolerance;
            let keff_ok = match self.mode {
                SimulationMode::Keff => keff_delta < self.keff_tolerance,
                SimulationMode::FixedSource => true,
            };
            if flux_ok && keff_ok {
                converged = true;
                break;
            }
        }

        self.keff = k;
        self.state = if converged {
            SolverState::Converged
        } else {
            warn!(
                "transport iteration hit the cap of {} (flux residual {:.3e})",
                self.max_iterations, flux_residual
            );
            SolverState::MaxIterExceeded
        };

        Ok(SolveResult {
            keff: k,
            iterations,
            converged,
            flux_residual,
            keff_delta,
            residual_history,
            solve_time_ms: start.elapsed().as_secs_f64() * 1e3,
        })
    }

    /// Per-steradian isotropic source for every region and group.
    fn update_source(&mut self, k: f64) {
        let ng = self.ngroups;
        for (i, fsr) in self.regions.fsrs().iter().enumerate() {
            let xs = &self.materials[fsr.material];
            let mut fission = 0.0;
            for g in 0..ng {
                fission += xs.nu_fission(g) * self.flux[[i, g]];
            }
            // In fixed-source mode k is frozen at its current value.
            let fission = fission / k;
            for g in 0..ng {
                let mut scatter = 0.0;
                for gp in 0..ng {
                    scatter += xs.scatter(gp, g) * self.flux[[i, gp]];
                }
                self.source[[i, g]] =
                    (xs.chi(g) * fission + scatter + self.extern_src[[i, g]]) * INV_FOUR_PI;
            }
        }
    }

    /// One full transport sweep plus flux update. Returns the number of
    /// clipped negative flux values.
    fn sweep_iteration(&mut self, it: usize) -> usize {
        let ng = self.ngroups;
        let stride = self.polar.len() * ng;
        let nfsr = self.regions.len();

        let tracks = &self.tracks;
        let links = &self.links;
        let weights = &self.sweep_weights;
        let inv_sin = &self.inv_sin;
        let materials = &self.materials;
        let fsrs = self.regions.fsrs();
        let source = &self.source;
        let expo = &self.expo;

        let [buf_a, buf_b] = &mut self.boundary;
        let (read, write): (&Vec<f64>, &mut Vec<f64>) = if it % 2 == 0 {
            (&*buf_a, buf_b)
        } else {
            (&*buf_b, buf_a)
        };

        // Per-thread partial sums, merged after the sweep; outgoing end
        // fluxes are injected serially below (each incoming slot has
        // exactly one source, so the writes are disjoint).
        let partial = tracks
            .par_iter()
            .enumerate()
            .fold(
                || SweepPartial::new(nfsr * ng),
                |mut p, (t, track)| {
                    let fam_weights = &weights[track.family];
                    for forward in [true, false] {
                        let tid = traversal(t, forward);
                        let mut psi = read[tid * stride..(tid + 1) * stride].to_vec();
                        attenuate_along(
                            track,
                            forward,
                            &mut psi,
                            fam_weights,
                            inv_sin,
                            materials,
                            fsrs,
                            source,
                            expo,
                            &mut p.accum,
                            ng,
                        );
                        if let Some(target) = links[tid] {
                            p.outgoing.push((target, psi));
                        }
                    }
                    p
                },
            )
            .reduce(|| SweepPartial::new(nfsr * ng), SweepPartial::merge);

        write.iter_mut().for_each(|v| *v = 0.0);
        for (target, psi) in partial.outgoing {
            write[target * stride..(target + 1) * stride].copy_from_slice(&psi);
        }

        let mut clipped = 0usize;
        for (i, fsr) in self.regions.fsrs().iter().enumerate() {
            let total = self.materials[fsr.material].total();
            for g in 0..ng {
                let st = total[g];
                let mut phi = partial.accum[i * ng + g] / (st * fsr.volume)
                    + FOUR_PI * self.source[[i, g]] / st;
                if phi < 0.0 {
                    phi = 0.0;
                    clipped += 1;
                }
                self.flux[[i, g]] = phi;
            }
        }
        clipped
    }

    /// Total fission production Σᵢ Vᵢ Σ_g νΣf·Φ.
    fn production(&self) -> f64 {
        let ng = self.ngroups;
        self.regions
            .fsrs()
            .iter()
            .enumerate()
            .map(|(i, fsr)| {
                let xs = &self.materials[fsr.material];
                let rate: f64 = (0..ng).map(|g| xs.nu_fission(g) * self.flux[[i, g]]).sum();
                rate * fsr.volume
            })
            .sum()
    }
}

struct SweepPartial {
    accum: Vec<f64>,
    outgoing: Vec<(usize, Vec<f64>)>,
}

impl SweepPartial {
    fn new(n: usize) -> Self {
        SweepPartial {
            accum: vec![0.0; n],
            outgoing: Vec::new(),
        }
    }

    fn merge(mut a: Self, b: Self) -> Self {
        for (x, y) in a.accum.iter_mut().zip(&b.accum) {
            *x += y;
        }
        a.outgoing.extend(b.outgoing);
        a
    }
}

/// Propagate one traversal's angular flux segment by segment:
/// ψ_out = ψ_in − (ψ_in − q/Σt)(1 − e^{−τ}), accumulating the weighted
/// (ψ_in − ψ_out) into each crossed region.
#[allow(clippy::too_many_arguments)]
fn attenuate_along(
    track: &Track,
    forward: bool,
    psi: &mut [f64],
    weights: &[f64],
    inv_sin: &[f64],
    materials: &[CrossSection],
    fsrs: &[FlatSourceRegion],
    source: &Array2<f64>,
    expo: &ExponentialEvaluator,
    accum: &mut [f64],
    ng: usize,
) {
    let mut step = |seg: &Segment| {
        let total = materials[fsrs[seg.fsr].material].total();
        let base = seg.fsr * ng;
        for (p, (&w, &isin)) in weights.iter().zip(inv_sin).enumerate() {
            let row = p * ng;
            for g in 0..ng {
                let st = total[g];
                let att = expo.eval(st * seg.length * isin);
                let delta = (psi[row + g] - source[[seg.fsr, g]] / st) * att;
                accum[base + g] += w * delta;
                psi[row + g] -= delta;
            }
        }
    };
    if forward {
        track.segments.iter().for_each(&mut step);
    } else {
        track.segments.iter().rev().for_each(&mut step);
    }
}

fn validate_periodic_pairing(bcs: &[BoundaryCondition; 4]) -> LatticeResult<()> {
    let periodic = |bc: BoundaryCondition| bc == BoundaryCondition::Periodic;
    if periodic(bcs[Edge::XMin.index()]) != periodic(bcs[Edge::XMax.index()])
        || periodic(bcs[Edge::YMin.index()]) != periodic(bcs[Edge::YMax.index()])
    {
        return Err(LatticeError::ConfigError(
            "periodic boundary conditions must pair opposite edges".to_string(),
        ));
    }
    Ok(())
}

/// L2 norm of the relative per-entry change between two flux arrays.
fn relative_l2(new: &Array2<f64>, old: &Array2<f64>) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for (a, b) in new.iter().zip(old.iter()) {
        let denom = b.abs().max(FLUX_FLOOR);
        let r = (a - b) / denom;
        sum += r * r;
        n += 1;
    }
    if n == 0 {
        return 0.0;
    }
    (sum / n as f64).sqrt()
}
