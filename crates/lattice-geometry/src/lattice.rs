// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Cartesian Lattice
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rectangular tile grid with iterative descent into nested lattices.
//!
//! Leaf regions get stable integer ids from per-tile prefix sums computed
//! at construction, so a region's id never depends on query order. Nested
//! lattices are walked with an explicit frame stack (no recursion) and a
//! hard depth cap.

use crate::cell::{self, Cell, SURFACE_TOL};
use crate::vector::{Direction, Vector};
use lattice_types::error::{LatticeError, LatticeResult};

/// Maximum nesting depth of the descent stack.
const MAX_NEST_DEPTH: usize = 8;

/// Rectangular array of tiles in local coordinates [0, W] × [0, H].
///
/// Tiles are row-major with the y-min row first. The lattice owns its
/// cells (and, through `Cell::Nested`, any sub-lattices); the transport
/// core refers to leaf regions only by integer id.
#[derive(Debug, Clone)]
pub struct CartesianLattice {
    x_edges: Vec<f64>,
    y_edges: Vec<f64>,
    nx: usize,
    ny: usize,
    tiles: Vec<Cell>,
    /// Per-tile starting region id.
    offsets: Vec<usize>,
    nregions: usize,
}

/// Answer to a combined region/distance query.
#[derive(Debug, Clone, Copy)]
pub struct Probe {
    /// Stable leaf-region id.
    pub region: usize,
    /// Material index of the leaf region.
    pub material: usize,
    /// Distance along the query direction to the next surface (tile wall,
    /// ring circle, or enclosing boundary).
    pub surface_distance: f64,
}

impl CartesianLattice {
    /// Build from tile widths and row-major cells (y-min row first).
    pub fn new(dx: &[f64], dy: &[f64], tiles: Vec<Cell>) -> LatticeResult<Self> {
        if dx.is_empty() || dy.is_empty() {
            return Err(LatticeError::ConfigError(
                "lattice needs at least one tile in each direction".to_string(),
            ));
        }
        for &w in dx.iter().chain(dy.iter()) {
            if !w.is_finite() || w <= 0.0 {
                return Err(LatticeError::ConfigError(format!(
                    "tile widths must be finite and > 0, got {w}"
                )));
            }
        }
        let (nx, ny) = (dx.len(), dy.len());
        if tiles.len() != nx * ny {
            return Err(LatticeError::ConfigError(format!(
                "{}x{} lattice needs {} tiles, got {}",
                nx,
                ny,
                nx * ny,
                tiles.len()
            )));
        }

        let mut x_edges = Vec::with_capacity(nx + 1);
        x_edges.push(0.0);
        for &w in dx {
            x_edges.push(x_edges.last().copied().unwrap_or(0.0) + w);
        }
        let mut y_edges = Vec::with_capacity(ny + 1);
        y_edges.push(0.0);
        for &h in dy {
            y_edges.push(y_edges.last().copied().unwrap_or(0.0) + h);
        }

        let mut offsets = Vec::with_capacity(tiles.len());
        let mut nregions = 0;
        for tile in &tiles {
            offsets.push(nregions);
            nregions += tile.nregions();
        }

        Ok(CartesianLattice {
            x_edges,
            y_edges,
            nx,
            ny,
            tiles,
            offsets,
            nregions,
        })
    }

    pub fn width(&self) -> f64 {
        self.x_edges[self.nx]
    }

    pub fn height(&self) -> f64 {
        self.y_edges[self.ny]
    }

    /// Total number of leaf regions, nested lattices included.
    pub fn nregions(&self) -> usize {
        self.nregions
    }

    /// Leaf region and material at `r`, with `u` breaking on-surface ties.
    pub fn resolve(&self, r: Vector, u: Direction) -> LatticeResult<(usize, usize)> {
        let probe = self.probe(r, u)?;
        Ok((probe.region, probe.material))
    }

    /// Distance along `u` from `r` to the next internal surface.
    pub fn distance_to_surface(&self, r: Vector, u: Direction) -> LatticeResult<f64> {
        Ok(self.probe(r, u)?.surface_distance)
    }

    /// Combined region/material/distance query — one descent for both
    /// questions, which is what the segmenter wants in its inner loop.
    pub fn probe(&self, r: Vector, u: Direction) -> LatticeResult<Probe> {
        let mut frames: Vec<(&CartesianLattice, Vector)> = Vec::new();
        let mut lat = self;
        let mut origin = Vector::default();
        let mut region_base = 0usize;
        let mut nearest = f64::INFINITY;

        loop {
            if frames.len() > MAX_NEST_DEPTH {
                return Err(LatticeError::GeometryError(format!(
                    "lattice nesting exceeds {MAX_NEST_DEPTH} levels"
                )));
            }

            let local = r - origin;
            let (ix, iy) = lat.tile_index(local, u)?;
            let t = iy * lat.nx + ix;

            let x0 = origin.x + lat.x_edges[ix];
            let x1 = origin.x + lat.x_edges[ix + 1];
            let y0 = origin.y + lat.y_edges[iy];
            let y1 = origin.y + lat.y_edges[iy + 1];
            nearest = nearest.min(rect_exit(r, u, x0, x1, y0, y1));

            region_base += lat.offsets[t];
            match &lat.tiles[t] {
                Cell::Uniform { material } => {
                    return Ok(Probe {
                        region: region_base,
                        material: *material,
                        surface_distance: nearest,
                    });
                }
                Cell::Pin { radii, materials } => {
                    let centre = Vector::new((x0 + x1) / 2.0, (y0 + y1) / 2.0);
                    let rel = r - centre;
                    let ring = cell::ring_index(rel, u, radii);
                    nearest = nearest.min(cell::distance_to_rings(rel, u, radii));
                    return Ok(Probe {
                        region: region_base + ring,
                        material: materials[ring],
                        surface_distance: nearest,
                    });
                }
                Cell::Nested(sub) => {
                    frames.push((lat, origin));
                    origin = Vector::new(x0, y0);
                    lat = sub;
                }
            }
        }
    }

    /// Check every material index referenced anywhere in the tree against
    /// the material table size. Iterative, stack-based.
    pub fn validate_materials(&self, n_materials: usize) -> LatticeResult<()> {
        let mut stack: Vec<&CartesianLattice> = vec![self];
        while let Some(lat) = stack.pop() {
            for tile in &lat.tiles {
                match tile {
                    Cell::Uniform { material } => {
                        check_material(*material, n_materials)?;
                    }
                    Cell::Pin { materials, .. } => {
                        for &m in materials {
                            check_material(m, n_materials)?;
                        }
                    }
                    Cell::Nested(sub) => stack.push(sub),
                }
            }
        }
        Ok(())
    }

    fn tile_index(&self, local: Vector, u: Direction) -> LatticeResult<(usize, usize)> {
        let xb = local.x + SURFACE_TOL * u.x();
        let yb = local.y + SURFACE_TOL * u.y();
        if xb < -SURFACE_TOL
            || xb > self.width() + SURFACE_TOL
            || yb < -SURFACE_TOL
            || yb > self.height() + SURFACE_TOL
        {
            return Err(LatticeError::GeometryError(format!(
                "point ({}, {}) lies outside the lattice",
                local.x, local.y
            )));
        }
        let ix = self
            .x_edges
            .partition_point(|&e| e <= xb)
            .saturating_sub(1)
            .min(self.nx - 1);
        let iy = self
            .y_edges
            .partition_point(|&e| e <= yb)
            .saturating_sub(1)
            .min(self.ny - 1);
        Ok((ix, iy))
    }
}

fn check_material(m: usize, n_materials: usize) -> LatticeResult<()> {
    if m >= n_materials {
        return Err(LatticeError::ConfigError(format!(
            "cell references material {m}, but only {n_materials} materials were supplied"
        )));
    }
    Ok(())
}

/// Distance along `u` out of the axis-aligned box [x0,x1] × [y0,y1].
fn rect_exit(r: Vector, u: Direction, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    let mut d = f64::INFINITY;
    if u.x() > SURFACE_TOL {
        d = d.min((x1 - r.x) / u.x());
    } else if u.x() < -SURFACE_TOL {
        d = d.min((x0 - r.x) / u.x());
    }
    if u.y() > SURFACE_TOL {
        d = d.min((y1 - r.y) / u.y());
    } else if u.y() < -SURFACE_TOL {
        d = d.min((y0 - r.y) / u.y());
    }
    d.max(0.0)
}
