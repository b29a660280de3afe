// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Tracks
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cyclic track layout.
//!
//! Every endpoint sits on the half-offset grid of its edge: x positions
//! (j+½)·W/nx on the horizontal edges, y positions (m+½)·H/ny on the
//! vertical edges. Because the effective angle satisfies
//! tan φ = H·nx / (W·ny), exits land on those same grids — the boundary
//! linker works on integer grid indices, never on coordinate matching.

use crate::azimuthal::{complement, AngleInfo};
use lattice_geometry::{Direction, Vector};

/// One domain edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    XMin,
    XMax,
    YMin,
    YMax,
}

impl Edge {
    pub fn index(self) -> usize {
        match self {
            Edge::XMin => 0,
            Edge::XMax => 1,
            Edge::YMin => 2,
            Edge::YMax => 3,
        }
    }

    pub fn opposite(self) -> Edge {
        match self {
            Edge::XMin => Edge::XMax,
            Edge::XMax => Edge::XMin,
            Edge::YMin => Edge::YMax,
            Edge::YMax => Edge::YMin,
        }
    }
}

/// A track endpoint pinned to the half-offset grid of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub edge: Edge,
    pub grid: usize,
}

/// Chord through one flat source region.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub fsr: usize,
    pub length: f64,
}

/// A traced characteristic across the domain. Forward travel runs
/// entry → exit; the φ+π direction reuses the same storage backward.
#[derive(Debug, Clone)]
pub struct Track {
    pub family: usize,
    pub entry: Vector,
    pub exit: Vector,
    pub entry_pt: Endpoint,
    pub exit_pt: Endpoint,
    pub direction: Direction,
    pub segments: Vec<Segment>,
}

impl Track {
    pub fn chord_length(&self) -> f64 {
        self.entry.distance(self.exit)
    }
}

/// Lay out the track set for every family over a W×H domain.
pub(crate) fn generate_tracks(angles: &[AngleInfo], width: f64, height: f64) -> Vec<Track> {
    let n_half = angles.len();
    let n_q = n_half / 2;
    let mut tracks = Vec::new();

    for (family, info) in angles.iter().enumerate() {
        let first_quadrant = family < n_q;
        debug_assert_eq!(
            info.nx,
            angles[complement(family, n_half)].nx,
            "complement families must share track counts"
        );
        let direction = Direction::from_angle(info.phi);

        for (entry_pt, exit_pt) in quadrant_one_endpoints(info.nx, info.ny) {
            let (entry_pt, exit_pt) = if first_quadrant {
                (entry_pt, exit_pt)
            } else {
                (mirror_x(entry_pt, info.nx), mirror_x(exit_pt, info.nx))
            };
            let entry = endpoint_coordinate(entry_pt, info, width, height);
            let exit = endpoint_coordinate(exit_pt, info, width, height);
            tracks.push(Track {
                family,
                entry,
                exit,
                entry_pt,
                exit_pt,
                direction,
                segments: Vec::new(),
            });
        }
    }
    tracks
}

/// Entry/exit grid pairs for a first-quadrant family, derived from the
/// integer closure relations of the effective angle.
fn quadrant_one_endpoints(nx: usize, ny: usize) -> Vec<(Endpoint, Endpoint)> {
    let mut pairs = Vec::with_capacity(nx + ny);

    // x-min starters, top down.
    for t in 0..ny {
        let m = ny - 1 - t;
        let entry = Endpoint {
            edge: Edge::XMin,
            grid: m,
        };
        let exit = if ny - m <= nx {
            Endpoint {
                edge: Edge::YMax,
                grid: ny - m - 1,
            }
        } else {
            Endpoint {
                edge: Edge::XMax,
                grid: m + nx,
            }
        };
        pairs.push((entry, exit));
    }

    // y-min starters, left to right.
    for j in 0..nx {
        let entry = Endpoint {
            edge: Edge::YMin,
            grid: j,
        };
        let exit = if j + ny <= nx - 1 {
            Endpoint {
                edge: Edge::YMax,
                grid: j + ny,
            }
        } else {
            Endpoint {
                edge: Edge::XMax,
                grid: nx - 1 - j,
            }
        };
        pairs.push((entry, exit));
    }
    pairs
}

/// Reflect an endpoint about the vertical midline (x ↦ W − x), mapping a
/// first-quadrant layout onto its second-quadrant mirror family.
fn mirror_x(pt: Endpoint, nx: usize) -> Endpoint {
    match pt.edge {
        Edge::XMin => Endpoint {
            edge: Edge::XMax,
            grid: pt.grid,
        },
        Edge::XMax => Endpoint {
            edge: Edge::XMin,
            grid: pt.grid,
        },
        Edge::YMin => Endpoint {
            edge: Edge::YMin,
            grid: nx - 1 - pt.grid,
        },
        Edge::YMax => Endpoint {
            edge: Edge::YMax,
            grid: nx - 1 - pt.grid,
        },
    }
}

pub(crate) fn endpoint_coordinate(
    pt: Endpoint,
    info: &AngleInfo,
    width: f64,
    height: f64,
) -> Vector {
    let dx = width / info.nx as f64;
    let dy = height / info.ny as f64;
    let g = pt.grid as f64 + 0.5;
    match pt.edge {
        Edge::XMin => Vector::new(0.0, g * dy),
        Edge::XMax => Vector::new(width, g * dy),
        Edge::YMin => Vector::new(g * dx, 0.0),
        Edge::YMax => Vector::new(g * dx, height),
    }
}
