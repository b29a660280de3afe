// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Cells
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The closed set of tile contents.
//!
//! Cells are a tagged variant set rather than an open class hierarchy: the
//! traversal code matches on the three shapes and nothing else can appear
//! in a tile.

use crate::lattice::CartesianLattice;
use crate::vector::{Direction, Vector};
use lattice_types::error::{LatticeError, LatticeResult};

/// Points closer than this to a surface resolve by travel direction, and
/// surfaces closer than this along a ray count as already crossed.
pub(crate) const SURFACE_TOL: f64 = 1e-9;

/// Contents of one rectangular tile.
#[derive(Debug, Clone)]
pub enum Cell {
    /// One homogeneous region filling the tile.
    Uniform { material: usize },
    /// Concentric annuli centred in the tile; `materials[i]` fills the
    /// ring inside `radii[i]`, `materials[radii.len()]` fills the corner
    /// remainder of the tile.
    Pin {
        radii: Vec<f64>,
        materials: Vec<usize>,
    },
    /// A nested Cartesian lattice occupying the tile.
    Nested(CartesianLattice),
}

impl Cell {
    pub fn uniform(material: usize) -> Self {
        Cell::Uniform { material }
    }

    /// Annular pin cell. Radii must be strictly increasing and positive;
    /// one more material than radii is required.
    pub fn pin(radii: Vec<f64>, materials: Vec<usize>) -> LatticeResult<Self> {
        if radii.is_empty() {
            return Err(LatticeError::ConfigError(
                "pin cell needs at least one radius".to_string(),
            ));
        }
        if materials.len() != radii.len() + 1 {
            return Err(LatticeError::ConfigError(format!(
                "pin cell with {} radii needs {} materials, got {}",
                radii.len(),
                radii.len() + 1,
                materials.len()
            )));
        }
        let mut prev = 0.0;
        for &r in &radii {
            if !r.is_finite() || r <= prev {
                return Err(LatticeError::ConfigError(format!(
                    "pin radii must be positive and strictly increasing, got {r} after {prev}"
                )));
            }
            prev = r;
        }
        Ok(Cell::Pin { radii, materials })
    }

    pub fn nested(lattice: CartesianLattice) -> Self {
        Cell::Nested(lattice)
    }

    /// Number of leaf regions this cell contributes to the region index.
    pub fn nregions(&self) -> usize {
        match self {
            Cell::Uniform { .. } => 1,
            Cell::Pin { radii, .. } => radii.len() + 1,
            Cell::Nested(lattice) => lattice.nregions(),
        }
    }
}

/// Ring index of a point relative to the pin centre, with the direction
/// bias deciding on-circle ties. Returns `radii.len()` for the outer
/// remainder region.
pub(crate) fn ring_index(rel: Vector, u: Direction, radii: &[f64]) -> usize {
    let biased = rel + u * SURFACE_TOL;
    let r = biased.norm();
    radii.partition_point(|&ri| ri <= r)
}

/// Distance along `u` from `rel` (relative to the pin centre) to the
/// nearest ring circle strictly ahead, or infinity if no ring is hit.
pub(crate) fn distance_to_rings(rel: Vector, u: Direction, radii: &[f64]) -> f64 {
    let u_vec = Vector::new(u.x(), u.y());
    let b = rel.dot(u_vec);
    let r2 = rel.dot(rel);
    let mut nearest = f64::INFINITY;
    for &radius in radii {
        let disc = b * b - (r2 - radius * radius);
        if disc <= 0.0 {
            continue;
        }
        let sq = disc.sqrt();
        for t in [-b - sq, -b + sq] {
            if t > SURFACE_TOL && t < nearest {
                nearest = t;
            }
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_validation() {
        assert!(Cell::pin(vec![0.4, 0.475], vec![0, 1, 2]).is_ok());
        assert!(Cell::pin(vec![], vec![0]).is_err());
        assert!(Cell::pin(vec![0.4, 0.3], vec![0, 1, 2]).is_err());
        assert!(Cell::pin(vec![0.4], vec![0]).is_err());
        assert!(Cell::pin(vec![-0.1], vec![0, 1]).is_err());
    }

    #[test]
    fn test_nregions() {
        assert_eq!(Cell::uniform(0).nregions(), 1);
        let pin = Cell::pin(vec![0.4, 0.475], vec![0, 1, 2]).unwrap();
        assert_eq!(pin.nregions(), 3);
    }

    #[test]
    fn test_ring_index_interior_and_outer() {
        let radii = [0.4, 0.475];
        let u = Direction::from_angle(0.0);
        assert_eq!(ring_index(Vector::new(0.1, 0.0), u, &radii), 0);
        assert_eq!(ring_index(Vector::new(0.45, 0.0), u, &radii), 1);
        assert_eq!(ring_index(Vector::new(0.6, 0.0), u, &radii), 2);
    }

    #[test]
    fn test_ring_index_tie_breaks_by_direction() {
        let radii = [0.4];
        let on_circle = Vector::new(0.4, 0.0);
        // Moving outward → outer ring; moving inward → inner ring.
        let outward = Direction::from_angle(0.0);
        let inward = outward.reversed();
        assert_eq!(ring_index(on_circle, outward, &radii), 1);
        assert_eq!(ring_index(on_circle, inward, &radii), 0);
    }

    #[test]
    fn test_distance_to_rings_through_centre() {
        let radii = [0.5];
        let u = Direction::from_angle(0.0);
        // From the centre: first crossing at r = 0.5.
        let d = distance_to_rings(Vector::new(0.0, 0.0), u, &radii);
        assert!((d - 0.5).abs() < 1e-12, "d = {d}");
        // From outside moving inward: crossing at 1.0 - 0.5.
        let d = distance_to_rings(Vector::new(-1.0, 0.0), u, &radii);
        assert!((d - 0.5).abs() < 1e-12, "d = {d}");
    }

    #[test]
    fn test_distance_to_rings_miss() {
        let radii = [0.5];
        let u = Direction::from_angle(0.0);
        let d = distance_to_rings(Vector::new(0.0, 0.8), u, &radii);
        assert!(d.is_infinite(), "ray above the ring must miss, got {d}");
    }
}
