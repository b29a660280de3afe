// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Boundary Linker
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Track-end stitching under the per-edge boundary conditions.
//!
//! Complement families (φ and π−φ) share nx/ny and therefore share the
//! half-offset edge grids, so every link is an integer table lookup:
//! a reflective partner departs the same grid point of the same edge in
//! the complement family; a periodic partner departs the same grid point
//! of the opposite edge in the same family. Vacuum ends stay unlinked —
//! their incoming flux is the fixed zero the sweep never overwrites.

use crate::azimuthal::{complement, AngleInfo};
use crate::track::{Edge, Endpoint, Track};
use lattice_types::boundary::BoundaryCondition;
use lattice_types::error::{LatticeError, LatticeResult};

/// Which end of a track an endpoint table entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum End {
    Entry,
    Exit,
}

/// Per-family endpoint lookup: edge → grid index → (track, end).
#[derive(Debug)]
pub(crate) struct FamilyEndpoints {
    edges: [Vec<Option<(usize, End)>>; 4],
}

impl FamilyEndpoints {
    fn new(nx: usize, ny: usize) -> Self {
        FamilyEndpoints {
            edges: [
                vec![None; ny], // x-min
                vec![None; ny], // x-max
                vec![None; nx], // y-min
                vec![None; nx], // y-max
            ],
        }
    }

    fn set(&mut self, pt: Endpoint, entry: (usize, End)) -> LatticeResult<()> {
        let slot = &mut self.edges[pt.edge.index()][pt.grid];
        if slot.is_some() {
            return Err(LatticeError::GeometryError(format!(
                "two track ends claim grid {} of edge {:?}; quadrature closure is broken",
                pt.grid, pt.edge
            )));
        }
        *slot = Some(entry);
        Ok(())
    }

    fn get(&self, edge: Edge, grid: usize) -> Option<(usize, End)> {
        self.edges[edge.index()].get(grid).copied().flatten()
    }
}

/// Traversal id: forward (entry → exit) = 2·track, backward = 2·track+1.
#[inline]
pub(crate) fn traversal(track: usize, forward: bool) -> usize {
    2 * track + usize::from(!forward)
}

/// Build the per-family endpoint tables, verifying that every grid point
/// of every edge is claimed by exactly one track end.
pub(crate) fn build_endpoint_tables(
    tracks: &[Track],
    angles: &[AngleInfo],
) -> LatticeResult<Vec<FamilyEndpoints>> {
    let mut tables: Vec<FamilyEndpoints> = angles
        .iter()
        .map(|a| FamilyEndpoints::new(a.nx, a.ny))
        .collect();
    for (t, track) in tracks.iter().enumerate() {
        tables[track.family].set(track.entry_pt, (t, End::Entry))?;
        tables[track.family].set(track.exit_pt, (t, End::Exit))?;
    }
    for (family, table) in tables.iter().enumerate() {
        for edge_slots in &table.edges {
            if edge_slots.iter().any(|s| s.is_none()) {
                return Err(LatticeError::GeometryError(format!(
                    "family {family} leaves boundary grid points unclaimed; \
                     quadrature closure is broken"
                )));
            }
        }
    }
    Ok(tables)
}

/// For every traversal, the traversal whose incoming flux receives its
/// outgoing end flux (`None` = vacuum, the flux is discarded).
///
/// The partner's travel sense falls out of the table: an endpoint that is
/// the partner track's entry is departed forward, an exit backward.
pub(crate) fn build_links(
    tracks: &[Track],
    tables: &[FamilyEndpoints],
    n_half: usize,
    bcs: &[BoundaryCondition; 4],
) -> LatticeResult<Vec<Option<usize>>> {
    let mut links = vec![None; 2 * tracks.len()];
    for (t, track) in tracks.iter().enumerate() {
        for forward in [true, false] {
            let out = if forward {
                track.exit_pt
            } else {
                track.entry_pt
            };
            let link = match bcs[out.edge.index()] {
                BoundaryCondition::Vacuum => None,
                BoundaryCondition::Reflective => {
                    let partner_family = complement(track.family, n_half);
                    let (t2, end2) = tables[partner_family]
                        .get(out.edge, out.grid)
                        .ok_or_else(|| missing_partner(out))?;
                    Some(traversal(t2, end2 == End::Entry))
                }
                BoundaryCondition::Periodic => {
                    let (t2, end2) = tables[track.family]
                        .get(out.edge.opposite(), out.grid)
                        .ok_or_else(|| missing_partner(out))?;
                    Some(traversal(t2, end2 == End::Entry))
                }
            };
            links[traversal(t, forward)] = link;
        }
    }
    Ok(links)
}

fn missing_partner(pt: Endpoint) -> LatticeError {
    LatticeError::GeometryError(format!(
        "no partner track end at grid {} of edge {:?}",
        pt.grid, pt.edge
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azimuthal::generate_azimuthal_quadrature;
    use crate::track::{endpoint_coordinate, generate_tracks};
    use lattice_geometry::Direction;

    fn setup(
        n_angles: usize,
        spacing: f64,
        w: f64,
        h: f64,
    ) -> (Vec<AngleInfo>, Vec<Track>, Vec<FamilyEndpoints>) {
        let angles = generate_azimuthal_quadrature(n_angles, spacing, w, h).unwrap();
        let tracks = generate_tracks(&angles, w, h);
        let tables = build_endpoint_tables(&tracks, &angles).unwrap();
        (angles, tracks, tables)
    }

    /// Outgoing direction of a traversal at its outgoing end.
    fn outgoing_direction(track: &Track, forward: bool) -> Direction {
        if forward {
            track.direction
        } else {
            track.direction.reversed()
        }
    }

    /// Direction with which a traversal departs its starting end.
    fn departing_direction(track: &Track, forward: bool) -> Direction {
        outgoing_direction(track, forward)
    }

    fn mirror(u: Direction, edge: Edge) -> Direction {
        match edge {
            Edge::XMin | Edge::XMax => Direction::new(-u.x(), u.y()).unwrap(),
            Edge::YMin | Edge::YMax => Direction::new(u.x(), -u.y()).unwrap(),
        }
    }

    #[test]
    fn test_every_traversal_end_is_resolved() {
        let (angles, tracks, tables) = setup(8, 0.3, 1.26, 1.26);
        for bcs in [
            [BoundaryCondition::Reflective; 4],
            [
                BoundaryCondition::Vacuum,
                BoundaryCondition::Vacuum,
                BoundaryCondition::Reflective,
                BoundaryCondition::Reflective,
            ],
            [BoundaryCondition::Periodic; 4],
        ] {
            let links = build_links(&tracks, &tables, angles.len(), &bcs).unwrap();
            assert_eq!(links.len(), 2 * tracks.len());

            // Each linked incoming slot must have exactly one source, and
            // slots starting on a vacuum edge exactly zero.
            let mut sources = vec![0usize; links.len()];
            for link in links.iter().flatten() {
                sources[*link] += 1;
            }
            for (t, track) in tracks.iter().enumerate() {
                for forward in [true, false] {
                    let start = if forward {
                        track.entry_pt
                    } else {
                        track.exit_pt
                    };
                    let expected = match bcs[start.edge.index()] {
                        BoundaryCondition::Vacuum => 0,
                        _ => 1,
                    };
                    assert_eq!(
                        sources[traversal(t, forward)],
                        expected,
                        "traversal ({t}, forward={forward}) starting on {:?}",
                        start.edge
                    );
                }
            }
        }
    }

    #[test]
    fn test_reflective_partner_coincides_and_mirrors() {
        let (angles, tracks, tables) = setup(8, 0.25, 2.0, 1.0);
        let bcs = [BoundaryCondition::Reflective; 4];
        let links = build_links(&tracks, &tables, angles.len(), &bcs).unwrap();

        for (t, track) in tracks.iter().enumerate() {
            for forward in [true, false] {
                let out_pt = if forward {
                    track.exit_pt
                } else {
                    track.entry_pt
                };
                let target = links[traversal(t, forward)].unwrap();
                let (t2, fwd2) = (target / 2, target % 2 == 0);
                let partner = &tracks[t2];
                let start_pt = if fwd2 {
                    partner.entry_pt
                } else {
                    partner.exit_pt
                };

                // Same physical point.
                let a = endpoint_coordinate(out_pt, &angles[track.family], 2.0, 1.0);
                let b = endpoint_coordinate(start_pt, &angles[partner.family], 2.0, 1.0);
                assert!(a.distance(b) < 1e-12, "partner endpoints diverge");

                // Mirrored direction.
                let expected = mirror(outgoing_direction(track, forward), out_pt.edge);
                let got = departing_direction(partner, fwd2);
                assert!(
                    (expected.x() - got.x()).abs() < 1e-12
                        && (expected.y() - got.y()).abs() < 1e-12,
                    "reflection direction mismatch at {:?}",
                    out_pt.edge
                );
            }
        }
    }

    #[test]
    fn test_periodic_partner_same_direction_opposite_edge() {
        let (angles, tracks, tables) = setup(8, 0.25, 1.5, 1.5);
        let bcs = [BoundaryCondition::Periodic; 4];
        let links = build_links(&tracks, &tables, angles.len(), &bcs).unwrap();

        for (t, track) in tracks.iter().enumerate() {
            for forward in [true, false] {
                let out_pt = if forward {
                    track.exit_pt
                } else {
                    track.entry_pt
                };
                let target = links[traversal(t, forward)].unwrap();
                let (t2, fwd2) = (target / 2, target % 2 == 0);
                let partner = &tracks[t2];
                let start_pt = if fwd2 {
                    partner.entry_pt
                } else {
                    partner.exit_pt
                };

                assert_eq!(start_pt.edge, out_pt.edge.opposite());
                assert_eq!(start_pt.grid, out_pt.grid);

                let u_out = outgoing_direction(track, forward);
                let u_in = departing_direction(partner, fwd2);
                assert!(
                    (u_out.x() - u_in.x()).abs() < 1e-12
                        && (u_out.y() - u_in.y()).abs() < 1e-12,
                    "periodic link must preserve direction"
                );
            }
        }
    }
}
