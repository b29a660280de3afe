// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Flat Source Regions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::collections::HashMap;

/// A flat source region: a maximal homogeneous sub-area with a spatially
/// flat isotropic source.
///
/// FSR indices are assigned in discovery order while the tracks are
/// segmented and are stable afterwards. The volume is the track-length
/// estimate, which the flux update uses as its normalization volume — the
/// analytic area is deliberately never used, so ray-density errors cancel.
#[derive(Debug, Clone)]
pub struct FlatSourceRegion {
    /// Geometric leaf-region id from the lattice prefix sums.
    pub region: usize,
    /// Material table index.
    pub material: usize,
    /// Track-length volume estimate [cm²].
    pub volume: f64,
}

/// Discovery-ordered FSR index.
#[derive(Debug, Default)]
pub(crate) struct FsrRegistry {
    fsrs: Vec<FlatSourceRegion>,
    by_region: HashMap<usize, usize>,
}

impl FsrRegistry {
    pub fn new() -> Self {
        FsrRegistry::default()
    }

    /// FSR index for a geometric region, registering it on first touch.
    pub fn index_of(&mut self, region: usize, material: usize) -> usize {
        if let Some(&idx) = self.by_region.get(&region) {
            return idx;
        }
        let idx = self.fsrs.len();
        self.fsrs.push(FlatSourceRegion {
            region,
            material,
            volume: 0.0,
        });
        self.by_region.insert(region, idx);
        idx
    }

    pub fn add_volume(&mut self, idx: usize, dv: f64) {
        self.fsrs[idx].volume += dv;
    }

    pub fn lookup(&self, region: usize) -> Option<usize> {
        self.by_region.get(&region).copied()
    }

    pub fn len(&self) -> usize {
        self.fsrs.len()
    }

    pub fn fsrs(&self) -> &[FlatSourceRegion] {
        &self.fsrs
    }
}
