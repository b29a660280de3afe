// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Property-Based Tests (proptest) for lattice-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for the shared data model.

use lattice_types::config::LatticeConfig;
use lattice_types::xs::CrossSection;
use ndarray::{Array1, Array2};
use proptest::prelude::*;

proptest! {
    /// Any positive-total, non-negative cross-section set is accepted and
    /// reports the right group count.
    #[test]
    fn xs_accepts_valid_data(ng in 1usize..8, seed in 0.1f64..5.0) {
        let total = Array1::from_shape_fn(ng, |g| seed + g as f64 * 0.1);
        let absorption = Array1::from_shape_fn(ng, |g| 0.1 * seed + g as f64 * 0.01);
        let scatter = Array2::from_shape_fn((ng, ng), |(a, b)| {
            if b >= a { 0.05 * seed / (1.0 + (b - a) as f64) } else { 0.0 }
        });
        let xs = CrossSection::new(total, absorption, scatter, "m")
            .expect("valid data must be accepted");
        prop_assert_eq!(xs.ngroups(), ng);
        prop_assert!(!xs.fissile());
    }

    /// A negative entry anywhere in the scattering matrix is rejected.
    #[test]
    fn xs_rejects_negative_scatter(ng in 1usize..6, row in 0usize..6, col in 0usize..6) {
        let row = row % ng;
        let col = col % ng;
        let total = Array1::from_elem(ng, 1.0);
        let absorption = Array1::from_elem(ng, 0.1);
        let mut scatter = Array2::from_elem((ng, ng), 0.05);
        scatter[[row, col]] = -0.01;
        prop_assert!(CrossSection::new(total, absorption, scatter, "m").is_err());
    }

    /// A non-positive total in any group is rejected.
    #[test]
    fn xs_rejects_nonpositive_total(ng in 1usize..6, bad in 0usize..6) {
        let bad = bad % ng;
        let mut total = Array1::from_elem(ng, 1.0);
        total[bad] = 0.0;
        let absorption = Array1::from_elem(ng, 0.1);
        let scatter = Array2::zeros((ng, ng));
        prop_assert!(CrossSection::new(total, absorption, scatter, "m").is_err());
    }

    /// Configurations survive a JSON round trip unchanged.
    #[test]
    fn config_roundtrips(n_az in 1usize..64, spacing in 0.001f64..1.0, max_it in 1usize..5000) {
        let json = format!(
            r#"{{
                "assembly_name": "prop",
                "tracks": {{ "n_azimuthal": {}, "spacing": {} }},
                "solver": {{ "max_iterations": {} }}
            }}"#,
            n_az * 4, spacing, max_it
        );
        let cfg: LatticeConfig = serde_json::from_str(&json).expect("parse");
        let back = serde_json::to_string(&cfg).expect("serialize");
        let cfg2: LatticeConfig = serde_json::from_str(&back).expect("reparse");
        prop_assert_eq!(cfg.tracks.n_azimuthal, cfg2.tracks.n_azimuthal);
        prop_assert!((cfg.tracks.spacing - cfg2.tracks.spacing).abs() < 1e-12);
        prop_assert_eq!(cfg.solver.max_iterations, cfg2.solver.max_iterations);
        prop_assert_eq!(cfg2.solver.max_iterations, max_it);
    }
}
