// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Core — Transport Sweep Benchmark
// © 1998–2026 Miroslav Šotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use criterion::{criterion_group, criterion_main, Criterion};
use lattice_geometry::{CartesianLattice, Cell};
use lattice_moc::{MocSolver, PolarQuadrature};
use lattice_types::xs::CrossSection;
use ndarray::{arr1, Array2};
use std::hint::black_box;

fn fuel() -> CrossSection {
    CrossSection::with_fission(
        arr1(&[0.3, 0.8]),
        arr1(&[0.05, 0.2]),
        Array2::from_shape_vec((2, 2), vec![0.2, 0.05, 0.0, 0.6]).unwrap(),
        arr1(&[0.016, 0.12]),
        arr1(&[2.5, 2.5]),
        arr1(&[1.0, 0.0]),
        "fuel",
    )
    .unwrap()
}

fn moderator() -> CrossSection {
    CrossSection::new(
        arr1(&[0.25, 1.2]),
        arr1(&[0.0005, 0.02]),
        Array2::from_shape_vec((2, 2), vec![0.2, 0.05, 0.0, 1.18]).unwrap(),
        "moderator",
    )
    .unwrap()
}

fn pin_cell_solver() -> MocSolver {
    let pin = Cell::pin(vec![0.4095, 0.475], vec![0, 1, 1]).unwrap();
    let geometry = CartesianLattice::new(&[1.26], &[1.26], vec![pin]).unwrap();
    let polar = PolarQuadrature::yamamoto_tabuchi(6).unwrap();
    MocSolver::new(geometry, vec![fuel(), moderator()], polar).unwrap()
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("pin_cell");
    group.sample_size(10);

    group.bench_function("draw_tracks_32x0.02", |b| {
        b.iter_batched(
            pin_cell_solver,
            |mut solver| {
                solver.draw_tracks(32, 0.02).expect("draw should succeed");
                black_box(solver.nfsr());
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("five_sweeps", |b| {
        b.iter_batched(
            || {
                let mut solver = pin_cell_solver();
                solver.draw_tracks(32, 0.02).expect("draw should succeed");
                solver.max_iterations = 5;
                solver
            },
            |mut solver| {
                let result = solver.solve_keff().expect("solve should run");
                black_box(result.iterations);
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_sweep);
criterion_main!(benches);
