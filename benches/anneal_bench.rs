//! Criterion benchmarks for the annealing loop.
//!
//! Uses synthetic problems (Sphere function, permutation sorting) to
//! measure engine overhead independent of any domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use u_anneal::{Cooler, Overrides, RandomSwap, Simulator};

// ===========================================================================
// Sphere function: minimize sum(x_i^2)
// ===========================================================================

fn sphere_simulator() -> Simulator<Vec<f64>> {
    Simulator::with_overrides(
        Overrides::new()
            .with_energy_calculator(|sol: &Vec<f64>| sol.iter().map(|x| x * x).sum::<f64>())
            .with_state_change(|sol: &Vec<f64>, rng: &mut dyn RngCore| {
                let mut new = sol.clone();
                let i = rng.random_range(0..new.len());
                new[i] += rng.random_range(-0.5..0.5);
                new
            })
            .with_temperature(100.0)
            .with_cooling_rate(0.1)
            .with_seed(42),
    )
}

// ===========================================================================
// Permutation sorting: count misplaced elements
// ===========================================================================

fn sort_simulator() -> Simulator<Vec<usize>> {
    Simulator::with_overrides(
        Overrides::new()
            .with_energy_calculator(|perm: &Vec<usize>| {
                perm.iter().enumerate().filter(|&(i, &v)| i != v).count() as f64
            })
            .with_state_change(RandomSwap)
            .with_temperature(50.0)
            .with_cooling_rate(0.05)
            .with_seed(42),
    )
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal_sphere");
    group.sample_size(10);

    let simulator = sphere_simulator();
    for &dim in &[10usize, 50, 100] {
        let mut rng = StdRng::seed_from_u64(7);
        let initial: Vec<f64> = (0..dim).map(|_| rng.random_range(-5.0..5.0)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(dim), &initial, |b, initial| {
            b.iter(|| {
                let state = simulator.run(black_box(initial.clone()), Overrides::new());
                black_box(state)
            })
        });
    }
    group.finish();
}

fn bench_cooling_schedules(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal_sort");
    group.sample_size(10);

    let simulator = sort_simulator();
    let schedules = [
        ("linear", Cooler::Linear),
        ("exponential", Cooler::Exponential),
        ("geometric", Cooler::default_geometric()),
    ];
    for (name, cooler) in schedules {
        let initial: Vec<usize> = (0..50).rev().collect();
        group.bench_with_input(BenchmarkId::new(name, 50), &initial, |b, initial| {
            b.iter(|| {
                let state = simulator.run(
                    black_box(initial.clone()),
                    Overrides::new().with_cool_down(cooler),
                );
                black_box(state)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sphere, bench_cooling_schedules);
criterion_main!(benches);
