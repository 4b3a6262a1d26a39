use cgmath::Point3;
use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use nbody::{presets, SolverConfig, Universe};

fn cloud_universe(count: usize, config: SolverConfig) -> Universe {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut universe = Universe::new(count + 1);
    universe.add_body(presets::earth());
    for desc in presets::satellite_cloud(&mut rng, count, Point3::new(0.0, 0.0, 0.0), 1e7) {
        universe.add_body(desc);
    }
    universe.set_solver(config);
    universe
}

fn bench_direct(c: &mut Criterion) {
    let mut universe = cloud_universe(1000, SolverConfig::Direct);
    c.bench_function("direct_1k", |b| b.iter(|| universe.step(1.0, 1)));
}

fn bench_direct_parallel(c: &mut Criterion) {
    let mut universe = cloud_universe(1000, SolverConfig::DirectParallel);
    c.bench_function("direct_parallel_1k", |b| b.iter(|| universe.step(1.0, 1)));
}

fn bench_barnes_hut(c: &mut Criterion) {
    let mut universe = cloud_universe(
        1000,
        SolverConfig::BarnesHut {
            theta: 0.5,
            size_scale: 3.0,
        },
    );
    c.bench_function("barnes_hut_1k", |b| b.iter(|| universe.step(1.0, 1)));
}

fn bench_barnes_hut_parallel(c: &mut Criterion) {
    let mut universe = cloud_universe(
        1000,
        SolverConfig::BarnesHutParallel {
            theta: 0.5,
            size_scale: 3.0,
        },
    );
    c.bench_function("barnes_hut_parallel_1k", |b| {
        b.iter(|| universe.step(1.0, 1))
    });
}

criterion_group!(
    benches,
    bench_direct,
    bench_direct_parallel,
    bench_barnes_hut,
    bench_barnes_hut_parallel
);
criterion_main!(benches);
