use std::sync::Arc;

use approx::assert_relative_eq;
use cgmath::{InnerSpace, Point3, Vector3, Zero};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{DirectParallelSolver, DirectSolver, GravitySolver};
use crate::body::{Body, BodyDescriptor, BodyKind, ShapeKind};
use crate::pool::WorkerPool;

fn random_bodies(count: usize, seed: u64) -> Vec<Body> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Body::new(BodyDescriptor {
                kind: BodyKind::Satellite,
                mass: rng.random_range(1e9..1e12),
                radius: 1.0,
                position: Point3::new(
                    rng.random_range(-1e6..1e6),
                    rng.random_range(-1e6..1e6),
                    rng.random_range(-1e6..1e6),
                ),
                velocity: Vector3::zero(),
                shape: ShapeKind::Sphere,
            })
        })
        .collect()
}

fn force_magnitude_sum(bodies: &[Body]) -> f64 {
    bodies.iter().map(|b| b.force.magnitude()).sum()
}

#[test]
fn pairwise_forces_cancel() {
    let mut bodies = random_bodies(50, 3);
    DirectSolver.compute_forces(&mut bodies);

    let net = bodies
        .iter()
        .fold(Vector3::zero(), |acc: Vector3<f64>, b| acc + b.force);
    let scale = force_magnitude_sum(&bodies);
    assert!(
        net.magnitude() <= 1e-12 * scale,
        "net force {net:?} out of proportion to {scale}"
    );
}

#[test]
fn parallel_solver_matches_serial() {
    let mut serial = random_bodies(200, 11);
    let mut parallel = serial.clone();

    DirectSolver.compute_forces(&mut serial);

    let pool = Arc::new(WorkerPool::new(4));
    DirectParallelSolver::new(pool).compute_forces(&mut parallel);

    assert_relative_eq!(
        force_magnitude_sum(&serial),
        force_magnitude_sum(&parallel),
        max_relative = 1e-9
    );
    for (a, b) in serial.iter().zip(parallel.iter()) {
        let scale = a.force.magnitude().max(1e-30);
        assert!((a.force - b.force).magnitude() <= 1e-9 * scale);
    }
}

#[test]
fn parallel_solver_is_deterministic() {
    let pool = Arc::new(WorkerPool::new(4));
    let mut solver = DirectParallelSolver::new(pool);

    let mut first = random_bodies(123, 17);
    solver.compute_forces(&mut first);

    let mut second = random_bodies(123, 17);
    solver.compute_forces(&mut second);

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.force, b.force);
    }
}

#[test]
fn parallel_solver_handles_fewer_bodies_than_blocks() {
    let pool = Arc::new(WorkerPool::new(4));
    let mut solver = DirectParallelSolver::new(pool);

    let mut bodies = random_bodies(3, 23);
    let mut reference = bodies.clone();
    solver.compute_forces(&mut bodies);
    DirectSolver.compute_forces(&mut reference);

    for (a, b) in bodies.iter().zip(reference.iter()) {
        let scale = b.force.magnitude().max(1e-30);
        assert!((a.force - b.force).magnitude() <= 1e-9 * scale);
    }
}
