use std::sync::Arc;

use cgmath::{InnerSpace, Vector3, Zero};

use crate::body::Body;
use crate::constants::gravitational_force;
use crate::math::with_length;
use crate::pool::{block_ranges, WorkerPool};
use crate::solver::GravitySolver;

/// Exact all-pairs gravity on one core. Each unordered pair is evaluated
/// once and applied to both bodies with opposite signs.
pub struct DirectSolver;

impl GravitySolver for DirectSolver {
    fn compute_forces(&mut self, bodies: &mut [Body]) {
        let n = bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let rel = bodies[j].position - bodies[i].position;
                let dist_squared = rel.magnitude2();
                let force = gravitational_force(bodies[i].mass, bodies[j].mass, dist_squared);
                let grav = with_length(rel, force);

                bodies[i].force += grav;
                bodies[j].force -= grav;
            }
        }
    }
}

/// All-pairs gravity with the outer index range spread over the worker pool.
///
/// The range is cut into twice as many blocks as there are workers, since
/// later blocks see shorter inner loops and the finer split balances the
/// triangular workload. Every block accumulates into its own scratch row, so
/// the parallel region has no write conflicts, and summing the rows in block
/// order afterwards makes the result reproducible for a fixed partition.
pub struct DirectParallelSolver {
    pool: Arc<WorkerPool>,
    scratch: Vec<Vector3<f64>>,
}

impl DirectParallelSolver {
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self {
            pool,
            scratch: Vec::new(),
        }
    }
}

impl GravitySolver for DirectParallelSolver {
    fn compute_forces(&mut self, bodies: &mut [Body]) {
        let n = bodies.len();
        if n == 0 {
            return;
        }

        let n_blocks = self.pool.thread_count() * 2;
        if self.scratch.len() != n * n_blocks {
            self.scratch.resize(n * n_blocks, Vector3::zero());
        }
        for slot in self.scratch.iter_mut() {
            *slot = Vector3::zero();
        }

        let shared: &[Body] = bodies;
        let tasks: Vec<_> = block_ranges(0, n, n_blocks)
            .zip(self.scratch.chunks_mut(n))
            .collect();

        self.pool.parallel_blocks(tasks, |((first, last), row)| {
            for i in first..last {
                for j in (i + 1)..n {
                    let rel = shared[j].position - shared[i].position;
                    let dist_squared = rel.magnitude2();
                    let force =
                        gravitational_force(shared[i].mass, shared[j].mass, dist_squared);
                    let grav = with_length(rel, force);

                    row[i] += grav;
                    row[j] -= grav;
                }
            }
        });

        for row in self.scratch.chunks(n) {
            for (body, accumulated) in bodies.iter_mut().zip(row) {
                body.force += *accumulated;
            }
        }
    }
}
