use std::sync::Arc;

use crate::body::Body;
use crate::pool::{split_blocks_mut, WorkerPool};
use crate::solver::GravitySolver;

pub mod tree;


pub use tree::Octree;

/// Approximate O(N log N) gravity over an incrementally maintained octree.
///
/// Per step: re-home bodies that moved out of their leaf cubes, roll mass and
/// center of mass up the tree, then answer one force query per body. Bodies
/// outside the universe volume neither receive nor exert gravity.
pub struct BarnesHutSolver {
    tree: Octree,
}

impl BarnesHutSolver {
    /// `theta` trades accuracy for speed (0.5 is the usual default; larger
    /// is coarser). `size_scale` must be at least 2.
    pub fn new(bodies: &mut [Body], theta: f64, size_scale: f64) -> Self {
        Self {
            tree: Octree::build(bodies, theta, size_scale),
        }
    }

    pub fn tree(&self) -> &Octree {
        &self.tree
    }

    fn prepare(tree: &mut Octree, bodies: &mut [Body]) {
        tree.reconcile_moved_bodies(bodies);
        tree.update_mass_distribution(bodies);
    }
}

impl GravitySolver for BarnesHutSolver {
    fn compute_forces(&mut self, bodies: &mut [Body]) {
        Self::prepare(&mut self.tree, bodies);
        for body in bodies.iter_mut() {
            if body.tree_slot.is_some() {
                self.tree.accumulate_force(body);
            }
        }
    }

    fn on_body_added(&mut self, bodies: &mut [Body], body: usize) {
        self.tree.add_body(bodies, body);
    }
}

/// [`BarnesHutSolver`] with the force queries fanned out over the worker
/// pool. Maintenance and rollup stay single-threaded; during the parallel
/// region the tree is strictly read-only and each query writes nothing but
/// its own body's accumulator, so no locking is involved.
pub struct BarnesHutParallelSolver {
    inner: BarnesHutSolver,
    pool: Arc<WorkerPool>,
}

impl BarnesHutParallelSolver {
    pub fn new(bodies: &mut [Body], theta: f64, size_scale: f64, pool: Arc<WorkerPool>) -> Self {
        Self {
            inner: BarnesHutSolver::new(bodies, theta, size_scale),
            pool,
        }
    }

    pub fn tree(&self) -> &Octree {
        self.inner.tree()
    }
}

impl GravitySolver for BarnesHutParallelSolver {
    fn compute_forces(&mut self, bodies: &mut [Body]) {
        BarnesHutSolver::prepare(&mut self.inner.tree, bodies);

        let tree = &self.inner.tree;
        // Twice as many blocks as workers: query costs vary per body, and
        // the finer split lets the pool balance the load.
        let n_blocks = self.pool.thread_count() * 2;
        self.pool
            .parallel_blocks(split_blocks_mut(bodies, n_blocks), |block| {
                for body in block {
                    if body.tree_slot.is_some() {
                        tree.accumulate_force(body);
                    }
                }
            });
    }

    fn on_body_added(&mut self, bodies: &mut [Body], body: usize) {
        self.inner.on_body_added(bodies, body);
    }
}
