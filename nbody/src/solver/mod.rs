use crate::body::Body;

pub mod barnes_hut;
pub mod direct;

#[cfg(test)]
mod direct_test;

pub use barnes_hut::{BarnesHutParallelSolver, BarnesHutSolver};
pub use direct::{DirectParallelSolver, DirectSolver};

/// A strategy for computing gravitational forces.
///
/// One call accumulates the gravitational force on every body into its force
/// accumulator; the integrator zeroes the accumulators beforehand and turns
/// them into motion afterwards.
pub trait GravitySolver: Send {
    fn compute_forces(&mut self, bodies: &mut [Body]);

    /// Called when a body joins a running universe, so stateful solvers can
    /// pick it up without a rebuild.
    fn on_body_added(&mut self, _bodies: &mut [Body], _body: usize) {}
}
