pub mod body;
pub mod constants;
pub mod math;
pub mod pool;
pub mod presets;
pub mod solver;
pub mod universe;

#[cfg(test)]
mod body_test;

pub use body::{Body, BodyDescriptor, BodyId, BodyKind, ShapeKind, Surface, TextureToken};
pub use constants::GRAVITATIONAL_CONSTANT;
pub use pool::WorkerPool;
pub use solver::{
    BarnesHutParallelSolver, BarnesHutSolver, DirectParallelSolver, DirectSolver, GravitySolver,
};
pub use universe::{ElapsedTime, LightRegistry, LightToken, SolverConfig, Universe};
