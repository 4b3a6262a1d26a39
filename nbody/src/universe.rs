use std::fmt::{self, Display};
use std::sync::Arc;

use cgmath::{InnerSpace, Point3, Vector3, Zero};

use crate::body::{Body, BodyDescriptor, BodyId, BodyKind};
use crate::constants::GRAVITATIONAL_CONSTANT;
use crate::pool::WorkerPool;
use crate::solver::{
    BarnesHutParallelSolver, BarnesHutSolver, DirectParallelSolver, DirectSolver, GravitySolver,
};

/// Opaque handle to a point light owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightToken(pub u64);

/// The renderer's registry of point light sources.
///
/// Stars acquire a light when they join the universe and
/// [`Universe::update_lights`] keeps the positions current; everything else
/// about lighting belongs to the renderer.
pub trait LightRegistry {
    fn add_light_point_source(&mut self, position: Point3<f64>) -> LightToken;
    fn move_light_point_source(&mut self, token: LightToken, position: Point3<f64>);
}

/// Which force-computation strategy the universe runs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverConfig {
    Direct,
    DirectParallel,
    BarnesHut { theta: f64, size_scale: f64 },
    BarnesHutParallel { theta: f64, size_scale: f64 },
}

struct StarEntry {
    body: BodyId,
    light: Option<LightToken>,
}

/// The body collection plus the currently selected gravity solver.
///
/// Storage is reserved up-front to `capacity` and bodies are never removed,
/// so body indices (and references handed to the renderer) stay valid for
/// the whole simulation; the octree and the star list rely on that.
pub struct Universe {
    capacity: usize,
    bodies: Vec<Body>,
    stars: Vec<StarEntry>,
    solver: Box<dyn GravitySolver>,
    pool: Arc<WorkerPool>,
    lights: Option<Box<dyn LightRegistry>>,
    time: f64,
    ticks: u64,
}

impl Universe {
    /// Universe with storage for `capacity` bodies and a worker pool sized
    /// to the host's logical CPU count.
    pub fn new(capacity: usize) -> Self {
        Self::with_pool(capacity, Arc::new(WorkerPool::with_available_parallelism()))
    }

    /// Like [`Universe::new`], but with an explicit thread-count hint from
    /// the host.
    pub fn with_thread_count(capacity: usize, threads: usize) -> Self {
        Self::with_pool(capacity, Arc::new(WorkerPool::new(threads)))
    }

    fn with_pool(capacity: usize, pool: Arc<WorkerPool>) -> Self {
        Self {
            capacity,
            bodies: Vec::with_capacity(capacity),
            stars: Vec::new(),
            solver: Box::new(DirectSolver),
            pool,
            lights: None,
            time: 0.0,
            ticks: 0,
        }
    }

    /// Add a body. Panics when the universe is full or the descriptor is
    /// unphysical; both are programmer errors.
    pub fn add_body(&mut self, desc: BodyDescriptor) -> BodyId {
        assert!(
            self.bodies.len() < self.capacity,
            "universe capacity of {} bodies reached",
            self.capacity
        );
        assert!(desc.mass > 0.0, "bodies must have positive mass");
        assert!(desc.radius > 0.0, "bodies must have positive radius");

        let id = BodyId(self.bodies.len() as u32);
        let position = desc.position;
        let is_star = desc.kind == BodyKind::Star;
        self.bodies.push(Body::new(desc));

        if is_star {
            let light = self
                .lights
                .as_mut()
                .map(|lights| lights.add_light_point_source(position));
            self.stars.push(StarEntry { body: id, light });
        }

        self.solver.on_body_added(&mut self.bodies, id.index());
        id
    }

    /// Swap the force-computation strategy. The Barnes–Hut variants size
    /// their universe cube from the current body configuration.
    pub fn set_solver(&mut self, config: SolverConfig) {
        // Tree slots belong to the outgoing solver.
        for body in &mut self.bodies {
            body.tree_slot = None;
        }

        self.solver = match config {
            SolverConfig::Direct => Box::new(DirectSolver),
            SolverConfig::DirectParallel => {
                Box::new(DirectParallelSolver::new(self.pool.clone()))
            }
            SolverConfig::BarnesHut { theta, size_scale } => {
                Box::new(BarnesHutSolver::new(&mut self.bodies, theta, size_scale))
            }
            SolverConfig::BarnesHutParallel { theta, size_scale } => Box::new(
                BarnesHutParallelSolver::new(&mut self.bodies, theta, size_scale, self.pool.clone()),
            ),
        };
    }

    /// Advance the simulation by `dt` seconds, split into `substeps` equal
    /// substeps. Every substep recomputes forces: zero the accumulators, run
    /// the solver, integrate each body.
    pub fn step(&mut self, dt: f64, substeps: usize) {
        assert!(substeps >= 1, "step needs at least one substep");
        let h = dt / substeps as f64;

        for _ in 0..substeps {
            for body in &mut self.bodies {
                body.force = Vector3::zero();
            }
            self.solver.compute_forces(&mut self.bodies);
            for body in &mut self.bodies {
                body.integrate(h);
            }
        }

        self.time += dt;
        self.ticks += substeps as u64;
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn body(&self, id: BodyId) -> &Body {
        &self.bodies[id.index()]
    }

    pub fn body_mut(&mut self, id: BodyId) -> &mut Body {
        &mut self.bodies[id.index()]
    }

    /// Read-only view of all bodies, in insertion order; this is the
    /// renderer's per-frame iteration.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    /// Read-only view of the light-emitting bodies.
    pub fn stars(&self) -> impl Iterator<Item = &Body> {
        self.stars.iter().map(|entry| &self.bodies[entry.body.index()])
    }

    pub fn total_momentum(&self) -> Vector3<f64> {
        self.bodies
            .iter()
            .map(Body::momentum)
            .fold(Vector3::zero(), |acc, p| acc + p)
    }

    pub fn total_kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Gravitational potential energy over all unordered pairs. O(N²); a
    /// diagnostic for drift checks, not part of the stepping loop.
    pub fn potential_energy(&self) -> f64 {
        let mut energy = 0.0;
        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                let separation = (b.position - a.position).magnitude();
                energy -= GRAVITATIONAL_CONSTANT * a.mass * b.mass / separation;
            }
        }
        energy
    }

    /// Hand the universe its renderer-side light registry. Stars that are
    /// already present register their lights immediately.
    pub fn attach_lights(&mut self, mut lights: Box<dyn LightRegistry>) {
        for entry in &mut self.stars {
            let position = self.bodies[entry.body.index()].position;
            entry.light = Some(lights.add_light_point_source(position));
        }
        self.lights = Some(lights);
    }

    /// Push current star positions to the light registry; the renderer calls
    /// this once per frame.
    pub fn update_lights(&mut self) {
        let Some(lights) = self.lights.as_mut() else {
            return;
        };
        for entry in &self.stars {
            if let Some(token) = entry.light {
                lights.move_light_point_source(token, self.bodies[entry.body.index()].position);
            }
        }
    }

    pub fn elapsed(&self) -> ElapsedTime {
        ElapsedTime::from_seconds(self.time, self.ticks)
    }
}

const SEC_PER_HOUR: f64 = 60.0 * 60.0;
const SEC_PER_DAY: f64 = SEC_PER_HOUR * 24.0;
const SEC_PER_YEAR: f64 = 365.25 * SEC_PER_DAY;

/// Simulated time broken down for display.
#[derive(Debug, Default)]
pub struct ElapsedTime {
    pub years: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: f64,
    pub ticks: u64,
}

impl ElapsedTime {
    fn from_seconds(mut time_s: f64, ticks: u64) -> Self {
        let years = (time_s / SEC_PER_YEAR).floor();
        time_s -= years * SEC_PER_YEAR;
        let days = (time_s / SEC_PER_DAY).floor();
        time_s -= days * SEC_PER_DAY;
        let hours = (time_s / SEC_PER_HOUR).floor();
        time_s -= hours * SEC_PER_HOUR;
        let minutes = (time_s / 60.0).floor();
        let seconds = time_s - minutes * 60.0;

        ElapsedTime {
            years: years as u64,
            days: days as u64,
            hours: hours as u64,
            minutes: minutes as u64,
            seconds,
            ticks,
        }
    }
}

impl Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Y {}D {:0>2}:{:0>2}:{:0>2} ({} ticks)",
            self.years, self.days, self.hours, self.minutes, self.seconds, self.ticks
        )
    }
}
