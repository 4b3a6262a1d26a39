use std::f64::consts::TAU;

use cgmath::{InnerSpace, Point3, Vector3, Zero};

use crate::solver::barnes_hut::tree::NodeId;

/// Identifier of a body within its universe, stable for the whole simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

impl BodyId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a body is, as far as rendering and light bookkeeping are concerned.
/// Gravity treats all kinds alike; stars additionally emit light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Star,
    Planet,
    Satellite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Sphere,
    Cube,
}

/// Opaque handle to a texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureToken(pub u64);

/// Draw-style data carried through to the renderer untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    Color(Vector3<f32>),
    Texture(TextureToken),
}

/// Everything needed to put a new body into a universe.
#[derive(Debug, Clone, Copy)]
pub struct BodyDescriptor {
    pub kind: BodyKind,
    pub mass: f64,
    pub radius: f64,
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
    pub shape: ShapeKind,
}

/// A point mass affected by gravity, plus the state the renderer needs.
///
/// Bodies are plain values stored contiguously in the universe's vector
/// rather than trait objects per kind: the solvers iterate them millions of
/// times per second and contiguity matters more than polymorphism. The
/// octree refers back into that vector by index, which is why a universe
/// never removes or reorders bodies.
#[derive(Debug, Clone)]
pub struct Body {
    pub kind: BodyKind,
    /// Abstract mass units, strictly positive.
    pub mass: f64,
    /// Abstract distance units; only the renderer cares.
    pub radius: f64,
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
    /// Net force of the current substep. Zeroed by the integrator before the
    /// solver runs; meaningless at any other time.
    pub force: Vector3<f64>,
    pub angular_velocity: f64,
    pub rotation_angle: f64,
    pub shape: ShapeKind,
    pub surface: Surface,
    /// External octree node currently holding this body; `None` once the
    /// body has left the universe volume. Owned by the Barnes–Hut solver.
    pub(crate) tree_slot: Option<NodeId>,
}

impl Body {
    /// Bodies normally enter a simulation through `Universe::add_body`,
    /// which also enforces capacity and star bookkeeping.
    pub fn new(desc: BodyDescriptor) -> Self {
        Self {
            kind: desc.kind,
            mass: desc.mass,
            radius: desc.radius,
            position: desc.position,
            velocity: desc.velocity,
            force: Vector3::zero(),
            angular_velocity: 0.0,
            rotation_angle: 0.0,
            shape: desc.shape,
            surface: Surface::Color(Vector3::new(1.0, 1.0, 1.0)),
            tree_slot: None,
        }
    }

    /// Spin the body around its (renderer-side) axis.
    pub fn set_rotation(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    pub fn set_color(&mut self, color: Vector3<f32>) {
        self.surface = Surface::Color(color);
    }

    pub fn set_texture(&mut self, texture: TextureToken) {
        self.surface = Surface::Texture(texture);
    }

    pub fn momentum(&self) -> Vector3<f64> {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude2()
    }

    /// Advance position, velocity and rotation by one substep of length `h`,
    /// using the force accumulated for this substep.
    ///
    /// The same force drives both the position and the velocity update, so
    /// the position gains the half-step term `a*h * h/2`.
    pub(crate) fn integrate(&mut self, h: f64) {
        let acc_dt = self.force / self.mass * h;
        self.position += self.velocity * h + acc_dt * (h / 2.0);
        self.velocity += acc_dt;
        self.rotation_angle = (self.rotation_angle + self.angular_velocity * h) % TAU;
    }

    /// Answer the renderer's z-range culling query. `distance_to_camera` is
    /// measured by the renderer; the body only contributes its draw size.
    pub fn is_inside_z_range(
        &self,
        distance_to_camera: f64,
        z_middle: f64,
        z_half_size: f64,
    ) -> bool {
        let separation = (distance_to_camera - z_middle).abs();
        match self.shape {
            ShapeKind::Sphere => separation <= self.radius + z_half_size,
            // A cube's corners stick out past its nominal radius.
            ShapeKind::Cube => separation <= self.radius * 1.5 + z_half_size,
        }
    }
}
