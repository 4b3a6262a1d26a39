//! Ready-made body descriptors for demo scenes, benches and tests.

use cgmath::{Point3, Vector3, Zero};
use rand::Rng;

use crate::body::{BodyDescriptor, BodyKind, ShapeKind};
use crate::constants::{kg_to_mass_units, meters_to_dist_units};

pub const EARTH_MASS_KG: f64 = 5.972e24;
pub const EARTH_RADIUS_M: f64 = 6371e3;

pub const MOON_MASS_KG: f64 = 7.34767309e22;
pub const MOON_RADIUS_M: f64 = 1737.4e3;

pub const SUN_MASS_KG: f64 = 1.98847e30;
pub const SUN_RADIUS_M: f64 = 696000e3;

pub const MOON_TO_EARTH_M: f64 = 384400e3;
pub const EARTH_TO_SUN_M: f64 = 149.6e9;

/// Mean orbital speed of the moon around the earth.
pub const MOON_ORBITAL_SPEED_M_S: f64 = 1022.0;

pub fn earth() -> BodyDescriptor {
    BodyDescriptor {
        kind: BodyKind::Planet,
        mass: kg_to_mass_units(EARTH_MASS_KG),
        radius: meters_to_dist_units(EARTH_RADIUS_M),
        position: Point3::new(0.0, 0.0, 0.0),
        velocity: Vector3::zero(),
        shape: ShapeKind::Sphere,
    }
}

pub fn moon() -> BodyDescriptor {
    BodyDescriptor {
        kind: BodyKind::Satellite,
        mass: kg_to_mass_units(MOON_MASS_KG),
        radius: meters_to_dist_units(MOON_RADIUS_M),
        position: Point3::new(0.0, 0.0, 0.0),
        velocity: Vector3::zero(),
        shape: ShapeKind::Sphere,
    }
}

pub fn sun() -> BodyDescriptor {
    BodyDescriptor {
        kind: BodyKind::Star,
        mass: kg_to_mass_units(SUN_MASS_KG),
        radius: meters_to_dist_units(SUN_RADIUS_M),
        position: Point3::new(0.0, 0.0, 0.0),
        velocity: Vector3::zero(),
        shape: ShapeKind::Sphere,
    }
}

/// A cloud of small cubic satellites scattered uniformly in a box around
/// `center`, for stress scenes and benchmarks. Pass a seeded rng for
/// reproducible clouds.
pub fn satellite_cloud(
    rng: &mut impl Rng,
    count: usize,
    center: Point3<f64>,
    spread: f64,
) -> Vec<BodyDescriptor> {
    (0..count)
        .map(|_| BodyDescriptor {
            kind: BodyKind::Satellite,
            mass: kg_to_mass_units(rng.random_range(1e3..1e6)),
            radius: meters_to_dist_units(rng.random_range(1.0..10.0)),
            position: center
                + Vector3::new(
                    rng.random_range(-spread..spread),
                    rng.random_range(-spread..spread),
                    rng.random_range(-spread..spread),
                ),
            velocity: Vector3::new(
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
            ),
            shape: ShapeKind::Cube,
        })
        .collect()
}
