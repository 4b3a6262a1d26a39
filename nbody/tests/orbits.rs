use std::f64::consts::TAU;

use approx::assert_relative_eq;
use cgmath::{InnerSpace, Point3, Vector3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use nbody::constants::GRAVITATIONAL_CONSTANT;
use nbody::{presets, SolverConfig, Universe};

fn total_energy(universe: &Universe) -> f64 {
    universe.total_kinetic_energy() + universe.potential_energy()
}

/// One earth-moon orbit at a 60 s step stays within 0.1% energy drift.
#[test]
fn earth_moon_orbit_conserves_energy() {
    let total_mass = presets::EARTH_MASS_KG + presets::MOON_MASS_KG;
    let r = presets::MOON_TO_EARTH_M;
    let omega = (GRAVITATIONAL_CONSTANT * total_mass / (r * r * r)).sqrt();

    // Both bodies circle the barycenter at the origin.
    let r_earth = r * presets::MOON_MASS_KG / total_mass;
    let r_moon = r * presets::EARTH_MASS_KG / total_mass;

    let mut universe = Universe::with_thread_count(2, 1);
    let mut earth = presets::earth();
    earth.position = Point3::new(-r_earth, 0.0, 0.0);
    earth.velocity = Vector3::new(0.0, -omega * r_earth, 0.0);
    universe.add_body(earth);

    let mut moon = presets::moon();
    moon.position = Point3::new(r_moon, 0.0, 0.0);
    moon.velocity = Vector3::new(0.0, omega * r_moon, 0.0);
    let moon = universe.add_body(moon);

    let initial = total_energy(&universe);

    let h = 60.0;
    let steps = (TAU / omega / h).ceil() as usize;
    for _ in 0..steps {
        universe.step(h, 1);
    }

    let drift = (total_energy(&universe) - initial) / initial;
    assert!(
        drift.abs() < 1e-3,
        "energy drifted by {:.3e} over one orbit",
        drift
    );

    // After a full period the moon is back near its starting point.
    let moon = universe.body(moon);
    let miss = (moon.position - Point3::new(r_moon, 0.0, 0.0)).magnitude();
    assert!(
        miss < 0.01 * r,
        "moon missed its starting point by {:.3e} m",
        miss
    );
}

fn cloud_universe(count: usize, seed: u64, config: SolverConfig) -> Universe {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut universe = Universe::with_thread_count(count + 1, 4);
    universe.add_body(presets::earth());
    for desc in presets::satellite_cloud(&mut rng, count, Point3::new(0.0, 0.0, 0.0), 1e7) {
        universe.add_body(desc);
    }
    universe.set_solver(config);
    universe
}

fn force_magnitude_sum(universe: &Universe) -> f64 {
    universe.bodies().map(|b| b.force.magnitude()).sum()
}

/// All four solvers agree on the same 500-body configuration.
#[test]
fn solvers_agree_on_a_random_cloud() {
    let seed = 4242;
    let mut direct = cloud_universe(500, seed, SolverConfig::Direct);
    let mut direct_parallel = cloud_universe(500, seed, SolverConfig::DirectParallel);
    let mut tree = cloud_universe(
        500,
        seed,
        SolverConfig::BarnesHut {
            theta: 1e-9,
            size_scale: 2.0,
        },
    );
    let mut tree_parallel = cloud_universe(
        500,
        seed,
        SolverConfig::BarnesHutParallel {
            theta: 1e-9,
            size_scale: 2.0,
        },
    );

    direct.step(1.0, 1);
    direct_parallel.step(1.0, 1);
    tree.step(1.0, 1);
    tree_parallel.step(1.0, 1);

    let reference = force_magnitude_sum(&direct);
    assert_relative_eq!(
        reference,
        force_magnitude_sum(&direct_parallel),
        max_relative = 1e-9
    );
    assert_relative_eq!(reference, force_magnitude_sum(&tree), max_relative = 1e-9);
    assert_relative_eq!(
        reference,
        force_magnitude_sum(&tree_parallel),
        max_relative = 1e-9
    );
}

/// The parallel tree solver reproduces the serial one step for step.
#[test]
fn barnes_hut_parallel_tracks_serial_over_many_steps() {
    let seed = 99;
    let mut serial = cloud_universe(200, seed, SolverConfig::BarnesHut {
        theta: 0.5,
        size_scale: 2.0,
    });
    let mut parallel = cloud_universe(200, seed, SolverConfig::BarnesHutParallel {
        theta: 0.5,
        size_scale: 2.0,
    });

    for _ in 0..20 {
        serial.step(10.0, 1);
        parallel.step(10.0, 1);
    }

    for (a, b) in serial.bodies().zip(parallel.bodies()) {
        assert_eq!(a.position, b.position);
        assert_eq!(a.velocity, b.velocity);
    }
}
