//! The classic demo scene: sun, earth and moon plus a swarm of random
//! satellite cubes, run headless on the parallel Barnes-Hut solver.

use cgmath::{InnerSpace, Point3, Vector3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use nbody::{presets, SolverConfig, Universe};

const SATELLITES: usize = 500;

fn main() {
    let mut universe = Universe::new(SATELLITES + 3);

    let mut sun = presets::sun();
    sun.position = Point3::new(presets::EARTH_TO_SUN_M, 0.0, 0.0);
    universe.add_body(sun);

    let earth = universe.add_body(presets::earth());

    let mut moon = presets::moon();
    moon.position = Point3::new(presets::MOON_TO_EARTH_M, 0.0, 0.0);
    moon.velocity = Vector3::new(0.0, 0.0, presets::MOON_ORBITAL_SPEED_M_S);
    universe.add_body(moon);

    // Low orbits around the earth.
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for desc in presets::satellite_cloud(
        &mut rng,
        SATELLITES,
        universe.body(earth).position,
        2e7,
    ) {
        universe.add_body(desc);
    }

    universe.set_solver(SolverConfig::BarnesHutParallel {
        theta: 0.5,
        size_scale: 4.0,
    });

    println!(
        "{} bodies ({} star), one simulated day at 30 steps/s",
        universe.len(),
        universe.stars().count()
    );

    let momentum_before = universe.total_momentum();
    for hour in 1..=24 {
        // A frame at 30 fps advances 1/30 s of real time; here each outer
        // step covers a simulated minute in two substeps.
        for _ in 0..60 {
            universe.step(60.0, 2);
        }
        if hour % 6 == 0 {
            println!("{}", universe.elapsed());
        }
    }

    let drift = (universe.total_momentum() - momentum_before).magnitude();
    println!("momentum drift after one day: {drift:.3e}");
}
