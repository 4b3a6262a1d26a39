//! Earth and moon in a circular orbit around their barycenter, integrated at
//! a 60 s step for one full revolution.

use std::f64::consts::TAU;

use cgmath::{InnerSpace, Point3, Vector3};

use nbody::constants::GRAVITATIONAL_CONSTANT;
use nbody::{presets, Universe};

fn main() {
    let total_mass = presets::EARTH_MASS_KG + presets::MOON_MASS_KG;
    let r = presets::MOON_TO_EARTH_M;
    let omega = (GRAVITATIONAL_CONSTANT * total_mass / (r * r * r)).sqrt();

    let r_earth = r * presets::MOON_MASS_KG / total_mass;
    let r_moon = r * presets::EARTH_MASS_KG / total_mass;

    let mut universe = Universe::new(2);

    let mut earth = presets::earth();
    earth.position = Point3::new(-r_earth, 0.0, 0.0);
    earth.velocity = Vector3::new(0.0, -omega * r_earth, 0.0);
    let earth = universe.add_body(earth);
    // One revolution per day.
    universe.body_mut(earth).set_rotation(TAU / 86400.0);

    let mut moon = presets::moon();
    moon.position = Point3::new(r_moon, 0.0, 0.0);
    moon.velocity = Vector3::new(0.0, omega * r_moon, 0.0);
    let moon = universe.add_body(moon);

    let h = 60.0;
    let steps = (TAU / omega / h).ceil() as u64;
    let report_every = steps / 8;

    for step in 1..=steps {
        universe.step(h, 1);
        if step % report_every == 0 {
            let moon = universe.body(moon);
            let earth = universe.body(earth);
            let separation = (moon.position - earth.position).magnitude();
            println!(
                "{}  separation {:.4e} m  moon speed {:.1} m/s",
                universe.elapsed(),
                separation,
                moon.velocity.magnitude()
            );
        }
    }

    let moon = universe.body(moon);
    println!(
        "after one period the moon is {:.3e} m from its starting point",
        (moon.position - Point3::new(r_moon, 0.0, 0.0)).magnitude()
    );
}
