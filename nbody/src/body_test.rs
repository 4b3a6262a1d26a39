use std::f64::consts::TAU;

use cgmath::{Point3, Vector3, Zero};

use crate::body::{Body, BodyDescriptor, BodyKind, ShapeKind};

fn test_body(mass: f64) -> Body {
    Body::new(BodyDescriptor {
        kind: BodyKind::Planet,
        mass,
        radius: 2.0,
        position: Point3::new(0.0, 0.0, 0.0),
        velocity: Vector3::zero(),
        shape: ShapeKind::Sphere,
    })
}

#[test]
fn integrate_applies_the_half_step_position_term() {
    let mut body = test_body(2.0);
    body.velocity = Vector3::new(1.0, 0.0, 0.0);
    body.force = Vector3::new(4.0, 0.0, 0.0);

    body.integrate(0.5);

    // acc*h = (4/2)*0.5 = 1; position gains v*h + acc*h * h/2 = 0.5 + 0.25.
    assert_eq!(body.position.x, 0.75);
    assert_eq!(body.velocity.x, 2.0);
}

#[test]
fn integrate_advances_rotation_modulo_a_full_turn() {
    let mut body = test_body(1.0);
    body.set_rotation(3.0);
    body.integrate(0.5);
    assert_eq!(body.rotation_angle, 1.5);

    body.set_rotation(1e6);
    for _ in 0..10 {
        body.integrate(1.0);
        assert!(body.rotation_angle.abs() < TAU);
    }
}

#[test]
fn momentum_and_kinetic_energy() {
    let mut body = test_body(2.0);
    body.velocity = Vector3::new(3.0, 0.0, 4.0);

    assert_eq!(body.momentum(), Vector3::new(6.0, 0.0, 8.0));
    assert_eq!(body.kinetic_energy(), 25.0);
}

#[test]
fn z_range_culling_gives_cubes_extra_margin() {
    let mut body = test_body(1.0);

    // Sphere of radius 2 against a z-range [2, 8]: reachable up to
    // separation 5 from the middle.
    assert!(body.is_inside_z_range(10.0, 5.0, 3.0));
    assert!(!body.is_inside_z_range(10.2, 5.0, 3.0));

    // A cube's corners stick out: the same body as a cube reaches 6.
    body.shape = ShapeKind::Cube;
    assert!(body.is_inside_z_range(11.0, 5.0, 3.0));
    assert!(!body.is_inside_z_range(11.2, 5.0, 3.0));
}
