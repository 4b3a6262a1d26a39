// PHYSICAL
/// SI gravitational constant, in m^3 kg^-1 s^-2
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11;

// UNITS
//
// The engine works in abstract mass and distance units. The conversions are
// currently the identity, but every constant that enters the simulation goes
// through them, so a rescaled unit system only has to change these functions.

#[inline]
pub fn meters_to_dist_units(meters: f64) -> f64 {
    meters
}

#[inline]
pub fn dist_units_to_meters(dist_units: f64) -> f64 {
    dist_units
}

#[inline]
pub fn km_to_dist_units(km: f64) -> f64 {
    meters_to_dist_units(km * 1000.0)
}

#[inline]
pub fn kg_to_mass_units(kg: f64) -> f64 {
    kg
}

#[inline]
pub fn mass_units_to_kg(mass_units: f64) -> f64 {
    mass_units
}

/// Magnitude of the gravitational attraction between two masses separated by
/// the given squared distance.
#[inline]
pub fn gravitational_force(mass_a: f64, mass_b: f64, dist_squared: f64) -> f64 {
    GRAVITATIONAL_CONSTANT * mass_a * (mass_b / dist_squared)
}
