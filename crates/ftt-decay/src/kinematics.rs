//! Derived quantities of a selected primary, in native units.

use ftt_core::{FourMomentum, FourVector, VertexView};

/// Distance between production and decay vertex as written by the legacy
/// tuples.
///
/// The third term pairs the production z with the decay *x* coordinate. This
/// is reproduced as-is for output compatibility.
pub fn legacy_decay_radius(production: &FourVector, decay: &FourVector) -> f64 {
    let dx = production.x - decay.x;
    let dy = production.y - decay.y;
    let dz = production.z - decay.x;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Spatial flight distance between the two vertices, zero when either is missing.
pub fn flight_distance<V: VertexView>(production: Option<&V>, decay: Option<&V>) -> f64 {
    match (production, decay) {
        (Some(production), Some(decay)) => decay.v4().minus(&production.v4()).vect_mag(),
        _ => 0.0,
    }
}

/// Decay radius, zero when either vertex is missing.
pub fn decay_radius<V: VertexView>(production: Option<&V>, decay: Option<&V>) -> f64 {
    match (production, decay) {
        (Some(production), Some(decay)) => legacy_decay_radius(&production.v4(), &decay.v4()),
        _ => 0.0,
    }
}

/// Lab-frame lifetime `d / (beta * gamma * c)`.
///
/// Returns zero when the result is not finite (particle at rest, massless or
/// unphysical momentum), so it is dropped by the positivity filter.
pub fn lab_lifetime(distance: f64, p4: &FourMomentum, speed_of_light: f64) -> f64 {
    let lifetime = distance / (p4.beta() * p4.gamma() * speed_of_light);
    if lifetime.is_finite() {
        lifetime
    } else {
        0.0
    }
}
