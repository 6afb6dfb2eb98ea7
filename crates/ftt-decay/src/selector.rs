use ftt_core::{DecayNode, ParticleView, VertexView};
use tracing::debug;

use crate::config::SelectionConfig;
use crate::kinematics::{decay_radius, flight_distance, lab_lifetime};

/// A primary particle together with its derived quantities in reporting units.
#[derive(Debug, Clone)]
pub struct SelectedPrimary<P> {
    /// Handle on the selected particle.
    pub particle: P,
    /// Position of the particle in the event's collection.
    pub index: usize,
    /// Transverse momentum.
    pub pt: f64,
    /// Displaced-vertex radius.
    pub decay_radius: f64,
    /// Lab-frame lifetime; only strictly positive values reach the output.
    pub lifetime: f64,
}

impl<P> SelectedPrimary<P> {
    /// Returns whether the lifetime passes the positivity filter.
    pub fn has_positive_lifetime(&self) -> bool {
        self.lifetime > 0.0
    }
}

/// Picks the primaries of an event and computes their derived quantities.
#[derive(Debug, Clone, Default)]
pub struct EventSelector {
    config: SelectionConfig,
}

impl EventSelector {
    /// Creates a selector with the given configuration.
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Selection predicate: `|pdg id|` and status both match the configuration.
    pub fn is_primary<P: ParticleView>(&self, particle: &P) -> bool {
        particle.pdg_id().abs() == self.config.primary_pdg_id.unsigned_abs()
            && particle.status() == self.config.primary_status
    }

    /// Selects the primaries among `particles`, preserving collection order.
    pub fn select<P, I>(&self, particles: I) -> Vec<SelectedPrimary<P>>
    where
        P: ParticleView,
        I: IntoIterator<Item = P>,
    {
        particles
            .into_iter()
            .enumerate()
            .filter(|(_, particle)| self.is_primary(particle))
            .map(|(index, particle)| self.measure(particle, index))
            .collect()
    }

    /// Computes pt, decay radius and lifetime of one particle.
    ///
    /// Radius and lifetime are zero when the production or decay vertex is
    /// missing; a zero lifetime is later dropped by the positivity filter.
    pub fn measure<P: ParticleView>(&self, particle: P, index: usize) -> SelectedPrimary<P> {
        let production = particle.production_vertex();
        let decay = particle.decay_vertex();
        let p4 = particle.p4();

        let pt = self.config.momentum_scale * particle.pt();
        let radius = self.config.radius_scale * decay_radius(production.as_ref(), decay.as_ref());
        let distance = flight_distance(production.as_ref(), decay.as_ref());
        let lifetime =
            lab_lifetime(distance, &p4, self.config.speed_of_light) * self.config.time_scale;

        debug!(
            pdg_id = particle.pdg_id().as_raw(),
            mass = particle.mass() * self.config.momentum_scale,
            status = particle.status(),
            decays = decay.is_some(),
            production = ?production.as_ref().map(|v| [v.x(), v.y(), v.z()]),
            decay = ?decay.as_ref().map(|v| [v.x(), v.y(), v.z()]),
            lifetime,
            "selected primary"
        );

        SelectedPrimary {
            particle,
            index,
            pt,
            decay_radius: radius,
            lifetime,
        }
    }
}
