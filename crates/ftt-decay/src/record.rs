use ftt_core::{DecayNode, DescendantSummary, EventRecord, ParticleView};
use tracing::debug;

use crate::selector::{EventSelector, SelectedPrimary};
use crate::walker::{walk, ChildMap};

/// Assembles output rows from selected primaries and their descendants.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    momentum_scale: f64,
    emit_descendants: bool,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self {
            momentum_scale: 1e-3,
            emit_descendants: false,
        }
    }
}

impl RecordBuilder {
    /// Creates a builder converting descendant momenta with `momentum_scale`.
    pub fn new(momentum_scale: f64) -> Self {
        Self {
            momentum_scale,
            emit_descendants: false,
        }
    }

    /// Also stores the per-primary descendant lists in the row.
    pub fn with_descendants(mut self, emit: bool) -> Self {
        self.emit_descendants = emit;
        self
    }

    /// Builds the row of one event.
    ///
    /// `pt` and `DV_R` get one entry per primary; the lifetime column only
    /// receives positive lifetimes. `child_sets` is parallel to `primaries`
    /// and is only copied into the row when descendants are requested.
    pub fn build<P: ParticleView>(
        &self,
        event_number: u64,
        primaries: &[SelectedPrimary<P>],
        child_sets: &[ChildMap<P>],
    ) -> EventRecord {
        let mut record = EventRecord::new(event_number);
        for primary in primaries {
            record.pt.push(primary.pt as f32);
            record.decay_radius.push(primary.decay_radius as f32);
            if primary.has_positive_lifetime() {
                record.lifetime.push(primary.lifetime as f32);
            }
        }
        if self.emit_descendants {
            let lists: Vec<Vec<DescendantSummary>> = child_sets
                .iter()
                .map(|children| {
                    children
                        .iter()
                        .map(|(_, child)| self.summarize(child))
                        .collect()
                })
                .collect();
            record.descendants = Some(lists);
        }
        record
    }

    fn summarize<P: ParticleView>(&self, child: &P) -> DescendantSummary {
        DescendantSummary {
            pdg_id: child.pdg_id().as_raw(),
            barcode: child.barcode().as_raw(),
            mass: (child.mass() * self.momentum_scale) as f32,
            pt: (child.pt() * self.momentum_scale) as f32,
        }
    }
}

/// Reduces one event: selects primaries, walks each decay tree with a fresh
/// map, and builds the row.
pub fn reduce_event<P, I>(
    selector: &EventSelector,
    builder: &RecordBuilder,
    event_number: u64,
    particles: I,
) -> EventRecord
where
    P: ParticleView,
    I: IntoIterator<Item = P>,
{
    let primaries = selector.select(particles);
    let child_sets: Vec<ChildMap<P>> = primaries
        .iter()
        .map(|primary| walk(&primary.particle))
        .collect();

    for (primary, children) in primaries.iter().zip(&child_sets) {
        for (_, child) in children {
            debug!(
                primary = primary.index,
                pdg_id = child.pdg_id().as_raw(),
                mass = child.mass() * selector.config().momentum_scale,
                pt = child.pt() * selector.config().momentum_scale,
                "terminal descendant"
            );
        }
    }

    builder.build(event_number, &primaries, &child_sets)
}
