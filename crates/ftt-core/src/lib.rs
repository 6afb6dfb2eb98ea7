#![deny(missing_docs)]
#![doc = "Core traits and data types for the FTAG truth tuple extractor."]

use std::iter::ExactSizeIterator;

use serde::{Deserialize, Serialize};

pub mod canonical;
pub mod errors;
pub mod provenance;
pub mod rng;
mod types;

pub use canonical::{stable_hash_string, to_canonical_json_bytes};
pub use errors::{ErrorInfo, FttError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
pub use types::{DescendantSummary, EventRecord, FourMomentum, FourVector};

/// Signed PDG Monte Carlo particle identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PdgId(i32);

impl PdgId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw signed identifier.
    pub fn as_raw(&self) -> i32 {
        self.0
    }

    /// Returns the identifier with the particle/antiparticle sign dropped.
    pub fn abs(&self) -> u32 {
        self.0.unsigned_abs()
    }

    /// Returns whether both identifiers name the same particle type, ignoring sign.
    pub fn same_type(&self, other: PdgId) -> bool {
        self.abs() == other.abs()
    }
}

/// Generator barcode, unique per particle within one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Barcode(i32);

impl Barcode {
    /// Creates a new barcode from its raw integer representation.
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the barcode.
    pub fn as_raw(&self) -> i32 {
        self.0
    }
}

/// Deduplication key for terminal descendants: `(|pdg id|, barcode)`.
///
/// Barcode uniqueness within an event is guaranteed by the upstream event
/// generator and is not checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChildKey {
    /// Particle type with the sign dropped.
    pub abs_pdg_id: u32,
    /// Generator barcode.
    pub barcode: Barcode,
}

impl ChildKey {
    /// Builds the key for a particle.
    pub fn of<N: DecayNode>(node: &N) -> Self {
        Self {
            abs_pdg_id: node.pdg_id().abs(),
            barcode: node.barcode(),
        }
    }
}

/// Minimal view of a decay-tree node consumed by the decay-chain walker.
pub trait DecayNode: Sized {
    /// Returns the signed particle identifier.
    fn pdg_id(&self) -> PdgId;

    /// Returns the generator barcode.
    fn barcode(&self) -> Barcode;

    /// Returns whether the particle has a decay vertex.
    fn has_decay_vertex(&self) -> bool;

    /// Returns the outgoing particles of the decay vertex in listed order.
    ///
    /// Leaves yield nothing. A `None` item is an unavailable reference.
    fn outgoing_children(&self) -> Box<dyn ExactSizeIterator<Item = Option<Self>> + '_>;
}

/// Read-only view of a truth vertex.
pub trait VertexView {
    /// Returns the space-time position.
    fn v4(&self) -> FourVector;

    /// Position along x.
    fn x(&self) -> f64 {
        self.v4().x
    }

    /// Position along y.
    fn y(&self) -> f64 {
        self.v4().y
    }

    /// Position along z.
    fn z(&self) -> f64 {
        self.v4().z
    }
}

/// Read-only view of a truth particle, valid for the current event only.
pub trait ParticleView: DecayNode {
    /// Vertex handle type.
    type Vertex: VertexView;

    /// Returns the generator status code.
    fn status(&self) -> i32;

    /// Returns the four-momentum in native units.
    fn p4(&self) -> FourMomentum;

    /// Returns the generator mass in native units.
    fn mass(&self) -> f64;

    /// Returns the production vertex, if any.
    fn production_vertex(&self) -> Option<Self::Vertex>;

    /// Returns the decay vertex, if any.
    fn decay_vertex(&self) -> Option<Self::Vertex>;

    /// Returns the transverse momentum in native units.
    fn pt(&self) -> f64 {
        self.p4().pt()
    }
}

/// Sequential event source bound to one input container.
pub trait EventSource {
    /// Per-entry store exposing the named collections of the current event.
    type Store;

    /// Returns the number of entries in the container.
    fn entry_count(&self) -> u64;

    /// Loads the entry at `index` and returns its store.
    ///
    /// A failure to read a single entry is reported as [`FttError::Entry`];
    /// any other error aborts the run.
    fn advance_to(&mut self, index: u64) -> Result<&Self::Store, FttError>;

    /// Releases the input before the next one is opened.
    fn close(self)
    where
        Self: Sized,
    {
    }
}

/// Append-only sink for output rows.
pub trait TableWriter {
    /// Summary returned once the table has been flushed.
    type Summary;

    /// Appends one row.
    fn append(&mut self, record: EventRecord) -> Result<(), FttError>;

    /// Flushes all rows and releases the output.
    fn finalize(self) -> Result<Self::Summary, FttError>
    where
        Self: Sized;
}
