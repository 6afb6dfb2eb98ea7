#![deny(missing_docs)]

//! Truth-level event record model and the container files it is read from.
//!
//! A container file holds a sequence of entries; every entry is a
//! [`TruthStore`] of named collections, usually an [`EventInfo`] under
//! [`EVENT_INFO_KEY`] and a [`TruthParticleContainer`] under
//! [`TRUTH_PARTICLES_KEY`]. [`TruthFile`] exposes a file as an
//! [`EventSource`](ftt_core::EventSource).

mod container;
mod event_info;
mod generators;
mod ids;
mod serialization;
mod source;
mod store;

pub use container::{ParticleRef, TruthParticle, TruthParticleContainer, TruthVertex, VertexRef};
pub use event_info::EventInfo;
pub use generators::{gen_decay_event, gen_event_store, DecayTreeOpts};
pub use ids::{ParticleId, VertexId};
pub use serialization::{
    store_from_bytes, store_from_json, store_to_bytes, store_to_json, write_truth_file,
    ContainerFormat, CONTAINER_SCHEMA,
};
pub use source::TruthFile;
pub use store::{Retrieve, StoredCollection, TruthStore};

/// Conventional key of the event metadata collection.
pub const EVENT_INFO_KEY: &str = "EventInfo";

/// Conventional key of the truth particle collection.
pub const TRUTH_PARTICLES_KEY: &str = "TruthParticles";
