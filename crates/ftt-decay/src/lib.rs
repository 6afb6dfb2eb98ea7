#![deny(missing_docs)]

//! Decay-chain extraction and per-event reduction for truth tuples.
//!
//! [`EventSelector`] picks the primaries of an event and computes their
//! derived quantities, [`walk`] flattens each primary's decay tree into its
//! unique terminal descendants, and [`RecordBuilder`] turns both into one
//! [`EventRecord`](ftt_core::EventRecord). [`reduce_event`] chains the three.

mod config;
pub mod kinematics;
mod record;
mod selector;
mod walker;

pub use config::SelectionConfig;
pub use record::{reduce_event, RecordBuilder};
pub use selector::{EventSelector, SelectedPrimary};
pub use walker::{unique_children, walk, ChildMap};
