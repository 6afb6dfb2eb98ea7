use std::collections::BTreeMap;

use ftt_core::errors::{ErrorInfo, FttError};
use ftt_core::stable_hash_string;
use serde::{Deserialize, Serialize};

use crate::container::TruthParticleContainer;
use crate::event_info::EventInfo;

/// Typed collection stored under a name in one event entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoredCollection {
    /// Event metadata.
    EventInfo(EventInfo),
    /// Truth particle record.
    TruthParticles(TruthParticleContainer),
}

impl StoredCollection {
    /// Type name reported in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            StoredCollection::EventInfo(_) => EventInfo::TYPE_NAME,
            StoredCollection::TruthParticles(_) => TruthParticleContainer::TYPE_NAME,
        }
    }
}

impl From<EventInfo> for StoredCollection {
    fn from(value: EventInfo) -> Self {
        StoredCollection::EventInfo(value)
    }
}

impl From<TruthParticleContainer> for StoredCollection {
    fn from(value: TruthParticleContainer) -> Self {
        StoredCollection::TruthParticles(value)
    }
}

/// Collection types that can be retrieved from a [`TruthStore`] by name.
pub trait Retrieve: Sized {
    /// Type name reported in diagnostics.
    const TYPE_NAME: &'static str;

    /// Returns the payload if the stored collection has this type.
    fn from_stored(stored: &StoredCollection) -> Option<&Self>;
}

impl Retrieve for EventInfo {
    const TYPE_NAME: &'static str = "EventInfo";

    fn from_stored(stored: &StoredCollection) -> Option<&Self> {
        match stored {
            StoredCollection::EventInfo(info) => Some(info),
            _ => None,
        }
    }
}

impl Retrieve for TruthParticleContainer {
    const TYPE_NAME: &'static str = "TruthParticleContainer";

    fn from_stored(stored: &StoredCollection) -> Option<&Self> {
        match stored {
            StoredCollection::TruthParticles(container) => Some(container),
            _ => None,
        }
    }
}

/// Named collections of one event entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TruthStore {
    collections: BTreeMap<String, StoredCollection>,
}

impl TruthStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a collection under `key`, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, collection: impl Into<StoredCollection>) {
        self.collections.insert(key.into(), collection.into());
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, collection: impl Into<StoredCollection>) -> Self {
        self.insert(key, collection);
        self
    }

    /// Returns whether a collection of type `C` is stored under `key`.
    pub fn contains<C: Retrieve>(&self, key: &str) -> bool {
        self.collections
            .get(key)
            .and_then(C::from_stored)
            .is_some()
    }

    /// Retrieves the collection of type `C` stored under `key`.
    pub fn retrieve<C: Retrieve>(&self, key: &str) -> Result<&C, FttError> {
        let stored = self.collections.get(key).ok_or_else(|| {
            FttError::DataMissing(
                ErrorInfo::new("missing-collection", "cannot read required collection")
                    .with_context("key", key)
                    .with_context("type", C::TYPE_NAME),
            )
        })?;
        C::from_stored(stored).ok_or_else(|| {
            FttError::DataMissing(
                ErrorInfo::new("collection-type", "collection has an unexpected type")
                    .with_context("key", key)
                    .with_context("expected", C::TYPE_NAME)
                    .with_context("found", stored.type_name()),
            )
        })
    }

    /// Names of the stored collections in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Content hash of the entry, independent of its on-disk encoding.
    pub fn digest(&self) -> Result<String, FttError> {
        stable_hash_string(self)
    }
}
