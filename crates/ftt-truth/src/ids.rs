use serde::{Deserialize, Serialize};

/// Index of a particle within a [`TruthParticleContainer`](crate::TruthParticleContainer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticleId(u32);

impl ParticleId {
    /// Creates an identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

/// Index of a vertex within a [`TruthParticleContainer`](crate::TruthParticleContainer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(u32);

impl VertexId {
    /// Creates an identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

pub(crate) fn particle_index(id: ParticleId) -> usize {
    id.as_raw() as usize
}

pub(crate) fn vertex_index(id: VertexId) -> usize {
    id.as_raw() as usize
}

pub(crate) fn make_particle(index: usize) -> ParticleId {
    ParticleId::from_raw(index as u32)
}

pub(crate) fn make_vertex(index: usize) -> VertexId {
    VertexId::from_raw(index as u32)
}
