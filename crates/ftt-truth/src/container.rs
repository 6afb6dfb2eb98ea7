use std::iter::ExactSizeIterator;

use ftt_core::errors::{ErrorInfo, FttError};
use ftt_core::{Barcode, DecayNode, FourMomentum, FourVector, ParticleView, PdgId, VertexView};
use serde::{Deserialize, Serialize};

use crate::ids::{make_particle, make_vertex, particle_index, vertex_index, ParticleId, VertexId};

/// Stored truth particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruthParticle {
    /// Signed PDG identifier.
    pub pdg_id: i32,
    /// Generator barcode, unique within the event.
    pub barcode: i32,
    /// Generator status code.
    pub status: i32,
    /// Four-momentum in MeV.
    pub p4: FourMomentum,
    /// Generator mass in MeV.
    pub mass: f64,
    /// Vertex the particle emerges from.
    pub prod_vtx: Option<VertexId>,
    /// Vertex the particle decays at; absent for stable particles.
    pub decay_vtx: Option<VertexId>,
}

impl TruthParticle {
    /// Creates an unlinked particle whose mass is taken from the four-momentum.
    pub fn new(pdg_id: i32, barcode: i32, status: i32, p4: FourMomentum) -> Self {
        Self {
            pdg_id,
            barcode,
            status,
            p4,
            mass: p4.mass().max(0.0),
            prod_vtx: None,
            decay_vtx: None,
        }
    }

    /// Overrides the generator mass.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }
}

/// Stored truth vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruthVertex {
    /// Generator barcode of the vertex.
    pub barcode: i32,
    /// Space-time position.
    pub position: FourVector,
    /// Particles decaying at this vertex.
    pub incoming: Vec<ParticleId>,
    /// Particles produced at this vertex. `None` marks an unavailable reference.
    pub outgoing: Vec<Option<ParticleId>>,
}

/// Arena holding the truth particles and vertices of one event.
///
/// Links are plain indices. Decoded containers may hold dangling links; views
/// treat those as absent instead of failing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TruthParticleContainer {
    particles: Vec<TruthParticle>,
    vertices: Vec<TruthVertex>,
}

impl TruthParticleContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns whether the container holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Appends a particle and returns its identifier.
    ///
    /// Vertex links carried by `particle` are ignored; use
    /// [`add_outgoing`](Self::add_outgoing) and
    /// [`set_decay_vertex`](Self::set_decay_vertex) to connect it.
    pub fn add_particle(&mut self, mut particle: TruthParticle) -> ParticleId {
        particle.prod_vtx = None;
        particle.decay_vtx = None;
        self.particles.push(particle);
        make_particle(self.particles.len() - 1)
    }

    /// Appends a vertex and returns its identifier.
    pub fn add_vertex(&mut self, barcode: i32, position: FourVector) -> VertexId {
        self.vertices.push(TruthVertex {
            barcode,
            position,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        });
        make_vertex(self.vertices.len() - 1)
    }

    /// Lists `particle` as produced at `vertex`.
    ///
    /// The first vertex a particle is attached to becomes its production
    /// vertex. Later attachments only extend the vertex's outgoing list, which
    /// is how one descendant ends up reachable from several branches.
    pub fn add_outgoing(&mut self, vertex: VertexId, particle: ParticleId) -> Result<(), FttError> {
        self.vertex_record(vertex)?;
        let record = self.particle_record_mut(particle)?;
        if record.prod_vtx.is_none() {
            record.prod_vtx = Some(vertex);
        }
        self.vertices[vertex_index(vertex)]
            .outgoing
            .push(Some(particle));
        Ok(())
    }

    /// Appends an unavailable reference to the outgoing list of `vertex`.
    pub fn add_unavailable_outgoing(&mut self, vertex: VertexId) -> Result<(), FttError> {
        self.vertex_record(vertex)?;
        self.vertices[vertex_index(vertex)].outgoing.push(None);
        Ok(())
    }

    /// Marks `vertex` as the decay vertex of `particle`.
    pub fn set_decay_vertex(
        &mut self,
        particle: ParticleId,
        vertex: VertexId,
    ) -> Result<(), FttError> {
        self.vertex_record(vertex)?;
        let record = self.particle_record_mut(particle)?;
        if record.decay_vtx.is_some() {
            return Err(record_error("decay-vertex-set", "particle already decays")
                .with_context("particle", particle.as_raw().to_string()));
        }
        record.decay_vtx = Some(vertex);
        self.vertices[vertex_index(vertex)].incoming.push(particle);
        Ok(())
    }

    /// Returns the view of a particle, or `None` for unknown identifiers.
    pub fn particle(&self, id: ParticleId) -> Option<ParticleRef<'_>> {
        self.particles.get(particle_index(id)).map(|_| ParticleRef {
            container: self,
            id,
        })
    }

    /// Returns the view of a vertex, or `None` for unknown identifiers.
    pub fn vertex(&self, id: VertexId) -> Option<VertexRef<'_>> {
        self.vertices.get(vertex_index(id)).map(|_| VertexRef {
            container: self,
            id,
        })
    }

    /// Returns the particle at position `index` in collection order.
    pub fn at(&self, index: usize) -> Option<ParticleRef<'_>> {
        self.particle(make_particle(index))
    }

    /// Iterates over the particles in collection order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = ParticleRef<'_>> + '_ {
        (0..self.particles.len()).map(move |index| ParticleRef {
            container: self,
            id: make_particle(index),
        })
    }

    fn vertex_record(&self, id: VertexId) -> Result<&TruthVertex, FttError> {
        self.vertices.get(vertex_index(id)).ok_or_else(|| {
            record_error("unknown-vertex", "vertex does not exist")
                .with_context("vertex", id.as_raw().to_string())
        })
    }

    fn particle_record_mut(&mut self, id: ParticleId) -> Result<&mut TruthParticle, FttError> {
        self.particles.get_mut(particle_index(id)).ok_or_else(|| {
            record_error("unknown-particle", "particle does not exist")
                .with_context("particle", id.as_raw().to_string())
        })
    }
}

/// Borrowed handle on one particle of a container.
#[derive(Debug, Clone, Copy)]
pub struct ParticleRef<'a> {
    container: &'a TruthParticleContainer,
    id: ParticleId,
}

impl<'a> ParticleRef<'a> {
    /// Identifier of the particle within its container.
    pub fn id(&self) -> ParticleId {
        self.id
    }

    /// Stored record backing this view.
    pub fn record(&self) -> &'a TruthParticle {
        &self.container.particles[particle_index(self.id)]
    }

    fn linked_vertex(&self, link: Option<VertexId>) -> Option<VertexRef<'a>> {
        link.and_then(|id| self.container.vertex(id))
    }
}

impl PartialEq for ParticleRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.container, other.container) && self.id == other.id
    }
}

impl Eq for ParticleRef<'_> {}

impl<'a> DecayNode for ParticleRef<'a> {
    fn pdg_id(&self) -> PdgId {
        PdgId::from_raw(self.record().pdg_id)
    }

    fn barcode(&self) -> Barcode {
        Barcode::from_raw(self.record().barcode)
    }

    fn has_decay_vertex(&self) -> bool {
        self.decay_vertex().is_some()
    }

    fn outgoing_children(&self) -> Box<dyn ExactSizeIterator<Item = Option<Self>> + '_> {
        match self.decay_vertex() {
            None => Box::new(std::iter::empty()),
            Some(vertex) => Box::new(vertex.outgoing()),
        }
    }
}

impl<'a> ParticleView for ParticleRef<'a> {
    type Vertex = VertexRef<'a>;

    fn status(&self) -> i32 {
        self.record().status
    }

    fn p4(&self) -> FourMomentum {
        self.record().p4
    }

    fn mass(&self) -> f64 {
        self.record().mass
    }

    fn production_vertex(&self) -> Option<VertexRef<'a>> {
        self.linked_vertex(self.record().prod_vtx)
    }

    fn decay_vertex(&self) -> Option<VertexRef<'a>> {
        self.linked_vertex(self.record().decay_vtx)
    }
}

/// Borrowed handle on one vertex of a container.
#[derive(Debug, Clone, Copy)]
pub struct VertexRef<'a> {
    container: &'a TruthParticleContainer,
    id: VertexId,
}

impl<'a> VertexRef<'a> {
    /// Identifier of the vertex within its container.
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Stored record backing this view.
    pub fn record(&self) -> &'a TruthVertex {
        &self.container.vertices[vertex_index(self.id)]
    }

    /// Produced particles in listed order; unavailable references are `None`.
    pub fn outgoing(&self) -> impl ExactSizeIterator<Item = Option<ParticleRef<'a>>> + 'a {
        let container = self.container;
        self.record()
            .outgoing
            .iter()
            .map(move |link| link.and_then(|id| container.particle(id)))
    }
}

impl VertexView for VertexRef<'_> {
    fn v4(&self) -> FourVector {
        self.record().position
    }
}

fn record_error(code: impl Into<String>, message: impl Into<String>) -> FttError {
    FttError::Record(ErrorInfo::new(code, message))
}
