use ftt_core::errors::{ErrorInfo, FttError};
use ftt_core::rng::RngHandle;
use ftt_core::{FourMomentum, FourVector};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::container::{TruthParticle, TruthParticleContainer};
use crate::event_info::EventInfo;
use crate::ids::{ParticleId, VertexId};
use crate::store::TruthStore;
use crate::{EVENT_INFO_KEY, TRUTH_PARTICLES_KEY};

const PRODUCT_TYPES: [i32; 10] = [1, -2, 3, -4, 5, 11, -13, 15, 22, 211];
const RADIATION_STATUS: i32 = 52;
const FINAL_STATUS: i32 = 1;

/// Shape of the synthetic decay trees produced by [`gen_decay_event`].
#[derive(Debug, Clone)]
pub struct DecayTreeOpts {
    /// Number of hard-process primaries per event.
    pub primaries: usize,
    /// PDG identifier of the primaries (either sign is generated).
    pub primary_pdg_id: i32,
    /// Status code of the primaries.
    pub primary_status: i32,
    /// Mass of the primaries in MeV.
    pub primary_mass: f64,
    /// Upper bound on same-type intermediate copies before the decay.
    pub max_self_copies: usize,
    /// Upper bound on type-changing decay products per primary.
    pub max_products: usize,
    /// Probability that a product is also listed under the previous copy's vertex.
    pub shared_product_rate: f64,
    /// Probability of an unavailable reference in a decay vertex.
    pub unavailable_rate: f64,
    /// Mean transverse decay length in mm.
    pub mean_decay_length: f64,
}

impl Default for DecayTreeOpts {
    fn default() -> Self {
        Self {
            primaries: 2,
            primary_pdg_id: 1_000_022,
            primary_status: 22,
            primary_mass: 100_000.0,
            max_self_copies: 3,
            max_products: 3,
            shared_product_rate: 0.2,
            unavailable_rate: 0.05,
            mean_decay_length: 40.0,
        }
    }
}

/// Generates the truth record of one synthetic event.
///
/// Each primary is produced at a common hard-process vertex, passes through a
/// random number of same-type copies (radiating photons) and finally decays at
/// a displaced vertex into particles of other types.
pub fn gen_decay_event(
    opts: &DecayTreeOpts,
    rng: &mut RngHandle,
) -> Result<TruthParticleContainer, FttError> {
    if opts.max_products == 0 {
        return Err(FttError::Config(ErrorInfo::new(
            "no-products",
            "decay tree generator requires at least one product per decay",
        )));
    }
    let mut builder = TreeBuilder::default();
    let hard = builder.vertex(FourVector::default());
    for sign in [1.0, -1.0] {
        let pz = sign * rng.gen_range(50_000.0f64..500_000.0);
        let parton = builder.particle(TruthParticle::new(
            21,
            builder.next_barcode(),
            21,
            FourMomentum::new(0.0, 0.0, pz, pz.abs()),
        ));
        builder.container.set_decay_vertex(parton, hard)?;
    }

    for _ in 0..opts.primaries {
        let sign = if rng.gen_bool(0.5) { 1 } else { -1 };
        let pdg_id = sign * opts.primary_pdg_id.abs();
        let p4 = random_momentum(opts.primary_mass, rng);
        let primary = builder.particle(
            TruthParticle::new(pdg_id, builder.next_barcode(), opts.primary_status, p4)
                .with_mass(opts.primary_mass),
        );
        builder.container.add_outgoing(hard, primary)?;

        let mut current = primary;
        let mut previous_vertex: Option<VertexId> = None;
        let mut position = FourVector::default();
        let copies = rng.gen_range(0..=opts.max_self_copies);
        for _ in 0..copies {
            position = step(position, p4, opts.mean_decay_length * 0.01, rng);
            let vertex = builder.vertex(position);
            builder.container.set_decay_vertex(current, vertex)?;
            let copy = builder.particle(
                TruthParticle::new(pdg_id, builder.next_barcode(), RADIATION_STATUS, p4)
                    .with_mass(opts.primary_mass),
            );
            builder.container.add_outgoing(vertex, copy)?;
            let photon = builder.particle(TruthParticle::new(
                22,
                builder.next_barcode(),
                FINAL_STATUS,
                FourMomentum::new(100.0, 0.0, 0.0, 100.0),
            ));
            builder.container.add_outgoing(vertex, photon)?;
            previous_vertex = Some(vertex);
            current = copy;
        }

        position = step(position, p4, opts.mean_decay_length, rng);
        let decay = builder.vertex(position);
        builder.container.set_decay_vertex(current, decay)?;
        let count = rng.gen_range(1..=opts.max_products);
        for _ in 0..count {
            let product_type = *PRODUCT_TYPES.choose(rng).unwrap_or(&22);
            let product = builder.particle(TruthParticle::new(
                product_type,
                builder.next_barcode(),
                FINAL_STATUS,
                random_momentum(0.0, rng),
            ));
            builder.container.add_outgoing(decay, product)?;
            if let Some(shared) = previous_vertex {
                if rng.gen_bool(opts.shared_product_rate.clamp(0.0, 1.0)) {
                    builder.container.add_outgoing(shared, product)?;
                }
            }
        }
        if rng.gen_bool(opts.unavailable_rate.clamp(0.0, 1.0)) {
            builder.container.add_unavailable_outgoing(decay)?;
        }
    }
    Ok(builder.container)
}

/// Generates a complete entry store: metadata plus truth record.
pub fn gen_event_store(
    event_number: u64,
    opts: &DecayTreeOpts,
    rng: &mut RngHandle,
) -> Result<TruthStore, FttError> {
    let container = gen_decay_event(opts, rng)?;
    Ok(TruthStore::new()
        .with(EVENT_INFO_KEY, EventInfo::numbered(event_number))
        .with(TRUTH_PARTICLES_KEY, container))
}

#[derive(Default)]
struct TreeBuilder {
    container: TruthParticleContainer,
    particles: i32,
    vertices: i32,
}

impl TreeBuilder {
    fn next_barcode(&self) -> i32 {
        10_001 + self.particles
    }

    fn particle(&mut self, particle: TruthParticle) -> ParticleId {
        self.particles += 1;
        self.container.add_particle(particle)
    }

    fn vertex(&mut self, position: FourVector) -> VertexId {
        self.vertices += 1;
        self.container.add_vertex(-self.vertices, position)
    }
}

fn random_momentum(mass: f64, rng: &mut RngHandle) -> FourMomentum {
    let pt: f64 = rng.gen_range(5_000.0..400_000.0);
    let phi: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let pz: f64 = rng.gen_range(-300_000.0..300_000.0);
    let (px, py) = (pt * phi.cos(), pt * phi.sin());
    let e = (px * px + py * py + pz * pz + mass * mass).sqrt();
    FourMomentum::new(px, py, pz, e)
}

fn step(from: FourVector, p4: FourMomentum, mean_length: f64, rng: &mut RngHandle) -> FourVector {
    let length = -mean_length * (1.0 - rng.gen::<f64>()).ln();
    let p = p4.p().max(f64::MIN_POSITIVE);
    FourVector::new(
        from.x + length * p4.px / p,
        from.y + length * p4.py / p,
        from.z + length * p4.pz / p,
        from.t + length / p4.beta().max(f64::MIN_POSITIVE),
    )
}
