use serde::{Deserialize, Serialize};

/// Energy-momentum four-vector in native units (MeV).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourMomentum {
    /// Momentum along x.
    pub px: f64,
    /// Momentum along y.
    pub py: f64,
    /// Momentum along z.
    pub pz: f64,
    /// Energy.
    pub e: f64,
}

impl FourMomentum {
    /// Creates a four-momentum from its cartesian components.
    pub const fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Magnitude of the three-momentum.
    pub fn p(&self) -> f64 {
        (self.px * self.px + self.py * self.py + self.pz * self.pz).sqrt()
    }

    /// Invariant mass. Space-like vectors return the negated magnitude.
    pub fn mass(&self) -> f64 {
        let m2 = self.e * self.e - self.p() * self.p();
        if m2 < 0.0 {
            -(-m2).sqrt()
        } else {
            m2.sqrt()
        }
    }

    /// Velocity `p / E`.
    pub fn beta(&self) -> f64 {
        self.p() / self.e
    }

    /// Lorentz factor `1 / sqrt(1 - beta^2)`.
    pub fn gamma(&self) -> f64 {
        let beta = self.beta();
        1.0 / (1.0 - beta * beta).sqrt()
    }
}

/// Space-time position of a vertex: `(x, y, z)` in mm and `t` as `ct` in mm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourVector {
    /// Position along x.
    pub x: f64,
    /// Position along y.
    pub y: f64,
    /// Position along z.
    pub z: f64,
    /// Time component.
    pub t: f64,
}

impl FourVector {
    /// Creates a four-vector from its components.
    pub const fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
        Self { x, y, z, t }
    }

    /// Spatial part of the four-vector.
    pub fn vect(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Magnitude of the spatial part.
    pub fn vect_mag(&self) -> f64 {
        let [x, y, z] = self.vect();
        (x * x + y * y + z * z).sqrt()
    }

    /// Component-wise difference `self - other`.
    pub fn minus(&self, other: &FourVector) -> FourVector {
        FourVector::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.t - other.t,
        )
    }
}

/// Summary of one unique terminal descendant, in reporting units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescendantSummary {
    /// Signed PDG identifier of the descendant.
    pub pdg_id: i32,
    /// Generator barcode of the descendant.
    pub barcode: i32,
    /// Mass in reporting units.
    pub mass: f32,
    /// Transverse momentum in reporting units.
    pub pt: f32,
}

/// One output row of the truth tuple.
///
/// The lifetime column only receives strictly positive lifetimes, so it may be
/// shorter than the radius and pt columns of the same row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event number reported by the event metadata.
    #[serde(rename = "EventNumber")]
    pub event_number: u64,
    /// Displaced-vertex radius per selected primary.
    #[serde(rename = "DV_R")]
    pub decay_radius: Vec<f32>,
    /// Positive lab-frame lifetimes of the selected primaries.
    #[serde(rename = "n1_lifetime")]
    pub lifetime: Vec<f32>,
    /// Transverse momentum per selected primary.
    #[serde(rename = "n1pt")]
    pub pt: Vec<f32>,
    /// Unique terminal descendants per selected primary, when requested.
    #[serde(
        rename = "n1_children",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub descendants: Option<Vec<Vec<DescendantSummary>>>,
}

impl EventRecord {
    /// Creates an empty row for the given event.
    pub fn new(event_number: u64) -> Self {
        Self {
            event_number,
            ..Self::default()
        }
    }

    /// Number of primaries that contributed to the row.
    pub fn primary_count(&self) -> usize {
        self.pt.len()
    }
}
