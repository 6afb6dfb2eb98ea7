use ftt_core::errors::{ErrorInfo, FttError};
use serde::{Deserialize, Serialize};

/// Primary selection and unit conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Absolute PDG identifier of the primaries (default: lightest neutralino).
    #[serde(default = "default_primary_pdg_id")]
    pub primary_pdg_id: i32,
    /// Generator status of the primaries (default: outgoing from the hard process).
    #[serde(default = "default_primary_status")]
    pub primary_status: i32,
    /// Factor converting native momenta (MeV) to reporting units (GeV).
    #[serde(default = "default_momentum_scale")]
    pub momentum_scale: f64,
    /// Factor applied to the decay radius.
    #[serde(default = "default_radius_scale")]
    pub radius_scale: f64,
    /// Factor applied to the lab-frame lifetime.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Speed of light used in the lifetime denominator.
    #[serde(default = "default_speed_of_light")]
    pub speed_of_light: f64,
}

fn default_primary_pdg_id() -> i32 {
    1_000_022
}

fn default_primary_status() -> i32 {
    22
}

fn default_momentum_scale() -> f64 {
    1e-3
}

fn default_radius_scale() -> f64 {
    0.1
}

fn default_time_scale() -> f64 {
    1e-3
}

fn default_speed_of_light() -> f64 {
    299_792_458.0
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            primary_pdg_id: default_primary_pdg_id(),
            primary_status: default_primary_status(),
            momentum_scale: default_momentum_scale(),
            radius_scale: default_radius_scale(),
            time_scale: default_time_scale(),
            speed_of_light: default_speed_of_light(),
        }
    }
}

impl SelectionConfig {
    /// Checks that every scale factor is finite and strictly positive.
    pub fn validate(&self) -> Result<(), FttError> {
        let factors = [
            ("momentum_scale", self.momentum_scale),
            ("radius_scale", self.radius_scale),
            ("time_scale", self.time_scale),
            ("speed_of_light", self.speed_of_light),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value <= 0.0 {
                return Err(FttError::Config(
                    ErrorInfo::new("invalid-scale", "scale factors must be finite and positive")
                        .with_context("field", name)
                        .with_context("value", value.to_string()),
                ));
            }
        }
        Ok(())
    }
}
