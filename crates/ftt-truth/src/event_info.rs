use serde::{Deserialize, Serialize};

/// Per-event metadata stored alongside the truth record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    /// Event number assigned by the generator.
    pub event_number: u64,
    /// Run number.
    pub run_number: u32,
    /// Monte Carlo dataset channel.
    pub mc_channel_number: u32,
    /// Nominal Monte Carlo event weight.
    pub mc_event_weight: f64,
}

impl EventInfo {
    /// Metadata carrying only an event number.
    pub fn numbered(event_number: u64) -> Self {
        Self {
            event_number,
            run_number: 0,
            mc_channel_number: 0,
            mc_event_weight: 1.0,
        }
    }
}
