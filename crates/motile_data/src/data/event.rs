use super::particle::ParticleId;
use serde::{Deserialize, Serialize};

/// Why a particle left the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    /// Consumed by another particle's Eating ability.
    Consumed { by: ParticleId },
    /// Energy reached zero.
    Starvation,
    /// Removed by the host application.
    External,
}

/// Tagged union of all lifecycle events emitted during a tick.
///
/// Serialised with `#[serde(tag = "event")]` for streaming JSONL output.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
pub enum LiveEvent {
    /// A particle was appended to the store (split or reproduction offspring).
    Birth {
        id: ParticleId,
        parent_id: Option<ParticleId>,
        generation: u32,
        tick: u64,
        x: f64,
        y: f64,
        parent_x: Option<f64>,
        parent_y: Option<f64>,
    },
    /// A particle was removed from the store.
    Death {
        id: ParticleId,
        cause: RemovalCause,
        tick: u64,
        x: f64,
        y: f64,
        radius: f64,
    },
}

impl LiveEvent {
    pub fn id(&self) -> ParticleId {
        match self {
            LiveEvent::Birth { id, .. } | LiveEvent::Death { id, .. } => *id,
        }
    }

    pub fn is_birth(&self) -> bool {
        matches!(self, LiveEvent::Birth { .. })
    }

    pub fn is_death(&self) -> bool {
        matches!(self, LiveEvent::Death { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_event_tag() {
        let event = LiveEvent::Death {
            id: ParticleId(3),
            cause: RemovalCause::Starvation,
            tick: 12,
            x: 1.0,
            y: 2.0,
            radius: 4.0,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"Death\""));
        assert!(json.contains("Starvation"));
    }
}
