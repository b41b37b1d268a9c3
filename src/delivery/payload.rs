//! Wire envelope.
//!
//! Every event crosses the wire in the same envelope shape, regardless of
//! kind. The envelope's field names and the `payload_json` form encoding
//! are an external contract with the aggregator.

use crate::event::{ChangeEvent, EventPayload};
use serde::Serialize;

/// Name this pipeline reports in the envelope's `source` field.
const SOURCE_NAME: &str = "runetrack";

/// The JSON envelope POSTed to the webhook endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEnvelope {
    /// Wire discriminator, e.g. `LEVEL` or `PLAYER_SYNC`.
    #[serde(rename = "type")]
    pub kind: String,
    pub player_name: String,
    /// Identifies the producing pipeline to the aggregator.
    pub source: String,
    /// Event creation time, milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Flat per-kind payload object.
    pub extra: EventPayload,
}

impl WebhookEnvelope {
    /// Wraps an event for the wire.
    pub fn from_event(event: ChangeEvent) -> Self {
        Self {
            kind: event.kind.wire_type().to_string(),
            player_name: event.player,
            source: SOURCE_NAME.to_string(),
            timestamp: event.timestamp_ms,
            extra: event.payload,
        }
    }

    /// Serializes the envelope to the JSON string carried in the
    /// `payload_json` form field.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, HeartbeatPayload, SkillPayload};

    #[test]
    fn envelope_carries_wire_contract_fields() {
        let event = ChangeEvent::new(
            EventKind::SkillUp,
            "Zezima",
            EventPayload::Skill(SkillPayload {
                skill: "Woodcutting".into(),
                level: 51,
                xp: 1_050_000,
                xp_gained: 50_000,
                levels_gained: 1,
            }),
        );
        let timestamp = event.timestamp_ms;

        let envelope = WebhookEnvelope::from_event(event);
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["type"], "LEVEL");
        assert_eq!(value["playerName"], "Zezima");
        assert_eq!(value["source"], "runetrack");
        assert_eq!(value["timestamp"], timestamp);
        assert_eq!(value["extra"]["skill"], "Woodcutting");
        assert_eq!(value["extra"]["levelsGained"], 1);
    }

    #[test]
    fn payload_object_is_flat() {
        let event = ChangeEvent::new(
            EventKind::Heartbeat,
            "Zezima",
            EventPayload::Heartbeat(HeartbeatPayload {
                status: "online".into(),
            }),
        );

        let value = serde_json::to_value(WebhookEnvelope::from_event(event)).unwrap();
        // No variant wrapper around the payload.
        assert_eq!(value["extra"], serde_json::json!({ "status": "online" }));
    }

    #[test]
    fn to_json_produces_parseable_output() {
        let event = ChangeEvent::new(
            EventKind::Heartbeat,
            "Zezima",
            EventPayload::Heartbeat(HeartbeatPayload {
                status: "online".into(),
            }),
        );

        let json = WebhookEnvelope::from_event(event).to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["type"], "HEARTBEAT");
    }
}
