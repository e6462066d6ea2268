//! Host events that can be dispatched to the bootstrap handler.
//!
//! The extension runs no event loop of its own. A host forwards whatever its
//! event source produces through [`Extension::dispatch`](crate::Extension::dispatch).

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Events a host can deliver to the handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// A player joined. The handler receives the player name.
    PlayerAdded { player: String },

    /// Any other host-defined event. The handler receives the name and the
    /// payload converted to Lua values.
    Custom {
        name: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
}

impl HostEvent {
    /// Event name for logging and matching.
    pub fn name(&self) -> &str {
        match self {
            Self::PlayerAdded { .. } => "player_added",
            Self::Custom { name, .. } => name,
        }
    }

    /// Parse an event from JSON, e.g. `{"type": "player_added", "player": "ana"}`.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Arguments passed to the handler for this event.
    pub fn args(&self) -> Result<Vec<Value>, serde_json::Error> {
        match self {
            Self::PlayerAdded { player } => Ok(vec![Value::from(player.as_str())]),
            Self::Custom { name, payload } => Ok(vec![
                Value::from(name.as_str()),
                serde_json::from_value(payload.clone())?,
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_added() {
        let event = HostEvent::from_json(r#"{"type": "player_added", "player": "ana"}"#).unwrap();
        assert_eq!(event.name(), "player_added");
        assert_eq!(event.args().unwrap(), vec![Value::from("ana")]);
    }

    #[test]
    fn test_custom_payload() {
        let event = HostEvent::from_json(
            r#"{"type": "custom", "name": "round_end", "payload": {"winner": "bo", "score": 3}}"#,
        )
        .unwrap();
        assert_eq!(event.name(), "round_end");

        let args = event.args().unwrap();
        assert_eq!(args[0], Value::from("round_end"));
        let Value::Object(payload) = &args[1] else {
            panic!("expected object payload");
        };
        assert_eq!(payload.get("winner"), Some(&Value::from("bo")));
        assert_eq!(payload.get("score"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_custom_without_payload() {
        let event = HostEvent::from_json(r#"{"type": "custom", "name": "tick"}"#).unwrap();
        assert_eq!(event.args().unwrap(), vec![Value::from("tick"), Value::Null]);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(HostEvent::from_json(r#"{"type": "teleport"}"#).is_err());
    }
}
