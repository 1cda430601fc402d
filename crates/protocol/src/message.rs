//! Command and acknowledgment frames.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One command received from the controller.
///
/// The wire shape is `{"action": "...", ...verb-specific fields}` with an
/// optional `"id"` correlation token. Verb-specific fields are kept as a raw
/// map and decoded per-verb via [`params`](Self::params); a command is
/// immutable once parsed and is discarded after its ack is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Verb naming the requested operation
    pub action: String,
    /// Correlation token echoed in the acknowledgment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Verb-specific fields, decoded by the matching handler
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl Command {
    /// Creates a command with no parameters, mainly for tests and tooling.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            id: None,
            params: Map::new(),
        }
    }

    /// Decodes the verb-specific fields into a typed parameter struct.
    pub fn params<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.params.clone()))
    }
}

/// Parameters of the `launch` verb.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LaunchParams {
    /// Package or program identifier to launch; empty when omitted
    #[serde(default)]
    pub package: String,
}

/// Parameters of the `toast` verb.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToastParams {
    /// Text to display; empty when omitted
    #[serde(default)]
    pub text: String,
}

/// Parameters of the `tap` verb.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TapParams {
    /// X coordinate in screen pixels
    pub x: f32,
    /// Y coordinate in screen pixels
    pub y: f32,
    /// Milliseconds to wait before the tap
    #[serde(default)]
    pub delay_ms: u64,
}

/// Parameters of the `tap_sequence` verb.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TapSequenceParams {
    /// Steps in execution order
    pub steps: Vec<crate::ActionStep>,
}

/// Structured acknowledgment of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Verb of the command being acknowledged
    pub action: String,
    /// Whether the handler accepted/performed the command
    pub ok: bool,
    /// Short human-readable outcome
    pub msg: String,
    /// Correlation token copied from the command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Ack {
    /// Creates a successful acknowledgment.
    pub fn ok(action: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ok: true,
            msg: msg.into(),
            id: None,
        }
    }

    /// Creates a failed acknowledgment.
    pub fn fail(action: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ok: false,
            msg: msg.into(),
            id: None,
        }
    }

    /// Attaches the correlation token to echo back.
    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }
}

/// Tagged envelope for agent-to-controller frames.
///
/// The device snapshot is the one outbound frame sent bare, for controller
/// wire compatibility; everything else carries a `"type"` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    /// Acknowledgment of one dispatched command
    Ack(Ack),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_parse_keeps_verb_fields() {
        let cmd: Command =
            serde_json::from_str(r#"{"action":"launch","package":"com.example.app"}"#).unwrap();
        assert_eq!(cmd.action, "launch");
        assert_eq!(cmd.id, None);
        let params: LaunchParams = cmd.params().unwrap();
        assert_eq!(params.package, "com.example.app");
    }

    #[test]
    fn command_parse_captures_correlation_id() {
        let cmd: Command =
            serde_json::from_str(r#"{"action":"toast","text":"hi","id":"c-7"}"#).unwrap();
        assert_eq!(cmd.id.as_deref(), Some("c-7"));
        assert!(!cmd.params.contains_key("id"));
    }

    #[test]
    fn command_without_action_is_rejected() {
        let err = serde_json::from_str::<Command>(r#"{"package":"x"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn tap_sequence_params_decode() {
        let cmd: Command = serde_json::from_value(json!({
            "action": "tap_sequence",
            "steps": [{"x": 10.0, "y": 20.0}, {"x": 10.0, "y": 20.0, "delay_ms": 1000}]
        }))
        .unwrap();
        let params: TapSequenceParams = cmd.params().unwrap();
        assert_eq!(params.steps.len(), 2);
        assert_eq!(params.steps[0].delay_ms, 0);
        assert_eq!(params.steps[1].delay_ms, 1000);
    }

    #[test]
    fn ack_wire_shape_is_tagged() {
        let ack = Ack::ok("launch", "launched com.example.app");
        let value = serde_json::to_value(Outbound::Ack(ack)).unwrap();
        assert_eq!(
            value,
            json!({"type": "ack", "action": "launch", "ok": true, "msg": "launched com.example.app"})
        );
    }

    #[test]
    fn ack_round_trip_preserves_triple() {
        let sent = Outbound::Ack(Ack::fail("launch", "no package").with_id(Some("9".into())));
        let text = serde_json::to_string(&sent).unwrap();
        let Outbound::Ack(back) = serde_json::from_str(&text).unwrap();
        assert_eq!(back.action, "launch");
        assert!(!back.ok);
        assert_eq!(back.msg, "no package");
        assert_eq!(back.id.as_deref(), Some("9"));
    }

    #[test]
    fn ack_omits_missing_id() {
        let text = serde_json::to_string(&Outbound::Ack(Ack::ok("toast", "ok"))).unwrap();
        assert!(!text.contains("\"id\""));
    }
}
