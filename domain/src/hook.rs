//! Out-of-band hook payloads
//!
//! Wake and isolated agent-turn requests bypass the chat pipeline and are
//! forwarded to the local hook endpoints. The payload structs serialize
//! directly into the JSON bodies those endpoints expect; absent optional
//! fields are omitted, never sent as `null`.

use serde::{Deserialize, Serialize};

/// Display name used for agent turns that do not carry one.
pub const DEFAULT_AGENT_NAME: &str = "Relay";

/// Which local hook endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Wake,
    Agent,
}

impl HookKind {
    /// Path segment appended to the hook base path.
    pub fn path(&self) -> &'static str {
        match self {
            HookKind::Wake => "wake",
            HookKind::Agent => "agent",
        }
    }
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// When a wake request should be delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WakeMode {
    #[default]
    Now,
    NextHeartbeat,
}

/// Wake request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakePayload {
    pub text: String,
    #[serde(default)]
    pub mode: WakeMode,
}

impl WakePayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: WakeMode::Now,
        }
    }
}

/// Isolated agent-turn payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTurnPayload {
    pub message: String,
    #[serde(default = "default_agent_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Reasoning-effort hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliver: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

fn default_agent_name() -> String {
    DEFAULT_AGENT_NAME.to_string()
}

impl AgentTurnPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            name: default_agent_name(),
            model: None,
            thinking: None,
            timeout_seconds: None,
            deliver: None,
            channel: None,
            to: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wake_mode_defaults_to_now() {
        let payload: WakePayload = serde_json::from_value(json!({"text": "ping"})).unwrap();
        assert_eq!(payload.mode, WakeMode::Now);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, json!({"text": "ping", "mode": "now"}));
    }

    #[test]
    fn wake_mode_next_heartbeat_is_kebab_case() {
        let payload: WakePayload =
            serde_json::from_value(json!({"text": "x", "mode": "next-heartbeat"})).unwrap();
        assert_eq!(payload.mode, WakeMode::NextHeartbeat);
    }

    #[test]
    fn agent_payload_omits_absent_fields() {
        let payload: AgentTurnPayload =
            serde_json::from_value(json!({"message": "summarize"})).unwrap();
        assert_eq!(payload.name, DEFAULT_AGENT_NAME);

        let json = serde_json::to_value(&payload).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(json["message"], "summarize");
        assert_eq!(json["name"], "Relay");
        assert!(obj.values().all(|v| !v.is_null()));
    }

    #[test]
    fn agent_payload_keeps_secondary_fields() {
        let mut payload = AgentTurnPayload::new("run report");
        payload.model = Some("fast".into());
        payload.timeout_seconds = Some(120);
        payload.deliver = Some(true);
        payload.channel = Some("relay".into());
        payload.to = Some("user1".into());

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["timeoutSeconds"], 120);
        assert_eq!(json["deliver"], true);
        assert_eq!(json["to"], "user1");
        assert!(json.get("thinking").is_none());
    }
}
