//! The audit event record and its `event` discriminant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// The kind of an audit event. A small set of names is recognized by
/// name; anything else round-trips through [`EventKind::Other`] rather
/// than being rejected, since the set of event kinds a downstream
/// consumer might log is open-ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Nav,
    Browse,
    ValidationFail,
    ConfigChange,
    BudgetDenied,
    Rotation,
    Other(String),
}

impl EventKind {
    fn as_str(&self) -> &str {
        match self {
            Self::Nav => "nav",
            Self::Browse => "browse",
            Self::ValidationFail => "validation_fail",
            Self::ConfigChange => "config_change",
            Self::BudgetDenied => "budget_denied",
            Self::Rotation => "rotation",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for EventKind {
    fn from(raw: &str) -> Self {
        match raw {
            "nav" => Self::Nav,
            "browse" => Self::Browse,
            "validation_fail" => Self::ValidationFail,
            "config_change" => Self::ConfigChange,
            "budget_denied" => Self::BudgetDenied,
            "rotation" => Self::Rotation,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(EventKind::from(raw.as_str()))
    }
}

/// A single append-only audit record. Fields beyond `timestamp`,
/// `session_id`, and `event` are optional and populated according to
/// what kind of event is being recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub session_id: Uuid,
    pub event: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl Event {
    /// Build a minimal event stamped with the process session id and the
    /// current UTC time. Optional fields default to `None`; set them with
    /// the builder-style `with_*` methods.
    pub fn new(kind: EventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id: crate::session::session_id(),
            event: kind,
            cost: None,
            model: None,
            input_tokens: None,
            output_tokens: None,
            files: None,
            reason: None,
            confidence: None,
            duration_ms: None,
            config: None,
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_event_kind_round_trips_through_json() {
        let json = serde_json::to_string(&EventKind::BudgetDenied).unwrap();
        assert_eq!(json, "\"budget_denied\"");
        let back: EventKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EventKind::BudgetDenied);
    }

    #[test]
    fn unrecognized_event_kind_round_trips_as_other() {
        let back: EventKind = serde_json::from_str("\"something_new\"").unwrap();
        assert_eq!(back, EventKind::Other("something_new".to_string()));
        assert_eq!(serde_json::to_string(&back).unwrap(), "\"something_new\"");
    }

    #[test]
    fn event_new_stamps_current_session() {
        let event = Event::new(EventKind::Nav);
        assert_eq!(event.session_id, crate::session::session_id());
        assert!(event.cost.is_none());
    }
}
