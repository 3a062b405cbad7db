//! Core data types for the chaos dashboard
//!
//! These mirror the record shapes returned by the backend's list/get
//! endpoints. The backend itself is an external collaborator; only the
//! deserializable contract lives here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fault-injection event reported by the backend.
///
/// `finish_time` is absent while the event is still running; the chart
/// renders such events open-ended up to "now".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,

    /// Name of the experiment that produced this event
    pub experiment: String,

    /// UID of the experiment instance; one timeline lane per distinct value
    pub experiment_id: String,

    pub start_time: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<DateTime<Utc>>,
}

impl Event {
    /// Whether the event is still running (no finish time recorded)
    pub fn is_running(&self) -> bool {
        self.finish_time.is_none()
    }
}

/// An experiment definition record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    pub uid: String,
    pub name: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<String>,
}

/// An archived (finished and retired) experiment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archive {
    pub uid: String,
    pub name: String,
    pub kind: String,
    pub start_time: DateTime<Utc>,
    pub finish_time: DateTime<Utc>,
}

/// A scheduled experiment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub uid: String,
    pub name: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub cron: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_running_status() {
        let event = Event {
            id: 1,
            experiment: "network-delay".into(),
            experiment_id: "uid-1".into(),
            start_time: Utc::now(),
            finish_time: None,
        };
        assert!(event.is_running());

        let finished = Event {
            finish_time: Some(Utc::now()),
            ..event
        };
        assert!(!finished.is_running());
    }

    #[test]
    fn test_event_deserialize_without_finish_time() {
        let json = r#"{
            "id": 7,
            "experiment": "pod-kill",
            "experiment_id": "abc",
            "start_time": "2024-04-01T10:00:00Z"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.experiment, "pod-kill");
        assert!(event.finish_time.is_none());
    }
}
