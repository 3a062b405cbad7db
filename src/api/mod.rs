//! Event source boundary
//!
//! The backend HTTP API is an external collaborator; this module defines the
//! trait the dashboard consumes plus a channel bridge that runs the fetch on
//! a background thread so the UI thread never blocks on network I/O. The
//! initial fetch is awaited (by polling the bridge) before the chart is
//! mounted; a failure leaves the UI in a loading-stalled state.

use crate::error::{DashboardError, Result};
use crate::types::Event;
use chrono::{Duration, Utc};
use crossbeam_channel::{bounded, Receiver};
use std::path::PathBuf;

/// A source of timeline events
pub trait EventSource: Send + 'static {
    /// Fetch the full event snapshot
    fn fetch_events(&self) -> Result<Vec<Event>>;
}

/// Event source backed by a local JSON file
///
/// Used for offline operation and integration tests; the file holds the same
/// record shapes the backend's `/events` endpoint returns.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for JsonFileSource {
    fn fetch_events(&self) -> Result<Vec<Event>> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            DashboardError::Api(format!("failed to read {:?}: {}", self.path, e))
        })?;
        let events = serde_json::from_str(&contents)?;
        Ok(events)
    }
}

/// Synthetic events covering the last hour, for running without a backend
pub struct DemoSource;

impl EventSource for DemoSource {
    fn fetch_events(&self) -> Result<Vec<Event>> {
        let now = Utc::now();
        let experiments = [
            ("network-delay", "c3f1a2"),
            ("pod-kill", "9b04d7"),
            ("stress-cpu", "51e8c0"),
        ];

        let mut events = Vec::new();
        let mut id = 0;
        for (i, (name, uid)) in experiments.iter().enumerate() {
            for j in 0..4 {
                id += 1;
                let start = now - Duration::minutes(55 - (i as i64 * 3 + j * 13));
                // Leave the newest event of each lane running
                let finish = (j < 3).then(|| start + Duration::minutes(5));
                events.push(Event {
                    id,
                    experiment: name.to_string(),
                    experiment_id: uid.to_string(),
                    start_time: start,
                    finish_time: finish,
                });
            }
        }
        events.sort_by_key(|e| e.start_time);
        Ok(events)
    }
}

/// Runs an [`EventSource`] on a background thread and delivers the result
/// over a channel polled from the UI thread.
pub struct FetchBridge {
    rx: Receiver<Result<Vec<Event>>>,
}

impl FetchBridge {
    /// Spawn the fetch thread
    pub fn spawn(source: impl EventSource) -> Self {
        let (tx, rx) = bounded(1);
        std::thread::spawn(move || {
            let result = source.fetch_events();
            if let Err(e) = &result {
                tracing::error!("Event fetch failed: {}", e);
            }
            // Receiver may be gone if the app shut down mid-fetch
            let _ = tx.send(result);
        });
        Self { rx }
    }

    /// Non-blocking poll for the fetch result
    pub fn try_recv(&self) -> Option<Result<Vec<Event>>> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_source_is_sorted_and_nonempty() {
        let events = DemoSource.fetch_events().unwrap();
        assert!(!events.is_empty());
        assert!(events.windows(2).all(|w| w[0].start_time <= w[1].start_time));
    }

    #[test]
    fn test_demo_source_has_running_events() {
        let events = DemoSource.fetch_events().unwrap();
        assert!(events.iter().any(|e| e.is_running()));
        assert!(events.iter().any(|e| !e.is_running()));
    }

    #[test]
    fn test_fetch_bridge_delivers_result() {
        let bridge = FetchBridge::spawn(DemoSource);
        // The fetch is synchronous on the worker; give it a moment
        let mut result = None;
        for _ in 0..100 {
            if let Some(r) = bridge.try_recv() {
                result = Some(r);
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        let events = result.expect("fetch result").expect("events");
        assert!(!events.is_empty());
    }

    #[test]
    fn test_json_file_source_missing_file_is_api_error() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        let err = source.fetch_events().unwrap_err();
        assert!(matches!(err, DashboardError::Api(_)));
    }
}
