//! Custom business events (prison transfers, tier updates, ...).
//!
//! In production the events are structured log lines under the
//! `telemetry` target, which the log shipper forwards as custom events.

use std::collections::BTreeMap;
use std::sync::Mutex;

use log::info;

pub type TelemetryProperties = BTreeMap<String, String>;

pub trait TelemetryClient: Send + Sync {
    fn track_event(&self, name: &str, properties: TelemetryProperties);
}

/// Builds a property map from `(key, value)` pairs.
pub fn properties<const N: usize>(pairs: [(&str, &str); N]) -> TelemetryProperties {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Default)]
pub struct LogTelemetryClient;

impl TelemetryClient for LogTelemetryClient {
    fn track_event(&self, name: &str, properties: TelemetryProperties) {
        let rendered = serde_json::to_string(&properties).unwrap_or_default();
        info!(target: "telemetry", "{} {}", name, rendered);
    }
}

/// Keeps every tracked event in memory.
#[derive(Default)]
pub struct RecordingTelemetryClient {
    events: Mutex<Vec<(String, TelemetryProperties)>>,
}

impl RecordingTelemetryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, TelemetryProperties)> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events().into_iter().map(|(name, _)| name).collect()
    }
}

impl TelemetryClient for RecordingTelemetryClient {
    fn track_event(&self, name: &str, properties: TelemetryProperties) {
        if let Ok(mut events) = self.events.lock() {
            events.push((name.to_string(), properties));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_client_keeps_events_in_order() {
        let client = RecordingTelemetryClient::new();

        client.track_event("First", properties([("crn", "X320741")]));
        client.track_event("Second", TelemetryProperties::new());

        assert_eq!(client.event_names(), vec!["First", "Second"]);
        assert_eq!(client.events()[0].1.get("crn").map(String::as_str), Some("X320741"));
    }
}
