//! Capture event payload and the submission seam

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::BenchConfig;
use crate::utils::ClientError;

/// Value of the `test_type` property on generated events
pub const TEST_TYPE: &str = "stress_test";

/// A single analytics event
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CaptureEvent {
    pub distinct_id: String,
    pub event: String,
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl CaptureEvent {
    /// Build the load-test event for one task
    ///
    /// The payload depends only on the configuration and the generation
    /// time, never on the task ordinal.
    pub fn stress(config: &BenchConfig, now: DateTime<Utc>) -> Self {
        let mut properties = Map::new();
        properties.insert("timestamp".to_string(), Value::from(now.timestamp()));
        properties.insert("test_type".to_string(), Value::from(TEST_TYPE));

        Self {
            distinct_id: config.subject_id.clone(),
            event: config.event_name.clone(),
            properties,
            timestamp: Some(now),
        }
    }
}

/// Synchronous event submission capability
///
/// One instance is built before dispatch and shared read-only by all
/// workers, so implementations must tolerate concurrent `submit` calls.
pub trait EventSink: Send + Sync {
    /// Submit a single event; `Ok` means the endpoint accepted it
    fn submit(&self, event: &CaptureEvent) -> Result<(), ClientError>;
}
