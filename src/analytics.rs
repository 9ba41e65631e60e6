//! Interaction tracking.
//!
//! Records are pushed onto the page's data-layer queue, which is created if
//! absent. Tracking is strictly best-effort: a missing window, a foreign
//! value in the slot or a malformed record all end in a log line, never in
//! an error surfacing to the caller.

use crate::config::AnalyticsConfig;
use crate::dom::{Document, DomError, SinkStatus};
use crate::{debug, error};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One interaction record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub event: String,
    pub action: String,
    pub category: String,
    pub label: String,
}

impl AnalyticsRecord {
    /// A record with the configured event, action and category.
    pub fn for_label(config: &AnalyticsConfig, label: &str) -> Self {
        Self {
            event: config.event.clone(),
            action: config.action.clone(),
            category: config.category.clone(),
            label: label.to_owned(),
        }
    }

    /// Record for the close control.
    pub fn close(config: &AnalyticsConfig) -> Self {
        Self::for_label(config, &config.close_label)
    }

    /// Record for the call-to-action control.
    pub fn cta(config: &AnalyticsConfig) -> Self {
        Self::for_label(config, &config.cta_label)
    }
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("record must be a non-empty object, got `{0}`")]
    Malformed(Value),
    #[error("record is not serializable: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("data layer rejected the record: {0}")]
    Sink(#[from] DomError),
}

/// Pushes records onto the page's data layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEmitter;

impl AnalyticsEmitter {
    pub fn new() -> Self {
        Self
    }

    /// Push `record`, returning whether it landed in the queue.
    ///
    /// The record is checked before the window: a malformed record is a
    /// bug in the caller and is reported even where tracking is absent.
    pub fn emit<M, D: Document<M>>(&self, doc: &mut D, record: &impl Serialize) -> bool {
        let entry = match to_entry(record) {
            Ok(entry) => entry,
            Err(e) => {
                error!("analytics"; "{}", e);
                return false;
            }
        };
        if !doc.has_window() {
            debug!("analytics"; "no window, record dropped");
            return false;
        }
        match doc.push_data_layer(&entry).map_err(EmitError::from) {
            Ok(SinkStatus::Pushed) => true,
            Ok(SinkStatus::Foreign) => {
                debug!("analytics"; "analytics unavailable, data layer is not a queue");
                false
            }
            Err(e) => {
                error!("analytics"; "{}", e);
                false
            }
        }
    }
}

/// Serialize `record`, requiring a non-empty JSON object.
fn to_entry(record: &impl Serialize) -> Result<Value, EmitError> {
    let value = serde_json::to_value(record)?;
    match &value {
        Value::Object(map) if !map.is_empty() => Ok(value),
        _ => Err(EmitError::Malformed(value)),
    }
}
