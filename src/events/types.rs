//! Record types of the mutation event log stored at `.intered/events.ndjson`.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// The type of event being logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Created,
    Updated,
    Deleted,
}

enum_display_fromstr!(
    EventType,
    crate::error::InterEdError::invalid_event_type,
    {
        Created => "created",
        Updated => "updated",
        Deleted => "deleted",
    }
);

/// A mutation event record
///
/// One successful create, update, or delete against the API. `data` holds
/// the payload that was sent (empty for deletes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// ISO 8601 timestamp with milliseconds
    pub timestamp: String,

    pub event_type: EventType,

    /// Collection the entity belongs to, e.g. `students`
    pub collection: String,

    pub entity_id: EntityId,

    pub data: serde_json::Value,
}

impl Event {
    /// Create a new event with the current timestamp
    pub fn new(
        event_type: EventType,
        collection: impl Into<String>,
        entity_id: EntityId,
        data: serde_json::Value,
    ) -> Self {
        Self {
            timestamp: iso_timestamp_millis(),
            event_type,
            collection: collection.into(),
            entity_id,
            data,
        }
    }
}

/// Get the current timestamp in ISO 8601 format with milliseconds
fn iso_timestamp_millis() -> String {
    jiff::Timestamp::now()
        .strftime("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}
