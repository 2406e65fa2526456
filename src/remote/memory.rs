//! In-process backend.
//!
//! Holds collections as JSON arrays behind a lock and mimics the REST
//! contract: ids are assigned on create, updates merge the payload into the
//! stored record, missing ids are `NotFound`. Used by the test suite and by
//! `--fixtures` runs that work from a JSON file instead of a server.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{ApiError, CollectionBackend, Payload};
use crate::error::{InterEdError, Result};
use crate::types::EntityId;

#[derive(Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    requests: AtomicUsize,
    /// Response for the next request, as `(status, body)`
    fail_next: Mutex<Option<(u16, String)>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load collections from a JSON object of arrays:
    /// `{"students": [...], "agents": [...]}`
    pub fn from_json(json: &str) -> Result<Self> {
        let collections: HashMap<String, Vec<Value>> = serde_json::from_str(json)?;
        Ok(Self {
            collections: RwLock::new(collections),
            ..Self::default()
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Replace a collection with serialized records
    pub fn seed<T: Serialize>(&self, collection: &str, records: &[T]) -> Result<()> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.collections.write().insert(collection.to_string(), values);
        Ok(())
    }

    /// Number of requests served so far, failed ones included
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Make the next request fail with the given status and body
    pub fn fail_next(&self, status: u16, body: impl Into<String>) {
        *self.fail_next.lock() = Some((status, body.into()));
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Count the request and consume an injected failure, if any
    fn begin(&self, op: &str, collection: &str, id: Option<EntityId>) -> Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        debug!(op, collection, id = id.map(|i| i.get()), "memory backend request");

        match self.fail_next.lock().take() {
            Some((status, body)) => {
                let status = StatusCode::from_u16(status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                Err(ApiError::from_response(status, &body).into_error(collection, id))
            }
            None => Ok(()),
        }
    }
}

fn record_id(record: &Value) -> Option<u64> {
    record.get("id").and_then(Value::as_u64)
}

fn not_found(collection: &str, id: EntityId) -> InterEdError {
    InterEdError::NotFound {
        collection: collection.to_string(),
        id,
    }
}

#[async_trait]
impl CollectionBackend for MemoryBackend {
    async fn list(&self, collection: &str) -> Result<Vec<Value>> {
        self.begin("list", collection, None)?;
        Ok(self
            .collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: EntityId) -> Result<Value> {
        self.begin("get", collection, Some(id))?;
        self.collections
            .read()
            .get(collection)
            .and_then(|records| records.iter().find(|r| record_id(r) == Some(id.get())))
            .cloned()
            .ok_or_else(|| not_found(collection, id))
    }

    async fn create(&self, collection: &str, payload: &Payload) -> Result<Value> {
        self.begin("create", collection, None)?;
        let mut collections = self.collections.write();
        let records = collections.entry(collection.to_string()).or_default();

        let next_id = records.iter().filter_map(record_id).max().unwrap_or(0) + 1;
        let mut record = payload.clone();
        record.insert("id".to_string(), Value::from(next_id));

        let record = Value::Object(record);
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, collection: &str, id: EntityId, payload: &Payload) -> Result<Value> {
        self.begin("update", collection, Some(id))?;
        let mut collections = self.collections.write();
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id.get())))
            .ok_or_else(|| not_found(collection, id))?;

        if let Some(fields) = record.as_object_mut() {
            for (key, value) in payload {
                if key != "id" {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, collection: &str, id: EntityId) -> Result<()> {
        self.begin("delete", collection, Some(id))?;
        let mut collections = self.collections.write();
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;

        let before = records.len();
        records.retain(|r| record_id(r) != Some(id.get()));
        if records.len() == before {
            return Err(not_found(collection, id));
        }
        Ok(())
    }
}
