//! Create, update and delete against the API, followed by invalidation.
//!
//! A mutation is never applied locally. Only after the server confirms it
//! does the dispatcher drop the affected cache keys and broadcast them, so
//! every open list re-fetches the server's view.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::cache::{CollectionSource, QueryCache, QueryKey};
use crate::entity::Entity;
use crate::error::Result;
use crate::events::{Event, EventLog, EventType};
use crate::remote::{CollectionBackend, Payload, decode};
use crate::types::EntityId;

pub struct MutationDispatcher<E> {
    backend: Arc<dyn CollectionBackend>,
    cache: QueryCache,
    log: Option<EventLog>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for MutationDispatcher<E> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            cache: self.cache.clone(),
            log: self.log.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> MutationDispatcher<E> {
    pub fn new(backend: Arc<dyn CollectionBackend>, cache: QueryCache) -> Self {
        Self {
            backend,
            cache,
            log: None,
            _entity: PhantomData,
        }
    }

    /// Dispatcher sharing a source's backend and cache
    pub fn for_source(source: &CollectionSource<E>) -> Self {
        Self::new(Arc::clone(source.backend()), source.cache().clone())
    }

    /// Record successful mutations in an event log
    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    /// `POST /api/{collection}`
    pub async fn create(&self, payload: &Payload) -> Result<E> {
        let value = self
            .backend
            .create(E::COLLECTION, payload)
            .await
            .inspect_err(|e| warn!(collection = E::COLLECTION, "create failed: {e}"))?;
        let record: E = decode(value)?;
        info!(collection = E::COLLECTION, id = %record.id(), "created");

        self.cache.invalidate_collection(E::COLLECTION);
        self.record(EventType::Created, record.id(), Value::Object(payload.clone()));
        Ok(record)
    }

    /// `PUT /api/{collection}/{id}`
    pub async fn update(&self, id: EntityId, payload: &Payload) -> Result<E> {
        let value = self
            .backend
            .update(E::COLLECTION, id, payload)
            .await
            .inspect_err(|e| warn!(collection = E::COLLECTION, %id, "update failed: {e}"))?;
        let record: E = decode(value)?;
        info!(collection = E::COLLECTION, %id, "updated");

        self.invalidate_entity(id);
        self.record(EventType::Updated, id, Value::Object(payload.clone()));
        Ok(record)
    }

    /// `DELETE /api/{collection}/{id}`
    pub async fn delete(&self, id: EntityId) -> Result<()> {
        self.backend
            .delete(E::COLLECTION, id)
            .await
            .inspect_err(|e| warn!(collection = E::COLLECTION, %id, "delete failed: {e}"))?;
        info!(collection = E::COLLECTION, %id, "deleted");

        self.invalidate_entity(id);
        self.record(EventType::Deleted, id, Value::Object(Payload::new()));
        Ok(())
    }

    fn invalidate_entity(&self, id: EntityId) {
        self.cache.invalidate_collection(E::COLLECTION);
        self.cache
            .invalidate(QueryKey::Entity(E::COLLECTION.to_string(), id));
    }

    fn record(&self, event_type: EventType, id: EntityId, data: Value) {
        if let Some(log) = &self.log {
            log.record(Event::new(event_type, E::COLLECTION, id, data));
        }
    }
}
