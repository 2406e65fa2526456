//! Request cache with publish/subscribe invalidation.
//!
//! Responses are cached per [`QueryKey`] and stay valid until something
//! invalidates them; there is no expiry or eviction. Every invalidation is
//! also broadcast on the [`InvalidationBus`] so open screens can re-fetch.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

use crate::types::EntityId;

mod source;

pub use source::CollectionSource;

/// Capacity of the invalidation channel. Slow subscribers that fall behind
/// see `Lagged` and should refresh everything they show.
const INVALIDATION_CAPACITY: usize = 64;

/// Aggregate name of per-tab record counts
pub const TAB_COUNTS: &str = "tab_counts";

/// Identity of a cached query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The full list of a collection
    Collection(String),
    /// One record of a collection
    Entity(String, EntityId),
    /// A value derived from a collection, e.g. stage counts
    Aggregate(String, &'static str),
}

impl QueryKey {
    pub fn collection(&self) -> &str {
        match self {
            QueryKey::Collection(c) | QueryKey::Entity(c, _) | QueryKey::Aggregate(c, _) => c,
        }
    }
}

/// Broadcast channel carrying invalidated keys
#[derive(Clone)]
pub struct InvalidationBus {
    sender: broadcast::Sender<QueryKey>,
}

impl InvalidationBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(INVALIDATION_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueryKey> {
        self.sender.subscribe()
    }

    /// Publish an invalidated key. Having no subscribers is not an error.
    pub fn publish(&self, key: QueryKey) {
        let _ = self.sender.send(key);
    }
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared, concurrent request cache.
///
/// Cheap to clone; clones share entries and the bus.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<DashMap<QueryKey, Value>>,
    bus: InvalidationBus,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, key: QueryKey, value: Value) {
        self.entries.insert(key, value);
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bus(&self) -> &InvalidationBus {
        &self.bus
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueryKey> {
        self.bus.subscribe()
    }

    /// Drop one key and announce it
    pub fn invalidate(&self, key: QueryKey) {
        self.entries.remove(&key);
        debug!(?key, "invalidated");
        self.bus.publish(key);
    }

    /// Drop a collection list and every aggregate derived from it
    pub fn invalidate_collection(&self, collection: &str) {
        let aggregates: Vec<QueryKey> = self
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|key| matches!(key, QueryKey::Aggregate(c, _) if c == collection))
            .collect();

        self.invalidate(QueryKey::Collection(collection.to_string()));
        for key in aggregates {
            self.invalidate(key);
        }
    }
}
