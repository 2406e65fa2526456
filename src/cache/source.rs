use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{QueryCache, QueryKey, TAB_COUNTS};
use crate::entity::Entity;
use crate::error::Result;
use crate::remote::{CollectionBackend, decode, decode_all};
use crate::types::{EntityId, Vocabulary};

/// Bucket for records whose tab value is outside the vocabulary
pub const UNKNOWN_BUCKET: &str = "unknown";

/// Cached, typed read access to one entity collection
pub struct CollectionSource<E> {
    backend: Arc<dyn CollectionBackend>,
    cache: QueryCache,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for CollectionSource<E> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            cache: self.cache.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> CollectionSource<E> {
    pub fn new(backend: Arc<dyn CollectionBackend>, cache: QueryCache) -> Self {
        Self {
            backend,
            cache,
            _entity: PhantomData,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn backend(&self) -> &Arc<dyn CollectionBackend> {
        &self.backend
    }

    pub fn collection_key() -> QueryKey {
        QueryKey::Collection(E::COLLECTION.to_string())
    }

    pub fn entity_key(id: EntityId) -> QueryKey {
        QueryKey::Entity(E::COLLECTION.to_string(), id)
    }

    /// The full collection, from cache when present
    pub async fn fetch(&self) -> Result<Vec<E>> {
        let key = Self::collection_key();
        if let Some(Value::Array(values)) = self.cache.get(&key) {
            return decode_all(values);
        }
        self.refetch().await
    }

    /// The full collection, always from the backend
    pub async fn refetch(&self) -> Result<Vec<E>> {
        let values = self.backend.list(E::COLLECTION).await?;
        debug!(collection = E::COLLECTION, count = values.len(), "fetched collection");
        let records = decode_all(values.clone())?;
        self.cache.insert(Self::collection_key(), Value::Array(values));
        Ok(records)
    }

    /// One record by id, from cache when present
    pub async fn fetch_one(&self, id: EntityId) -> Result<E> {
        let key = Self::entity_key(id);
        if let Some(value) = self.cache.get(&key) {
            return decode(value);
        }
        let value = self.backend.get(E::COLLECTION, id).await?;
        let record = decode(value.clone())?;
        self.cache.insert(key, value);
        Ok(record)
    }

    /// Record count per tab value, in vocabulary order.
    ///
    /// Every vocabulary value is listed, zero counts included. Records with
    /// unknown values are counted under [`UNKNOWN_BUCKET`], which only
    /// appears when non-empty.
    pub async fn tab_counts(&self) -> Result<Vec<(String, usize)>> {
        let key = QueryKey::Aggregate(E::COLLECTION.to_string(), TAB_COUNTS);
        if let Some(value) = self.cache.get(&key)
            && let Ok(counts) = serde_json::from_value(value)
        {
            return Ok(counts);
        }

        let records = self.fetch().await?;
        let counts = count_tabs(&records);
        self.cache.insert(key, serde_json::to_value(&counts)?);
        Ok(counts)
    }
}

fn count_tabs<E: Entity>(records: &[E]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = <E::Tab as Vocabulary>::values()
        .iter()
        .map(|v| ((*v).to_string(), 0))
        .collect();
    let mut unknown = 0;

    for record in records {
        let tab = record.tab();
        match counts.iter_mut().find(|(v, _)| tab.is_known() && v == tab.as_str()) {
            Some((_, n)) => *n += 1,
            None => unknown += 1,
        }
    }

    if unknown > 0 {
        counts.push((UNKNOWN_BUCKET.to_string(), unknown));
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Agent;
    use crate::remote::MemoryBackend;

    const AGENTS: &str = r#"{"agents": [
        {"id": 1, "name": "Global Pathways", "email": "a@gp.com", "status": "active"},
        {"id": 2, "name": "Study Bridge", "email": "b@sb.com", "status": "active"},
        {"id": 3, "name": "EduLink", "email": "c@el.com", "status": "suspended"}
    ]}"#;

    fn source() -> (Arc<MemoryBackend>, CollectionSource<Agent>) {
        let backend = Arc::new(MemoryBackend::from_json(AGENTS).unwrap());
        let source = CollectionSource::new(backend.clone(), QueryCache::new());
        (backend, source)
    }

    #[tokio::test]
    async fn test_fetch_is_served_from_cache() {
        let (backend, source) = source();
        assert_eq!(source.fetch().await.unwrap().len(), 3);
        assert_eq!(source.fetch().await.unwrap().len(), 3);
        assert_eq!(backend.request_count(), 1);

        source.cache().invalidate_collection("agents");
        source.fetch().await.unwrap();
        assert_eq!(backend.request_count(), 2);
    }

    #[tokio::test]
    async fn test_tab_counts_include_zero_and_unknown() {
        let (_, source) = source();
        let counts = source.tab_counts().await.unwrap();
        assert_eq!(
            counts,
            vec![
                ("active".to_string(), 2),
                ("inactive".to_string(), 0),
                ("pending".to_string(), 0),
                ("unknown".to_string(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_one_not_found() {
        let (_, source) = source();
        let err = source.fetch_one(EntityId::new(42)).await.unwrap_err();
        assert_eq!(err.to_string(), "agents #42 not found");
    }
}
