//! A live list screen: controller state bound to a data source.
//!
//! The screen keeps the last fetched collection and listens on the cache's
//! invalidation bus. [`ListScreen::sync`] re-fetches when its collection was
//! invalidated, then re-anchors the controller (page clamp, selection prune).

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::cache::{CollectionSource, QueryKey};
use crate::display::Toast;
use crate::entity::Entity;
use crate::error::{InterEdError, Result};
use crate::list::{ListAction, ListController, ListView};
use crate::mutation::MutationDispatcher;
use crate::types::EntityId;

pub struct ListScreen<E: Entity> {
    source: CollectionSource<E>,
    controller: ListController<E>,
    records: Vec<E>,
    invalidations: broadcast::Receiver<QueryKey>,
    toast: Option<Toast>,
}

impl<E: Entity> ListScreen<E> {
    /// Subscribe to invalidations, then load the collection
    pub async fn open(source: CollectionSource<E>, controller: ListController<E>) -> Result<Self> {
        let invalidations = source.cache().subscribe();
        let records = source.fetch().await?;
        let mut screen = Self {
            source,
            controller,
            records,
            invalidations,
            toast: None,
        };
        screen.controller.on_collection_changed(&screen.records);
        Ok(screen)
    }

    pub fn source(&self) -> &CollectionSource<E> {
        &self.source
    }

    pub fn records(&self) -> &[E] {
        &self.records
    }

    pub fn controller(&self) -> &ListController<E> {
        &self.controller
    }

    pub fn view(&self) -> ListView<'_, E> {
        self.controller.view(&self.records)
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn take_toast(&mut self) -> Option<Toast> {
        self.toast.take()
    }

    /// Apply a controller action against the current collection
    pub fn dispatch(&mut self, action: ListAction) {
        self.controller.apply(action, &self.records);
    }

    /// Drain pending invalidations and re-fetch if this collection is stale.
    ///
    /// Returns whether a re-fetch happened. A failed re-fetch keeps the
    /// previous records and raises an error toast.
    pub async fn sync(&mut self) -> Result<bool> {
        let mut stale = false;
        loop {
            match self.invalidations.try_recv() {
                Ok(QueryKey::Collection(collection)) if collection == E::COLLECTION => {
                    stale = true;
                }
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "invalidation receiver lagged");
                    stale = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        if !stale {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Re-fetch unconditionally
    pub async fn refresh(&mut self) -> Result<()> {
        match self.source.refetch().await {
            Ok(records) => {
                self.records = records;
                self.controller.on_collection_changed(&self.records);
                Ok(())
            }
            Err(err) => {
                warn!(collection = E::COLLECTION, "refresh failed: {err}");
                self.toast = Some(Toast::error(format!("Failed to load {}: {err}", E::COLLECTION)));
                Err(err)
            }
        }
    }

    /// Delete every selected record, one request each.
    ///
    /// Continues past failures: each one is collected and reported, successful
    /// deletes stay deleted. The screen re-syncs afterwards.
    pub async fn delete_selected(
        &mut self,
        dispatcher: &MutationDispatcher<E>,
    ) -> Vec<(EntityId, InterEdError)> {
        let ids: Vec<EntityId> = self.controller.selected().iter().copied().collect();
        let mut failures = Vec::new();

        for id in &ids {
            if let Err(err) = dispatcher.delete(*id).await {
                failures.push((*id, err));
            }
        }

        let deleted = ids.len() - failures.len();
        self.toast = Some(if failures.is_empty() {
            Toast::success(format!("Deleted {deleted} {}", E::COLLECTION))
        } else {
            Toast::warning(format!(
                "Deleted {deleted} of {} {}; {} failed",
                ids.len(),
                E::COLLECTION,
                failures.len()
            ))
        });

        if deleted > 0
            && let Err(err) = self.sync().await
        {
            debug!("re-sync after delete failed: {err}");
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::QueryCache;
    use crate::entity::StaffMember;
    use crate::remote::MemoryBackend;

    const STAFF: &str = r#"{"staff": [
        {"id": 1, "name": "Nadia Rahman", "email": "nadia@intered.io", "role": "admin"},
        {"id": 2, "name": "Tom Okafor", "email": "tom@intered.io", "role": "counselor"},
        {"id": 3, "name": "Eva Lind", "email": "eva@intered.io", "role": "finance"}
    ]}"#;

    async fn screen() -> (Arc<MemoryBackend>, ListScreen<StaffMember>, MutationDispatcher<StaffMember>) {
        let backend = Arc::new(MemoryBackend::from_json(STAFF).unwrap());
        let source = CollectionSource::new(backend.clone(), QueryCache::new());
        let dispatcher = MutationDispatcher::for_source(&source);
        let screen = ListScreen::open(source, ListController::new(2)).await.unwrap();
        (backend, screen, dispatcher)
    }

    #[tokio::test]
    async fn test_sync_without_invalidation_is_noop() {
        let (backend, mut screen, _) = screen().await;
        assert!(!screen.sync().await.unwrap());
        assert_eq!(backend.request_count(), 1);
    }

    #[tokio::test]
    async fn test_mutation_triggers_refetch_and_clamp() {
        let (_, mut screen, dispatcher) = screen().await;
        screen.dispatch(ListAction::NextPage);
        assert_eq!(screen.view().rows.len(), 1);

        dispatcher.delete(EntityId::new(3)).await.unwrap();
        assert!(screen.sync().await.unwrap());

        assert_eq!(screen.records().len(), 2);
        assert_eq!(screen.controller().page(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_records_and_raises_toast() {
        let (backend, mut screen, _) = screen().await;
        backend.fail_next(503, "");
        assert!(screen.refresh().await.is_err());
        assert_eq!(screen.records().len(), 3);
        assert!(screen.take_toast().is_some());
    }

    #[tokio::test]
    async fn test_delete_selected_reports_failures() {
        let (_, mut screen, dispatcher) = screen().await;
        screen.dispatch(ListAction::SelectAll(vec![EntityId::new(1), EntityId::new(9)]));

        let failures = screen.delete_selected(&dispatcher).await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, EntityId::new(9));
        assert_eq!(screen.records().len(), 2);
        assert!(screen.controller().selected().is_empty());
    }
}
