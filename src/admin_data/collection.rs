//! Cached collection units for events, news and resources.

use std::sync::Arc;

use async_trait::async_trait;

use super::{settle, MutationOutcome};
use crate::cache::{Query, QueryClient, QueryView};
use crate::errors::AppError;
use crate::models::{Event, EventDraft, NewsDraft, NewsItem, RecordKind, Resource, ResourceDraft};
use crate::notify::{MutationAction, Notifier};
use crate::store::RecordStore;

/// A record type the dashboard manages as a collection.
#[async_trait]
pub trait ManagedCollection: Clone + Send + Sync + 'static {
    /// Fields submitted on creation
    type Draft: Send + Sync;

    const KIND: RecordKind;

    async fn fetch_all(store: &RecordStore) -> Result<Vec<Self>, AppError>;
    async fn create(store: &RecordStore, draft: &Self::Draft) -> bool;
    async fn update(store: &RecordStore, record: &Self) -> bool;
    async fn delete(store: &RecordStore, id: &str) -> bool;
}

/// Cached reads and invalidating mutations for one collection.
pub struct CollectionData<T: ManagedCollection> {
    store: RecordStore,
    client: Arc<QueryClient>,
    notifier: Arc<dyn Notifier>,
    query: Query<Vec<T>>,
}

impl<T: ManagedCollection> CollectionData<T> {
    pub fn new(store: RecordStore, client: Arc<QueryClient>, notifier: Arc<dyn Notifier>) -> Self {
        let query = Query::new(T::KIND, Arc::clone(&client));
        Self {
            store,
            client,
            notifier,
            query,
        }
    }

    /// Serve the cached collection, fetching from the store when stale.
    ///
    /// A store failure shows the last good data (empty if none) with `is_error` set, and the next
    /// read tries the store again.
    pub async fn read(&self) -> QueryView<Vec<T>> {
        let store = &self.store;
        self.query.read(|| T::fetch_all(store)).await
    }

    #[cfg(test)]
    pub async fn status(&self) -> crate::cache::QueryStatus {
        self.query.status().await
    }

    pub async fn create(&self, draft: &T::Draft) -> MutationOutcome {
        let ok = T::create(&self.store, draft).await;
        self.settle(MutationAction::Create, ok)
    }

    pub async fn update(&self, record: &T) -> MutationOutcome {
        let ok = T::update(&self.store, record).await;
        self.settle(MutationAction::Update, ok)
    }

    pub async fn delete(&self, id: &str) -> MutationOutcome {
        let ok = T::delete(&self.store, id).await;
        self.settle(MutationAction::Delete, ok)
    }

    fn settle(&self, action: MutationAction, ok: bool) -> MutationOutcome {
        settle(&self.client, self.notifier.as_ref(), T::KIND, action, ok)
    }
}

#[async_trait]
impl ManagedCollection for Event {
    type Draft = EventDraft;
    const KIND: RecordKind = RecordKind::Events;

    async fn fetch_all(store: &RecordStore) -> Result<Vec<Self>, AppError> {
        store.try_fetch_events().await
    }

    async fn create(store: &RecordStore, draft: &EventDraft) -> bool {
        store.create_event(draft).await
    }

    async fn update(store: &RecordStore, record: &Self) -> bool {
        store.update_event(record).await
    }

    async fn delete(store: &RecordStore, id: &str) -> bool {
        store.delete_event(id).await
    }
}

#[async_trait]
impl ManagedCollection for NewsItem {
    type Draft = NewsDraft;
    const KIND: RecordKind = RecordKind::News;

    async fn fetch_all(store: &RecordStore) -> Result<Vec<Self>, AppError> {
        store.try_fetch_news().await
    }

    async fn create(store: &RecordStore, draft: &NewsDraft) -> bool {
        store.create_news(draft).await
    }

    async fn update(store: &RecordStore, record: &Self) -> bool {
        store.update_news(record).await
    }

    async fn delete(store: &RecordStore, id: &str) -> bool {
        store.delete_news(id).await
    }
}

#[async_trait]
impl ManagedCollection for Resource {
    type Draft = ResourceDraft;
    const KIND: RecordKind = RecordKind::Resources;

    async fn fetch_all(store: &RecordStore) -> Result<Vec<Self>, AppError> {
        store.try_fetch_resources().await
    }

    async fn create(store: &RecordStore, draft: &ResourceDraft) -> bool {
        store.create_resource(draft).await
    }

    async fn update(store: &RecordStore, record: &Self) -> bool {
        store.update_resource(record).await
    }

    async fn delete(store: &RecordStore, id: &str) -> bool {
        store.delete_resource(id).await
    }
}
