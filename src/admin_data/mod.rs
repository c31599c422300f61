//! Dashboard data layer.
//!
//! One unit per record kind composes the record store with a cached [`Query`]. Reads serve the
//! cached value while it is fresh. Mutations go straight to the store; on success they notify
//! and invalidate the kind, on failure they notify and leave the cache alone. Mutations are
//! neither queued nor coalesced, so racing writes resolve in whatever order the store applies
//! them.

mod collection;
mod site_config;

pub use collection::CollectionData;
pub use site_config::SiteConfigData;

use std::sync::Arc;

use serde::Serialize;

use crate::cache::QueryClient;
use crate::models::{Event, NewsItem, Resource};
use crate::notify::{MutationAction, Notification, Notifier};
use crate::store::RecordStore;

pub type EventsData = CollectionData<Event>;
pub type NewsData = CollectionData<NewsItem>;
pub type ResourcesData = CollectionData<Resource>;

/// Result of a mutation trigger, carrying the notification that was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    pub success: bool,
    pub notification: Notification,
}

/// Every dashboard data unit, sharing one query client and notifier.
#[derive(Clone)]
pub struct AdminData {
    pub events: Arc<EventsData>,
    pub news: Arc<NewsData>,
    pub resources: Arc<ResourcesData>,
    pub site_config: Arc<SiteConfigData>,
}

impl AdminData {
    pub fn new(store: RecordStore, notifier: Arc<dyn Notifier>) -> Self {
        let client = Arc::new(QueryClient::new());
        Self {
            events: Arc::new(CollectionData::new(
                store.clone(),
                Arc::clone(&client),
                Arc::clone(&notifier),
            )),
            news: Arc::new(CollectionData::new(
                store.clone(),
                Arc::clone(&client),
                Arc::clone(&notifier),
            )),
            resources: Arc::new(CollectionData::new(
                store.clone(),
                Arc::clone(&client),
                Arc::clone(&notifier),
            )),
            site_config: Arc::new(SiteConfigData::new(store, client, notifier)),
        }
    }
}

/// Shared mutation settlement: notify, and invalidate on success.
pub(crate) fn settle(
    client: &QueryClient,
    notifier: &dyn Notifier,
    kind: crate::models::RecordKind,
    action: MutationAction,
    succeeded: bool,
) -> MutationOutcome {
    let notification = if succeeded {
        client.invalidate(kind);
        Notification::success(kind, action)
    } else {
        Notification::failure(kind, action)
    };
    notifier.notify(notification.clone());
    MutationOutcome {
        success: succeeded,
        notification,
    }
}
