//! Cached unit for the singleton site configuration.

use std::sync::Arc;

use super::{settle, MutationOutcome};
use crate::cache::{Query, QueryClient, QueryView};
use crate::models::{RecordKind, SiteConfig, SiteConfigPatch};
use crate::notify::{MutationAction, Notifier};
use crate::store::RecordStore;

pub struct SiteConfigData {
    store: RecordStore,
    client: Arc<QueryClient>,
    notifier: Arc<dyn Notifier>,
    query: Query<SiteConfig>,
}

impl SiteConfigData {
    pub fn new(store: RecordStore, client: Arc<QueryClient>, notifier: Arc<dyn Notifier>) -> Self {
        let query = Query::new(RecordKind::SiteConfig, Arc::clone(&client));
        Self {
            store,
            client,
            notifier,
            query,
        }
    }

    /// Before the first successful fetch the view carries the default configuration.
    pub async fn read(&self) -> QueryView<SiteConfig> {
        let store = &self.store;
        self.query.read(|| store.try_fetch_site_config()).await
    }

    #[cfg(test)]
    pub async fn status(&self) -> crate::cache::QueryStatus {
        self.query.status().await
    }

    pub async fn update(&self, patch: &SiteConfigPatch) -> MutationOutcome {
        let ok = self.store.update_site_config(patch).await;
        settle(
            &self.client,
            self.notifier.as_ref(),
            RecordKind::SiteConfig,
            MutationAction::Update,
            ok,
        )
    }
}
