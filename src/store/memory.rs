//! In-memory record backend for development and tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{sample, AdminCredential, RecordBackend};
use crate::auth::constant_time_compare;
use crate::errors::AppError;
use crate::models::{
    Event, EventDraft, NewsDraft, NewsItem, Resource, ResourceDraft, SiteConfig, SiteConfigPatch,
};

#[derive(Default)]
struct MemoryState {
    events: Vec<Event>,
    news: Vec<NewsItem>,
    resources: Vec<Resource>,
    site_config: Option<SiteConfig>,
    admins: Vec<AdminCredential>,
}

/// Process-local store. Records keep insertion order.
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

impl MemoryBackend {
    /// Empty store with no site configuration persisted.
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the fixed sample records.
    pub fn with_sample_data() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                events: sample::events(),
                news: sample::news(),
                resources: sample::resources(),
                site_config: Some(sample::site_config()),
                admins: Vec::new(),
            }),
        }
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl RecordBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        Ok(self.state.read().await.events.clone())
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event, AppError> {
        let event = draft.clone().with_id(new_id());
        self.state.write().await.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(&self, event: &Event) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(slot) = state.events.iter_mut().find(|e| e.id == event.id) {
            *slot = event.clone();
        }
        Ok(())
    }

    async fn delete_event(&self, id: &str) -> Result<(), AppError> {
        self.state.write().await.events.retain(|e| e.id != id);
        Ok(())
    }

    async fn list_news(&self) -> Result<Vec<NewsItem>, AppError> {
        Ok(self.state.read().await.news.clone())
    }

    async fn create_news(&self, draft: &NewsDraft) -> Result<NewsItem, AppError> {
        let item = draft.clone().with_id(new_id());
        self.state.write().await.news.push(item.clone());
        Ok(item)
    }

    async fn update_news(&self, item: &NewsItem) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(slot) = state.news.iter_mut().find(|n| n.id == item.id) {
            *slot = item.clone();
        }
        Ok(())
    }

    async fn delete_news(&self, id: &str) -> Result<(), AppError> {
        self.state.write().await.news.retain(|n| n.id != id);
        Ok(())
    }

    async fn list_resources(&self) -> Result<Vec<Resource>, AppError> {
        Ok(self.state.read().await.resources.clone())
    }

    async fn create_resource(&self, draft: &ResourceDraft) -> Result<Resource, AppError> {
        let resource = draft.clone().with_id(new_id());
        self.state.write().await.resources.push(resource.clone());
        Ok(resource)
    }

    async fn update_resource(&self, resource: &Resource) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(slot) = state.resources.iter_mut().find(|r| r.id == resource.id) {
            *slot = resource.clone();
        }
        Ok(())
    }

    async fn delete_resource(&self, id: &str) -> Result<(), AppError> {
        self.state.write().await.resources.retain(|r| r.id != id);
        Ok(())
    }

    async fn load_site_config(&self) -> Result<Option<SiteConfig>, AppError> {
        Ok(self.state.read().await.site_config.clone())
    }

    async fn merge_site_config(&self, patch: &SiteConfigPatch) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let base = state.site_config.take().unwrap_or_default();
        state.site_config = Some(patch.clone().merge_onto(base));
        Ok(())
    }

    async fn find_admin(&self, username: &str) -> Result<Option<AdminCredential>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .admins
            .iter()
            .find(|a| constant_time_compare(&a.username, username))
            .cloned())
    }

    async fn upsert_admin(&self, credential: &AdminCredential) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.admins.retain(|a| a.username != credential.username);
        state.admins.push(credential.clone());
        Ok(())
    }
}
