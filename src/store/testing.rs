//! Backend wrapper that can fail or hold operations on demand.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex};

use super::{AdminCredential, RecordBackend};
use crate::errors::AppError;
use crate::models::{
    Event, EventDraft, NewsDraft, NewsItem, Resource, ResourceDraft, SiteConfig, SiteConfigPatch,
};

pub(crate) struct ScriptedBackend {
    inner: Arc<dyn RecordBackend>,
    /// Reads that reached this backend, failed or not
    pub reads: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    held_update: Mutex<Option<(String, oneshot::Receiver<()>)>>,
}

impl ScriptedBackend {
    pub fn new(inner: Arc<dyn RecordBackend>) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            held_update: Mutex::new(None),
        }
    }

    /// Hold the next update of a resource in `category` until the returned sender fires.
    pub async fn hold_resource_update(&self, category: &str) -> oneshot::Sender<()> {
        let (release, held) = oneshot::channel();
        *self.held_update.lock().await = Some((category.to_string(), held));
        release
    }

    fn read_guard(&self) -> Result<(), AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(AppError::Database("unable to open database file".to_string()))
        } else {
            Ok(())
        }
    }

    fn write_guard(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(AppError::Database("database is locked".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        self.read_guard()?;
        self.inner.list_events().await
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event, AppError> {
        self.write_guard()?;
        self.inner.create_event(draft).await
    }

    async fn update_event(&self, event: &Event) -> Result<(), AppError> {
        self.write_guard()?;
        self.inner.update_event(event).await
    }

    async fn delete_event(&self, id: &str) -> Result<(), AppError> {
        self.write_guard()?;
        self.inner.delete_event(id).await
    }

    async fn list_news(&self) -> Result<Vec<NewsItem>, AppError> {
        self.read_guard()?;
        self.inner.list_news().await
    }

    async fn create_news(&self, draft: &NewsDraft) -> Result<NewsItem, AppError> {
        self.write_guard()?;
        self.inner.create_news(draft).await
    }

    async fn update_news(&self, item: &NewsItem) -> Result<(), AppError> {
        self.write_guard()?;
        self.inner.update_news(item).await
    }

    async fn delete_news(&self, id: &str) -> Result<(), AppError> {
        self.write_guard()?;
        self.inner.delete_news(id).await
    }

    async fn list_resources(&self) -> Result<Vec<Resource>, AppError> {
        self.read_guard()?;
        self.inner.list_resources().await
    }

    async fn create_resource(&self, draft: &ResourceDraft) -> Result<Resource, AppError> {
        self.write_guard()?;
        self.inner.create_resource(draft).await
    }

    async fn update_resource(&self, resource: &Resource) -> Result<(), AppError> {
        self.write_guard()?;

        let held = {
            let mut slot = self.held_update.lock().await;
            match slot.take() {
                Some((category, held)) if category == resource.category => Some(held),
                other => {
                    *slot = other;
                    None
                }
            }
        };
        if let Some(held) = held {
            let _ = held.await;
        }

        self.inner.update_resource(resource).await
    }

    async fn delete_resource(&self, id: &str) -> Result<(), AppError> {
        self.write_guard()?;
        self.inner.delete_resource(id).await
    }

    async fn load_site_config(&self) -> Result<Option<SiteConfig>, AppError> {
        self.read_guard()?;
        self.inner.load_site_config().await
    }

    async fn merge_site_config(&self, patch: &SiteConfigPatch) -> Result<(), AppError> {
        self.write_guard()?;
        self.inner.merge_site_config(patch).await
    }

    async fn find_admin(&self, username: &str) -> Result<Option<AdminCredential>, AppError> {
        self.inner.find_admin(username).await
    }

    async fn upsert_admin(&self, credential: &AdminCredential) -> Result<(), AppError> {
        self.inner.upsert_admin(credential).await
    }
}
