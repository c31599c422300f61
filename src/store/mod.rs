//! Record store adapter.
//!
//! Backends implement [`RecordBackend`] and report failures as `AppError`. [`RecordStore`] is the
//! boundary the dashboard talks to: it never propagates a backend failure, degrading reads to an
//! empty or default value and writes to `false`, and logging the cause. The cached dashboard
//! reads use the `try_fetch_*` variants so an outage is reported rather than cached as empty.

mod memory;
pub mod sample;
mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::{init_database, SqliteBackend};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::auth::TokenIssuer;
use crate::config::{Config, StoreBackend};
use crate::errors::AppError;
use crate::models::{
    Event, EventDraft, NewsDraft, NewsItem, RecordKind, Resource, ResourceDraft, SiteConfig,
    SiteConfigPatch,
};

/// Stored administrator credential. The password is only ever kept as a bcrypt hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredential {
    pub username: String,
    pub password_hash: String,
}

/// Persistence operations shared by the in-memory and SQLite backends.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn list_events(&self) -> Result<Vec<Event>, AppError>;
    async fn create_event(&self, draft: &EventDraft) -> Result<Event, AppError>;
    /// Replace every mutable field. Unknown ids are a no-op.
    async fn update_event(&self, event: &Event) -> Result<(), AppError>;
    /// Unknown ids are a no-op.
    async fn delete_event(&self, id: &str) -> Result<(), AppError>;

    async fn list_news(&self) -> Result<Vec<NewsItem>, AppError>;
    async fn create_news(&self, draft: &NewsDraft) -> Result<NewsItem, AppError>;
    async fn update_news(&self, item: &NewsItem) -> Result<(), AppError>;
    async fn delete_news(&self, id: &str) -> Result<(), AppError>;

    async fn list_resources(&self) -> Result<Vec<Resource>, AppError>;
    async fn create_resource(&self, draft: &ResourceDraft) -> Result<Resource, AppError>;
    async fn update_resource(&self, resource: &Resource) -> Result<(), AppError>;
    async fn delete_resource(&self, id: &str) -> Result<(), AppError>;

    /// `None` when no configuration has been persisted yet.
    async fn load_site_config(&self) -> Result<Option<SiteConfig>, AppError>;
    /// Merge the patch onto the stored configuration, or onto the default if none exists.
    async fn merge_site_config(&self, patch: &SiteConfigPatch) -> Result<(), AppError>;

    async fn find_admin(&self, username: &str) -> Result<Option<AdminCredential>, AppError>;
    async fn upsert_admin(&self, credential: &AdminCredential) -> Result<(), AppError>;

    /// Release pooled resources on shutdown.
    async fn close(&self) {}
}

/// Outcome of an admin login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthResult {
    pub fn denied() -> Self {
        Self {
            success: false,
            token: None,
            expires_at: None,
        }
    }
}

/// Hash verified for unknown usernames so both paths cost one bcrypt verification.
static TIMING_GUARD_HASH: Lazy<String> = Lazy::new(|| {
    bcrypt::hash("nespak-timing-guard", bcrypt::DEFAULT_COST).unwrap_or_default()
});

/// The degrading CRUD boundary over a backend.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn RecordBackend>,
    tokens: Arc<TokenIssuer>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn RecordBackend>, tokens: Arc<TokenIssuer>) -> Self {
        Self { backend, tokens }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn tokens(&self) -> &Arc<TokenIssuer> {
        &self.tokens
    }

    /// Release backend resources. Later operations fail and degrade.
    pub async fn close(&self) {
        self.backend.close().await;
    }

    // ==================== EVENTS ====================

    /// Degrading read: a store failure yields an empty list.
    pub async fn fetch_events(&self) -> Vec<Event> {
        self.try_fetch_events().await.unwrap_or_default()
    }

    /// Read that reports store failures, for callers that must tell them apart from no data.
    pub async fn try_fetch_events(&self) -> Result<Vec<Event>, AppError> {
        logged_read(RecordKind::Events, self.backend.list_events().await)
    }

    pub async fn create_event(&self, draft: &EventDraft) -> bool {
        let result = self.backend.create_event(draft).await;
        if let Ok(event) = &result {
            tracing::debug!(id = %event.id, "Created event");
        }
        report_write(RecordKind::Events, "create", result)
    }

    pub async fn update_event(&self, event: &Event) -> bool {
        report_write(
            RecordKind::Events,
            "update",
            self.backend.update_event(event).await,
        )
    }

    pub async fn delete_event(&self, id: &str) -> bool {
        report_write(RecordKind::Events, "delete", self.backend.delete_event(id).await)
    }

    // ==================== NEWS ====================

    /// Degrading read: a store failure yields an empty list.
    pub async fn fetch_news(&self) -> Vec<NewsItem> {
        self.try_fetch_news().await.unwrap_or_default()
    }

    /// Read that reports store failures, for callers that must tell them apart from no data.
    pub async fn try_fetch_news(&self) -> Result<Vec<NewsItem>, AppError> {
        logged_read(RecordKind::News, self.backend.list_news().await)
    }

    pub async fn create_news(&self, draft: &NewsDraft) -> bool {
        let result = self.backend.create_news(draft).await;
        if let Ok(item) = &result {
            tracing::debug!(id = %item.id, "Created news item");
        }
        report_write(RecordKind::News, "create", result)
    }

    pub async fn update_news(&self, item: &NewsItem) -> bool {
        report_write(RecordKind::News, "update", self.backend.update_news(item).await)
    }

    pub async fn delete_news(&self, id: &str) -> bool {
        report_write(RecordKind::News, "delete", self.backend.delete_news(id).await)
    }

    // ==================== RESOURCES ====================

    /// Degrading read: a store failure yields an empty list.
    pub async fn fetch_resources(&self) -> Vec<Resource> {
        self.try_fetch_resources().await.unwrap_or_default()
    }

    /// Read that reports store failures, for callers that must tell them apart from no data.
    pub async fn try_fetch_resources(&self) -> Result<Vec<Resource>, AppError> {
        logged_read(RecordKind::Resources, self.backend.list_resources().await)
    }

    pub async fn create_resource(&self, draft: &ResourceDraft) -> bool {
        let result = self.backend.create_resource(draft).await;
        if let Ok(resource) = &result {
            tracing::debug!(id = %resource.id, "Created resource");
        }
        report_write(RecordKind::Resources, "create", result)
    }

    pub async fn update_resource(&self, resource: &Resource) -> bool {
        report_write(
            RecordKind::Resources,
            "update",
            self.backend.update_resource(resource).await,
        )
    }

    pub async fn delete_resource(&self, id: &str) -> bool {
        report_write(
            RecordKind::Resources,
            "delete",
            self.backend.delete_resource(id).await,
        )
    }

    // ==================== SITE CONFIG ====================

    /// Always yields a configuration; falls back to [`SiteConfig::default`].
    pub async fn fetch_site_config(&self) -> SiteConfig {
        self.try_fetch_site_config().await.unwrap_or_default()
    }

    /// The stored configuration or the default when none is persisted; store failures are errors.
    pub async fn try_fetch_site_config(&self) -> Result<SiteConfig, AppError> {
        let config = logged_read(
            RecordKind::SiteConfig,
            self.backend.load_site_config().await,
        )?;
        Ok(config.unwrap_or_default())
    }

    pub async fn update_site_config(&self, patch: &SiteConfigPatch) -> bool {
        report_write(
            RecordKind::SiteConfig,
            "update",
            self.backend.merge_site_config(patch).await,
        )
    }

    // ==================== ADMIN ====================

    /// Store an administrator credential, replacing any existing one for the username.
    pub async fn register_admin(&self, credential: &AdminCredential) -> Result<(), AppError> {
        self.backend.upsert_admin(credential).await
    }

    /// Check admin credentials. Bad credentials and backend failures both yield `success: false`.
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthResult {
        match self.try_authenticate(username, password).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Error authenticating admin");
                AuthResult::denied()
            }
        }
    }

    async fn try_authenticate(&self, username: &str, password: &str) -> Result<AuthResult, AppError> {
        let credential = self.backend.find_admin(username).await?;
        let known = credential.is_some();
        let hash = credential
            .map(|c| c.password_hash)
            .unwrap_or_else(|| TIMING_GUARD_HASH.clone());

        let password = password.to_owned();
        let verified =
            tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash).unwrap_or(false))
                .await?;

        if !(known && verified) {
            tracing::warn!(username = %username, "Rejected admin login");
            return Ok(AuthResult::denied());
        }

        let issued = self.tokens.issue(username)?;
        tracing::info!(username = %username, "Admin logged in");
        Ok(AuthResult {
            success: true,
            token: Some(issued.token),
            expires_at: Some(issued.expires_at),
        })
    }
}

fn logged_read<T>(kind: RecordKind, result: Result<T, AppError>) -> Result<T, AppError> {
    result.map_err(|e| {
        tracing::error!(kind = %kind, error = %e, "Error fetching records");
        e
    })
}

fn report_write<T>(kind: RecordKind, action: &str, result: Result<T, AppError>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(kind = %kind, action, error = %e, "Error writing record");
            false
        }
    }
}

/// Build the backend selected by configuration.
pub async fn open_backend(config: &Config) -> Result<Arc<dyn RecordBackend>, AppError> {
    match config.store_backend {
        StoreBackend::Mock => Ok(Arc::new(MemoryBackend::with_sample_data())),
        StoreBackend::Sqlite => {
            let pool = init_database(
                &config.db_path,
                config.db_max_connections,
                config.db_acquire_timeout,
            )
            .await?;
            let backend = SqliteBackend::new(pool);
            if config.seed_sample_data {
                backend.seed_if_empty().await?;
            }
            Ok(Arc::new(backend))
        }
    }
}

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;
