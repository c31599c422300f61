//! SQLite record backend.
//!
//! Every statement binds its values; column names follow the snake_case mapping of the
//! frontend field names.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use super::{sample, AdminCredential, RecordBackend};
use crate::auth::constant_time_compare;
use crate::errors::AppError;
use crate::models::{
    Event, EventDraft, NewsDraft, NewsItem, Resource, ResourceDraft, SiteConfig, SiteConfigPatch,
};

/// Initialize the database connection pool and run migrations.
pub async fn init_database(
    db_path: &Path,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(acquire_timeout)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Create tables if they don't exist.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            location TEXT NOT NULL,
            image_url TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS news (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            date TEXT NOT NULL,
            summary TEXT NOT NULL,
            content TEXT NOT NULL,
            image_url TEXT,
            author TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resources (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            url TEXT NOT NULL,
            category TEXT NOT NULL,
            type TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS site_config (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            primary_color TEXT NOT NULL,
            secondary_color TEXT NOT NULL,
            accent_color TEXT NOT NULL,
            logo_url TEXT NOT NULL,
            banner_text TEXT,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admin_users (
            username TEXT PRIMARY KEY,
            password_hash TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_events_date ON events(date);
        CREATE INDEX IF NOT EXISTS idx_news_date ON news(date);
        CREATE INDEX IF NOT EXISTS idx_resources_category ON resources(category);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Pooled SQLite backend.
#[derive(Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the sample records into tables that have none.
    pub async fn seed_if_empty(&self) -> Result<(), AppError> {
        if self.count("events").await? == 0 {
            for event in sample::events() {
                self.insert_event(&event).await?;
            }
        }
        if self.count("news").await? == 0 {
            for item in sample::news() {
                self.insert_news(&item).await?;
            }
        }
        if self.count("resources").await? == 0 {
            for resource in sample::resources() {
                self.insert_resource(&resource).await?;
            }
        }
        if self.count("site_config").await? == 0 {
            let config = sample::site_config();
            let patch = SiteConfigPatch {
                primary_color: Some(config.primary_color),
                secondary_color: Some(config.secondary_color),
                accent_color: Some(config.accent_color),
                logo_url: Some(config.logo_url),
                banner_text: Some(config.banner_text),
            };
            self.merge_site_config(&patch).await?;
        }
        tracing::info!("Seeded sample records into empty tables");
        Ok(())
    }

    async fn count(&self, table: &'static str) -> Result<i64, AppError> {
        // Table names come from the fixed set above, never from input.
        let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    async fn insert_event(&self, event: &Event) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO events (id, title, date, description, location, image_url, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.id)
        .bind(&event.title)
        .bind(&event.date)
        .bind(&event.description)
        .bind(&event.location)
        .bind(&event.image_url)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_news(&self, item: &NewsItem) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO news (id, title, date, summary, content, image_url, author, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&item.title)
        .bind(&item.date)
        .bind(&item.summary)
        .bind(&item.content)
        .bind(&item.image_url)
        .bind(&item.author)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_resource(&self, resource: &Resource) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO resources (id, title, description, url, category, type, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&resource.id)
        .bind(&resource.title)
        .bind(&resource.description)
        .bind(&resource.url)
        .bind(&resource.category)
        .bind(&resource.resource_type)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl RecordBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    // ==================== EVENT OPERATIONS ====================

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, date, description, location, image_url FROM events ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(event_from_row).collect())
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event, AppError> {
        let event = draft.clone().with_id(new_id());
        self.insert_event(&event).await?;
        Ok(event)
    }

    async fn update_event(&self, event: &Event) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE events SET title = ?, date = ?, description = ?, location = ?, image_url = ? WHERE id = ?",
        )
        .bind(&event.title)
        .bind(&event.date)
        .bind(&event.description)
        .bind(&event.location)
        .bind(&event.image_url)
        .bind(&event.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(id = %event.id, "Update matched no event");
        }
        Ok(())
    }

    async fn delete_event(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== NEWS OPERATIONS ====================

    async fn list_news(&self) -> Result<Vec<NewsItem>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, date, summary, content, image_url, author FROM news ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(news_from_row).collect())
    }

    async fn create_news(&self, draft: &NewsDraft) -> Result<NewsItem, AppError> {
        let item = draft.clone().with_id(new_id());
        self.insert_news(&item).await?;
        Ok(item)
    }

    async fn update_news(&self, item: &NewsItem) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE news SET title = ?, date = ?, summary = ?, content = ?, image_url = ?, author = ? WHERE id = ?",
        )
        .bind(&item.title)
        .bind(&item.date)
        .bind(&item.summary)
        .bind(&item.content)
        .bind(&item.image_url)
        .bind(&item.author)
        .bind(&item.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(id = %item.id, "Update matched no news item");
        }
        Ok(())
    }

    async fn delete_news(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM news WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== RESOURCE OPERATIONS ====================

    async fn list_resources(&self) -> Result<Vec<Resource>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, description, url, category, type FROM resources ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(resource_from_row).collect())
    }

    async fn create_resource(&self, draft: &ResourceDraft) -> Result<Resource, AppError> {
        let resource = draft.clone().with_id(new_id());
        self.insert_resource(&resource).await?;
        Ok(resource)
    }

    async fn update_resource(&self, resource: &Resource) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE resources SET title = ?, description = ?, url = ?, category = ?, type = ? WHERE id = ?",
        )
        .bind(&resource.title)
        .bind(&resource.description)
        .bind(&resource.url)
        .bind(&resource.category)
        .bind(&resource.resource_type)
        .bind(&resource.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(id = %resource.id, "Update matched no resource");
        }
        Ok(())
    }

    async fn delete_resource(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM resources WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== SITE CONFIG OPERATIONS ====================

    async fn load_site_config(&self) -> Result<Option<SiteConfig>, AppError> {
        let row = sqlx::query(
            "SELECT primary_color, secondary_color, accent_color, logo_url, banner_text FROM site_config WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(site_config_from_row))
    }

    async fn merge_site_config(&self, patch: &SiteConfigPatch) -> Result<(), AppError> {
        // One upsert statement so concurrent patches never interleave a read and a write.
        let initial = patch.clone().merge_onto(SiteConfig::default());

        sqlx::query(
            r#"INSERT INTO site_config (id, primary_color, secondary_color, accent_color, logo_url, banner_text, updated_at)
               VALUES (1, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   primary_color = COALESCE(?, primary_color),
                   secondary_color = COALESCE(?, secondary_color),
                   accent_color = COALESCE(?, accent_color),
                   logo_url = COALESCE(?, logo_url),
                   banner_text = CASE WHEN ? THEN ? ELSE banner_text END,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&initial.primary_color)
        .bind(&initial.secondary_color)
        .bind(&initial.accent_color)
        .bind(&initial.logo_url)
        .bind(&initial.banner_text)
        .bind(Utc::now().to_rfc3339())
        .bind(&patch.primary_color)
        .bind(&patch.secondary_color)
        .bind(&patch.accent_color)
        .bind(&patch.logo_url)
        .bind(patch.banner_text.is_some())
        .bind(patch.banner_text.clone().flatten())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ==================== ADMIN OPERATIONS ====================

    async fn find_admin(&self, username: &str) -> Result<Option<AdminCredential>, AppError> {
        // Usernames are compared in constant time
        let rows = sqlx::query("SELECT username, password_hash FROM admin_users")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .find(|row| constant_time_compare(row.get::<&str, _>("username"), username))
            .map(|row| AdminCredential {
                username: row.get("username"),
                password_hash: row.get("password_hash"),
            }))
    }

    async fn upsert_admin(&self, credential: &AdminCredential) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO admin_users (username, password_hash, updated_at) VALUES (?, ?, ?)
               ON CONFLICT(username) DO UPDATE SET
                   password_hash = excluded.password_hash,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&credential.username)
        .bind(&credential.password_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Close the pool. Subsequent operations fail.
    async fn close(&self) {
        self.pool.close().await;
    }
}

// Helper functions for row conversion

fn event_from_row(row: &SqliteRow) -> Event {
    Event {
        id: row.get("id"),
        title: row.get("title"),
        date: row.get("date"),
        description: row.get("description"),
        location: row.get("location"),
        image_url: row.get("image_url"),
    }
}

fn news_from_row(row: &SqliteRow) -> NewsItem {
    NewsItem {
        id: row.get("id"),
        title: row.get("title"),
        date: row.get("date"),
        summary: row.get("summary"),
        content: row.get("content"),
        image_url: row.get("image_url"),
        author: row.get("author"),
    }
}

fn resource_from_row(row: &SqliteRow) -> Resource {
    Resource {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        url: row.get("url"),
        category: row.get("category"),
        resource_type: row.get("type"),
    }
}

fn site_config_from_row(row: &SqliteRow) -> SiteConfig {
    SiteConfig {
        primary_color: row.get("primary_color"),
        secondary_color: row.get("secondary_color"),
        accent_color: row.get("accent_color"),
        logo_url: row.get("logo_url"),
        banner_text: row.get("banner_text"),
    }
}
