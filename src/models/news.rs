//! News item model matching the frontend NewsItem interface.

use serde::{Deserialize, Serialize};

use super::{require_iso_date, require_non_empty};
use crate::errors::AppError;

/// A news article shown on the News page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub date: String,
    pub summary: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// News item fields without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsDraft {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl NewsDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("Title", &self.title)?;
        require_iso_date("Date", &self.date)
    }

    pub fn with_id(self, id: impl Into<String>) -> NewsItem {
        NewsItem {
            id: id.into(),
            title: self.title,
            date: self.date,
            summary: self.summary,
            content: self.content,
            image_url: self.image_url,
            author: self.author,
        }
    }
}
