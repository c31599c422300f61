//! Event model matching the frontend AdminEvent interface.

use serde::{Deserialize, Serialize};

use super::{require_iso_date, require_non_empty};
use crate::errors::AppError;

/// An association event listed on the Events page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    /// ISO calendar date, `YYYY-MM-DD`
    pub date: String,
    pub description: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Event fields without an id, used for creation and full replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl EventDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("Title", &self.title)?;
        require_iso_date("Date", &self.date)
    }

    /// Attach an id to produce a full record.
    pub fn with_id(self, id: impl Into<String>) -> Event {
        Event {
            id: id.into(),
            title: self.title,
            date: self.date,
            description: self.description,
            location: self.location,
            image_url: self.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_camel_case() {
        let event = EventDraft {
            title: "Conf".to_string(),
            date: "2025-07-15".to_string(),
            description: "d".to_string(),
            location: "Nairobi".to_string(),
            image_url: Some("/events/conf.jpg".to_string()),
        }
        .with_id("e-1");

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["id"], "e-1");
        assert_eq!(value["imageUrl"], "/events/conf.jpg");
    }

    #[test]
    fn test_draft_requires_iso_date() {
        let draft: EventDraft =
            serde_json::from_str(r#"{"title":"Conf","date":"July 15"}"#).unwrap();
        assert!(draft.validate().is_err());
    }
}
