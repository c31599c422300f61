//! Resource model matching the frontend Resource interface.

use serde::{Deserialize, Serialize};

use super::require_non_empty;
use crate::errors::AppError;

/// A downloadable member resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Target URL or site path
    pub url: String,
    /// Free-text classification, e.g. "Regulation"
    pub category: String,
    /// File format tag, e.g. "PDF"
    #[serde(rename = "type")]
    pub resource_type: String,
}

/// Resource fields without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
}

impl ResourceDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("Title", &self.title)?;
        require_non_empty("URL", &self.url)
    }

    pub fn with_id(self, id: impl Into<String>) -> Resource {
        Resource {
            id: id.into(),
            title: self.title,
            description: self.description,
            url: self.url,
            category: self.category,
            resource_type: self.resource_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_uses_wire_name() {
        let draft: ResourceDraft = serde_json::from_str(
            r#"{"title":"Guide","url":"/resources/guide.pdf","category":"Regulation","type":"PDF"}"#,
        )
        .unwrap();
        assert_eq!(draft.resource_type, "PDF");

        let value = serde_json::to_value(draft.with_id("r-1")).unwrap();
        assert_eq!(value["type"], "PDF");
        assert!(value.get("resourceType").is_none());
    }
}
