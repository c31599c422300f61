//! Record type tags used as cache keys and in notification texts.

use serde::Serialize;

/// The four record types the dashboard manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    Events,
    News,
    Resources,
    SiteConfig,
}

impl RecordKind {
    pub const COUNT: usize = 4;

    /// Cache key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Events => "events",
            RecordKind::News => "news",
            RecordKind::Resources => "resources",
            RecordKind::SiteConfig => "siteConfig",
        }
    }

    /// Human label for a single record, as shown in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Events => "Event",
            RecordKind::News => "News Item",
            RecordKind::Resources => "Resource",
            RecordKind::SiteConfig => "Site Configuration",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            RecordKind::Events => 0,
            RecordKind::News => 1,
            RecordKind::Resources => 2,
            RecordKind::SiteConfig => 3,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexes_are_distinct_and_in_range() {
        let kinds = [
            RecordKind::Events,
            RecordKind::News,
            RecordKind::Resources,
            RecordKind::SiteConfig,
        ];
        let mut seen = [false; RecordKind::COUNT];
        for kind in kinds {
            assert!(!seen[kind.index()], "{kind} shares a cache slot");
            seen[kind.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_cache_key_names() {
        assert_eq!(RecordKind::SiteConfig.to_string(), "siteConfig");
        assert_eq!(
            serde_json::to_value(RecordKind::SiteConfig).unwrap(),
            "siteConfig"
        );
    }
}
