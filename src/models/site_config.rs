//! Singleton site configuration and its partial update.

use serde::{Deserialize, Deserializer, Serialize};

use super::{require_hex_color, require_non_empty};
use crate::errors::AppError;

/// Branding configuration. Exactly one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub logo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_text: Option<String>,
}

impl Default for SiteConfig {
    /// Used whenever no configuration has been persisted or it cannot be read.
    fn default() -> Self {
        Self {
            primary_color: "#1a365d".to_string(),
            secondary_color: "#2b6cb0".to_string(),
            accent_color: "#4299e1".to_string(),
            logo_url: "/logo.svg".to_string(),
            banner_text: None,
        }
    }
}

/// Partial site configuration update. Absent fields keep their current value.
///
/// `bannerText` distinguishes absent (keep) from `null` (remove the banner).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub banner_text: Option<Option<String>>,
}

/// Maps a present field (even `null`) to `Some`, leaving `None` for a missing one.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl SiteConfigPatch {
    pub fn banner(text: impl Into<String>) -> Self {
        Self {
            banner_text: Some(Some(text.into())),
            ..Self::default()
        }
    }

    pub fn clear_banner() -> Self {
        Self {
            banner_text: Some(None),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(color) = &self.primary_color {
            require_hex_color("primaryColor", color)?;
        }
        if let Some(color) = &self.secondary_color {
            require_hex_color("secondaryColor", color)?;
        }
        if let Some(color) = &self.accent_color {
            require_hex_color("accentColor", color)?;
        }
        if let Some(logo) = &self.logo_url {
            require_non_empty("logoUrl", logo)?;
        }
        Ok(())
    }

    /// Overwrite each present field on `base`.
    pub fn merge_onto(self, base: SiteConfig) -> SiteConfig {
        SiteConfig {
            primary_color: self.primary_color.unwrap_or(base.primary_color),
            secondary_color: self.secondary_color.unwrap_or(base.secondary_color),
            accent_color: self.accent_color.unwrap_or(base.accent_color),
            logo_url: self.logo_url.unwrap_or(base.logo_url),
            banner_text: match self.banner_text {
                Some(banner) => banner,
                None => base.banner_text,
            },
        }
    }
}
