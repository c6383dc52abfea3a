use serde::{Deserialize, Serialize};

/// Marker written into every badge, the only thing telling our badges apart from other NFC tags
pub const APP_MARKER: &str = "ecodeli";

/// Language code of the text record
pub const LANGUAGE: &str = "en";

/// Badges carrying an issue time are refused once older than 30 days
pub const MAX_BADGE_AGE_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Largest NDEF message the encoder will produce, tags are small and vary in capacity
pub const MAX_RECORD_SIZE: u32 = 8000;

/// Schema version written into minimal badges
pub const DEFAULT_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum PolicyError {
    #[error("unable to parse badge policy: {0}")]
    Parse(String),

    #[error("app marker can not be empty")]
    EmptyAppMarker,

    #[error("language code must be 1 to 63 ascii bytes, found {0:?}")]
    InvalidLanguage(String),

    #[error("max badge age can not be negative: {0}")]
    NegativeMaxAge(i64),
}

/// Rules shared by the encoder and the decoder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
#[serde(default, rename_all = "camelCase")]
pub struct BadgePolicy {
    pub app_marker: String,
    pub language: String,
    pub max_age_ms: i64,
    pub max_record_size: u32,
    pub default_version: String,
}

impl Default for BadgePolicy {
    fn default() -> Self {
        Self {
            app_marker: APP_MARKER.to_string(),
            language: LANGUAGE.to_string(),
            max_age_ms: MAX_BADGE_AGE_MS,
            max_record_size: MAX_RECORD_SIZE,
            default_version: DEFAULT_SCHEMA_VERSION.to_string(),
        }
    }
}

impl BadgePolicy {
    /// Parse host supplied overrides, missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let policy: Self =
            serde_json::from_str(json).map_err(|error| PolicyError::Parse(error.to_string()))?;

        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.app_marker.is_empty() {
            return Err(PolicyError::EmptyAppMarker);
        }

        let language_ok = !self.language.is_empty()
            && self.language.len() <= 63
            && self.language.is_ascii();

        if !language_ok {
            return Err(PolicyError::InvalidLanguage(self.language.clone()));
        }

        if self.max_age_ms < 0 {
            return Err(PolicyError::NegativeMaxAge(self.max_age_ms));
        }

        Ok(())
    }
}

mod ffi {
    use super::*;

    #[uniffi::export]
    fn default_badge_policy() -> BadgePolicy {
        BadgePolicy::default()
    }

    #[uniffi::export]
    fn badge_policy_from_json(json: String) -> Result<BadgePolicy, PolicyError> {
        BadgePolicy::from_json(&json)
    }
}
