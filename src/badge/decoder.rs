use ecodeli_nfc::{TextPayload, TextPayloadError};
use tracing::{debug, warn};

use crate::{error::ErrorReason, policy::BadgePolicy};

use super::{now_ms, payload::BadgePayload, wire};

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum DecodeError {
    #[error("malformed text record: {0}")]
    MalformedFrame(String),

    #[error("badge is missing the `{0}` field or it has the wrong type")]
    MissingField(String),

    #[error("badge belongs to another application ({found})")]
    ForeignBadge { found: String },

    #[error("badge expired, issued at {issued_at} which is {age_ms}ms ago")]
    Expired { issued_at: i64, age_ms: i64 },
}

ecodeli_macros::impl_error_reason!(DecodeError => ErrorReason {
    DecodeError::MalformedFrame(_) => ErrorReason::MalformedFrame,
    DecodeError::MissingField(_) => ErrorReason::MissingField,
    DecodeError::ForeignBadge { .. } => ErrorReason::ForeignBadge,
    DecodeError::Expired { .. } => ErrorReason::Expired,
});

impl From<TextPayloadError> for DecodeError {
    fn from(error: TextPayloadError) -> Self {
        Self::MalformedFrame(error.to_string())
    }
}

type Error = DecodeError;
type Result<T, E = Error> = std::result::Result<T, E>;

/// Reads text record payloads back into badge payloads
///
/// Holds no state besides the policy, every call is independent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeDecoder {
    policy: BadgePolicy,
}

impl BadgeDecoder {
    pub fn new(policy: BadgePolicy) -> Self {
        Self { policy }
    }

    pub fn decode_and_validate(&self, raw: &[u8]) -> Result<BadgePayload> {
        self.decode_and_validate_at(raw, now_ms())
    }

    /// Decode and validate against the given wall clock time, in epoch millis
    pub fn decode_and_validate_at(&self, raw: &[u8], now_ms: i64) -> Result<BadgePayload> {
        let result = self.decode(raw).and_then(|payload| self.check_age(payload, now_ms));

        if let Err(error) = &result {
            warn!("rejected badge ({}): {error}", error.reason());
        }

        result
    }

    /// Framing and classification only, no expiry check
    pub(crate) fn decode(&self, raw: &[u8]) -> Result<BadgePayload> {
        let text = TextPayload::parse(raw)?;
        if text.language != self.policy.language {
            debug!("badge text record language is {:?}", text.language);
        }

        let object = wire::parse_object(&text.text)?;
        wire::classify(&object, &self.policy.app_marker)
    }

    fn check_age(&self, payload: BadgePayload, now_ms: i64) -> Result<BadgePayload> {
        let Some(issued_at) = payload.issued_at() else {
            debug!("{} badge carries no issue time, skipping expiry", payload.variant_name());
            return Ok(payload);
        };

        let age_ms = now_ms.saturating_sub(issued_at);
        if age_ms > self.policy.max_age_ms {
            return Err(Error::Expired { issued_at, age_ms });
        }

        Ok(payload)
    }
}

/// Decode with the default policy and the current time
pub fn decode_and_validate(raw: &[u8]) -> Result<BadgePayload> {
    BadgeDecoder::default().decode_and_validate(raw)
}

pub fn decode_and_validate_at(raw: &[u8], now_ms: i64) -> Result<BadgePayload> {
    BadgeDecoder::default().decode_and_validate_at(raw, now_ms)
}
