use ecodeli_nfc::{NdefMessage, NdefRecord, TextPayload, TextPayloadError};
use tracing::debug;

use crate::{error::ErrorReason, policy::BadgePolicy};

use super::{
    now_ms,
    payload::{BadgePayload, BadgeVariant},
    wire,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum EncodeError {
    #[error("user id can not be empty")]
    EmptyUserId,

    #[error("token badge needs at least one of email, token or timestamp")]
    EmptyTokenBadge,

    #[error("badge marker {found:?} is not this application's {expected:?}")]
    ForeignMarker { found: String, expected: String },

    #[error("badge needs {size} bytes, the most a badge may hold is {max}")]
    CapacityExceeded { size: u32, max: u32 },

    #[error("unable to frame the text record: {0}")]
    Framing(String),

    #[error("unable to serialize badge: {0}")]
    Serialize(String),
}

ecodeli_macros::impl_error_reason!(EncodeError => ErrorReason {
    EncodeError::EmptyUserId | EncodeError::EmptyTokenBadge => ErrorReason::MissingField,
    EncodeError::ForeignMarker { .. } => ErrorReason::ForeignBadge,
    EncodeError::CapacityExceeded { .. } => ErrorReason::CapacityExceeded,
    EncodeError::Framing(_) | EncodeError::Serialize(_) => ErrorReason::MalformedFrame,
});

impl From<TextPayloadError> for EncodeError {
    fn from(error: TextPayloadError) -> Self {
        Self::Framing(error.to_string())
    }
}

type Error = EncodeError;
type Result<T, E = Error> = std::result::Result<T, E>;

/// Fields beyond the user id and token that a badge may carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, uniffi::Record)]
pub struct BadgeExtras {
    pub email: Option<String>,
    pub version: Option<String>,
}

/// A text record ready to be committed to a tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct RawTagRecord {
    pub language: String,
    pub text: String,

    /// Framed text record payload, status byte then language code then text
    pub payload: Vec<u8>,
}

impl RawTagRecord {
    pub fn to_ndef_message(&self) -> NdefMessage {
        NdefMessage::single(NdefRecord::new(
            ecodeli_nfc::ndef_type::NdefType::WellKnown,
            ecodeli_nfc::record::TEXT_RECORD_TYPE.to_vec(),
            None,
            self.payload.clone(),
        ))
    }

    /// The exact bytes written to the tag
    pub fn message_bytes(&self) -> Vec<u8> {
        self.to_ndef_message().to_bytes()
    }

    pub fn message_len(&self) -> usize {
        self.to_ndef_message().encoded_len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeEncoder {
    policy: BadgePolicy,
}

impl BadgeEncoder {
    pub fn new(policy: BadgePolicy) -> Self {
        Self { policy }
    }

    /// Build and encode a badge for the user, stamped with the current time when it carries a token
    pub fn encode(
        &self,
        user_id: &str,
        token: Option<&str>,
        extras: BadgeExtras,
    ) -> Result<RawTagRecord> {
        self.encode_at(user_id, token, extras, now_ms())
    }

    pub fn encode_at(
        &self,
        user_id: &str,
        token: Option<&str>,
        extras: BadgeExtras,
        now_ms: i64,
    ) -> Result<RawTagRecord> {
        let marker = self.policy.app_marker.as_str();

        let payload = match token {
            Some(token) => BadgePayload::with_token(
                user_id,
                marker,
                extras.email,
                Some(token.to_string()),
                Some(now_ms),
            ),
            None => {
                let version = extras.version.unwrap_or_else(|| self.policy.default_version.clone());
                BadgePayload::minimal(user_id, marker, Some(version))
            }
        };

        self.encode_payload(&payload)
    }

    /// Encode an already built payload as is, same payload gives the same bytes
    ///
    /// Only payloads that decode back to themselves under this policy are accepted
    pub fn encode_payload(&self, payload: &BadgePayload) -> Result<RawTagRecord> {
        if payload.user_id.is_empty() {
            return Err(Error::EmptyUserId);
        }

        if payload.app_marker != self.policy.app_marker {
            return Err(Error::ForeignMarker {
                found: payload.app_marker.clone(),
                expected: self.policy.app_marker.clone(),
            });
        }

        // with none of its fields a token badge reads back as a minimal one
        if let BadgeVariant::Token {
            email: None,
            token: None,
            issued_at: None,
        } = &payload.variant
        {
            return Err(Error::EmptyTokenBadge);
        }

        let text = wire::to_json(payload).map_err(|error| Error::Serialize(error.to_string()))?;
        let framed = TextPayload::new(self.policy.language.as_str(), text.as_str()).to_bytes()?;

        let record = RawTagRecord {
            language: self.policy.language.clone(),
            text,
            payload: framed,
        };

        let size = record.message_len();
        let max = self.policy.max_record_size as usize;
        if size > max {
            return Err(Error::CapacityExceeded {
                size: size as u32,
                max: max as u32,
            });
        }

        debug!(
            "encoded {} badge for user {}, {size} bytes",
            payload.variant_name(),
            payload.user_id
        );

        Ok(record)
    }
}

/// Encode with the default policy
pub fn encode(user_id: &str, token: Option<&str>, extras: BadgeExtras) -> Result<RawTagRecord> {
    BadgeEncoder::default().encode(user_id, token, extras)
}
