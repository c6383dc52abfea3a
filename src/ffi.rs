//! Free functions exported to the host

use crate::{
    badge::{
        self, BadgeDecoder, BadgeEncoder, BadgeExtras, BadgePayload, DecodeError, EncodeError,
        NfcUserData, RawTagRecord, now_ms,
    },
    error::BadgeError,
    policy::BadgePolicy,
    tag::{self, TagError, TagTransport},
};

#[uniffi::export]
fn init_logging() {
    crate::logging::init();
}

#[uniffi::export]
fn encode_badge(
    user_id: String,
    token: Option<String>,
    extras: BadgeExtras,
) -> Result<RawTagRecord, EncodeError> {
    badge::encode(&user_id, token.as_deref(), extras)
}

#[uniffi::export]
fn encode_badge_with_policy(
    policy: BadgePolicy,
    user_id: String,
    token: Option<String>,
    extras: BadgeExtras,
) -> Result<RawTagRecord, EncodeError> {
    BadgeEncoder::new(policy).encode(&user_id, token.as_deref(), extras)
}

/// The full NDEF message to hand to the platform writer
#[uniffi::export]
fn badge_message_bytes(record: RawTagRecord) -> Vec<u8> {
    record.message_bytes()
}

#[uniffi::export]
fn decode_badge(raw: Vec<u8>) -> Result<BadgePayload, DecodeError> {
    badge::decode_and_validate(&raw)
}

#[uniffi::export]
fn decode_badge_at(raw: Vec<u8>, now_ms: i64) -> Result<BadgePayload, DecodeError> {
    badge::decode_and_validate_at(&raw, now_ms)
}

/// Validate a text record payload and hand back the identity it carries
#[uniffi::export]
fn validate_badge(raw: Vec<u8>, policy: BadgePolicy) -> Result<NfcUserData, DecodeError> {
    let now = now_ms();
    let payload = BadgeDecoder::new(policy).decode_and_validate_at(&raw, now)?;

    Ok(payload.into_user_data(now))
}

/// Diagnostics only, never base an authentication decision on this
#[uniffi::export]
fn badge_debug_dump(raw: Vec<u8>) -> String {
    badge::debug::debug_dump(&raw)
}

#[uniffi::export]
fn write_badge(transport: Box<dyn TagTransport>, record: RawTagRecord) -> Result<(), TagError> {
    tag::write_record(transport.as_ref(), &record)
}

#[uniffi::export]
fn read_badge(transport: Box<dyn TagTransport>) -> Result<Vec<u8>, TagError> {
    tag::read_record(transport.as_ref())
}

/// Read the tag and validate the badge on it in one go
#[uniffi::export]
fn read_and_validate_badge(
    transport: Box<dyn TagTransport>,
    policy: BadgePolicy,
) -> Result<NfcUserData, BadgeError> {
    let raw = tag::read_record(transport.as_ref())?;
    Ok(validate_badge(raw, policy)?)
}
