//! Badge codec: the identity payload, its wire form on the tag, and the validation rules

pub mod debug;
pub mod decoder;
pub mod encoder;
pub mod payload;
pub mod user_data;

mod wire;

pub use decoder::{BadgeDecoder, DecodeError, decode_and_validate, decode_and_validate_at};
pub use encoder::{BadgeEncoder, BadgeExtras, EncodeError, RawTagRecord, encode};
pub use payload::{BadgePayload, BadgeVariant};
pub use user_data::NfcUserData;

/// Current wall clock time in epoch milliseconds
pub fn now_ms() -> i64 {
    jiff::Timestamp::now().as_millisecond()
}
