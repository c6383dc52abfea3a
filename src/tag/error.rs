use crate::error::ErrorReason;

use super::transport::TagIoError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum TagError {
    #[error("tag holds no NDEF record")]
    NoRecord,

    #[error("tag is read only")]
    NotWritable,

    #[error("tag supports neither NDEF nor NDEF formatting")]
    UnsupportedMedium,

    #[error("message needs {needed} bytes, tag holds {capacity}")]
    CapacityExceeded { needed: u32, capacity: u32 },

    #[error("tag content is not a valid NDEF message: {0}")]
    MalformedFrame(String),

    #[error(transparent)]
    TagIo(#[from] TagIoError),
}

ecodeli_macros::impl_error_reason!(TagError => ErrorReason {
    TagError::NoRecord => ErrorReason::NoRecord,
    TagError::NotWritable => ErrorReason::NotWritable,
    TagError::UnsupportedMedium => ErrorReason::UnsupportedMedium,
    TagError::CapacityExceeded { .. } => ErrorReason::CapacityExceeded,
    TagError::MalformedFrame(_) => ErrorReason::MalformedFrame,
    TagError::TagIo(_) => ErrorReason::TagIo,
});

impl From<ecodeli_nfc::NdefError> for TagError {
    fn from(error: ecodeli_nfc::NdefError) -> Self {
        match error {
            ecodeli_nfc::NdefError::Empty => Self::NoRecord,
            other => Self::MalformedFrame(other.to_string()),
        }
    }
}
