use crate::{
    badge::{DecodeError, EncodeError},
    tag::TagError,
};

/// Why a tap did not produce a badge identity or a written badge
///
/// Every reason is terminal for the current tap, a retry is a new tap
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    uniffi::Enum,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorReason {
    MalformedFrame,
    MissingField,
    ForeignBadge,
    Expired,
    NoRecord,
    NotWritable,
    UnsupportedMedium,
    CapacityExceeded,
    TagIo,
}

/// Any failure along the path from a tap to a badge identity or a written badge
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum BadgeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Tag(#[from] TagError),
}

impl BadgeError {
    pub fn reason(&self) -> ErrorReason {
        match self {
            Self::Decode(error) => error.reason(),
            Self::Encode(error) => error.reason(),
            Self::Tag(error) => error.reason(),
        }
    }
}

#[uniffi::export]
fn error_reason_code(reason: ErrorReason) -> String {
    reason.to_string()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn codes_are_screaming_snake_case() {
        assert_eq!(ErrorReason::MalformedFrame.to_string(), "MALFORMED_FRAME");
        assert_eq!(ErrorReason::UnsupportedMedium.as_ref(), "UNSUPPORTED_MEDIUM");
        assert_eq!(ErrorReason::TagIo.to_string(), "TAG_IO");
    }

    #[test]
    fn codes_parse_back() {
        for reason in ErrorReason::iter() {
            assert_eq!(ErrorReason::from_str(&reason.to_string()), Ok(reason));
        }
    }

    #[test]
    fn aggregate_error_keeps_the_layer_reason() {
        let decode = BadgeError::from(DecodeError::ForeignBadge { found: "shop".into() });
        let encode = BadgeError::from(EncodeError::EmptyUserId);
        let tag = BadgeError::from(TagError::NotWritable);

        assert_eq!(decode.reason(), ErrorReason::ForeignBadge);
        assert_eq!(encode.reason(), ErrorReason::MissingField);
        assert_eq!(tag.reason(), ErrorReason::NotWritable);
        assert_eq!(tag.to_string(), "tag is read only");
    }
}
