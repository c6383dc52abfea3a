use winnow::error::{ContextError, ErrMode, Needed};

uniffi::setup_scaffolding!();

pub mod header;
pub mod message;
pub mod ndef_type;
pub mod parser;
pub mod payload;
pub mod record;

pub use message::NdefMessage;
pub use payload::{TextPayload, TextPayloadError, TextPayloadFormat};
pub use record::NdefRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum NdefError {
    #[error("no bytes to parse")]
    Empty,

    #[error("message ends early, needed {needed:?} more bytes")]
    Truncated { needed: Option<u32> },

    #[error("error parsing the NDEF message: {0}")]
    ParsingError(String),
}

impl From<ErrMode<ContextError>> for NdefError {
    fn from(error: ErrMode<ContextError>) -> Self {
        match error {
            ErrMode::Incomplete(Needed::Size(size)) => Self::Truncated {
                needed: Some(size.get() as u32),
            },
            ErrMode::Incomplete(Needed::Unknown) => Self::Truncated { needed: None },
            error => Self::ParsingError(error.to_string()),
        }
    }
}
