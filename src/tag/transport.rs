/// Tag technologies the host can open a connection with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum, derive_more::Display)]
pub enum TagTech {
    /// Already formatted for NDEF
    #[display("NDEF")]
    Ndef,

    /// Blank, can be formatted with an initial NDEF message
    #[display("NDEF formatable")]
    NdefFormatable,
}

/// Implemented by the host over the platform tag technologies
///
/// Every call is blocking and is only made between a successful `connect` and the matching
/// `close` for that technology
#[uniffi::export(callback_interface)]
pub trait TagTransport: Send + Sync + std::fmt::Debug + 'static {
    fn supports(&self, tech: TagTech) -> bool;

    fn connect(&self, tech: TagTech) -> Result<(), TagIoError>;

    /// Must not fail, errors while closing are the host's to log
    fn close(&self, tech: TagTech);

    fn is_writable(&self) -> bool;

    /// Largest NDEF message the tag can hold, if the host can tell
    fn max_size(&self) -> Option<u32>;

    /// The cached or freshly read NDEF message, `None` when the tag holds none
    fn read_ndef_message(&self) -> Result<Option<Vec<u8>>, TagIoError>;

    fn write_ndef_message(&self, message: Vec<u8>) -> Result<(), TagIoError>;

    fn format_ndef(&self, message: Vec<u8>) -> Result<(), TagIoError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum TagIoError {
    #[error("tag was lost: {0}")]
    TagLost(String),

    #[error("tag io failed: {0}")]
    Io(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for TagIoError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Io(error.reason)
    }
}
