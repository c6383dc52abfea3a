//! Payload of an NFC Forum well-known text record (RTD-Text)
//!
//! ```text
//! ┌─────────────┬──────────────────────┬────────────────────┐
//! │ status (1B) │ language code (n B)  │ text               │
//! │ bit 7: utf16│ IANA code, ascii     │ utf8 or utf16      │
//! │ bits 0-5: n │                      │                    │
//! └─────────────┴──────────────────────┴────────────────────┘
//! ```

/// Status byte bit marking the text as UTF-16
const UTF16_FLAG: u8 = 0b1000_0000;

/// Low 6 bits of the status byte hold the language code length
const LANGUAGE_LENGTH_MASK: u8 = 0b0011_1111;

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TextPayload {
    pub format: TextPayloadFormat,
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum TextPayloadFormat {
    Utf8,
    Utf16,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum TextPayloadError {
    #[error("text record payload is empty")]
    Empty,

    #[error("language code length {declared} exceeds the {available} bytes left in the payload")]
    LanguageCodeOverrun { declared: u8, available: u32 },

    #[error("language code is not ascii")]
    InvalidLanguageCode,

    #[error("language code is longer than 63 bytes: {0}")]
    LanguageCodeTooLong(u32),

    #[error("text is not valid {format:?}: {error}")]
    InvalidText {
        format: TextPayloadFormat,
        error: String,
    },
}

type Error = TextPayloadError;
type Result<T, E = Error> = std::result::Result<T, E>;

impl TextPayload {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            format: TextPayloadFormat::Utf8,
            language: language.into(),
            text: text.into(),
        }
    }

    /// Parse the framed payload bytes of a text record
    ///
    /// Decoding is strict, invalid text is an error and never replaced with lossy characters
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let (&status, rest) = bytes.split_first().ok_or(Error::Empty)?;

        let format = if status & UTF16_FLAG == 0 {
            TextPayloadFormat::Utf8
        } else {
            TextPayloadFormat::Utf16
        };

        let language_length = status & LANGUAGE_LENGTH_MASK;
        if language_length as usize > rest.len() {
            return Err(Error::LanguageCodeOverrun {
                declared: language_length,
                available: rest.len() as u32,
            });
        }

        let (language, text) = rest.split_at(language_length as usize);
        if !language.is_ascii() {
            return Err(Error::InvalidLanguageCode);
        }

        let language = String::from_utf8_lossy(language).to_string();
        let text = match format {
            TextPayloadFormat::Utf8 => decode_utf8(text)?,
            TextPayloadFormat::Utf16 => decode_utf16(text)?,
        };

        Ok(Self {
            format,
            language,
            text,
        })
    }

    /// Frame the payload for writing, text is always written as UTF-8
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if !self.language.is_ascii() {
            return Err(Error::InvalidLanguageCode);
        }

        let language_length = self.language.len();
        if language_length > LANGUAGE_LENGTH_MASK as usize {
            return Err(Error::LanguageCodeTooLong(language_length as u32));
        }

        let mut bytes = Vec::with_capacity(1 + language_length + self.text.len());
        bytes.push(language_length as u8);
        bytes.extend_from_slice(self.language.as_bytes());
        bytes.extend_from_slice(self.text.as_bytes());

        Ok(bytes)
    }
}

fn decode_utf8(text: &[u8]) -> Result<String> {
    String::from_utf8(text.to_vec()).map_err(|error| Error::InvalidText {
        format: TextPayloadFormat::Utf8,
        error: error.to_string(),
    })
}

fn decode_utf16(text: &[u8]) -> Result<String> {
    let invalid = |error: String| Error::InvalidText {
        format: TextPayloadFormat::Utf16,
        error,
    };

    if text.len() % 2 != 0 {
        return Err(invalid(format!("odd number of bytes: {}", text.len())));
    }

    // big endian unless a byte order mark says otherwise
    let (little_endian, text) = match text {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, text),
    };

    let units = text
        .chunks_exact(2)
        .map(|chunk| {
            let pair = [chunk[0], chunk[1]];
            if little_endian { u16::from_le_bytes(pair) } else { u16::from_be_bytes(pair) }
        })
        .collect::<Vec<u16>>();

    String::from_utf16(&units).map_err(|error| invalid(error.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_utf8_text_with_language() {
        let payload = TextPayload::parse(b"\x02enhello").unwrap();

        assert_eq!(payload, TextPayload::new("en", "hello"));
    }

    #[test]
    fn reserved_status_bit_is_not_part_of_language_length() {
        // bit 6 is reserved, the length only uses the low 6 bits
        let payload = TextPayload::parse(b"\x42enhi").unwrap();

        assert_eq!(payload.language, "en");
        assert_eq!(payload.text, "hi");
    }

    #[test]
    fn parses_utf16_text_with_and_without_bom() {
        let big_endian = [0x82, b'e', b'n', 0x00, b'h', 0x00, b'i'];
        let payload = TextPayload::parse(&big_endian).unwrap();
        assert_eq!(payload.format, TextPayloadFormat::Utf16);
        assert_eq!(payload.text, "hi");

        let little_endian = [0x82, b'e', b'n', 0xFF, 0xFE, b'h', 0x00, b'i', 0x00];
        let payload = TextPayload::parse(&little_endian).unwrap();
        assert_eq!(payload.text, "hi");
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert_eq!(TextPayload::parse(&[]), Err(TextPayloadError::Empty));
    }

    #[test]
    fn language_length_past_the_end_is_rejected() {
        let result = TextPayload::parse(b"\x05en");

        assert_eq!(
            result,
            Err(TextPayloadError::LanguageCodeOverrun {
                declared: 5,
                available: 2
            })
        );
    }

    #[test]
    fn invalid_utf8_is_rejected_not_replaced() {
        let result = TextPayload::parse(b"\x02en\xFF\xFE{");

        assert!(matches!(result, Err(TextPayloadError::InvalidText { .. })));
    }

    #[test]
    fn framing_writes_language_length_in_status_byte() {
        let bytes = TextPayload::new("en", "{}").to_bytes().unwrap();

        assert_eq!(bytes, b"\x02en{}".to_vec());
        assert_eq!(TextPayload::parse(&bytes).unwrap().text, "{}");
    }

    #[test]
    fn overlong_language_code_is_refused() {
        let payload = TextPayload::new("x".repeat(64), "");

        assert_eq!(payload.to_bytes(), Err(TextPayloadError::LanguageCodeTooLong(64)));
    }
}
