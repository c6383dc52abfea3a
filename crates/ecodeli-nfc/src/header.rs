use crate::ndef_type::NdefType;

const MESSAGE_BEGIN: u8 = 0b1000_0000;
const MESSAGE_END: u8 = 0b0100_0000;
const CHUNKED: u8 = 0b0010_0000;
const SHORT_RECORD: u8 = 0b0001_0000;
const ID_LENGTH: u8 = 0b0000_1000;

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NdefHeader {
    pub message_begin: bool,
    pub message_end: bool,
    pub chunked: bool,
    pub short_record: bool,
    pub has_id_length: bool,
    pub type_name_format: NdefType,
    pub type_length: u8,
    pub payload_length: u32,
    pub id_length: Option<u8>,
}

impl NdefHeader {
    /// The flag byte that opens the record on the wire
    pub fn flags_byte(&self) -> u8 {
        let mut byte = self.type_name_format.to_bits();

        if self.message_begin {
            byte |= MESSAGE_BEGIN;
        }

        if self.message_end {
            byte |= MESSAGE_END;
        }

        if self.chunked {
            byte |= CHUNKED;
        }

        if self.short_record {
            byte |= SHORT_RECORD;
        }

        if self.has_id_length {
            byte |= ID_LENGTH;
        }

        byte
    }

    /// Number of bytes the header takes up on the wire
    pub fn encoded_len(&self) -> usize {
        let payload_length_len = if self.short_record { 1 } else { 4 };
        let id_length_len = usize::from(self.has_id_length);

        2 + payload_length_len + id_length_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_byte_matches_known_text_record_header() {
        let header = NdefHeader {
            message_begin: true,
            message_end: true,
            chunked: false,
            short_record: true,
            has_id_length: false,
            type_name_format: NdefType::WellKnown,
            type_length: 1,
            payload_length: 13,
            id_length: None,
        };

        assert_eq!(header.flags_byte(), 0xD1);
        assert_eq!(header.encoded_len(), 3);
    }

    #[test]
    fn long_record_with_id_takes_more_header_bytes() {
        let header = NdefHeader {
            message_begin: true,
            message_end: false,
            chunked: false,
            short_record: false,
            has_id_length: true,
            type_name_format: NdefType::Mime,
            type_length: 16,
            payload_length: 3009,
            id_length: Some(2),
        };

        assert_eq!(header.flags_byte(), 0b1000_1010);
        assert_eq!(header.encoded_len(), 7);
    }
}
