use crate::{
    header::NdefHeader,
    ndef_type::NdefType,
    payload::{TextPayload, TextPayloadError},
};

/// Record type of a well-known text record
pub const TEXT_RECORD_TYPE: &[u8] = b"T";

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NdefRecord {
    pub header: NdefHeader,
    pub type_: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

impl NdefRecord {
    /// Build a standalone record, the header is derived from the contents
    pub fn new(
        type_name_format: NdefType,
        type_: Vec<u8>,
        id: Option<Vec<u8>>,
        payload: Vec<u8>,
    ) -> Self {
        let short_record = payload.len() <= u8::MAX as usize;

        let header = NdefHeader {
            message_begin: true,
            message_end: true,
            chunked: false,
            short_record,
            has_id_length: id.is_some(),
            type_name_format,
            type_length: type_.len() as u8,
            payload_length: payload.len() as u32,
            id_length: id.as_ref().map(|id| id.len() as u8),
        };

        Self {
            header,
            type_,
            id,
            payload,
        }
    }

    /// Well-known text record with the given framed text payload
    pub fn text(text: &TextPayload) -> Result<Self, TextPayloadError> {
        let payload = text.to_bytes()?;
        Ok(Self::new(NdefType::WellKnown, TEXT_RECORD_TYPE.to_vec(), None, payload))
    }

    pub fn is_text(&self) -> bool {
        self.header.type_name_format == NdefType::WellKnown && self.type_ == TEXT_RECORD_TYPE
    }

    /// Decode the payload as a text record, `None` if this is not a text record
    pub fn text_payload(&self) -> Option<Result<TextPayload, TextPayloadError>> {
        if !self.is_text() {
            return None;
        }

        Some(TextPayload::parse(&self.payload))
    }

    /// Number of bytes this record takes up on the wire
    pub fn encoded_len(&self) -> usize {
        self.header.encoded_len()
            + self.type_.len()
            + self.id.as_ref().map_or(0, Vec::len)
            + self.payload.len()
    }

    /// Append the wire form of this record, with the message begin and end flags given
    pub fn write_to(&self, message_begin: bool, message_end: bool, dst: &mut Vec<u8>) {
        let header = NdefHeader {
            message_begin,
            message_end,
            ..self.header.clone()
        };

        dst.reserve(self.encoded_len());
        dst.push(header.flags_byte());
        dst.push(header.type_length);

        if header.short_record {
            dst.push(header.payload_length as u8);
        } else {
            dst.extend_from_slice(&header.payload_length.to_be_bytes());
        }

        if let Some(id_length) = header.id_length {
            dst.push(id_length);
        }

        dst.extend_from_slice(&self.type_);

        if let Some(id) = &self.id {
            dst.extend_from_slice(id);
        }

        dst.extend_from_slice(&self.payload);
    }
}

// only used for uniffi
mod ffi {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
    pub struct NdefRecordReader {
        record: NdefRecord,
    }

    #[uniffi::export]
    impl NdefRecordReader {
        #[uniffi::constructor]
        pub fn new(record: NdefRecord) -> Self {
            Self { record }
        }

        pub fn type_(&self) -> Option<String> {
            String::from_utf8(self.record.type_.clone()).ok()
        }

        pub fn id(&self) -> Option<String> {
            let id = self.record.id.as_ref()?;
            String::from_utf8(id.clone()).ok()
        }

        pub fn text(&self) -> Option<String> {
            let text = self.record.text_payload()?.ok()?;
            Some(text.text)
        }
    }
}
