use crate::{
    NdefError,
    parser::{self, stream::StreamExt as _},
    record::NdefRecord,
};

/// An NDEF message, the unit read from and written to a tag
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NdefMessage {
    pub records: Vec<NdefRecord>,
}

impl NdefMessage {
    pub fn new(records: Vec<NdefRecord>) -> Self {
        Self { records }
    }

    pub fn single(record: NdefRecord) -> Self {
        Self::new(vec![record])
    }

    /// Parse a complete message as handed over by the tag stack
    pub fn parse(bytes: &[u8]) -> Result<Self, NdefError> {
        if bytes.is_empty() {
            return Err(NdefError::Empty);
        }

        let mut stream = parser::stream::new(bytes);
        let records = parser::parse_ndef_message(&mut stream).map_err(NdefError::from)?;

        if !stream.is_empty() {
            tracing::debug!("ignoring {} bytes after the message end record", stream.len());
        }

        Ok(Self { records })
    }

    pub fn first(&self) -> Option<&NdefRecord> {
        self.records.first()
    }

    /// Wire form, first record gets the begin flag and last record the end flag
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        let last = self.records.len().saturating_sub(1);

        for (index, record) in self.records.iter().enumerate() {
            record.write_to(index == 0, index == last, &mut bytes);
        }

        bytes
    }

    pub fn encoded_len(&self) -> usize {
        self.records.iter().map(NdefRecord::encoded_len).sum()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ndef_type::NdefType, payload::TextPayload};

    #[test]
    fn multi_record_message_sets_begin_and_end_flags() {
        let message = NdefMessage::new(vec![
            NdefRecord::text(&TextPayload::new("en", "one")).unwrap(),
            NdefRecord::new(NdefType::Mime, b"text/plain".to_vec(), None, b"1".to_vec()),
        ]);

        let bytes = message.to_bytes();
        assert_eq!(bytes.len(), message.encoded_len());

        let parsed = NdefMessage::parse(&bytes).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.records[0].header.message_begin);
        assert!(!parsed.records[0].header.message_end);
        assert!(!parsed.records[1].header.message_begin);
        assert!(parsed.records[1].header.message_end);
        assert_eq!(parsed.records[1].payload, b"1".to_vec());
    }

    #[test]
    fn empty_bytes_are_not_a_message() {
        assert_eq!(NdefMessage::parse(&[]), Err(NdefError::Empty));
    }
}
