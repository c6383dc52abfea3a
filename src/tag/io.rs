use ecodeli_nfc::{NdefMessage, ndef_type::NdefType};
use tracing::{debug, error, info};

use crate::badge::RawTagRecord;

use super::{
    connection::TagConnection,
    error::TagError,
    transport::{TagTech, TagTransport},
};

type Result<T, E = TagError> = std::result::Result<T, E>;

/// Write the record as a single record NDEF message
///
/// Formatted tags are written in place, blank formatable tags are formatted with the message
pub fn write_record(transport: &dyn TagTransport, record: &RawTagRecord) -> Result<()> {
    let message = record.message_bytes();
    let needed = message.len() as u32;

    let result = if transport.supports(TagTech::Ndef) {
        write_formatted(transport, message)
    } else if transport.supports(TagTech::NdefFormatable) {
        format_blank(transport, message)
    } else {
        Err(TagError::UnsupportedMedium)
    };

    match &result {
        Ok(()) => info!("wrote {needed} byte badge to tag"),
        Err(TagError::TagIo(io)) => error!("tag io failed while writing: {io}"),
        Err(other) => debug!("badge not written: {other}"),
    }

    result
}

fn write_formatted(transport: &dyn TagTransport, message: Vec<u8>) -> Result<()> {
    let connection = TagConnection::open(transport, TagTech::Ndef)?;
    let tag = connection.transport();

    if !tag.is_writable() {
        return Err(TagError::NotWritable);
    }

    check_capacity(tag, message.len())?;
    tag.write_ndef_message(message)?;

    Ok(())
}

fn format_blank(transport: &dyn TagTransport, message: Vec<u8>) -> Result<()> {
    let connection = TagConnection::open(transport, TagTech::NdefFormatable)?;
    let tag = connection.transport();

    check_capacity(tag, message.len())?;
    tag.format_ndef(message)?;

    Ok(())
}

fn check_capacity(tag: &dyn TagTransport, needed: usize) -> Result<()> {
    let Some(capacity) = tag.max_size() else {
        debug!("tag did not report its capacity");
        return Ok(());
    };

    if needed > capacity as usize {
        return Err(TagError::CapacityExceeded {
            needed: needed as u32,
            capacity,
        });
    }

    Ok(())
}

/// Read the payload of the first record on the tag
pub fn read_record(transport: &dyn TagTransport) -> Result<Vec<u8>> {
    if !transport.supports(TagTech::Ndef) {
        debug!("tag is not NDEF formatted");
        return Err(TagError::NoRecord);
    }

    let bytes = {
        let connection = TagConnection::open(transport, TagTech::Ndef)?;
        connection
            .transport()
            .read_ndef_message()
            .inspect_err(|io| error!("tag io failed while reading: {io}"))?
    };

    let bytes = bytes.filter(|bytes| !bytes.is_empty()).ok_or(TagError::NoRecord)?;
    let message = NdefMessage::parse(&bytes)?;

    let record = message.first().ok_or(TagError::NoRecord)?;
    if record.header.type_name_format == NdefType::Empty {
        return Err(TagError::NoRecord);
    }

    debug!(
        "read {} record message, first payload {} bytes",
        message.records.len(),
        record.payload.len()
    );

    Ok(record.payload.clone())
}
