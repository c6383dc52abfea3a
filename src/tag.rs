//! Moving badge records on and off physical tags through the host's tag stack

pub mod connection;
pub mod error;
pub mod io;
pub mod transport;

pub use error::TagError;
pub use io::{read_record, write_record};
pub use transport::{TagIoError, TagTech, TagTransport};
