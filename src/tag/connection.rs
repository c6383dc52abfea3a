use tracing::debug;

use super::transport::{TagIoError, TagTech, TagTransport};

/// An open connection to a tag, closed when dropped
///
/// Holding the guard is the only way to reach the tag, so the connection is released on
/// every exit path including early returns and unwinding
#[derive(Debug)]
pub struct TagConnection<'a> {
    transport: &'a dyn TagTransport,
    tech: TagTech,
}

impl<'a> TagConnection<'a> {
    /// Connect with the given technology, nothing needs closing if this fails
    pub fn open(transport: &'a dyn TagTransport, tech: TagTech) -> Result<Self, TagIoError> {
        transport.connect(tech)?;
        debug!("connected to tag over {tech}");

        Ok(Self { transport, tech })
    }

    pub fn tech(&self) -> TagTech {
        self.tech
    }

    pub fn transport(&self) -> &'a dyn TagTransport {
        self.transport
    }
}

impl Drop for TagConnection<'_> {
    fn drop(&mut self) {
        self.transport.close(self.tech);
        debug!("closed tag connection over {}", self.tech);
    }
}
