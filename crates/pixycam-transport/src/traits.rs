#[cfg(unix)]
use std::io::{Read, Write};

use bytes::BytesMut;

use crate::error::Result;

/// One synchronous request/reply channel to a device.
///
/// Implementations carry exactly one call at a time. `send_and_receive`
/// blocks until the reply is available or the link fails; the reply bytes
/// replace the contents of `reply`.
pub trait Link {
    /// Establish the link and complete any protocol handshake.
    fn open(&mut self) -> Result<()>;

    /// Tear the link down. Closing an already closed link is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Send one named call with encoded arguments and receive the encoded results.
    fn send_and_receive(&mut self, name: &str, args: &[u8], reply: &mut BytesMut) -> Result<()>;

    /// Transport name for diagnostics.
    fn transport_name(&self) -> &'static str {
        "link"
    }
}

impl<L: Link + ?Sized> Link for Box<L> {
    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn send_and_receive(&mut self, name: &str, args: &[u8], reply: &mut BytesMut) -> Result<()> {
        (**self).send_and_receive(name, args, reply)
    }

    fn transport_name(&self) -> &'static str {
        (**self).transport_name()
    }
}

/// A connected bridge stream that implements Read + Write.
///
/// Wraps the Unix domain socket the bridge listens on.
#[cfg(unix)]
pub struct DeviceStream {
    inner: std::os::unix::net::UnixStream,
}

#[cfg(unix)]
impl Read for DeviceStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

#[cfg(unix)]
impl Write for DeviceStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(unix)]
impl DeviceStream {
    /// Create a DeviceStream from a Unix domain socket stream.
    pub fn from_unix(stream: std::os::unix::net::UnixStream) -> Self {
        Self { inner: stream }
    }

    /// Set read timeout on the underlying stream.
    pub fn set_read_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        self.inner.set_read_timeout(timeout).map_err(Into::into)
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        self.inner.set_write_timeout(timeout).map_err(Into::into)
    }
}

#[cfg(unix)]
impl std::fmt::Debug for DeviceStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStream")
            .field("type", &"unix")
            .finish()
    }
}
