use std::io::{ErrorKind, Read, Write};

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::config::LinkConfig;
use crate::envelope::{
    decode_envelope, encode_call, encode_envelope, encode_hello, parse_hello, parse_reply,
    status, status_to_error, Envelope, EnvelopeKind,
};
use crate::error::{Result, TransportError};
#[cfg(unix)]
use crate::traits::DeviceStream;
use crate::traits::Link;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// A [`Link`] speaking the bridge envelope protocol over any `Read + Write` stream.
///
/// Handles partial reads and writes internally. The link must be opened
/// (HELLO / HELLO_ACK exchange) before calls are accepted. A call that fails
/// after its CALL envelope went out leaves the stream out of step with the
/// bridge, so the link drops back to closed and must be reopened.
pub struct StreamLink<S> {
    inner: S,
    rx: BytesMut,
    tx: BytesMut,
    config: LinkConfig,
    open: bool,
}

impl<S: Read + Write> StreamLink<S> {
    /// Create a new stream link with default configuration.
    pub fn new(inner: S) -> Self {
        Self::with_config(inner, LinkConfig::default())
    }

    /// Create a new stream link with explicit configuration.
    pub fn with_config(inner: S, config: LinkConfig) -> Self {
        Self {
            inner,
            rx: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            tx: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            open: false,
        }
    }

    /// Whether the handshake has completed and the link accepts calls.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consume the link and return the inner stream.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Current link configuration.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.tx.len() {
            match self.inner.write(&self.tx[offset..]) {
                Ok(0) => return Err(TransportError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        trace!(bytes = offset, "envelope written");

        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn read_envelope(&mut self) -> Result<Envelope> {
        loop {
            if let Some(env) = decode_envelope(&mut self.rx, self.config.max_reply_size)? {
                trace!(kind = ?env.kind, bytes = env.wire_size(), "envelope read");
                return Ok(env);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            };

            if read == 0 {
                return Err(TransportError::ConnectionClosed);
            }

            self.rx.extend_from_slice(&chunk[..read]);
        }
    }

    /// Send the buffered CALL and wait for its REPLY.
    fn exchange(&mut self) -> Result<(i32, Bytes)> {
        self.write_buffered()?;
        let env = self.read_envelope()?;
        if env.kind != EnvelopeKind::Reply {
            return Err(TransportError::Malformed("expected REPLY envelope"));
        }
        parse_reply(env.body)
    }
}

#[cfg(unix)]
impl StreamLink<DeviceStream> {
    /// Create a stream link for a `DeviceStream` and apply timeouts from config.
    pub fn with_config_device(inner: DeviceStream, config: LinkConfig) -> Result<Self> {
        inner.set_read_timeout(config.read_timeout)?;
        inner.set_write_timeout(config.write_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}

impl<S: Read + Write> Link for StreamLink<S> {
    fn open(&mut self) -> Result<()> {
        if self.open {
            return Ok(());
        }

        self.rx.clear();
        self.tx.clear();
        encode_hello(EnvelopeKind::Hello, self.config.protocol_version, &mut self.tx)?;
        self.write_buffered()?;

        let env = self.read_envelope().map_err(|err| match err {
            TransportError::Malformed(what) => TransportError::Handshake(what.to_string()),
            other => other,
        })?;
        if env.kind != EnvelopeKind::HelloAck {
            return Err(TransportError::Handshake(format!(
                "expected HELLO_ACK, got {:?}",
                env.kind
            )));
        }
        let version = parse_hello(&env.body)
            .map_err(|err| TransportError::Handshake(err.to_string()))?;
        if version != self.config.protocol_version {
            return Err(TransportError::Handshake(format!(
                "protocol version mismatch: bridge speaks {version}, expected {}",
                self.config.protocol_version
            )));
        }

        debug!(version, "bridge handshake complete");
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;

        self.tx.clear();
        encode_envelope(EnvelopeKind::Bye, &[], &mut self.tx)?;
        self.write_buffered()?;
        debug!("bridge link closed");
        Ok(())
    }

    fn send_and_receive(&mut self, name: &str, args: &[u8], reply: &mut BytesMut) -> Result<()> {
        if !self.open {
            return Err(TransportError::NotOpen);
        }

        self.tx.clear();
        encode_call(name, args, &mut self.tx)?;

        let (device_status, results) = match self.exchange() {
            Ok(reply) => reply,
            Err(err) => {
                // A late reply must never be read as the answer to the next call.
                self.rx.clear();
                self.open = false;
                debug!(name, error = %err, "call failed mid-exchange, link closed");
                return Err(err);
            }
        };
        if device_status != status::OK {
            debug!(name, device_status, "device rejected call");
            return Err(status_to_error(device_status, name));
        }

        reply.clear();
        reply.extend_from_slice(&results);
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "stream"
    }
}

impl<S> std::fmt::Debug for StreamLink<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamLink")
            .field("open", &self.open)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
