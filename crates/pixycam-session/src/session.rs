use std::ops::Deref;

use bytes::BytesMut;
use pixycam_chirp::{decode_results, Call, Results};
use pixycam_transport::Link;
use tracing::{debug, trace};

use crate::error::{Result, SessionError};

/// Default receive buffer size: one 320x200 frame plus headroom.
pub const DEFAULT_RECEIVE_BUFFER_CAPACITY: usize = 128 * 1024;

const SEND_BUFFER_CAPACITY: usize = 64;

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Initial capacity of the receive buffer. It grows if a reply is larger.
    pub receive_buffer_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            receive_buffer_capacity: DEFAULT_RECEIVE_BUFFER_CAPACITY,
        }
    }
}

/// Decoded results of one dispatched call.
///
/// Byte arrays borrow the session's receive buffer, so the session cannot
/// dispatch another call while a `Reply` is alive.
#[derive(Debug)]
pub struct Reply<'a> {
    results: Results<'a>,
}

impl<'a> Reply<'a> {
    pub fn into_results(self) -> Results<'a> {
        self.results
    }
}

impl<'a> Deref for Reply<'a> {
    type Target = Results<'a>;

    fn deref(&self) -> &Self::Target {
        &self.results
    }
}

/// One conversation with a sensor over a [`Link`].
///
/// The session must be opened before any call; calls on a session that is
/// not open fail with [`SessionError::NotInitialized`] and touch nothing.
/// One call is in flight at a time and every reply lands in a single
/// receive buffer owned by the session.
pub struct Session<L: Link> {
    link: L,
    tx: BytesMut,
    rx: BytesMut,
    initialized: bool,
}

impl<L: Link> Session<L> {
    /// Wrap a link with default configuration. The session starts closed.
    pub fn new(link: L) -> Self {
        Self::with_config(link, SessionConfig::default())
    }

    pub fn with_config(link: L, config: SessionConfig) -> Self {
        Self {
            link,
            tx: BytesMut::with_capacity(SEND_BUFFER_CAPACITY),
            rx: BytesMut::with_capacity(config.receive_buffer_capacity),
            initialized: false,
        }
    }

    /// Open the link. Opening an open session is a no-op.
    pub fn open(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.link.open()?;
        self.initialized = true;
        debug!(transport = self.link.transport_name(), "session opened");
        Ok(())
    }

    /// Close the link. Closing a closed session is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;
        self.rx.clear();
        self.link.close()?;
        debug!("session closed");
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.initialized
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Dispatch one call and decode its reply against the call's schema.
    pub fn call(&mut self, call: &Call<'_>) -> Result<Reply<'_>> {
        if !self.initialized {
            return Err(SessionError::NotInitialized);
        }

        debug!(
            command = call.name(),
            args = call.args().len(),
            "dispatching call"
        );
        self.tx.clear();
        call.encode_args(&mut self.tx);
        self.link
            .send_and_receive(call.name(), &self.tx, &mut self.rx)?;
        trace!(command = call.name(), bytes = self.rx.len(), "reply received");

        let results = decode_results(&self.rx, call.schema().results)?;
        Ok(Reply { results })
    }
}

impl<L: Link> Drop for Session<L> {
    fn drop(&mut self) {
        if self.initialized {
            if let Err(err) = self.close() {
                debug!(error = %err, "close on drop failed");
            }
        }
    }
}

impl<L: Link> std::fmt::Debug for Session<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("transport", &self.link.transport_name())
            .field("open", &self.initialized)
            .finish_non_exhaustive()
    }
}
