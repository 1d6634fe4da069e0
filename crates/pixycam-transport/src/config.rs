use std::time::Duration;

use crate::envelope::PROTOCOL_VERSION;

/// Default maximum envelope body accepted from a bridge: 4 MiB.
///
/// Large enough for a full 1280x800 raw frame.
pub const DEFAULT_MAX_REPLY_SIZE: usize = 4 * 1024 * 1024;

/// Configuration for a stream link.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Maximum envelope body size in bytes. Default: 4 MiB.
    pub max_reply_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<Duration>,
    /// Bridge protocol version announced during the handshake.
    pub protocol_version: u16,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            max_reply_size: DEFAULT_MAX_REPLY_SIZE,
            read_timeout: None,
            write_timeout: None,
            protocol_version: PROTOCOL_VERSION,
        }
    }
}
