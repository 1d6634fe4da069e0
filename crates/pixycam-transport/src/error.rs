use std::path::PathBuf;

/// Errors that can occur while moving bytes to and from the device.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to connect to the bridge socket.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the link.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// The device is claimed by another client.
    #[error("device busy")]
    Busy,

    /// The device went away.
    #[error("no device")]
    NoDevice,

    /// No matching device was found.
    #[error("device not found")]
    NotFound,

    /// The link was established but the protocol handshake failed.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// The device does not know the requested procedure.
    #[error("invalid command '{0}'")]
    InvalidCommand(String),

    /// The device could not make sense of a call it received.
    #[error("device reported a protocol error on '{0}'")]
    Protocol(String),

    /// The peer sent bytes that do not form a valid envelope.
    #[error("malformed envelope: {0}")]
    Malformed(&'static str),

    /// An envelope body exceeds the configured maximum.
    #[error("envelope body too large ({size} bytes, max {max})")]
    BodyTooLarge { size: usize, max: usize },

    /// The device reported a status this link does not recognize.
    #[error("device reported status {0}")]
    Device(i32),

    /// A call was attempted on a link that is not open.
    #[error("link is not open")]
    NotOpen,

    /// The connection was closed before a complete envelope was received.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
