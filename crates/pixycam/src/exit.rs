use std::fmt;
use std::io;

use pixycam_image::ImageError;
use pixycam_session::SessionError;
use pixycam_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused => TRANSPORT_ERROR,
        _ => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Connect { source, .. } | TransportError::Io(source) => {
            io_error(context, source)
        }
        TransportError::PathTooLong { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        TransportError::Protocol(_)
        | TransportError::Malformed(_)
        | TransportError::BodyTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

/// Map a session error to an exit code, keeping the device status in the message.
pub fn session_error(context: &str, err: SessionError) -> CliError {
    let status = err.code();
    match err {
        SessionError::Transport(err) => transport_error(context, err),
        SessionError::InvalidParameter(_) => {
            CliError::new(USAGE, format!("{context}: {err} [{status}]"))
        }
        SessionError::Chirp(ref inner) if inner.is_argument_error() => {
            CliError::new(USAGE, format!("{context}: {err} [{status}]"))
        }
        SessionError::Chirp(_) | SessionError::Protocol(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err} [{status}]"))
        }
        SessionError::Remote(_) => CliError::new(FAILURE, format!("{context}: {err}")),
        SessionError::NotInitialized => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

pub fn image_error(context: &str, err: ImageError) -> CliError {
    match err {
        ImageError::Io(source) => io_error(context, source),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}
