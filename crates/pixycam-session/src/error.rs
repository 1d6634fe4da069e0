use pixycam_chirp::ChirpError;
use pixycam_transport::TransportError;

use crate::status::{status_text, StatusCode};

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Link-level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Call construction or reply decoding error.
    #[error("chirp error: {0}")]
    Chirp(#[from] ChirpError),

    /// A call was attempted before `open()` or after `close()`.
    #[error("session is not open")]
    NotInitialized,

    /// A parameter was rejected locally; nothing was sent.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The reply decoded but its contents are inconsistent.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The device answered with a negative response value.
    #[error("device returned {} ({})", .0, status_text(*.0))]
    Remote(i32),
}

impl SessionError {
    /// The status code this error reports as.
    pub fn status(&self) -> StatusCode {
        match self {
            SessionError::Transport(err) => transport_status(err),
            SessionError::Chirp(err) if err.is_argument_error() => StatusCode::InvalidParameter,
            SessionError::Chirp(_) | SessionError::Protocol(_) => StatusCode::ChirpProtocolError,
            SessionError::NotInitialized => StatusCode::NotInitialized,
            SessionError::InvalidParameter(_) => StatusCode::InvalidParameter,
            SessionError::Remote(code) => {
                StatusCode::from_i32(*code).unwrap_or(StatusCode::ChirpProtocolError)
            }
        }
    }

    /// The signed integer status. Device-reported codes pass through unchanged.
    pub fn code(&self) -> i32 {
        match self {
            SessionError::Remote(code) | SessionError::Transport(TransportError::Device(code)) => {
                *code
            }
            other => other.status().as_i32(),
        }
    }
}

fn transport_status(err: &TransportError) -> StatusCode {
    match err {
        TransportError::Io(_) | TransportError::ConnectionClosed => StatusCode::UsbIo,
        TransportError::Connect { .. } | TransportError::NotFound => StatusCode::UsbNotFound,
        TransportError::NoDevice => StatusCode::UsbNoDevice,
        TransportError::Busy => StatusCode::UsbBusy,
        TransportError::PathTooLong { .. } => StatusCode::InvalidParameter,
        TransportError::Handshake(_)
        | TransportError::Protocol(_)
        | TransportError::Malformed(_)
        | TransportError::BodyTooLarge { .. } => StatusCode::ChirpProtocolError,
        TransportError::InvalidCommand(_) => StatusCode::InvalidCommand,
        TransportError::Device(code) => {
            StatusCode::from_i32(*code).unwrap_or(StatusCode::ChirpProtocolError)
        }
        TransportError::NotOpen => StatusCode::NotInitialized,
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
