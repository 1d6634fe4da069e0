//! Session layer for Pixy sensors.
//!
//! This is the "just works" layer. Open a [`Session`] over a [`Link`],
//! then poll blocks, grab frames or change camera settings through typed
//! methods. Lower-level callers can build any [`Call`] and dispatch it
//! with [`Session::call`].
//!
//! [`Link`]: pixycam_transport::Link
//! [`Call`]: pixycam_chirp::Call

pub mod blocks;
pub mod commands;
#[cfg(unix)]
pub mod connector;
pub mod error;
pub mod frame;
pub mod session;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use blocks::{Block, BlockKind, BLOCK_RECORD_SIZE};
pub use commands::{ExposureCompensation, FirmwareVersion, Rgb};
#[cfg(unix)]
pub use connector::{connect, connect_with_config, BridgeSession};
pub use error::{Result, SessionError};
pub use frame::{Frame, FrameRequest, RawFrame};
pub use session::{Reply, Session, SessionConfig, DEFAULT_RECEIVE_BUFFER_CAPACITY};
pub use status::{status_text, StatusCode};
