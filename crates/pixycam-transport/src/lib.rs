//! Link abstraction for talking to a Pixy sensor.
//!
//! A [`Link`] carries one named call and its encoded arguments to the
//! device and hands back the encoded reply. The USB side lives in a bridge
//! process; this crate ships the stream link that talks to such a bridge
//! over a Unix domain socket:
//! - [`envelope`]: message framing between host and bridge
//! - [`StreamLink`]: a [`Link`] over any `Read + Write` stream
//! - [`UnixDomainSocket`]: connector for the bridge socket (Linux/macOS)
//!
//! This is the lowest layer of pixycam. Everything else builds on top of
//! the [`Link`] trait provided here.

pub mod config;
pub mod envelope;
pub mod error;
pub mod stream;
pub mod traits;

#[cfg(unix)]
pub mod uds;

pub use config::{LinkConfig, DEFAULT_MAX_REPLY_SIZE};
pub use envelope::{Envelope, EnvelopeKind, PROTOCOL_VERSION};
pub use error::{Result, TransportError};
pub use stream::StreamLink;
pub use traits::Link;

#[cfg(unix)]
pub use traits::DeviceStream;
#[cfg(unix)]
pub use uds::UnixDomainSocket;
