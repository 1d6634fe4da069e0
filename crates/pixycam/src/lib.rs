//! Host-side client for the Pixy (CMUcam5) vision sensor.
//!
//! # Crate Structure
//!
//! - [`transport`]: Link trait and the Unix socket bridge link
//! - [`chirp`]: Typed argument/result codec and command schemas
//! - [`image`]: Pixel formats and Bayer demosaicing
//! - [`session`]: Sessions, blocks, frames and typed settings
//!
//! ```no_run
//! # fn main() -> pixycam::session::Result<()> {
//! let mut session = pixycam::connect("/tmp/pixycam.sock")?;
//! for block in session.blocks(25)? {
//!     println!("sig {} at ({}, {})", block.signature, block.x, block.y);
//! }
//! # Ok(())
//! # }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use pixycam_transport::*;
}

/// Re-export chirp codec types.
pub mod chirp {
    pub use pixycam_chirp::*;
}

/// Re-export image types.
pub mod image {
    pub use pixycam_image::*;
}

/// Re-export session types.
pub mod session {
    pub use pixycam_session::*;
}

#[cfg(unix)]
pub use pixycam_session::{connect, connect_with_config, BridgeSession};
pub use pixycam_session::{Block, Frame, FrameRequest, Session, SessionError, StatusCode};
