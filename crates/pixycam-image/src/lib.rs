//! Image side of pixycam.
//!
//! - [`PixelFormat`] resolves the FourCC a frame reply carries
//! - [`demosaic`] turns a raw Bayer plane into three color planes
//!
//! Nothing here touches the device; the session crate hands frame bytes in.

pub mod bayer;
pub mod error;
pub mod fourcc;

pub use bayer::{demosaic, RgbPlanes};
pub use error::{ImageError, Result};
pub use fourcc::{fourcc, PixelFormat};
