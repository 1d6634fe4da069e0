//! Typed calling convention for Pixy remote procedures ("chirp").
//!
//! A call is a procedure name, an ordered list of tagged arguments and an
//! ordered list of tagged results. On the wire every value is prefixed by
//! its width tag and each list ends with a zero sentinel:
//! - `0x01` / `0x02` / `0x04`: 8, 16 or 32-bit little-endian scalar
//! - `0x81`: byte array: 4-byte little-endian length, then the bytes
//! - `0x00`: end of list
//!
//! Nothing on the wire says how many values to expect, so both ends must
//! agree on a [`CommandSchema`]. [`Call`] checks arguments against the
//! schema before anything is encoded and [`decode_results`] checks every
//! reply value against it.

pub mod call;
pub mod codec;
pub mod error;
pub mod schema;
pub mod value;

pub use call::{Call, CallBuilder};
pub use codec::{decode_results, encode_arguments, encode_results, Results, ARRAY_TAG, SENTINEL};
pub use error::{ChirpError, Result};
pub use schema::{lookup, CommandSchema};
pub use value::{ResultValue, Value, ValueKind};
