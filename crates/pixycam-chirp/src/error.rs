use crate::value::ValueKind;

/// Errors raised while building, encoding or decoding a call.
#[derive(Debug, thiserror::Error)]
pub enum ChirpError {
    /// The call supplies a different number of arguments than the schema declares.
    #[error("'{command}' takes {expected} argument(s), got {found}")]
    ArgumentCount {
        command: String,
        expected: usize,
        found: usize,
    },

    /// An argument's kind does not match the schema.
    #[error("'{command}' argument {index}: expected {expected:?}, got {found:?}")]
    ArgumentKind {
        command: String,
        index: usize,
        expected: ValueKind,
        found: ValueKind,
    },

    /// The reply ended before every expected result was present.
    #[error("reply is missing result {index} ({expected:?})")]
    MissingResult { index: usize, expected: ValueKind },

    /// A reply value carries a tag that does not match the expected kind.
    #[error("result {index}: expected {expected:?}, got wire tag {tag:#04x}")]
    KindMismatch {
        index: usize,
        expected: ValueKind,
        tag: u8,
    },

    /// A reply value is cut short.
    #[error("result {index} is truncated")]
    Truncated { index: usize },

    /// A trailing reply value carries a tag no kind uses.
    #[error("unknown wire tag {tag:#04x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    /// The reply does not end with the list sentinel.
    #[error("reply is not terminated by a sentinel")]
    MissingSentinel,

    /// A decoded result was read with the wrong accessor or index.
    #[error("result {index} is not a {expected:?}")]
    ResultAccess { index: usize, expected: ValueKind },
}

impl ChirpError {
    /// True for errors detected before any I/O (bad call construction).
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            ChirpError::ArgumentCount { .. } | ChirpError::ArgumentKind { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ChirpError>;
