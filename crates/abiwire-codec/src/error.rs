//! Codec error types

use thiserror::Error;

use crate::types::AbiParameter;

/// Codec error type
///
/// `path` fields locate the offending value below the parameter list, e.g.
/// `[1].amount[3]`; they render with a leading `$` for the root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Malformed or unknown type descriptor
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// Value count differs from parameter count
    #[error("parameter count mismatch at ${path}: expected {expected}, got {got}")]
    ParameterCountMismatch {
        /// Location of the mismatching list
        path: String,
        /// Number of parameters
        expected: usize,
        /// Number of values supplied
        got: usize,
    },

    /// Value not representable by its declared type
    #[error("invalid value at ${path}: {reason}")]
    InvalidValue {
        /// Location of the value
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// An offset or read position points outside the buffer
    #[error("offset {offset} out of bounds for buffer of {len} bytes")]
    OffsetOutOfBounds {
        /// Absolute position that was requested
        offset: usize,
        /// Buffer length
        len: usize,
    },

    /// A declared length needs more bytes than the buffer holds
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes required
        needed: usize,
        /// Bytes present
        available: usize,
    },

    /// No ABI item matches the query
    #[error("no matching ABI item: {0}")]
    SelectorNotFound(String),

    /// Several ABI items match and nothing disambiguates them
    #[error("ambiguous overload for `{name}`: {}", .candidates.join(", "))]
    AmbiguousOverload {
        /// Queried name, selector or topic
        name: String,
        /// Canonical signatures of the remaining candidates
        candidates: Vec<String>,
    },

    /// ABI or configuration JSON could not be read
    #[error("invalid ABI JSON: {0}")]
    Json(String),
}

impl CodecError {
    pub(crate) fn invalid_value(reason: impl Into<String>) -> Self {
        CodecError::InvalidValue {
            path: String::new(),
            reason: reason.into(),
        }
    }

    pub(crate) fn count_mismatch(expected: usize, got: usize) -> Self {
        CodecError::ParameterCountMismatch {
            path: String::new(),
            expected,
            got,
        }
    }

    /// Prefix the error's path with one more enclosing segment
    pub(crate) fn nested(self, segment: &str) -> Self {
        match self {
            CodecError::InvalidValue { path, reason } => CodecError::InvalidValue {
                path: format!("{segment}{path}"),
                reason,
            },
            CodecError::ParameterCountMismatch {
                path,
                expected,
                got,
            } => CodecError::ParameterCountMismatch {
                path: format!("{segment}{path}"),
                expected,
                got,
            },
            other => other,
        }
    }

    /// True for decode-time structural corruption
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            CodecError::OffsetOutOfBounds { .. } | CodecError::BufferTooSmall { .. }
        )
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e.to_string())
    }
}

impl From<abiwire_primitives::PrimitiveError> for CodecError {
    fn from(e: abiwire_primitives::PrimitiveError) -> Self {
        CodecError::invalid_value(e.to_string())
    }
}

/// One step of an error path
#[derive(Debug, Clone, Copy)]
pub(crate) enum Segment<'a> {
    /// Position in a parameter list or array
    Index(usize),
    /// Named tuple component
    Field(&'a str),
}

impl<'a> Segment<'a> {
    /// Named component if it has a name, its position otherwise
    pub(crate) fn component(param: &'a AbiParameter, index: usize) -> Self {
        match &param.name {
            Some(name) => Segment::Field(name),
            None => Segment::Index(index),
        }
    }

    pub(crate) fn render(&self) -> String {
        match self {
            Segment::Index(i) => format!("[{i}]"),
            Segment::Field(name) => format!(".{name}"),
        }
    }
}

/// Codec result type
pub type Result<T> = std::result::Result<T, CodecError>;
