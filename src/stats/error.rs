//! Structured error types for parsing cgroup counter files.

use std::num::ParseIntError;

use thiserror::Error;

/// Error raised while parsing a line-oriented kernel counter file.
///
/// Line numbers are 1-based and refer to the file as read, so an error can be
/// traced back to the exact kernel line that produced it.
#[derive(Debug, Error)]
pub enum StatParseError {
    /// A line did not consist of exactly one key and one value.
    #[error("malformed line {line}: `{content}`")]
    MalformedLine { content: String, line: usize },

    /// A value failed to parse as an unsigned integer.
    #[error("invalid value for `{key}` at line {line}: `{value}`: {source}")]
    InvalidValue {
        key: String,
        value: String,
        line: usize,
        #[source]
        source: ParseIntError,
    },

    /// The underlying read failed.
    #[error("error during I/O: {0}")]
    Io(#[from] std::io::Error),
}
