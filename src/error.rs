//! Error types for textual input.
//!
//! All algorithms are total over well-formed cubes and covers; errors only
//! arise while parsing the textual cube and PLA formats.

use thiserror::Error;

use crate::types::MAX_VARS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The positional cube format only admits `0`, `1` and `-`.
    #[error("invalid cube character {0:?}")]
    InvalidCubeChar(char),

    /// A cube or PLA header names more variables than the packed
    /// representation supports.
    #[error("{0} variables requested, capacity is {MAX_VARS}")]
    TooManyVariables(usize),

    /// A PLA product line without a recognizable output column, or with a
    /// multi-bit output (only single-output PLAs are supported).
    #[error("malformed PLA line {0:?}")]
    MalformedPla(String),
}
