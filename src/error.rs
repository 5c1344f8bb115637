// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type shared by every fallible operation of the crate.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DtmsError>;

/// Failures raised by [`Instant`](crate::Instant), [`Interval`](crate::Interval)
/// and the calendar helpers they delegate to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DtmsError {
    /// A caller-supplied value is outside the accepted domain
    /// (negative microsecond amount, unrecognized `diff` operand, ...).
    #[error("{0}")]
    InvalidArgument(String),

    /// A relative-offset string could not be understood by the calendar engine.
    #[error("invalid relative offset `{0}`")]
    InvalidModifier(String),

    /// An ISO-8601 duration string is malformed.
    #[error("invalid interval specification `{0}`")]
    InvalidInterval(String),

    /// `input` does not match the parse template `format`.
    #[error("cannot parse `{input}` with format `{format}`: {source}")]
    Parse {
        input: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The IANA timezone identifier is unknown.
    #[error("unknown timezone `{0}`")]
    UnknownTimezone(String),

    /// Calendar arithmetic left the range representable by chrono.
    #[error("date arithmetic out of representable range")]
    OutOfRange,
}

impl DtmsError {
    pub(crate) fn negative_microseconds() -> Self {
        Self::InvalidArgument("Value of microseconds should be positive.".to_string())
    }
}
