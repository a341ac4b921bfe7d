//! Error types shared across the crate.
//!
//! Internally everything is an `anyhow::Error`. At command boundaries errors are tagged with an
//! `ErrorType` so that a caller can tell a network failure from a bad config without parsing
//! message strings.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad class of a failure surfaced by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The configuration file or home directory is missing or invalid.
    Config,
    /// The API could not be reached or returned a non-success status.
    Network,
    /// The API answered, but the body could not be understood.
    Response,
    /// The store rejected the operation, e.g. an unknown transaction id.
    Store,
    /// The user supplied something unusable on the command line.
    Input,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

impl ErrorType {
    /// Returns the `ErrorType` that `err` was tagged with by `pub_result`, if any.
    pub fn of(err: &Error) -> Option<ErrorType> {
        err.downcast_ref::<Tagged>().map(|t| t.error_type)
    }
}

/// The context value attached by `pub_result`. It keeps the full inner chain so that the outermost
/// `Display` of the error still says what went wrong.
#[derive(Debug)]
struct Tagged {
    error_type: ErrorType,
    message: String,
}

impl Display for Tagged {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {}", self.error_type, self.message)
    }
}

/// Converts any result into a crate `Result` whose error is tagged with an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| {
            let e: Error = e.into();
            // Already tagged further down, keep the inner classification.
            if ErrorType::of(&e).is_some() {
                return e;
            }
            let message = format!("{e:#}");
            e.context(Tagged {
                error_type,
                message,
            })
        })
    }
}
