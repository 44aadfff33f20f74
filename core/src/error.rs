//! Error types for the SmarterU client.
//!
//! # Design
//! Local validation failures (`MissingValue`, `InvalidArgument`) are raised
//! before anything touches the network. Transport failures (`Http`,
//! `Transport`) carry the raw status and body so callers see exactly what the
//! wire returned. A vendor rejection is a single `SmarterU` variant whose
//! display text is fixed; the individual vendor codes live in
//! [`SmarterUError::error_codes`].

use thiserror::Error;

use crate::types::ErrorCode;

/// Display text of every vendor rejection, regardless of the codes returned.
pub const SMARTERU_EXCEPTION_MESSAGE: &str =
    "SmarterU rejected the request due to the following error(s).";

/// Errors returned by the client and the XML generator.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field or identifier was absent before a request could be
    /// built.
    #[error("{0}")]
    MissingValue(String),

    /// A value had the wrong shape or fell outside an enumerated set.
    #[error("{0}")]
    InvalidArgument(String),

    /// The vendor answered `<Result>Failed</Result>`.
    #[error(transparent)]
    SmarterU(#[from] SmarterUError),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The transport could not complete the round trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The request XML could not be written.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body was not a well-formed vendor envelope.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn missing(message: impl Into<String>) -> Self {
        Error::MissingValue(message.into())
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

/// A vendor-reported failure with every `<Error>` entry in response order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", SMARTERU_EXCEPTION_MESSAGE)]
pub struct SmarterUError {
    error_codes: Vec<ErrorCode>,
}

impl SmarterUError {
    pub fn new(error_codes: Vec<ErrorCode>) -> Self {
        Self { error_codes }
    }

    pub fn error_codes(&self) -> &[ErrorCode] {
        &self.error_codes
    }

    /// `CODE: message` pairs joined by `, `, e.g. `Error1: Testing, Error2: 123`.
    pub fn details(&self) -> String {
        self.error_codes
            .iter()
            .map(|code| format!("{}: {}", code.error_code, code.error_message))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.error_codes.iter().any(|c| c.error_code == code)
    }
}
