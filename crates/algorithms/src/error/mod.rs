//! Error handling for the arithmetic primitives

use std::borrow::Cow;

use api::Error as CoreError;
use thiserror::Error as ThisError;

/// The error type for arithmetic primitives
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// Parameter validation error
    #[error("Invalid parameter '{name}': {reason}")]
    Parameter {
        /// Name of the invalid parameter
        name: Cow<'static, str>,
        /// Reason why the parameter is invalid
        reason: Cow<'static, str>,
    },

    /// Length validation error
    #[error("Invalid length for {context}: expected {expected}, got {actual}")]
    Length {
        /// Context where the length error occurred
        context: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Processing error during an operation
    #[error("Processing error in {operation}: {details}")]
    Processing {
        /// Operation that failed
        operation: &'static str,
        /// Additional details about the failure
        details: &'static str,
    },

    /// Fallback for other errors
    #[error("{0}")]
    Other(&'static str),
}

impl Error {
    /// Shorthand to create a Parameter error
    pub fn param<N: Into<Cow<'static, str>>, R: Into<Cow<'static, str>>>(
        name: N,
        reason: R,
    ) -> Self {
        Error::Parameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for arithmetic primitives
pub type Result<T> = core::result::Result<T, Error>;

impl From<Error> for CoreError {
    fn from(err: Error) -> Self {
        match err {
            Error::Parameter { name, reason } => CoreError::InvalidParameter {
                context: "algorithms",
                message: format!("{}: {}", name, reason),
            },
            Error::Length {
                context,
                expected,
                actual,
            } => CoreError::InvalidLength {
                context,
                expected,
                actual,
            },
            Error::Processing { operation, details } => CoreError::Other {
                context: operation,
                message: details.to_string(),
            },
            Error::Other(msg) => CoreError::Other {
                context: "algorithms",
                message: msg.to_string(),
            },
        }
    }
}

pub mod validate;
