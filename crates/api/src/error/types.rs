//! Error type definitions for signature operations

use thiserror::Error as ThisError;

/// Primary error type returned across the public API
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// Invalid key error
    #[error("Invalid key: {context}: {message}")]
    InvalidKey {
        context: &'static str,
        message: String,
    },

    /// Invalid signature error
    #[error("Invalid signature: {context}: {message}")]
    InvalidSignature {
        context: &'static str,
        message: String,
    },

    /// Invalid length error with context
    #[error("{context}: invalid length (expected {expected}, got {actual})")]
    InvalidLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Invalid parameter error
    #[error("{context}: {message}")]
    InvalidParameter {
        context: &'static str,
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {context}: {message}")]
    SerializationError {
        context: &'static str,
        message: String,
    },

    /// Random generation error
    #[error("Random generation error: {context}: {message}")]
    RandomGenerationError {
        context: &'static str,
        message: String,
    },

    /// A sampling bound was exhausted or an invariant the signer guarantees did not hold
    #[error("Internal error: {context}: {message}")]
    Internal {
        context: &'static str,
        message: String,
    },

    /// Other error
    #[error("{context}: {message}")]
    Other {
        context: &'static str,
        message: String,
    },
}

/// Result type for signature operations
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Replace the context of an existing error, keeping its message
    pub fn with_context(self, context: &'static str) -> Self {
        match self {
            Self::InvalidKey { message, .. } => Self::InvalidKey { context, message },
            Self::InvalidSignature { message, .. } => Self::InvalidSignature { context, message },
            Self::InvalidLength { expected, actual, .. } => Self::InvalidLength {
                context,
                expected,
                actual,
            },
            Self::InvalidParameter { message, .. } => Self::InvalidParameter { context, message },
            Self::SerializationError { message, .. } => {
                Self::SerializationError { context, message }
            }
            Self::RandomGenerationError { message, .. } => {
                Self::RandomGenerationError { context, message }
            }
            Self::Internal { message, .. } => Self::Internal { context, message },
            Self::Other { message, .. } => Self::Other { context, message },
        }
    }

    /// Replace the message of an existing error
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        match self {
            Self::InvalidKey { context, .. } => Self::InvalidKey { context, message },
            Self::InvalidSignature { context, .. } => Self::InvalidSignature { context, message },
            Self::InvalidLength { .. } => self,
            Self::InvalidParameter { context, .. } => Self::InvalidParameter { context, message },
            Self::SerializationError { context, .. } => {
                Self::SerializationError { context, message }
            }
            Self::RandomGenerationError { context, .. } => {
                Self::RandomGenerationError { context, message }
            }
            Self::Internal { context, .. } => Self::Internal { context, message },
            Self::Other { context, .. } => Self::Other { context, message },
        }
    }

    /// True for errors that mean "this signature does not verify"
    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, Self::InvalidSignature { .. })
    }
}
