//! Error types for the signature crate

use thiserror::Error as ThisError;

/// Errors that can occur during signature operations
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// Invalid key size
    #[error("Invalid key size: expected {expected}, got {actual}")]
    InvalidKeySize {
        /// Expected size in bytes
        expected: usize,
        /// Actual size in bytes
        actual: usize,
    },

    /// Invalid signature size
    #[error("Invalid signature size: expected {expected}, got {actual}")]
    InvalidSignatureSize {
        /// Expected size in bytes
        expected: usize,
        /// Actual size in bytes
        actual: usize,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Key generation failed
    #[error("{algorithm} key generation failed: {details}")]
    KeyGeneration {
        /// Parameter set name
        algorithm: &'static str,
        /// What went wrong
        details: String,
    },

    /// Signature generation failed
    #[error("{algorithm} signature generation failed: {details}")]
    SignatureGeneration {
        /// Parameter set name
        algorithm: &'static str,
        /// What went wrong
        details: String,
    },

    /// Verification failed
    #[error("{algorithm} verification failed: {details}")]
    Verification {
        /// Parameter set name
        algorithm: &'static str,
        /// Why the signature was rejected
        details: String,
    },

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// The random source failed
    #[error("Sampling error: {0}")]
    Sampling(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wraps an arithmetic-layer error that should not occur for valid
    /// parameters.
    pub fn from_algo(err: algorithms::Error) -> Self {
        Self::Internal(format!("Algorithm error: {}", err))
    }

    /// Whether this is a rejected signature rather than malformed input
    pub fn is_verification_failure(&self) -> bool {
        matches!(self, Error::Verification { .. })
    }
}

impl From<algorithms::Error> for Error {
    fn from(err: algorithms::Error) -> Self {
        use algorithms::Error as AlgoError;

        match err {
            AlgoError::Parameter { name, reason } => {
                Error::InvalidParameter(format!("{}: {}", name, reason))
            }
            AlgoError::Length {
                context,
                expected,
                actual,
            } => Error::Deserialization(format!(
                "{}: expected {} bytes, got {}",
                context, expected, actual
            )),
            other => Error::from_algo(other),
        }
    }
}

impl From<Error> for api::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidKeySize { expected, actual } => api::Error::InvalidLength {
                context: "MEDS key",
                expected,
                actual,
            },
            Error::InvalidSignatureSize { expected, actual } => api::Error::InvalidLength {
                context: "MEDS signature",
                expected,
                actual,
            },
            Error::InvalidParameter(message) => api::Error::InvalidParameter {
                context: "sign",
                message,
            },
            Error::InvalidKey(message) => api::Error::InvalidKey {
                context: "sign",
                message,
            },
            Error::KeyGeneration { algorithm, details } => api::Error::Internal {
                context: algorithm,
                message: format!("Key generation failed: {}", details),
            },
            Error::SignatureGeneration { algorithm, details } => api::Error::Internal {
                context: algorithm,
                message: format!("Signature generation failed: {}", details),
            },
            Error::Verification { algorithm, details } => api::Error::InvalidSignature {
                context: algorithm,
                message: details,
            },
            Error::Deserialization(message) => api::Error::SerializationError {
                context: "deserialization",
                message,
            },
            Error::Sampling(message) => api::Error::RandomGenerationError {
                context: "sampling",
                message,
            },
            Error::Internal(message) => api::Error::Internal {
                context: "internal",
                message,
            },
        }
    }
}

/// Result type for signature operations
pub type Result<T> = core::result::Result<T, Error>;
