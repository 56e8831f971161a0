//! Error handling shared by all meds crates

pub mod types;

pub use types::{Error, Result};

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Other {
            context: "I/O operation",
            message: e.to_string(),
        }
    }
}
