//! Public API traits and types for the meds library
//!
//! This crate provides the public API surface shared by the meds crates:
//! the error type returned across crate boundaries and the signature traits
//! implemented by every MEDS parameter set.

pub mod error;
pub mod traits;

pub use error::{Error, Result};

pub use traits::{Signature, SignatureAttached, SignatureSerialize};

pub use traits::signature;
