//! Traits implemented by the signature schemes

pub mod signature;

pub use signature::{Signature, SignatureAttached, SignatureSerialize};
