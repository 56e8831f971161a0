//! The MEDS signature scheme
//!
//! MEDS (Matrix Equivalence Digital Signature) is a post-quantum signature
//! built from the matrix code equivalence problem. This crate provides the
//! six published parameter sets as types implementing
//! [`api::Signature`], plus runtime-parameterized functions in
//! [`pq::meds`].
//!
//! Enable the `parallel` feature to compute the per-round commitments of
//! signing and verification on the rayon thread pool.

pub mod error;
pub mod pq;

pub use error::{Error, Result};
pub use pq::meds::{
    MedsPublicKey, MedsSecretKey, MedsSignatureData, Meds, Meds134180, Meds13220, Meds167717,
    Meds41711, Meds69497, Meds9923,
};
