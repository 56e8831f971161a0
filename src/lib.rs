//! # meds
//!
//! Pure Rust implementation of MEDS, the Matrix Equivalence Digital Signature
//! scheme, for the six published parameter sets.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! meds = "0.3"
//! ```
//!
//! ```no_run
//! use meds::prelude::*;
//! use meds::sign::Meds9923;
//!
//! let mut rng = rand::rngs::OsRng;
//! let (pk, sk) = Meds9923::keypair(&mut rng)?;
//! let sig = Meds9923::sign(b"This is my message", &sk)?;
//! Meds9923::verify(b"This is my message", &sig, &pk)?;
//! # Ok::<(), meds::api::Error>(())
//! ```
//!
//! ## Features
//!
//! - `sign` (default): key generation, signing and verification
//! - `parallel`: compute the per-round commitments on a rayon pool
//! - `serde`: `Serialize` for [`params::pqc::meds::ParameterSet`]
//! - `full`: all features enabled
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several sub-crates:
//!
//! - [`meds-api`]: error type and signature traits
//! - [`meds-params`]: parameter sets
//! - [`meds-algorithms`]: finite field, matrices and SHAKE256
//! - [`meds-sign`]: the signature scheme itself

pub use meds_algorithms as algorithms;
pub use meds_api as api;
pub use meds_params as params;

#[cfg(feature = "sign")]
pub use meds_sign as sign;

/// Common imports for meds users
pub mod prelude {
    pub use crate::api::{Error, Result};
    pub use crate::api::{Signature, SignatureAttached, SignatureSerialize};

    pub use crate::algorithms::field::FieldElement;
    pub use crate::algorithms::matrix::Matrix;
    pub use crate::params::pqc::meds::ParameterSet;
}
