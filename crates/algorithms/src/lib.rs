//! Arithmetic primitives for MEDS
//!
//! This crate provides the pieces MEDS is built from:
//!
//! - [`field`]: elements of the prime field F_q
//! - [`matrix`]: dense matrices over F_q with systematic-form reduction,
//!   inversion, Kronecker products and two byte codecs
//! - [`xof`]: the SHAKE256 extendable-output function
//!
//! Everything here is independent of any particular MEDS parameter set.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub use error::{validate, Error, Result};

pub mod field;
pub use field::FieldElement;

pub mod matrix;
pub use matrix::Matrix;

pub mod xof;
pub use xof::{ExtendableOutputFunction, ShakeXof256};
