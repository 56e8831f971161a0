//! Parameter sets for the meds library
//!
//! Constants only; every other meds crate reads its dimensions, modulus and
//! byte lengths from here.

pub mod pqc;
