//! Extendable Output Functions (XOF)
//!
//! MEDS draws all of its pseudorandomness from SHAKE256: seeds are absorbed
//! once and an arbitrary number of bytes is squeezed from the same stream.

use crate::error::{validate, Result};

pub mod shake;

pub use shake::ShakeXof256;

/// Trait for extendable output functions
pub trait ExtendableOutputFunction {
    /// Creates a new instance of the XOF
    fn new() -> Self;

    /// Updates the XOF state with new data
    fn update(&mut self, data: &[u8]) -> Result<()>;

    /// Finalizes the XOF state for output
    fn finalize(&mut self) -> Result<()>;

    /// Squeezes output bytes into the provided buffer.
    ///
    /// Successive calls continue the same output stream.
    fn squeeze(&mut self, output: &mut [u8]) -> Result<()>;

    /// Squeezes the specified number of output bytes into a new vector
    fn squeeze_into_vec(&mut self, len: usize) -> Result<Vec<u8>>;

    /// Resets the XOF state
    fn reset(&mut self) -> Result<()>;

    /// Returns the security level in bits
    fn security_level() -> usize;

    /// Convenience method to generate output in a single call
    fn generate(data: &[u8], len: usize) -> Result<Vec<u8>>
    where
        Self: Sized,
    {
        validate::parameter(
            len > 0,
            "output_length",
            "XOF output length must be greater than 0",
        )?;

        let mut xof = Self::new();
        xof.update(data)?;
        xof.squeeze_into_vec(len)
    }
}
