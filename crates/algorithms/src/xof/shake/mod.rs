//! SHAKE256 extendable output function
//!
//! Thin stateful wrapper around the `sha3` crate: absorb with
//! [`update`](ExtendableOutputFunction::update), then squeeze as many bytes
//! as needed.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Shake256, Shake256Reader};

use super::ExtendableOutputFunction;
use crate::error::{Error, Result};

enum State {
    Absorbing(Shake256),
    Squeezing(Shake256Reader),
}

/// SHAKE256 with 256-bit security
pub struct ShakeXof256 {
    state: State,
}

impl ShakeXof256 {
    /// Absorbs `data` and returns an XOF ready to squeeze
    pub fn with_input(data: &[u8]) -> Self {
        let mut hasher = Shake256::default();
        hasher.update(data);
        Self {
            state: State::Squeezing(hasher.finalize_xof()),
        }
    }
}

impl Default for ShakeXof256 {
    fn default() -> Self {
        <Self as ExtendableOutputFunction>::new()
    }
}

impl ExtendableOutputFunction for ShakeXof256 {
    fn new() -> Self {
        Self {
            state: State::Absorbing(Shake256::default()),
        }
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        match &mut self.state {
            State::Absorbing(hasher) => {
                hasher.update(data);
                Ok(())
            }
            State::Squeezing(_) => Err(Error::Processing {
                operation: "SHAKE256",
                details: "cannot absorb after squeezing",
            }),
        }
    }

    fn finalize(&mut self) -> Result<()> {
        if let State::Absorbing(hasher) = &mut self.state {
            let reader = core::mem::take(hasher).finalize_xof();
            self.state = State::Squeezing(reader);
        }
        Ok(())
    }

    fn squeeze(&mut self, output: &mut [u8]) -> Result<()> {
        self.finalize()?;
        match &mut self.state {
            State::Squeezing(reader) => {
                reader.read(output);
                Ok(())
            }
            State::Absorbing(_) => Err(Error::Processing {
                operation: "SHAKE256",
                details: "state not finalized",
            }),
        }
    }

    fn squeeze_into_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; len];
        self.squeeze(&mut out)?;
        Ok(out)
    }

    fn reset(&mut self) -> Result<()> {
        self.state = State::Absorbing(Shake256::default());
        Ok(())
    }

    fn security_level() -> usize {
        256
    }
}
