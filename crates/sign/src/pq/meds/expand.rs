//! Pseudorandom expansion of seeds into field elements, matrices and the
//! challenge vector.
//!
//! Every sampler here is a rejection loop over a SHAKE256 stream. The loops
//! accept with high probability, so they are capped at
//! `MAX_REJECTION_ITERATIONS` and report exhaustion as an internal error.

use algorithms::field::{bitlen, bytelen};
use algorithms::xof::{ExtendableOutputFunction, ShakeXof256};
use algorithms::{FieldElement, Matrix};
use params::pqc::meds::{ParameterSet, MAX_REJECTION_ITERATIONS};
use tracing::trace;

use crate::error::{Error, Result};

fn exhausted(what: &str) -> Error {
    Error::Internal(format!(
        "{} did not succeed within {} attempts",
        what, MAX_REJECTION_ITERATIONS
    ))
}

/// Draws one uniform element of F_q from `xof`.
///
/// Reads `bytelen(q)` bytes little-endian, masks to `bitlen(q)` bits and
/// rejects values `>= q`.
pub(crate) fn next_fq(xof: &mut ShakeXof256, q: u16) -> Result<FieldElement> {
    let byte_len = bytelen(usize::from(q));
    let mask = (1u32 << bitlen(usize::from(q))) - 1;
    let mut buf = [0u8; 2];

    for _ in 0..MAX_REJECTION_ITERATIONS {
        xof.squeeze(&mut buf[..byte_len])?;
        let v = buf[..byte_len]
            .iter()
            .enumerate()
            .fold(0u32, |acc, (j, &b)| acc | (u32::from(b) << (8 * j)))
            & mask;
        if v < u32::from(q) {
            return Ok(FieldElement::new(i64::from(v), q));
        }
    }
    Err(exhausted("field element sampling"))
}

/// Expands `seed` into `count` uniform field elements.
pub fn expand_fqs(seed: &[u8], count: usize, q: u16) -> Result<Vec<FieldElement>> {
    let mut xof = ShakeXof256::with_input(seed);
    (0..count).map(|_| next_fq(&mut xof, q)).collect()
}

/// Expands `seed` into a k x mn matrix `[I_k | X]` with uniform X.
pub fn expand_syst_mat(seed: &[u8], params: &ParameterSet) -> Result<Matrix> {
    let (k, mn, q) = (params.k, params.m * params.n, params.q);
    let mut xof = ShakeXof256::with_input(seed);

    let mut g = Matrix::new(k, mn, q);
    for i in 0..k {
        g.set(i, i, FieldElement::one(q));
        for j in k..mn {
            g.set(i, j, next_fq(&mut xof, q)?);
        }
    }
    Ok(g)
}

/// Expands `seed` into a uniform invertible d x d matrix.
///
/// Candidates are drawn from one continuous stream until one is invertible.
pub fn expand_inv_mat(seed: &[u8], q: u16, d: usize) -> Result<Matrix> {
    let mut xof = ShakeXof256::with_input(seed);
    let mut m = Matrix::new(d, d, q);

    for attempt in 0..MAX_REJECTION_ITERATIONS {
        for i in 0..d {
            for j in 0..d {
                m.set(i, j, next_fq(&mut xof, q)?);
            }
        }
        if m.is_invertible() {
            return Ok(m);
        }
        trace!(attempt, d, "sampled singular matrix, resampling");
    }
    Err(exhausted("invertible matrix sampling"))
}

/// Derives the challenge vector from a digest.
///
/// The result has length `t` with exactly `w` non-zero entries, each in
/// `[1, s)`.
pub fn parse_hash(s: usize, t: usize, w: usize, digest: &[u8]) -> Result<Vec<u8>> {
    if !(2..=256).contains(&s) || t == 0 || w > t {
        return Err(Error::InvalidParameter(format!(
            "challenge shape s = {}, t = {}, w = {}",
            s, t, w
        )));
    }

    let t_bytes = bytelen(t);
    let t_mask = (1usize << bitlen(t)) - 1;
    let s_mask = (1usize << bitlen(s)) - 1;

    let mut xof = ShakeXof256::with_input(digest);
    let mut next = || -> Result<u8> {
        let mut b = [0u8; 1];
        xof.squeeze(&mut b)?;
        Ok(b[0])
    };

    let mut h = vec![0u8; t];
    let mut buf = next()?;

    for _ in 0..w {
        let mut pos = None;
        for _ in 0..MAX_REJECTION_ITERATIONS {
            let mut idx = 0usize;
            for j in 0..t_bytes {
                idx |= usize::from(buf) << (8 * j);
                buf = next()?;
            }
            idx &= t_mask;
            if idx < t && h[idx] == 0 {
                pos = Some(idx);
                break;
            }
        }
        let pos = pos.ok_or_else(|| exhausted("challenge index sampling"))?;

        let mut value = None;
        for _ in 0..MAX_REJECTION_ITERATIONS {
            let v = usize::from(buf) & s_mask;
            buf = next()?;
            if v != 0 && v < s {
                value = Some(v as u8);
                break;
            }
        }
        h[pos] = value.ok_or_else(|| exhausted("challenge value sampling"))?;
    }

    Ok(h)
}
