//! Generator matrices: the equivalence action `Pi` and the compressed
//! public-key form.
//!
//! A public generator `G_i = SF(Pi(A, G0, B))` has a known shape: the left
//! k x k block is the identity, row 0 reshapes to I_m and row 1 to the
//! upper shift U_m except for its last m-row. Only the remaining
//! `(k - 2)(mn - k) + n` entries are stored.

use algorithms::field::ELEMENT_BYTES;
use algorithms::{FieldElement, Matrix};
use params::pqc::meds::ParameterSet;

use crate::error::{Error, Result};

/// Applies `(A, B)` to every row of `g`: each row is reshaped to an
/// m x n matrix `P`, replaced by `A * P * B` and flattened back.
pub fn pi(a: &Matrix, g: &Matrix, b: &Matrix) -> Result<Matrix> {
    let blocks = g.rows_to_matrices(a.rows(), b.cols())?;
    let mapped = blocks
        .iter()
        .map(|p| a.mul(p)?.mul(b))
        .collect::<algorithms::Result<Vec<_>>>()?;
    Ok(Matrix::matrices_to_rows(&mapped)?)
}

/// Number of free entries stored for one generator matrix
pub(crate) const fn free_entries(params: &ParameterSet) -> usize {
    (params.k - 2) * (params.m * params.n - params.k) + params.n
}

/// Serializes the free entries of a systematic generator matrix.
pub fn compress_g(g: &Matrix, params: &ParameterSet) -> Result<Vec<u8>> {
    let (k, mn, n) = (params.k, params.m * params.n, params.n);
    if g.rows() != k || g.cols() != mn {
        return Err(Error::InvalidParameter(format!(
            "generator must be {} x {}, got {} x {}",
            k,
            mn,
            g.rows(),
            g.cols()
        )));
    }

    let mut out = Vec::with_capacity(free_entries(params) * ELEMENT_BYTES);
    for i in 0..n {
        out.extend_from_slice(&g.get(1, mn - n + i).to_bytes());
    }
    for i in 2..k {
        for j in k..mn {
            out.extend_from_slice(&g.get(i, j).to_bytes());
        }
    }
    Ok(out)
}

/// Rebuilds a generator matrix from its compressed form.
pub fn decompress_g(bytes: &[u8], params: &ParameterSet) -> Result<Matrix> {
    let (q, m, n, k) = (params.q, params.m, params.n, params.k);
    let mn = m * n;
    let free = Matrix::decompress(bytes, 1, free_entries(params), q)?;
    let mut values = free.as_slice().iter().copied();
    let mut take = || {
        values
            .next()
            .ok_or_else(|| Error::Internal("compressed generator exhausted".into()))
    };

    let one = FieldElement::one(q);
    let mut g = Matrix::new(k, mn, q);
    for i in 0..k {
        g.set(i, i, one);
    }
    for i in 1..m {
        g.set(0, i * (n + 1), one);
    }
    for i in 1..m - 1 {
        g.set(1, i * (n + 1) + 1, one);
    }
    for i in 0..n {
        g.set_value(1, mn - n + i, take()?);
    }
    for i in 2..k {
        for j in k..mn {
            g.set_value(i, j, take()?);
        }
    }
    Ok(g)
}
