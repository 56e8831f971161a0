//! Recovery of `(A, B^-1)` from the first two rows of `T * G0`.
//!
//! Key generation fixes the images of the first two code words to I_m and
//! U_m. Writing `P0'`, `P1'` for the first two rows of `T * G0` reshaped to
//! m x n, the unknowns satisfy
//!
//! ```text
//! A * P0' = B^-1          A * P1' = U_m * B^-1
//! ```
//!
//! with `A[m-1][m-1] = a` fixed. This is a linear system in the n^2 entries
//! of `B^-1` and the m^2 - 1 free entries of `A`. The system is
//! (m^2 + n^2 - 1) x (m^2 + n^2), augmented with the right-hand side in the
//! last column, and block bidiagonal, so it is reduced window by window
//! instead of with one large elimination.
//!
//! Only square transforms (m = n, m >= 3) are supported.

use algorithms::{FieldElement, Matrix};
use tracing::trace;

use crate::error::{Error, Result};

/// Solves for `(A, B^-1)`.
///
/// Returns `Ok(None)` when the system has no unique solution for this `a`;
/// the caller resamples and retries.
pub fn solve(g: &Matrix, a: FieldElement, m: usize, n: usize) -> Result<Option<(Matrix, Matrix)>> {
    if m != n || m < 3 {
        return Err(Error::InvalidParameter(format!(
            "equivalence solver needs m = n >= 3, got m = {}, n = {}",
            m, n
        )));
    }
    if g.rows() < 2 || g.cols() != m * n {
        return Err(Error::InvalidParameter(format!(
            "generator must have at least 2 rows and {} columns",
            m * n
        )));
    }

    let q = g.modulus();
    let blocks = g.submatrix(0..2, 0..m * n)?.rows_to_matrices(m, n)?;
    let mut rsys = fill_rsys(&blocks[0], &blocks[1], a);

    if !solve_sub_matrices(&mut rsys, m, n)? {
        trace!("equivalence system has no unique solution");
        return Ok(None);
    }
    backprop_to_sf(&mut rsys, m);

    let last = rsys.cols() - 1;
    let mut values: Vec<u16> = (0..rsys.rows()).map(|i| rsys.value(i, last)).collect();
    values.push(a.value());

    let a_values = values.split_off(n * n);
    let b_inv = Matrix::from_vec(n, n, q, values)?;
    let a = Matrix::from_vec(m, m, q, a_values)?;
    Ok(Some((a, b_inv)))
}

/// Builds the augmented system.
///
/// Columns `0..n^2` hold the coefficients of `B^-1`, columns `n^2..` those of
/// `A`. The coefficient of `A[m-1][m-1]` is multiplied by `a` and moved to
/// the last column. Rows `0..m^2` encode `A * P0' = B^-1`; the rows after
/// them encode the second relation with the first one already subtracted
/// along the superdiagonal of U_m.
pub(crate) fn fill_rsys(p0: &Matrix, p1: &Matrix, a: FieldElement) -> Matrix {
    let q = p0.modulus();
    let (m, n) = (p0.rows(), p0.cols());
    let rows = m * m + n * n - 1;
    let cols = m * m + n * n;
    let last = cols - 1;

    let eqs1 = p0.transpose().neg();
    let eqs2 = p1.transpose().neg();
    let (er, ec) = (eqs1.rows(), eqs1.cols());

    let mut rsys = Matrix::new(rows, cols, q);

    // A * P0' = B^-1
    let (mut row, mut col) = (0, cols / 2);
    while col < cols - ec {
        for i in 0..er {
            for j in 0..ec {
                rsys.set(row + i, col + j, eqs1.get(i, j));
            }
        }
        row += er;
        col += ec;
    }
    for i in 0..er {
        for j in 0..ec - 1 {
            rsys.set(row + i, col + j, eqs1.get(i, j));
        }
        rsys.set(row + i, last, -(eqs1.get(i, ec - 1) * a));
    }

    // A * P1' = U_m * B^-1, minus the shifted copy of the first relation
    let (mut row, mut col) = (m * m, cols / 2);
    while col < cols - ec {
        for i in 0..er {
            for j in 0..ec {
                rsys.set(row + i, col + j, eqs2.get(i, j));
            }
            for j in ec..2 * ec {
                let c = eqs1.get(i, j - ec);
                if col + j == last {
                    rsys.set(row + i, col + j, c * a);
                } else {
                    rsys.set(row + i, col + j, -c);
                }
            }
        }
        row += er;
        col += ec;
    }
    for i in 0..er {
        if row + i >= rows {
            break;
        }
        for j in 0..ec - 1 {
            rsys.set(row + i, col + j, eqs2.get(i, j));
        }
        rsys.set(row + i, last, -(eqs2.get(i, ec - 1) * a));
    }

    let one = FieldElement::one(q);
    for r in 0..m * m {
        rsys.set(r, r, one);
    }
    rsys
}

/// Reduces one window; a missing pivot is an ordinary failure.
fn reduce(rsys: &mut Matrix, row: usize, col: usize, height: usize, width: usize) -> Result<bool> {
    match rsys.systematic_form_window(row, col, height, width) {
        Ok(()) => Ok(true),
        Err(algorithms::Error::Processing { .. }) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Forward reduction of the second relation, block by block.
///
/// All middle blocks of the second relation are identical, so the first one
/// is reduced once and copied down the diagonal. The last full block carries
/// the `a` column and the final (m-1) x n block closes the system.
pub(crate) fn solve_sub_matrices(rsys: &mut Matrix, m: usize, n: usize) -> Result<bool> {
    let (base_row, base_col) = (m * m, n * n);
    if !reduce(rsys, base_row, base_col, m, 2 * n)? {
        return Ok(false);
    }

    let (mut row, mut col) = (base_row + m, base_col + n);
    while row < rsys.rows() - 2 * m {
        for i in 0..m {
            for j in 0..2 * n {
                let v = rsys.value(base_row + i, base_col + j);
                rsys.set_value(row + i, col + j, v);
            }
        }
        row += m;
        col += n;
    }

    if !reduce(rsys, row, col, m, 2 * n)? {
        return Ok(false);
    }
    reduce(rsys, row + m, col + n, m - 1, n)
}

/// Backward elimination from the last row up.
///
/// Row `r >= m^2` has its pivot in column `r`; once the rows below are
/// processed it is zero everywhere else except the last column, so every
/// update only touches columns `r..`.
pub(crate) fn backprop_to_sf(rsys: &mut Matrix, m: usize) {
    let cols = rsys.cols();
    for row in (m * m..rsys.rows()).rev() {
        let col = row;
        for i in 0..row {
            let c = rsys.get(i, col);
            if c.is_zero() {
                continue;
            }
            rsys.add_scaled_row_range(row, i, -c, col..cols);
        }
    }
}
