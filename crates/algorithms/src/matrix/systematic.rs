//! Systematic form, inversion and invertibility
//!
//! The reduction is Gauss-Jordan elimination where the pivot of row `i` must
//! sit in column `i`. A column with no usable pivot is a failure, not a skip:
//! a matrix whose reduced row echelon form does not start with an identity
//! block has no systematic form.

use core::ops::Range;

use super::Matrix;
use crate::error::{validate, Error, Result};

impl Matrix {
    /// Reduces the window of `height` rows starting at `row` and `width`
    /// columns starting at `col` to systematic form, in place.
    ///
    /// Row swaps and row operations only touch cells inside the window.
    /// When the rest of the window rows is zero this is the same as
    /// operating on full rows.
    ///
    /// On failure the window is left partially reduced.
    pub fn systematic_form_window(
        &mut self,
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    ) -> Result<()> {
        validate::parameter(
            row + height <= self.rows && col + width <= self.cols,
            "systematic form window",
            "window exceeds matrix",
        )?;
        validate::parameter(
            height <= width,
            "systematic form window",
            "more rows than columns",
        )?;

        let q = self.modulus;
        let cols: Range<usize> = col..col + width;
        for i in 0..height {
            let pivot_col = col + i;
            let target = row + i;

            let pivot_row = (target..row + height)
                .find(|&r| self.value(r, pivot_col) != 0)
                .ok_or(Error::Processing {
                    operation: "systematic form",
                    details: "no pivot in column",
                })?;
            self.swap_row_segment(pivot_row, target, cols.clone());

            let inv = self
                .get(target, pivot_col)
                .inv()
                .ok_or(Error::Processing {
                    operation: "systematic form",
                    details: "pivot not invertible",
                })?;
            self.scale_row_segment(target, inv.value(), cols.clone());

            for r in row..row + height {
                if r == target {
                    continue;
                }
                let c = self.value(r, pivot_col);
                if c != 0 {
                    self.add_scaled_row_segment(target, r, q - c, cols.clone());
                }
            }
        }
        Ok(())
    }

    /// Reduces the whole matrix in place.
    pub fn systematic_form_in_place(&mut self) -> Result<()> {
        self.systematic_form_window(0, 0, self.rows, self.cols)
    }

    /// Returns the systematic form `[I_rows | X]`, or `None` when the first
    /// `rows` columns are not linearly independent.
    pub fn systematic_form(&self) -> Option<Matrix> {
        let mut out = self.clone();
        out.systematic_form_in_place().ok()?;
        Some(out)
    }

    /// Whether a square matrix is invertible.
    pub fn is_invertible(&self) -> bool {
        self.rows == self.cols && self.systematic_form().is_some()
    }

    /// Inverse of a square matrix, read off the right half of the systematic
    /// form of `[self | I]`.
    pub fn inverse(&self) -> Option<Matrix> {
        if self.rows != self.cols {
            return None;
        }
        let n = self.rows;
        let mut aug = self.augment(&Matrix::identity(n, self.modulus)).ok()?;
        aug.systematic_form_in_place().ok()?;
        aug.submatrix(0..n, n..2 * n).ok()
    }

    /// Solves for the inverse and reports a typed error on failure.
    pub fn try_inverse(&self) -> Result<Matrix> {
        self.inverse().ok_or(Error::Processing {
            operation: "matrix inverse",
            details: "matrix is singular",
        })
    }
}
