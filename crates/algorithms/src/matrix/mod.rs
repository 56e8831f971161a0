//! Dense matrices over F_q
//!
//! A [`Matrix`] owns a flat row-major buffer of canonical residues. All
//! arithmetic allocates a fresh result; the in-place operations are the row
//! operations and the systematic-form reductions in [`systematic`].
//!
//! Cells are read and written by value through [`Matrix::get`] /
//! [`Matrix::set`], so no matrix ever aliases another.

use core::fmt;
use core::ops::Range;

use zeroize::Zeroize;

use crate::error::{validate, Error, Result};
use crate::field::FieldElement;

pub mod serialize;
pub mod systematic;

/// A rows x cols matrix over F_q.
#[derive(Clone, PartialEq, Eq, Hash, Zeroize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    modulus: u16,
    data: Vec<u16>,
}

impl Matrix {
    /// Zero matrix.
    pub fn new(rows: usize, cols: usize, modulus: u16) -> Self {
        debug_assert!(rows > 0 && cols > 0, "matrix dimensions must be non-zero");
        Self {
            rows,
            cols,
            modulus,
            data: vec![0; rows * cols],
        }
    }

    /// Matrix with every cell set to `value mod q`.
    pub fn with_default(rows: usize, cols: usize, modulus: u16, value: i64) -> Self {
        let fill = FieldElement::new(value, modulus).value();
        Self {
            rows,
            cols,
            modulus,
            data: vec![fill; rows * cols],
        }
    }

    /// Identity matrix I_n.
    pub fn identity(n: usize, modulus: u16) -> Self {
        let mut m = Self::new(n, n, modulus);
        for i in 0..n {
            m.data[i * n + i] = 1;
        }
        m
    }

    /// Upper-shift matrix U_d: ones on the superdiagonal.
    pub fn upper_shift(d: usize, modulus: u16) -> Self {
        let mut m = Self::new(d, d, modulus);
        for i in 1..d {
            m.data[(i - 1) * d + i] = 1;
        }
        m
    }

    /// Wraps a row-major buffer of canonical values.
    pub fn from_vec(rows: usize, cols: usize, modulus: u16, data: Vec<u16>) -> Result<Self> {
        validate::parameter(rows > 0 && cols > 0, "dimensions", "must be non-zero")?;
        validate::length("matrix data", data.len(), rows * cols)?;
        if data.iter().any(|&v| v >= modulus) {
            return Err(Error::param("matrix data", "value not below modulus"));
        }
        Ok(Self {
            rows,
            cols,
            modulus,
            data,
        })
    }

    /// Builds a matrix from rows of integers, reducing each modulo q.
    pub fn from_rows<R: AsRef<[i64]>>(rows: &[R], modulus: u16) -> Result<Self> {
        validate::parameter(!rows.is_empty(), "rows", "must not be empty")?;
        let cols = rows[0].as_ref().len();
        validate::parameter(cols > 0, "cols", "must not be empty")?;

        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            validate::length("matrix row", row.len(), cols)?;
            data.extend(row.iter().map(|&v| FieldElement::new(v, modulus).value()));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            modulus,
            data,
        })
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The field modulus q
    #[inline]
    pub fn modulus(&self) -> u16 {
        self.modulus
    }

    /// Row-major view of the cells
    #[inline]
    pub fn as_slice(&self) -> &[u16] {
        &self.data
    }

    /// One row as a slice
    #[inline]
    pub fn row(&self, i: usize) -> &[u16] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Reads cell (i, j).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> FieldElement {
        FieldElement::from_canonical(self.data[i * self.cols + j], self.modulus)
    }

    /// Writes cell (i, j).
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: FieldElement) {
        debug_assert_eq!(value.modulus(), self.modulus);
        self.data[i * self.cols + j] = value.value();
    }

    /// Raw value of cell (i, j).
    #[inline]
    pub fn value(&self, i: usize, j: usize) -> u16 {
        self.data[i * self.cols + j]
    }

    /// Writes a raw value, reducing it modulo q.
    #[inline]
    pub fn set_value(&mut self, i: usize, j: usize, value: u16) {
        self.data[i * self.cols + j] = value % self.modulus;
    }

    fn check_same_shape(&self, other: &Self, op: &'static str) -> Result<()> {
        validate::parameter(self.modulus == other.modulus, op, "moduli differ")?;
        validate::parameter(
            self.rows == other.rows && self.cols == other.cols,
            op,
            "dimensions differ",
        )
    }

    /// Element-wise sum.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "matrix add")?;
        let q = u32::from(self.modulus);
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| ((u32::from(a) + u32::from(b)) % q) as u16)
            .collect();
        Ok(self.with_data(data))
    }

    /// Element-wise difference.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "matrix sub")?;
        let q = u32::from(self.modulus);
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| ((u32::from(a) + q - u32::from(b)) % q) as u16)
            .collect();
        Ok(self.with_data(data))
    }

    /// Multiplies every cell by `c`.
    pub fn scalar_mul(&self, c: FieldElement) -> Self {
        let q = u32::from(self.modulus);
        let c = u32::from(c.value());
        let data = self
            .data
            .iter()
            .map(|&a| ((u32::from(a) * c) % q) as u16)
            .collect();
        self.with_data(data)
    }

    /// Additive inverse of every cell.
    pub fn neg(&self) -> Self {
        let data = self
            .data
            .iter()
            .map(|&a| if a == 0 { 0 } else { self.modulus - a })
            .collect();
        self.with_data(data)
    }

    /// Matrix product `self * other`.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        validate::parameter(self.modulus == other.modulus, "matrix mul", "moduli differ")?;
        validate::parameter(
            self.cols == other.rows,
            "matrix mul",
            "left columns must equal right rows",
        )?;

        let q = u64::from(self.modulus);
        let mut out = Self::new(self.rows, other.cols, self.modulus);
        let mut acc = vec![0u64; other.cols];
        for i in 0..self.rows {
            acc.iter_mut().for_each(|a| *a = 0);
            for (l, &a) in self.row(i).iter().enumerate() {
                if a == 0 {
                    continue;
                }
                let a = u64::from(a);
                for (slot, &b) in acc.iter_mut().zip(other.row(l)) {
                    *slot += a * u64::from(b);
                }
            }
            for (j, &v) in acc.iter().enumerate() {
                out.data[i * other.cols + j] = (v % q) as u16;
            }
        }
        Ok(out)
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let mut out = Self::new(self.cols, self.rows, self.modulus);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        out
    }

    /// Kronecker product: block (i, j) of the result is `self[i][j] * other`.
    pub fn kronecker(&self, other: &Self) -> Result<Self> {
        validate::parameter(self.modulus == other.modulus, "kronecker", "moduli differ")?;
        let q = u32::from(self.modulus);
        let rows = self.rows * other.rows;
        let cols = self.cols * other.cols;
        let mut out = Self::new(rows, cols, self.modulus);
        for i in 0..self.rows {
            for j in 0..self.cols {
                let a = u32::from(self.value(i, j));
                if a == 0 {
                    continue;
                }
                for k in 0..other.rows {
                    for l in 0..other.cols {
                        let v = (a * u32::from(other.value(k, l))) % q;
                        out.data[(i * other.rows + k) * cols + j * other.cols + l] = v as u16;
                    }
                }
            }
        }
        Ok(out)
    }

    /// Copy of the cells in `rows x cols` (half-open ranges).
    pub fn submatrix(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Self> {
        validate::parameter(
            rows.start < rows.end && rows.end <= self.rows,
            "submatrix rows",
            "range out of bounds",
        )?;
        validate::parameter(
            cols.start < cols.end && cols.end <= self.cols,
            "submatrix cols",
            "range out of bounds",
        )?;
        let width = cols.end - cols.start;
        let mut data = Vec::with_capacity(rows.len() * width);
        for i in rows.clone() {
            data.extend_from_slice(&self.row(i)[cols.clone()]);
        }
        Ok(Self {
            rows: rows.len(),
            cols: width,
            modulus: self.modulus,
            data,
        })
    }

    /// Horizontal concatenation `[self | other]`.
    pub fn augment(&self, other: &Self) -> Result<Self> {
        validate::parameter(self.modulus == other.modulus, "augment", "moduli differ")?;
        validate::parameter(self.rows == other.rows, "augment", "row counts differ")?;
        let cols = self.cols + other.cols;
        let mut data = Vec::with_capacity(self.rows * cols);
        for i in 0..self.rows {
            data.extend_from_slice(self.row(i));
            data.extend_from_slice(other.row(i));
        }
        Ok(Self {
            rows: self.rows,
            cols,
            modulus: self.modulus,
            data,
        })
    }

    /// Splits each row (length m*n) into an m x n matrix, row-major:
    /// element j goes to (j / n, j % n).
    pub fn rows_to_matrices(&self, m: usize, n: usize) -> Result<Vec<Self>> {
        validate::length("row length", self.cols, m * n)?;
        Ok((0..self.rows)
            .map(|i| Self {
                rows: m,
                cols: n,
                modulus: self.modulus,
                data: self.row(i).to_vec(),
            })
            .collect())
    }

    /// Inverse of [`Matrix::rows_to_matrices`]: flattens each matrix into one row.
    pub fn matrices_to_rows(matrices: &[Self]) -> Result<Self> {
        let first = matrices
            .first()
            .ok_or_else(|| Error::param("matrices", "must not be empty"))?;
        let width = first.rows * first.cols;
        let mut data = Vec::with_capacity(matrices.len() * width);
        for m in matrices {
            first.check_same_shape(m, "matrices to rows")?;
            data.extend_from_slice(&m.data);
        }
        Ok(Self {
            rows: matrices.len(),
            cols: width,
            modulus: first.modulus,
            data,
        })
    }

    // ----- row operations -----

    /// Swaps rows `a` and `b`.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.swap_row_segment(a, b, 0..self.cols);
    }

    /// Multiplies row `i` by `c`.
    pub fn scale_row(&mut self, i: usize, c: FieldElement) {
        self.scale_row_segment(i, c.value(), 0..self.cols);
    }

    /// Adds `c` times row `src` to row `dst`.
    pub fn add_scaled_row(&mut self, src: usize, dst: usize, c: FieldElement) {
        self.add_scaled_row_segment(src, dst, c.value(), 0..self.cols);
    }

    /// Like [`Matrix::add_scaled_row`], but only touches the columns in `cols`.
    /// Callers use it when `src` is known to be zero outside that range.
    pub fn add_scaled_row_range(
        &mut self,
        src: usize,
        dst: usize,
        c: FieldElement,
        cols: Range<usize>,
    ) {
        self.add_scaled_row_segment(src, dst, c.value(), cols);
    }

    pub(crate) fn swap_row_segment(&mut self, a: usize, b: usize, cols: Range<usize>) {
        if a == b {
            return;
        }
        for j in cols {
            self.data.swap(a * self.cols + j, b * self.cols + j);
        }
    }

    pub(crate) fn scale_row_segment(&mut self, i: usize, c: u16, cols: Range<usize>) {
        let q = u32::from(self.modulus);
        let c = u32::from(c);
        for j in cols {
            let cell = &mut self.data[i * self.cols + j];
            *cell = ((u32::from(*cell) * c) % q) as u16;
        }
    }

    pub(crate) fn add_scaled_row_segment(
        &mut self,
        src: usize,
        dst: usize,
        c: u16,
        cols: Range<usize>,
    ) {
        if c == 0 {
            return;
        }
        let q = u32::from(self.modulus);
        let c = u32::from(c);
        for j in cols {
            let s = self.data[src * self.cols + j];
            if s == 0 {
                continue;
            }
            let cell = &mut self.data[dst * self.cols + j];
            *cell = ((u32::from(*cell) + c * u32::from(s)) % q) as u16;
        }
    }

    fn with_data(&self, data: Vec<u16>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            rows: self.rows,
            cols: self.cols,
            modulus: self.modulus,
            data,
        }
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix {}x{} over F_{} [", self.rows, self.cols, self.modulus)?;
        for i in 0..self.rows {
            writeln!(f, "  {:?}", self.row(i))?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            let cells: Vec<String> = self.row(i).iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
