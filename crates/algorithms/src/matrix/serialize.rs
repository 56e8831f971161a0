//! Byte codecs for matrices
//!
//! Two encodings are provided:
//!
//! - [`Matrix::compress`]: every cell as 2 big-endian bytes, row-major. This
//!   is the wire format for keys and signatures.
//! - [`Matrix::pack_bits`]: every cell in `bitlen(q)` bits, LSB first, with
//!   the final byte zero padded.
//!
//! Both decoders are strict and reject values outside `[0, q)`.

use super::Matrix;
use crate::error::{validate, Error, Result};
use crate::field::{bitlen, ELEMENT_BYTES};

/// Bytes needed to pack `count` elements of `bits` bits each.
pub const fn packed_len(count: usize, bits: usize) -> usize {
    (count * bits + 7) / 8
}

impl Matrix {
    /// Serialized length of a `rows x cols` matrix under [`Matrix::compress`].
    pub const fn compressed_len(rows: usize, cols: usize) -> usize {
        rows * cols * ELEMENT_BYTES
    }

    /// Encodes every cell as 2 big-endian bytes.
    pub fn compress(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * ELEMENT_BYTES);
        self.compress_into(&mut out);
        out
    }

    /// Appends the [`Matrix::compress`] encoding to `out`.
    pub fn compress_into(&self, out: &mut Vec<u8>) {
        for &v in &self.data {
            out.extend_from_slice(&v.to_be_bytes());
        }
    }

    /// Decodes a `rows x cols` matrix written by [`Matrix::compress`].
    pub fn decompress(bytes: &[u8], rows: usize, cols: usize, modulus: u16) -> Result<Self> {
        validate::length(
            "compressed matrix",
            bytes.len(),
            Self::compressed_len(rows, cols),
        )?;
        let data = bytes
            .chunks_exact(ELEMENT_BYTES)
            .map(|c| {
                let v = u16::from_be_bytes([c[0], c[1]]);
                if v >= modulus {
                    Err(Error::param("compressed matrix", "value not below modulus"))
                } else {
                    Ok(v)
                }
            })
            .collect::<Result<Vec<u16>>>()?;
        Self::from_vec(rows, cols, modulus, data)
    }

    /// Packs every cell into `bitlen(q)` bits.
    pub fn pack_bits(&self) -> Vec<u8> {
        let bits = bitlen(usize::from(self.modulus));
        let mut out = vec![0u8; packed_len(self.data.len(), bits)];

        let mut pos = 0usize;
        for &v in &self.data {
            for b in 0..bits {
                if (v >> b) & 1 == 1 {
                    out[pos / 8] |= 1 << (pos % 8);
                }
                pos += 1;
            }
        }
        out
    }

    /// Decodes a `rows x cols` matrix written by [`Matrix::pack_bits`].
    ///
    /// Padding bits in the last byte must be zero.
    pub fn unpack_bits(bytes: &[u8], rows: usize, cols: usize, modulus: u16) -> Result<Self> {
        let bits = bitlen(usize::from(modulus));
        let count = rows * cols;
        validate::length("packed matrix", bytes.len(), packed_len(count, bits))?;

        let bit = |pos: usize| (bytes[pos / 8] >> (pos % 8)) & 1;

        let mut data = Vec::with_capacity(count);
        let mut pos = 0usize;
        for _ in 0..count {
            let mut v = 0u16;
            for b in 0..bits {
                v |= u16::from(bit(pos)) << b;
                pos += 1;
            }
            if v >= modulus {
                return Err(Error::param("packed matrix", "value not below modulus"));
            }
            data.push(v);
        }

        if (pos..bytes.len() * 8).any(|p| bit(p) != 0) {
            return Err(Error::param("packed matrix", "non-zero padding bits"));
        }
        Self::from_vec(rows, cols, modulus, data)
    }
}
