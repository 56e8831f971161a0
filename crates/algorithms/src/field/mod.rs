//! Arithmetic in the prime field F_q
//!
//! MEDS moduli are at most 4093, so an element fits in a `u16` and every
//! product fits in a `u32` before reduction. Elements are always kept as the
//! least non-negative residue.

use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use zeroize::Zeroize;

use crate::error::{validate, Error, Result};

/// Width of the fixed big-endian element encoding in bytes
pub const ELEMENT_BYTES: usize = 2;

/// Ceiling of log2(x) for x >= 1 (`Bitlen` in the MEDS documentation).
pub const fn bitlen(x: usize) -> usize {
    let mut bits = 0;
    while (1usize << bits) < x {
        bits += 1;
    }
    bits
}

/// Number of bytes needed for `bitlen(x)` bits.
pub const fn bytelen(x: usize) -> usize {
    (bitlen(x) + 7) / 8
}

/// An element of F_q.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Zeroize)]
pub struct FieldElement {
    value: u16,
    modulus: u16,
}

impl FieldElement {
    /// Reduces `value` into `[0, modulus)` with floored modulo, so negative
    /// inputs wrap to the positive representative.
    ///
    /// # Panics
    ///
    /// Panics if `modulus` is zero.
    pub fn new(value: i64, modulus: u16) -> Self {
        let reduced = value.rem_euclid(i64::from(modulus));
        Self {
            value: reduced as u16,
            modulus,
        }
    }

    /// Builds an element from a value already known to be below `modulus`.
    #[inline]
    pub(crate) const fn from_canonical(value: u16, modulus: u16) -> Self {
        Self { value, modulus }
    }

    /// The zero element
    pub const fn zero(modulus: u16) -> Self {
        Self::from_canonical(0, modulus)
    }

    /// The one element
    pub const fn one(modulus: u16) -> Self {
        Self::from_canonical(1, modulus)
    }

    /// Canonical representative in `[0, q)`
    #[inline]
    pub const fn value(&self) -> u16 {
        self.value
    }

    /// The field modulus q
    #[inline]
    pub const fn modulus(&self) -> u16 {
        self.modulus
    }

    /// True for the additive identity
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Overwrites the value, reducing it modulo q.
    pub fn set(&mut self, value: i64) {
        *self = Self::new(value, self.modulus);
    }

    /// Multiplicative inverse via the extended Euclidean algorithm.
    ///
    /// Returns `None` when `gcd(x, q) != 1`, which for prime q means x = 0.
    pub fn inv(&self) -> Option<Self> {
        let q = i64::from(self.modulus);
        let (mut r0, mut r1) = (i64::from(self.value), q);
        let (mut x0, mut x1) = (1i64, 0i64);
        while r1 != 0 {
            let quot = r0 / r1;
            (r0, r1) = (r1, r0 - quot * r1);
            (x0, x1) = (x1, x0 - quot * x1);
        }
        if r0 != 1 {
            return None;
        }
        Some(Self::new(x0, self.modulus))
    }

    /// Fixed two-byte big-endian encoding
    pub fn to_bytes(&self) -> [u8; ELEMENT_BYTES] {
        self.value.to_be_bytes()
    }

    /// Decodes the two-byte big-endian encoding.
    ///
    /// Values outside `[0, q)` are rejected rather than reduced, so every
    /// element has exactly one encoding.
    pub fn from_bytes(bytes: &[u8], modulus: u16) -> Result<Self> {
        validate::length("field element", bytes.len(), ELEMENT_BYTES)?;
        let value = u16::from_be_bytes([bytes[0], bytes[1]]);
        if value >= modulus {
            return Err(Error::param("field element", "value not below modulus"));
        }
        Ok(Self::from_canonical(value, modulus))
    }
}

impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        debug_assert_eq!(self.modulus, rhs.modulus);
        let sum = (u32::from(self.value) + u32::from(rhs.value)) % u32::from(self.modulus);
        Self::from_canonical(sum as u16, self.modulus)
    }
}

impl Sub for FieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        debug_assert_eq!(self.modulus, rhs.modulus);
        let q = u32::from(self.modulus);
        let diff = (u32::from(self.value) + q - u32::from(rhs.value)) % q;
        Self::from_canonical(diff as u16, self.modulus)
    }
}

impl Mul for FieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        debug_assert_eq!(self.modulus, rhs.modulus);
        let prod = (u32::from(self.value) * u32::from(rhs.value)) % u32::from(self.modulus);
        Self::from_canonical(prod as u16, self.modulus)
    }
}

impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self {
        if self.value == 0 {
            self
        } else {
            Self::from_canonical(self.modulus - self.value, self.modulus)
        }
    }
}

impl AddAssign for FieldElement {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for FieldElement {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for FieldElement {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
