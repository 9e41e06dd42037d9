//! Modified implementation based on curve25519-dalek (with modifications)
//!
//! Original source: https://github.com/dalek-cryptography/curve25519-dalek
//!
//! This file is part of curve25519-dalek.
//! Copyright (c) 2016-2021 isis lovecruft
//! Copyright (c) 2016-2019 Henry de Valence

//! Arithmetic on scalars (integers mod the group order).
//!
//! Both the Ristretto group and the Ed25519 basepoint have order
//! \\(\ell = 2\^{252} + 27742317777372353535851937790883648493\\).
//!
//! This module provides the `Scalar` struct, which represents
//! elements of \\(\mathbb Z / \ell \mathbb Z\\), and supports
//! arithmetic modulo this constant, storing a canonical 32-byte
//! little-endian encoding and deferring to the 52-bit-limb Montgomery
//! backend for the actual arithmetic.

#![allow(non_snake_case)]

use core::fmt::Debug;
use core::iter::Sum;
use core::ops::Neg;
use core::ops::{Add, AddAssign};
use core::ops::{Mul, MulAssign};
use core::ops::{Sub, SubAssign};

use crate::crypto::subtle::Choice;
use crate::crypto::subtle::ConditionallySelectable;
use crate::crypto::subtle::ConstantTimeEq;

use crate::crypto::rng::{CryptoRng, RngCore};

use super::backend::serial::u64::scalar::Scalar52;

/// The `Scalar` struct holds an integer \\(s < 2\^{255}\\) which
/// represents an element of \\(\mathbb Z / \ell\\).
#[derive(Copy, Clone, Hash)]
pub struct Scalar {
    /// The 32-byte little-endian encoding of an integer representing
    /// this `Scalar`.
    ///
    /// Bit 255 (the high bit of byte 31) is always zero. A `Scalar`
    /// constructed via `from_bits` may hold a reduced-range, but not
    /// necessarily canonical, representative.
    pub(crate) bytes: [u8; 32],
}

impl Debug for Scalar {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Scalar{{\n\tbytes: {:?},\n}}", &self.bytes)
    }
}

impl Scalar {
    /// The scalar `0`.
    pub const ZERO: Scalar = Scalar { bytes: [0u8; 32] };

    /// The scalar `1`.
    pub const ONE: Scalar = Scalar {
        bytes: [
            1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0,
        ],
    };

    #[inline]
    fn unpack(&self) -> Scalar52 {
        Scalar52::from_bytes(&self.bytes)
    }

    fn pack(x: Scalar52) -> Scalar {
        Scalar { bytes: x.to_bytes() }
    }

    /// Reduce this scalar modulo `l`, even if it was not canonically
    /// reduced to begin with (e.g. as constructed by `from_bits`).
    pub(crate) fn reduce(&self) -> Scalar {
        let x = self.unpack();
        let xR = Scalar52::mul_internal(&x, &Scalar52::one_montgomery_r());
        let x_mod_l = Scalar52::montgomery_reduce(&xR);
        Scalar::pack(x_mod_l)
    }

    /// Check whether this `Scalar` is the canonical representative mod `l`.
    pub fn is_canonical(&self) -> bool {
        self.as_bytes() == self.reduce().as_bytes()
    }

    /// View the little-endian byte encoding of this `Scalar`.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Copy the little-endian byte encoding of this `Scalar`.
    pub const fn to_bytes(&self) -> [u8; 32] {
        self.bytes
    }

    /// Construct a `Scalar` by reducing a 256-bit little-endian integer
    /// modulo `l`.
    pub fn from_bytes_mod_order(bytes: [u8; 32]) -> Scalar {
        Scalar { bytes }.reduce()
    }

    /// Construct a `Scalar` by reducing a 512-bit little-endian integer
    /// modulo `l`.
    pub fn from_bytes_mod_order_wide(input: &[u8; 64]) -> Scalar {
        Scalar::pack(Scalar52::from_bytes_wide(input))
    }

    /// Attempt to construct a `Scalar` from a canonical byte representation.
    ///
    /// Returns `None` if `bytes` is not a canonical encoding of a scalar
    /// (the high bit is set, or the value is not fully reduced mod `l`).
    pub fn from_canonical_bytes(bytes: [u8; 32]) -> Option<Scalar> {
        if (bytes[31] >> 7) != 0 {
            return None;
        }
        let candidate = Scalar::from_bits(bytes);
        if candidate.is_canonical() {
            Some(candidate)
        } else {
            None
        }
    }

    /// Construct a `Scalar` from the low 255 bits of a 256-bit integer,
    /// clearing the high bit. Does not reduce modulo `l` and so may
    /// represent a non-canonical (but in-range) residue.
    pub fn from_bits(bytes: [u8; 32]) -> Scalar {
        let mut s = Scalar { bytes };
        s.bytes[31] &= 0b0111_1111;
        s
    }

    /// Generate a uniformly random scalar using an approved CSPRNG.
    pub fn random<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Scalar {
        let mut scalar_bytes = [0u8; 64];
        rng.fill_bytes(&mut scalar_bytes);
        Scalar::from_bytes_mod_order_wide(&scalar_bytes)
    }

    /// Write this scalar in radix 16, with coefficients in `[-8, 8)`,
    /// for the Pippenger-style fixed-base multiplication used by
    /// basepoint tables with radix 16.
    pub(crate) fn as_radix_16(&self) -> [i8; 64] {
        debug_assert!(self.bytes[31] <= 127);
        let mut output = [0i8; 64];

        for i in 0..32 {
            output[2 * i] = (self.bytes[i] & 0xf) as i8;
            output[2 * i + 1] = ((self.bytes[i] >> 4) & 0xf) as i8;
        }

        for i in 0..63 {
            let carry = (output[i] + 8) >> 4;
            output[i] -= carry << 4;
            output[i + 1] += carry;
        }

        output
    }

    /// Write this scalar in radix `2^w`, with coefficients in
    /// `[-2^(w-1), 2^(w-1))`, for `4 <= w <= 8`.
    pub(crate) fn as_radix_2w(&self, w: usize) -> [i8; 64] {
        debug_assert!(w >= 4);
        debug_assert!(w <= 8);

        if w == 4 {
            return self.as_radix_16();
        }

        let mut scalar64x4 = [0u64; 4];
        for i in 0..4 {
            for j in 0..8 {
                scalar64x4[i] |= (self.bytes[8 * i + j] as u64) << (8 * j);
            }
        }

        let radix: u64 = 1 << w;
        let window_mask: u64 = radix - 1;

        let mut carry = 0u64;
        let mut digits = [0i8; 64];
        let digits_count = (256 + w - 1) / w;
        for i in 0..digits_count {
            let bit_offset = i * w;
            let u64_idx = bit_offset / 64;
            let bit_idx = bit_offset % 64;

            let bit_buf: u64 = if bit_idx < 64 - w || u64_idx == 3 {
                scalar64x4[u64_idx] >> bit_idx
            } else {
                (scalar64x4[u64_idx] >> bit_idx) | (scalar64x4[1 + u64_idx] << (64 - bit_idx))
            };

            let coef = carry + (bit_buf & window_mask);

            carry = (coef + (radix / 2)) >> w;
            digits[i] = ((coef as i64) - ((carry << w) as i64)) as i8;
        }

        match w {
            8 => digits[digits_count] += carry as i8,
            _ => digits[digits_count - 1] += (carry << w) as i8,
        }

        digits
    }

    /// Compute the width-`w` non-adjacent form of this scalar, for use
    /// in variable-time double-scalar multiplication.
    pub(crate) fn non_adjacent_form(&self, w: usize) -> [i8; 256] {
        debug_assert!(w >= 2);
        debug_assert!(w <= 8);

        let mut naf = [0i8; 256];

        let mut x_u64 = [0u64; 5];
        for i in 0..4 {
            for j in 0..8 {
                x_u64[i] |= (self.bytes[8 * i + j] as u64) << (8 * j);
            }
        }

        let width = 1u64 << w;
        let window_mask = width - 1;

        let mut pos = 0usize;
        let mut carry = 0u64;
        while pos < 256 {
            let u64_idx = pos / 64;
            let bit_idx = pos % 64;
            let bit_buf: u64 = if bit_idx < 64 - w {
                x_u64[u64_idx] >> bit_idx
            } else {
                (x_u64[u64_idx] >> bit_idx) | (x_u64[1 + u64_idx] << (64 - bit_idx))
            };

            let window = carry + (bit_buf & window_mask);

            if window & 1 == 0 {
                pos += 1;
                continue;
            }

            if window < width / 2 {
                carry = 0;
                naf[pos] = window as i8;
            } else {
                carry = 1;
                naf[pos] = (window as i8).wrapping_sub(width as i8);
            }

            pos += w;
        }

        naf
    }
}

impl Scalar52 {
    /// `1` expressed in Montgomery form, i.e. `R mod l`; multiplying by
    /// this and reducing is how `Scalar::reduce` normalises an
    /// arbitrary (possibly >`l`) 256-bit value down to canonical range.
    pub(crate) fn one_montgomery_r() -> Scalar52 {
        super::backend::serial::u64::scalar::R
    }
}

impl Default for Scalar {
    fn default() -> Scalar {
        Scalar::ZERO
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Scalar) -> Choice {
        self.as_bytes().ct_eq(other.as_bytes())
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Scalar) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Scalar, b: &Scalar, choice: Choice) -> Scalar {
        let mut bytes = [0u8; 32];
        for i in 0..32 {
            bytes[i] = u8::conditional_select(&a.bytes[i], &b.bytes[i], choice);
        }
        Scalar { bytes }
    }
}

impl<'b> AddAssign<&'b Scalar> for Scalar {
    fn add_assign(&mut self, rhs: &'b Scalar) {
        *self = (self as &Scalar) + rhs;
    }
}
define_add_assign_variants!(LHS = Scalar, RHS = Scalar);

impl<'a, 'b> Add<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    fn add(self, rhs: &'b Scalar) -> Scalar {
        Scalar::pack(Scalar52::add(&self.unpack(), &rhs.unpack()))
    }
}
define_add_variants!(LHS = Scalar, RHS = Scalar, Output = Scalar);

impl<'b> SubAssign<&'b Scalar> for Scalar {
    fn sub_assign(&mut self, rhs: &'b Scalar) {
        *self = (self as &Scalar) - rhs;
    }
}
define_sub_assign_variants!(LHS = Scalar, RHS = Scalar);

impl<'a, 'b> Sub<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    fn sub(self, rhs: &'b Scalar) -> Scalar {
        Scalar::pack(Scalar52::sub(&self.unpack(), &rhs.unpack()))
    }
}
define_sub_variants!(LHS = Scalar, RHS = Scalar, Output = Scalar);

impl<'b> MulAssign<&'b Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: &'b Scalar) {
        *self = (self as &Scalar) * rhs;
    }
}
define_mul_assign_variants!(LHS = Scalar, RHS = Scalar);

impl<'a, 'b> Mul<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    fn mul(self, rhs: &'b Scalar) -> Scalar {
        Scalar::pack(Scalar52::mul(&self.unpack(), &rhs.unpack()))
    }
}
define_mul_variants!(LHS = Scalar, RHS = Scalar, Output = Scalar);

impl<'a> Neg for &'a Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        &Scalar::ZERO - self
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        -&self
    }
}

impl<T> Sum<T> for Scalar
where
    T: core::borrow::Borrow<Scalar>,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Scalar::ZERO, |acc, item| acc + item.borrow())
    }
}

#[cfg(feature = "zeroize")]
impl zeroize::Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
        self.bytes[0] = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub_round_trip() {
        let a = Scalar::from_bytes_mod_order([7u8; 32]);
        let b = Scalar::from_bytes_mod_order([11u8; 32]);
        let c = &a + &b;
        let back = &c - &b;
        assert_eq!(a, back);
    }

    #[test]
    fn zero_is_additive_identity() {
        let a = Scalar::from_bytes_mod_order([42u8; 32]);
        assert_eq!(a, &a + &Scalar::ZERO);
    }

    #[test]
    fn one_is_multiplicative_identity() {
        let a = Scalar::from_bytes_mod_order([42u8; 32]);
        assert_eq!(a, &a * &Scalar::ONE);
    }

    #[test]
    fn non_canonical_is_rejected() {
        // l's low limb, in little-endian bytes, is not itself a valid
        // canonical scalar encoding (it is >= l).
        let l_bytes: [u8; 32] = [
            0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9,
            0xde, 0x14, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x10,
        ];
        assert!(Scalar::from_canonical_bytes(l_bytes).is_none());
    }

    #[test]
    fn as_radix_16_matches_value() {
        let a = Scalar::from_bytes_mod_order([3u8; 32]);
        let digits = a.as_radix_16();
        let mut sum = Scalar::ZERO;
        let mut weight = Scalar::ONE;
        let sixteen = Scalar::from_bytes_mod_order({
            let mut b = [0u8; 32];
            b[0] = 16;
            b
        });
        for d in digits.iter() {
            let term = if *d >= 0 {
                Scalar::from_bytes_mod_order({
                    let mut b = [0u8; 32];
                    b[0] = *d as u8;
                    b
                })
            } else {
                -Scalar::from_bytes_mod_order({
                    let mut b = [0u8; 32];
                    b[0] = (-*d) as u8;
                    b
                })
            };
            sum = &sum + &(&term * &weight);
            weight = &weight * &sixteen;
        }
        assert_eq!(sum, a);
    }
}
