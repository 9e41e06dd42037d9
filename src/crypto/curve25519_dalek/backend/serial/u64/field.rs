//! Modified implementation based on curve25519-dalek (with modifications)
//!
//! Original source: https://github.com/dalek-cryptography/curve25519-dalek
//!
//! This file is part of curve25519-dalek.
//! Copyright (c) 2016-2021 isis lovecruft
//! Copyright (c) 2016-2019 Henry de Valence
//!
//! Authors:
//! - isis agora lovecruft <isis@patternsinthevoid.net>
//! - Henry de Valence <hdevalence@hdevalence.ca>

//! Field arithmetic modulo \\(p = 2\^{255} - 19\\), using 64-bit limbs with
//! 128-bit products.
//!
//! This uses the radix-\\(2\^{51}\\) representation of field elements used
//! throughout `curve25519-dalek`'s 64-bit serial backend.

use core::fmt::Debug;
use core::ops::{Add, AddAssign};
use core::ops::{Mul, MulAssign};
use core::ops::Neg;
use core::ops::{Sub, SubAssign};

use crate::crypto::subtle::Choice;
use crate::crypto::subtle::ConditionallyNegatable;
use crate::crypto::subtle::ConditionallySelectable;
use crate::crypto::subtle::ConstantTimeEq;

impl ConditionallyNegatable for FieldElement51 {
    fn conditional_negate(&mut self, choice: Choice) {
        let mut negated = *self;
        negated.negate();
        self.conditional_assign(&negated, choice);
    }
}

/// A `FieldElement51` represents an element of the field
/// \\( \mathbb Z / (2\^{255} - 19)\\).
///
/// In the 64-bit implementation, a `FieldElement` is represented in
/// radix \\(2\^{51}\\) as five `u64`s; the value of the field element
/// is understood to be \\( \sum\_{i=0}\^4 x\_i 2\^{51 i} \\).  Bits
/// 51..64 of each `u64` should be zero after any normalisation.
#[derive(Copy, Clone)]
pub struct FieldElement51(pub(crate) [u64; 5]);

impl Debug for FieldElement51 {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "FieldElement51({:?})", &self.0[..])
    }
}

const LOW_51_BIT_MASK: u64 = (1u64 << 51) - 1;

#[inline(always)]
fn m(x: u64, y: u64) -> u128 {
    (x as u128) * (y as u128)
}

impl<'b> AddAssign<&'b FieldElement51> for FieldElement51 {
    fn add_assign(&mut self, rhs: &'b FieldElement51) {
        for i in 0..5 {
            self.0[i] += rhs.0[i];
        }
    }
}

impl<'a, 'b> Add<&'b FieldElement51> for &'a FieldElement51 {
    type Output = FieldElement51;
    fn add(self, rhs: &'b FieldElement51) -> FieldElement51 {
        let mut output = *self;
        output += rhs;
        output
    }
}

impl<'b> SubAssign<&'b FieldElement51> for FieldElement51 {
    fn sub_assign(&mut self, rhs: &'b FieldElement51) {
        let result = (self as &FieldElement51) - rhs;
        self.0 = result.0;
    }
}

impl<'a, 'b> Sub<&'b FieldElement51> for &'a FieldElement51 {
    type Output = FieldElement51;
    fn sub(self, rhs: &'b FieldElement51) -> FieldElement51 {
        // To avoid underflow, add a multiple of p before subtracting.
        // 16*p fits comfortably above any limb produced by our
        // arithmetic, and the low limb's bias is reduced by 16*19 to
        // account for the 2^255 = 19 wraparound term carried there.
        FieldElement51::reduce64([
            (self.0[0] + 36028797018963664u64) - rhs.0[0],
            (self.0[1] + 36028797018963952u64) - rhs.0[1],
            (self.0[2] + 36028797018963952u64) - rhs.0[2],
            (self.0[3] + 36028797018963952u64) - rhs.0[3],
            (self.0[4] + 36028797018963952u64) - rhs.0[4],
        ])
    }
}

impl<'b> MulAssign<&'b FieldElement51> for FieldElement51 {
    fn mul_assign(&mut self, rhs: &'b FieldElement51) {
        let result = (self as &FieldElement51) * rhs;
        self.0 = result.0;
    }
}

impl<'a, 'b> Mul<&'b FieldElement51> for &'a FieldElement51 {
    type Output = FieldElement51;
    fn mul(self, rhs: &'b FieldElement51) -> FieldElement51 {
        let a = &self.0;
        let b = &rhs.0;

        // 2^255 = 19 (mod p), so limbs with total weight >= 2^255
        // fold back in multiplied by 19.
        let b1_19 = b[1] * 19;
        let b2_19 = b[2] * 19;
        let b3_19 = b[3] * 19;
        let b4_19 = b[4] * 19;

        let c0 = m(a[0], b[0]) + m(a[4], b1_19) + m(a[3], b2_19) + m(a[2], b3_19) + m(a[1], b4_19);
        let c1 = m(a[1], b[0]) + m(a[0], b[1]) + m(a[4], b2_19) + m(a[3], b3_19) + m(a[2], b4_19);
        let c2 = m(a[2], b[0]) + m(a[1], b[1]) + m(a[0], b[2]) + m(a[4], b3_19) + m(a[3], b4_19);
        let c3 = m(a[3], b[0]) + m(a[2], b[1]) + m(a[1], b[2]) + m(a[0], b[3]) + m(a[4], b4_19);
        let c4 = m(a[4], b[0]) + m(a[3], b[1]) + m(a[2], b[2]) + m(a[1], b[3]) + m(a[0], b[4]);

        FieldElement51::reduce128([c0, c1, c2, c3, c4])
    }
}

impl<'a> Neg for &'a FieldElement51 {
    type Output = FieldElement51;
    fn neg(self) -> FieldElement51 {
        let mut output = *self;
        output.negate();
        output
    }
}

impl FieldElement51 {
    pub fn negate(&mut self) {
        let neg = FieldElement51::reduce64([
            36028797018963664u64 - self.0[0],
            36028797018963952u64 - self.0[1],
            36028797018963952u64 - self.0[2],
            36028797018963952u64 - self.0[3],
            36028797018963952u64 - self.0[4],
        ]);
        self.0 = neg.0;
    }

    /// Carry-propagate a set of 64-bit limbs that may individually
    /// exceed 51 bits (but not by much), folding the final carry back
    /// in multiplied by 19.
    #[inline(always)]
    const fn reduce64(mut limbs: [u64; 5]) -> FieldElement51 {
        let c0 = limbs[0] >> 51;
        let c1 = limbs[1] >> 51;
        let c2 = limbs[2] >> 51;
        let c3 = limbs[3] >> 51;
        let c4 = limbs[4] >> 51;

        limbs[0] &= LOW_51_BIT_MASK;
        limbs[1] &= LOW_51_BIT_MASK;
        limbs[2] &= LOW_51_BIT_MASK;
        limbs[3] &= LOW_51_BIT_MASK;
        limbs[4] &= LOW_51_BIT_MASK;

        limbs[0] += c4 * 19;
        limbs[1] += c0;
        limbs[2] += c1;
        limbs[3] += c2;
        limbs[4] += c3;

        FieldElement51(limbs)
    }

    /// Carry-propagate the wide (128-bit) limb accumulator produced by
    /// `mul`/`pow2k`, folding the final carry back in multiplied by 19.
    #[inline(always)]
    fn reduce128(z: [u128; 5]) -> FieldElement51 {
        let low_51_bit_mask = LOW_51_BIT_MASK as u128;

        let c0 = (z[0] >> 51) as u64;
        let c1 = (z[1] >> 51) as u64;
        let c2 = (z[2] >> 51) as u64;
        let c3 = (z[3] >> 51) as u64;
        let c4 = (z[4] >> 51) as u64;

        FieldElement51::reduce64([
            (z[0] & low_51_bit_mask) as u64,
            ((z[1] & low_51_bit_mask) as u64) + c0,
            ((z[2] & low_51_bit_mask) as u64) + c1,
            ((z[3] & low_51_bit_mask) as u64) + c2,
            ((z[4] & low_51_bit_mask) as u64) + c3 + c4 * 19,
        ])
    }

    /// The additive identity.
    pub const ZERO: FieldElement51 = FieldElement51([0, 0, 0, 0, 0]);

    /// The multiplicative identity.
    pub const ONE: FieldElement51 = FieldElement51([1, 0, 0, 0, 0]);

    /// `-1 mod p`.
    pub const MINUS_ONE: FieldElement51 = FieldElement51([
        2251799813685228,
        2251799813685247,
        2251799813685247,
        2251799813685247,
        2251799813685247,
    ]);

    /// Construct zero.
    pub const fn zero() -> FieldElement51 {
        FieldElement51::ZERO
    }

    /// Construct one.
    pub const fn one() -> FieldElement51 {
        FieldElement51::ONE
    }

    /// Construct -1.
    pub fn minus_one() -> FieldElement51 {
        FieldElement51::MINUS_ONE
    }

    /// Given `k > 0`, return `self^(2^k)`.
    pub fn pow2k(&self, mut k: u32) -> FieldElement51 {
        debug_assert!(k > 0);

        let mut a = self.0;

        loop {
            let a3_19 = 19 * a[3];
            let a4_19 = 19 * a[4];

            let c0 = m(a[0], a[0]) + 2 * m(a[1], a4_19) + 2 * m(a[2], a3_19);
            let c1 = m(a[3], a3_19) + 2 * m(a[0], a[1]) + 2 * m(a[2], a4_19);
            let c2 = m(a[1], a[1]) + 2 * m(a[0], a[2]) + 2 * m(a[4], a3_19);
            let c3 = m(a[4], a4_19) + 2 * m(a[0], a[3]) + 2 * m(a[1], a[2]);
            let c4 = m(a[2], a[2]) + 2 * m(a[0], a[4]) + 2 * m(a[1], a[3]);

            a = FieldElement51::reduce128([c0, c1, c2, c3, c4]).0;

            k -= 1;
            if k == 0 {
                break;
            }
        }

        FieldElement51(a)
    }

    /// Square this field element, returning the result.
    pub fn square(&self) -> FieldElement51 {
        self.pow2k(1)
    }

    /// Return `2 * self^2`.
    pub fn square2(&self) -> FieldElement51 {
        let mut square = self.pow2k(1);
        for limb in square.0.iter_mut() {
            *limb *= 2;
        }
        FieldElement51::reduce64(square.0)
    }

    /// Load a `FieldElement51` from the low 255 bits of a 256-bit input,
    /// masking the high bit of byte 31. Never fails; non-canonical
    /// encodings are silently reduced by subsequent arithmetic.
    pub fn from_bytes(bytes: &[u8; 32]) -> FieldElement51 {
        let load8 = |input: &[u8]| -> u64 {
            (input[0] as u64)
                | ((input[1] as u64) << 8)
                | ((input[2] as u64) << 16)
                | ((input[3] as u64) << 24)
                | ((input[4] as u64) << 32)
                | ((input[5] as u64) << 40)
                | ((input[6] as u64) << 48)
                | ((input[7] as u64) << 56)
        };

        FieldElement51([
            load8(&bytes[0..]) & LOW_51_BIT_MASK,
            (load8(&bytes[6..]) >> 3) & LOW_51_BIT_MASK,
            (load8(&bytes[12..]) >> 6) & LOW_51_BIT_MASK,
            (load8(&bytes[19..]) >> 1) & LOW_51_BIT_MASK,
            (load8(&bytes[24..]) >> 12) & LOW_51_BIT_MASK,
        ])
    }

    /// Serialize this `FieldElement51` to the unique canonical 32-byte
    /// little-endian encoding (top bit always zero).
    pub fn as_bytes(&self) -> [u8; 32] {
        // Reduce once more to be sure every limb is < 2^51...
        let mut limbs = FieldElement51::reduce64(self.0).0;
        limbs = FieldElement51::reduce64(limbs).0;

        // ... then test whether the 255-bit value is >= p and, if so,
        // subtract p via constant-time conditional add of 19 and carry
        // propagation (equivalent to subtracting p = 2^255 - 19).
        let mut q = (limbs[0] + 19) >> 51;
        q = (limbs[1] + q) >> 51;
        q = (limbs[2] + q) >> 51;
        q = (limbs[3] + q) >> 51;
        q = (limbs[4] + q) >> 51;

        limbs[0] += 19 * q;

        limbs[1] += limbs[0] >> 51;
        limbs[0] &= LOW_51_BIT_MASK;
        limbs[2] += limbs[1] >> 51;
        limbs[1] &= LOW_51_BIT_MASK;
        limbs[3] += limbs[2] >> 51;
        limbs[2] &= LOW_51_BIT_MASK;
        limbs[4] += limbs[3] >> 51;
        limbs[3] &= LOW_51_BIT_MASK;
        limbs[4] &= LOW_51_BIT_MASK;

        let mut s = [0u8; 32];
        s[0] = limbs[0] as u8;
        s[1] = (limbs[0] >> 8) as u8;
        s[2] = (limbs[0] >> 16) as u8;
        s[3] = (limbs[0] >> 24) as u8;
        s[4] = (limbs[0] >> 32) as u8;
        s[5] = (limbs[0] >> 40) as u8;
        s[6] = ((limbs[0] >> 48) | (limbs[1] << 3)) as u8;
        s[7] = (limbs[1] >> 5) as u8;
        s[8] = (limbs[1] >> 13) as u8;
        s[9] = (limbs[1] >> 21) as u8;
        s[10] = (limbs[1] >> 29) as u8;
        s[11] = (limbs[1] >> 37) as u8;
        s[12] = ((limbs[1] >> 45) | (limbs[2] << 6)) as u8;
        s[13] = (limbs[2] >> 2) as u8;
        s[14] = (limbs[2] >> 10) as u8;
        s[15] = (limbs[2] >> 18) as u8;
        s[16] = (limbs[2] >> 26) as u8;
        s[17] = (limbs[2] >> 34) as u8;
        s[18] = (limbs[2] >> 42) as u8;
        s[19] = ((limbs[2] >> 50) | (limbs[3] << 1)) as u8;
        s[20] = (limbs[3] >> 7) as u8;
        s[21] = (limbs[3] >> 15) as u8;
        s[22] = (limbs[3] >> 23) as u8;
        s[23] = (limbs[3] >> 31) as u8;
        s[24] = (limbs[3] >> 39) as u8;
        s[25] = ((limbs[3] >> 47) | (limbs[4] << 4)) as u8;
        s[26] = (limbs[4] >> 4) as u8;
        s[27] = (limbs[4] >> 12) as u8;
        s[28] = (limbs[4] >> 20) as u8;
        s[29] = (limbs[4] >> 28) as u8;
        s[30] = (limbs[4] >> 36) as u8;
        s[31] = (limbs[4] >> 44) as u8;

        debug_assert!((s[31] & 0b1000_0000u8) == 0u8);

        s
    }

    /// Returns 1 iff this field element is negative: the least
    /// significant bit of the canonical encoding is 1.
    pub fn is_negative(&self) -> Choice {
        let bytes = self.as_bytes();
        (bytes[0] & 1).into()
    }

    /// Returns 1 iff this field element is zero.
    pub fn is_zero(&self) -> Choice {
        let zero = [0u8; 32];
        let bytes = self.as_bytes();
        bytes.ct_eq(&zero)
    }

    /// Compute the addition-chain values `(self^(2^10 - 1), self^(2^250 - 1))`
    /// shared by `invert` and `sqrt_ratio_i`'s exponentiation to (p-5)/8.
    fn pow22501(&self) -> (FieldElement51, FieldElement51) {
        let t0 = self.square();
        let t1 = t0.square().square();
        let t2 = self * &t1;
        let t3 = &t0 * &t2;
        let t4 = t3.square();
        let t5 = &t2 * &t4;
        let t6 = t5.pow2k(5);
        let t7 = &t6 * &t5;
        let t8 = t7.pow2k(10);
        let t9 = &t8 * &t7;
        let t10 = t9.pow2k(20);
        let t11 = &t10 * &t9;
        let t12 = t11.pow2k(10);
        let t13 = &t12 * &t7;
        let t14 = t13.pow2k(50);
        let t15 = &t14 * &t13;
        let t16 = t15.pow2k(100);
        let t17 = &t16 * &t15;
        let t18 = t17.pow2k(50);
        let t19 = &t18 * &t13;

        (t3, t19)
    }

    /// Raise `self` to `(p-5)/8 = 2^252 - 3`, the exponent used by the
    /// Ristretto/Ed25519 square-root trick.
    fn pow_p58(&self) -> FieldElement51 {
        let (_, t19) = self.pow22501();
        let t20 = t19.pow2k(2);
        &t20 * self
    }

    /// Given a nonzero field element, compute its inverse via
    /// Fermat's little theorem (`self^(p-2)`); the zero input maps to
    /// zero rather than being rejected, matching the contract callers
    /// rely on.
    pub fn invert(&self) -> FieldElement51 {
        let (t3, t19) = self.pow22501();
        let t20 = t19.pow2k(5);
        &t20 * &t3
    }

    /// Attempt to compute `sqrt(u/v)`.
    ///
    /// Returns `(Choice(1), sqrt(u/v))` if `u/v` is a nonzero square;
    /// `(Choice(1), 0)` if `u` is zero; `(Choice(0), 0)` if `v` is zero
    /// and `u` is not; and otherwise `(Choice(0), sqrt(i*u/v))`, where
    /// `i = sqrt(-1)`. The returned root is always the nonnegative
    /// (even-LSB) representative.
    pub fn sqrt_ratio_i(u: &FieldElement51, v: &FieldElement51) -> (Choice, FieldElement51) {
        use crate::crypto::curve25519_dalek::constants::SQRT_M1;

        let v3 = &v.square() * v;
        let v7 = &v3.square() * v;
        let mut r = &(u * &v3) * &(u * &v7).pow_p58();
        let check = v * &r.square();

        let u_neg = -u;
        let correct_sign_sqrt = check.ct_eq(u);
        let flipped_sign_sqrt = check.ct_eq(&u_neg);
        let flipped_sign_sqrt_i = check.ct_eq(&(&u_neg * &SQRT_M1));

        let r_prime = &SQRT_M1 * &r;
        r.conditional_assign(&r_prime, flipped_sign_sqrt | flipped_sign_sqrt_i);

        let r_is_negative = r.is_negative();
        r.conditional_negate(r_is_negative);

        let was_nonzero_square = correct_sign_sqrt | flipped_sign_sqrt;

        (was_nonzero_square, r)
    }

    /// Compute `(Choice(1), self^-1/2)` if `self` is a nonzero square,
    /// `(Choice(0), sqrt(i)*self^-1/2)` otherwise.
    pub fn invsqrt(&self) -> (Choice, FieldElement51) {
        FieldElement51::sqrt_ratio_i(&FieldElement51::one(), self)
    }
}

impl ConstantTimeEq for FieldElement51 {
    fn ct_eq(&self, other: &FieldElement51) -> Choice {
        self.as_bytes().ct_eq(&other.as_bytes())
    }
}

impl PartialEq for FieldElement51 {
    fn eq(&self, other: &FieldElement51) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement51 {}

impl ConditionallySelectable for FieldElement51 {
    fn conditional_select(
        a: &FieldElement51,
        b: &FieldElement51,
        choice: Choice,
    ) -> FieldElement51 {
        FieldElement51([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
            u64::conditional_select(&a.0[4], &b.0[4], choice),
        ])
    }

    fn conditional_assign(&mut self, other: &FieldElement51, choice: Choice) {
        for i in 0..5 {
            self.0[i].conditional_assign(&other.0[i], choice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_times_a_inv_is_one() {
        let a = FieldElement51([1, 2, 3, 4, 5]);
        let a_inv = a.invert();
        let should_be_one = &a * &a_inv;
        assert_eq!(should_be_one.as_bytes(), FieldElement51::one().as_bytes());
    }

    #[test]
    fn zero_invert_is_zero() {
        let z = FieldElement51::zero();
        assert_eq!(z.invert().as_bytes(), FieldElement51::zero().as_bytes());
    }

    #[test]
    fn square_matches_mul() {
        let a = FieldElement51([9, 8, 7, 6, 5]);
        assert_eq!((&a * &a).as_bytes(), a.square().as_bytes());
    }

    #[test]
    fn square2_is_double_square() {
        let a = FieldElement51([11, 22, 33, 44, 55]);
        let doubled = &a.square() + &a.square();
        assert_eq!(doubled.as_bytes(), a.square2().as_bytes());
    }

    #[test]
    fn sqrt_ratio_i_zero_over_zero() {
        let zero = FieldElement51::zero();
        let (was_square, r) = FieldElement51::sqrt_ratio_i(&zero, &zero);
        assert!(bool::from(was_square));
        assert_eq!(r.as_bytes(), FieldElement51::zero().as_bytes());
    }

    #[test]
    fn sqrt_ratio_i_one_over_zero() {
        let zero = FieldElement51::zero();
        let one = FieldElement51::one();
        let (was_square, r) = FieldElement51::sqrt_ratio_i(&one, &zero);
        assert!(!bool::from(was_square));
        assert_eq!(r.as_bytes(), FieldElement51::zero().as_bytes());
    }

    #[test]
    fn sqrt_ratio_i_four_over_one() {
        let one = FieldElement51::one();
        let four = FieldElement51([4, 0, 0, 0, 0]);
        let (was_square, r) = FieldElement51::sqrt_ratio_i(&four, &one);
        assert!(bool::from(was_square));
        assert_eq!((&r * &r).as_bytes(), four.as_bytes());
    }
}
