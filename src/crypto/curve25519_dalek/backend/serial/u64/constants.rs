//! Modified implementation based on curve25519-dalek (with modifications)
//!
//! Original source: https://github.com/dalek-cryptography/curve25519-dalek
//!
//! This file is part of curve25519-dalek.
//! Copyright (c) 2016-2021 isis lovecruft
//! Copyright (c) 2016-2019 Henry de Valence

//! Field- and scalar-element constants, expressed in the 64-bit
//! backend's limb representations.

use crate::crypto::curve25519_dalek::backend::serial::u64::field::FieldElement51;
use crate::crypto::curve25519_dalek::backend::serial::u64::scalar::Scalar52;

/// Edwards `d` value, equal to `-121665/121666 mod p`.
pub(crate) const EDWARDS_D: FieldElement51 = FieldElement51([
    929955233495203,
    466365720129213,
    1662059464998953,
    2033849074728123,
    1442794654840575,
]);

/// Edwards `2*d` value, equal to `2*(-121665/121666) mod p`.
pub(crate) const EDWARDS_D2: FieldElement51 = FieldElement51([
    1859910466990425,
    932731440258426,
    1072319116312658,
    1815898335770999,
    633789495995903,
]);

/// `= sqrt(-1) mod p`, used in Ristretto/Ed25519 decompression.
pub(crate) const SQRT_M1: FieldElement51 = FieldElement51([
    1718705420411056,
    234908883556509,
    2233514472574048,
    2117202627021982,
    765476049583133,
]);

/// `= sqrt(a*d - 1) mod p`, where `a = -1`, used by Ristretto decompression.
pub(crate) const SQRT_AD_MINUS_ONE: FieldElement51 = FieldElement51([
    10306688700882,
    1825811894652973,
    44770894383559,
    1031309182999399,
    1277000682391499,
]);

/// `= 1/sqrt(a - d) mod p`, used by Ristretto compression/decompression.
pub(crate) const INVSQRT_A_MINUS_D: FieldElement51 = FieldElement51([
    278908739862762,
    821645201101625,
    8113234426968,
    1777959178193151,
    2118520810568447,
]);

/// Edwards basepoint `x`-coordinate.
pub(crate) const ED25519_BASEPOINT_X: FieldElement51 = FieldElement51([
    1738742601995546,
    1146398526822698,
    2070867633025821,
    562264141797630,
    587772402128613,
]);

/// Edwards basepoint `y`-coordinate, `= 4/5 mod p`.
pub(crate) const ED25519_BASEPOINT_Y: FieldElement51 = FieldElement51([
    1801439850948184,
    1351079888211148,
    450359962737049,
    900719925474099,
    1801439850948198,
]);

/// Edwards basepoint `t`-coordinate `= x*y mod p`.
pub(crate) const ED25519_BASEPOINT_T: FieldElement51 = FieldElement51([
    1841354044333475,
    16398895984059,
    755974180946558,
    900171276175154,
    1821297809914039,
]);

/// `l`, the order of the Ristretto group, as `Scalar52` limbs.
pub(crate) const L: Scalar52 = Scalar52([
    0x0002631a5cf5d3ed,
    0x000dea2f79cd6581,
    0x000000000014def9,
    0x0000000000000000,
    0x0000100000000000,
]);
