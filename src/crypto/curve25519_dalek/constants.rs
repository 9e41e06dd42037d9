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
//! Various constants, such as the Ristretto and Ed25519 basepoints.

#![allow(non_snake_case)]

use std::sync::LazyLock;

use super::backend::serial::curve_models::AffineNielsPoint;
use super::edwards::EdwardsPoint;
use super::field::FieldElement;
use super::scalar::Scalar;
use super::traits::BasepointTable;
use super::window::NafLookupTable8;

#[cfg(feature = "precomputed-tables")]
use super::edwards::EdwardsBasepointTable;

// Default to u64 backend constants for simplicity
pub use super::backend::serial::u64::constants::*;

/// The Ed25519 basepoint, as an `EdwardsPoint`.
pub const ED25519_BASEPOINT_POINT: EdwardsPoint = EdwardsPoint {
    X: ED25519_BASEPOINT_X,
    Y: ED25519_BASEPOINT_Y,
    Z: FieldElement::ONE,
    T: ED25519_BASEPOINT_T,
};

/// The Ed25519 basepoint, as an `EdwardsBasepointTable` for fast
/// fixed-base scalar multiplication.
///
/// Unlike the original C reference implementation, this table is not
/// a hardcoded data blob: it is built once, on first use, by repeated
/// doubling of [`ED25519_BASEPOINT_POINT`].
#[cfg(feature = "precomputed-tables")]
pub static ED25519_BASEPOINT_TABLE: LazyLock<EdwardsBasepointTable> =
    LazyLock::new(|| EdwardsBasepointTable::create(&ED25519_BASEPOINT_POINT));

/// Odd multiples `{1B, 3B, ..., 127B}` of the Ed25519 basepoint, stored
/// in affine-Niels form, used by the width-8 NAF variable-time
/// double-scalar multiplication that backs signature verification.
pub static AFFINE_ODD_MULTIPLES_OF_BASEPOINT: LazyLock<NafLookupTable8<AffineNielsPoint>> =
    LazyLock::new(|| NafLookupTable8::from(&ED25519_BASEPOINT_POINT));

#[cfg(feature = "precomputed-tables")]
use super::ristretto::{CompressedRistretto, RistrettoBasepointTable, RistrettoPoint};

/// The Ristretto basepoint, as a `RistrettoPoint`.
///
/// This is called `_POINT` to distinguish it from `_TABLE`, which
/// provides fast scalar multiplication.
#[cfg(feature = "precomputed-tables")]
pub const RISTRETTO_BASEPOINT_POINT: RistrettoPoint = RistrettoPoint(ED25519_BASEPOINT_POINT);

/// The Ristretto basepoint, as its compressed 32-byte encoding.
#[cfg(feature = "precomputed-tables")]
pub static RISTRETTO_BASEPOINT_COMPRESSED: LazyLock<CompressedRistretto> =
    LazyLock::new(|| RISTRETTO_BASEPOINT_POINT.compress());

/// The Ristretto basepoint, as a `RistrettoBasepointTable` for scalar multiplication.
#[cfg(feature = "precomputed-tables")]
pub static RISTRETTO_BASEPOINT_TABLE: LazyLock<RistrettoBasepointTable> =
    LazyLock::new(|| RistrettoBasepointTable::create(&RISTRETTO_BASEPOINT_POINT));

/// `BASEPOINT_ORDER` is the order of the Ristretto group and of the Ed25519 basepoint, i.e.,
/// $$
/// \ell = 2^\{252\} + 27742317777372353535851937790883648493.
/// $$
pub const BASEPOINT_ORDER: Scalar = Scalar {
    bytes: [
        237, 211, 245, 92, 26, 99, 18, 88, 214, 156, 247, 162, 222, 249, 222, 20, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 16,
    ],
};

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::curve25519_dalek::backend::serial::u64::field::FieldElement51;

    /// Test that SQRT_M1 is the positive square root of -1
    #[test]
    fn test_sqrt_minus_one() {
        let minus_one = FieldElement::MINUS_ONE;
        let sqrt_m1_sq = &SQRT_M1 * &SQRT_M1;
        assert_eq!(minus_one, sqrt_m1_sq);
        assert!(bool::from(!SQRT_M1.is_negative()));
    }

    #[test]
    fn test_sqrt_constants_sign() {
        let minus_one = FieldElement::MINUS_ONE;
        let (was_nonzero_square, invsqrt_m1) = minus_one.invsqrt();
        assert!(bool::from(was_nonzero_square));
        let sign_test_sqrt = &invsqrt_m1 * &SQRT_M1;
        assert_eq!(sign_test_sqrt, minus_one);
    }

    /// Test that d = -121665/121666
    #[test]
    fn test_d_vs_ratio() {
        let a = -&FieldElement51([121665, 0, 0, 0, 0]);
        let b = FieldElement51([121666, 0, 0, 0, 0]);
        let d = &a * &b.invert();
        let d2 = &d + &d;
        assert_eq!(d, EDWARDS_D);
        assert_eq!(d2, EDWARDS_D2);
    }

    #[test]
    fn test_sqrt_ad_minus_one() {
        let a = FieldElement::MINUS_ONE;
        let ad_minus_one = &(&a * &EDWARDS_D) + &a;
        let should_be_ad_minus_one = SQRT_AD_MINUS_ONE.square();
        assert_eq!(should_be_ad_minus_one, ad_minus_one);
    }

    #[test]
    fn basepoint_round_trips_through_table() {
        let table = &*ED25519_BASEPOINT_TABLE;
        assert!(table.basepoint().compress().as_bytes() == ED25519_BASEPOINT_POINT.compress().as_bytes());
    }

    #[test]
    fn ristretto_basepoint_is_canonical() {
        let bytes = RISTRETTO_BASEPOINT_COMPRESSED.as_bytes();
        assert_eq!(
            CompressedRistretto(*bytes).decompress().unwrap().compress().as_bytes(),
            *bytes
        );
    }
}
