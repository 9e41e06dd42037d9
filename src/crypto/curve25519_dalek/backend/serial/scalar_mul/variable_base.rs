//! Modified implementation based on curve25519-dalek (with modifications)
//!
//! Original source: https://github.com/dalek-cryptography/curve25519-dalek
//!
//! This file is part of curve25519-dalek.
//! Copyright (c) 2016-2021 isis lovecruft
//! Copyright (c) 2016-2019 Henry de Valence

use crate::crypto::curve25519_dalek::backend::serial::curve_models::ProjectiveNielsPoint;
use crate::crypto::curve25519_dalek::edwards::EdwardsPoint;
use crate::crypto::curve25519_dalek::scalar::Scalar;
use crate::crypto::curve25519_dalek::traits::Identity;
use crate::crypto::curve25519_dalek::window::LookupTable;

/// Constant-time variable-base scalar multiplication: `scalar * point`.
///
/// Recodes `scalar` into 64 signed radix-16 digits and walks them from
/// the most significant down, repeatedly doubling 4 times and adding
/// the digit's multiple of `point` selected from a constant-time
/// lookup table, so that memory access pattern and timing are
/// independent of the scalar's value.
pub fn mul(point: &EdwardsPoint, scalar: &Scalar) -> EdwardsPoint {
    let lookup_table = LookupTable::<ProjectiveNielsPoint>::from(point);
    let e = scalar.as_radix_16();

    let mut q = EdwardsPoint::identity();
    for i in (0..64).rev() {
        q = q.mul_by_pow_2(4);
        let r = lookup_table.select(e[i]);
        q = (&q + &r).as_extended();
    }
    q
}
