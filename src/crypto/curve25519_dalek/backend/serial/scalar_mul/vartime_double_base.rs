//! Modified implementation based on curve25519-dalek (with modifications)
//!
//! Original source: https://github.com/dalek-cryptography/curve25519-dalek
//!
//! This file is part of curve25519-dalek.
//! Copyright (c) 2016-2021 isis lovecruft
//! Copyright (c) 2016-2019 Henry de Valence

#![allow(non_snake_case)]

use crate::crypto::curve25519_dalek::backend::serial::curve_models::ProjectivePoint;
use crate::crypto::curve25519_dalek::constants;
use crate::crypto::curve25519_dalek::edwards::EdwardsPoint;
use crate::crypto::curve25519_dalek::scalar::Scalar;
use crate::crypto::curve25519_dalek::window::NafLookupTable5;

/// Variable-time computation of `aA + bB`, where `B` is the Ed25519
/// basepoint.
///
/// Used for signature verification: `a`, `A` and `b` are all public,
/// so leaking their values (or the value of the sum) through timing
/// is not a concern, and the NAF approach is substantially faster than
/// the constant-time ladder used for signing. `a` (against the
/// not-precomputed point `A`) uses width-5 NAF; `b` (against the
/// once-precomputed basepoint table) uses width-8, trading a bigger
/// table for a sparser recoding.
pub fn mul(a: &Scalar, A: &EdwardsPoint, b: &Scalar) -> EdwardsPoint {
    let a_naf = a.non_adjacent_form(5);
    let b_naf = b.non_adjacent_form(8);

    let A_table = NafLookupTable5::from(A);
    let B_table = &*constants::AFFINE_ODD_MULTIPLES_OF_BASEPOINT;

    let mut i: usize = 255;
    loop {
        if a_naf[i] != 0 || b_naf[i] != 0 {
            break;
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }

    let mut r = ProjectivePoint::identity();
    loop {
        let mut t = r.double();

        if a_naf[i] > 0 {
            t = &t.as_extended() + &A_table.select(a_naf[i] as usize);
        } else if a_naf[i] < 0 {
            t = &t.as_extended() - &A_table.select(-a_naf[i] as usize);
        }

        if b_naf[i] > 0 {
            t = &t.as_extended() + &B_table.select(b_naf[i] as usize);
        } else if b_naf[i] < 0 {
            t = &t.as_extended() - &B_table.select(-b_naf[i] as usize);
        }

        r = t.as_projective();

        if i == 0 {
            break;
        }
        i -= 1;
    }

    r.as_extended()
}
