//! Modified implementation based on curve25519-dalek (with modifications)
//!
//! Original source: https://github.com/dalek-cryptography/curve25519-dalek
//!
//! This file is part of curve25519-dalek.
//! Copyright (c) 2016-2021 isis lovecruft
//! Copyright (c) 2016-2019 Henry de Valence

//! Affine (non-projective) Edwards point representation, used only as
//! an intermediate step when compressing an `EdwardsPoint`.

#![allow(non_snake_case)]

use crate::crypto::subtle::Choice;

use super::CompressedEdwardsY;
use crate::crypto::curve25519_dalek::field::FieldElement;

/// A point \\((x, y)\\) on the curve, in affine coordinates.
#[derive(Copy, Clone)]
pub struct AffinePoint {
    pub x: FieldElement,
    pub y: FieldElement,
}

impl AffinePoint {
    /// Compress this point to `CompressedEdwardsY` format: the
    /// `y`-coordinate, with the sign of `x` folded into the top bit.
    pub fn compress(&self) -> CompressedEdwardsY {
        let mut s = self.y.as_bytes();
        let x_is_negative: Choice = self.x.is_negative();
        s[31] ^= x_is_negative.unwrap_u8() << 7;
        CompressedEdwardsY(s)
    }
}
