//! Modified implementation based on curve25519-dalek (with modifications)
//!
//! Original source: https://github.com/dalek-cryptography/curve25519-dalek
//!
//! This file is part of curve25519-dalek.
//! Copyright (c) 2016-2021 isis lovecruft
//! Copyright (c) 2016-2019 Henry de Valence

//! Precomputed lookup tables of multiples of a point, for use in
//! scalar multiplication.

#![allow(non_snake_case)]

use core::fmt::Debug;

use crate::crypto::subtle::Choice;
use crate::crypto::subtle::ConditionallyNegatable;
use crate::crypto::subtle::ConditionallySelectable;
use crate::crypto::subtle::ConstantTimeEq;

use super::backend::serial::curve_models::{AffineNielsPoint, ProjectiveNielsPoint};
use super::edwards::EdwardsPoint;

impl Debug for AffineNielsPoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "AffineNielsPoint")
    }
}

impl Debug for ProjectiveNielsPoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ProjectiveNielsPoint")
    }
}

macro_rules! impl_lookup_table {
    (Name = $name:ident, Size = $size:expr, ConversionRange = $conv_range:expr) => {
        /// A lookup table of precomputed multiples of a point, used to
        /// accelerate scalar multiplication.
        #[derive(Copy, Clone)]
        pub struct $name<T>(pub(crate) [T; $size]);

        impl<T> $name<T>
        where
            T: Copy + Default + ConditionallySelectable + ConditionallyNegatable,
        {
            /// Given `-8 <= x <= 8` (for the 8-entry tables, scaled
            /// accordingly for larger tables), return `x * B`, where
            /// `B` is the point this table was built from.
            pub fn select(&self, x: i8) -> T {
                debug_assert!(x as i32 >= -($size as i32));
                debug_assert!(x as i32 <= $size as i32);

                let xmask = x as i16 >> 7;
                let xabs = (x as i16 + xmask) ^ xmask;

                let mut t = T::default();
                for j in 1..=$size {
                    let c = (xabs as u16).ct_eq(&(j as u16));
                    t.conditional_assign(&self.0[j - 1], c);
                }

                let neg_mask = Choice::from((xmask & 1) as u8);
                t.conditional_negate(neg_mask);

                t
            }
        }

        impl<T: Copy + Default> Default for $name<T> {
            fn default() -> $name<T> {
                $name([T::default(); $size])
            }
        }

        impl<T: Debug> Debug for $name<T> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}(", stringify!($name))?;
                for x in self.0.iter() {
                    write!(f, "{:?}", x)?;
                }
                write!(f, ")")
            }
        }

        impl<'a> From<&'a EdwardsPoint> for $name<ProjectiveNielsPoint> {
            fn from(P: &'a EdwardsPoint) -> Self {
                let mut points = [P.as_projective_niels(); $size];
                let P2 = P.double();
                for j in $conv_range {
                    points[j] = (&P2 + &points[j - 1]).as_extended().as_projective_niels();
                }
                $name(points)
            }
        }

        impl<'a> From<&'a EdwardsPoint> for $name<AffineNielsPoint> {
            fn from(P: &'a EdwardsPoint) -> Self {
                let mut points = [P.as_affine_niels(); $size];
                let P2 = P.double();
                for j in $conv_range {
                    points[j] = (&P2 + &points[j - 1]).as_extended().as_affine_niels();
                }
                $name(points)
            }
        }
    };
}

// Used by constant-time variable-base scalar multiplication.
impl_lookup_table! {
    Name = LookupTable,
    Size = 8,
    ConversionRange = 1..8
}

// Used to build the basepoint tables, at increasing radices.
impl_lookup_table! {
    Name = LookupTableRadix16,
    Size = 8,
    ConversionRange = 1..8
}
impl_lookup_table! {
    Name = LookupTableRadix32,
    Size = 16,
    ConversionRange = 1..16
}
impl_lookup_table! {
    Name = LookupTableRadix64,
    Size = 32,
    ConversionRange = 1..32
}
impl_lookup_table! {
    Name = LookupTableRadix128,
    Size = 64,
    ConversionRange = 1..64
}
impl_lookup_table! {
    Name = LookupTableRadix256,
    Size = 128,
    ConversionRange = 1..128
}

/// A lookup table of odd multiples `{1A, 3A, ..., 15A}` used by the
/// width-5 non-adjacent form in variable-time double-scalar
/// multiplication.
pub struct NafLookupTable5<T>(pub(crate) [T; 8]);

impl<T: Copy> NafLookupTable5<T> {
    /// Given an odd `0 < x < 16`, return `x * A`.
    pub fn select(&self, x: usize) -> T {
        debug_assert_eq!(x & 1, 1);
        debug_assert!(x < 16);
        self.0[x / 2]
    }
}

impl<'a> From<&'a EdwardsPoint> for NafLookupTable5<ProjectiveNielsPoint> {
    fn from(A: &'a EdwardsPoint) -> Self {
        let mut Ai = [A.as_projective_niels(); 8];
        let A2 = A.double();
        for i in 0..7 {
            Ai[i + 1] = (&A2 + &Ai[i]).as_extended().as_projective_niels();
        }
        NafLookupTable5(Ai)
    }
}

impl<'a> From<&'a EdwardsPoint> for NafLookupTable5<AffineNielsPoint> {
    fn from(A: &'a EdwardsPoint) -> Self {
        let mut Ai = [A.as_affine_niels(); 8];
        let A2 = A.double();
        for i in 0..7 {
            Ai[i + 1] = (&A2 + &Ai[i]).as_extended().as_affine_niels();
        }
        NafLookupTable5(Ai)
    }
}

/// A lookup table of odd multiples `{1A, 3A, ..., 127A}` used by the
/// width-8 non-adjacent form against the fixed basepoint in
/// variable-time double-scalar multiplication: a bigger table buys a
/// sparser recoding for the operand that pays precomputation only once.
pub struct NafLookupTable8<T>(pub(crate) [T; 64]);

impl<T: Copy> NafLookupTable8<T> {
    /// Given an odd `0 < x < 128`, return `x * A`.
    pub fn select(&self, x: usize) -> T {
        debug_assert_eq!(x & 1, 1);
        debug_assert!(x < 128);
        self.0[x / 2]
    }
}

impl<'a> From<&'a EdwardsPoint> for NafLookupTable8<AffineNielsPoint> {
    fn from(A: &'a EdwardsPoint) -> Self {
        let mut Ai = [A.as_affine_niels(); 64];
        let A2 = A.double();
        for i in 0..63 {
            Ai[i + 1] = (&A2 + &Ai[i]).as_extended().as_affine_niels();
        }
        NafLookupTable8(Ai)
    }
}
