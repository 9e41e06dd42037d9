//! Modified implementation based on curve25519-dalek (with modifications)
//!
//! Original source: https://github.com/dalek-cryptography/curve25519-dalek
//!
//! This file is part of curve25519-dalek.
//! Copyright (c) 2016-2021 isis lovecruft
//! Copyright (c) 2016-2019 Henry de Valence

//! The 64-bit serial backend: field and scalar arithmetic using 64-bit
//! limbs and 128-bit products, plus the curve constants expressed in
//! this backend's limb representation.

pub mod field;
pub mod scalar;
pub mod constants;

pub use self::field::FieldElement51;
pub use self::scalar::Scalar52;
