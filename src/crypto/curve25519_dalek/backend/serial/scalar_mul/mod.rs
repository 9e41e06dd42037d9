//! Modified implementation based on curve25519-dalek (with modifications)
//!
//! Original source: https://github.com/dalek-cryptography/curve25519-dalek
//!
//! This file is part of curve25519-dalek.
//! Copyright (c) 2016-2021 isis lovecruft
//! Copyright (c) 2016-2019 Henry de Valence

//! Serial implementations of scalar multiplication algorithms.
//!
//! Signing needs a constant-time, variable-base multiplication, so
//! timing never leaks the scalar. Verification only ever multiplies
//! by public values, so it can use the much faster variable-time
//! double-base algorithm instead.

pub mod variable_base;
pub mod vartime_double_base;
