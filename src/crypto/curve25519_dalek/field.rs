//! Modified implementation based on curve25519-dalek (with modifications)
//!
//! Original source: https://github.com/dalek-cryptography/curve25519-dalek
//!
//! This file is part of curve25519-dalek.
//! Copyright (c) 2016-2021 isis lovecruft
//! Copyright (c) 2016-2019 Henry de Valence

//! Field arithmetic modulo \\(p = 2\^{255} - 19\\).
//!
//! Rather than selecting a backend at compile time via `cfg`, this
//! crate always uses the 64-bit serial backend: field elements are
//! always `FieldElement51`s.

pub(crate) use super::backend::serial::u64::field::FieldElement51 as FieldElement;
