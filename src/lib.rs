//! Ristretto-Schnorr (sr25519) signing and verification, wire-compatible
//! with the Substrate/Polkadot ecosystem.
//!
//! This crate implements the four layers the protocol is built from,
//! from the ground up rather than by wrapping an existing signature
//! library: field arithmetic over GF(2^255 - 19), Edwards/Ristretto
//! group operations, scalar arithmetic mod the group order, and a
//! Merlin transcript carrying the Schnorr sign/verify protocol plus
//! hierarchical key derivation.
//!
//! A `MiniSecretKey` is expanded into a `Keypair` via [`ExpansionMode`],
//! which signs and verifies messages under an application-specific
//! context byte string (`b"substrate"` for chain-compatible signatures).

mod crypto;

pub mod rng {
    //! RNG abstractions used for nonce generation.
    pub use crate::crypto::rng::{ChaCha20Rng, CryptoRng, RngCore};
}

pub mod curve {
    //! Field, scalar, and Edwards/Ristretto group arithmetic.
    pub use crate::crypto::curve25519_dalek::{constants, edwards, ristretto, scalar, traits};
}

pub use crypto::schnorrkel::{
    ChainCode, ExpansionMode, Keypair, MiniSecretKey, ProtocolError, PublicKey,
    RistrettoBoth, SecretKey, Signature, SignatureError, SignatureResult,
    CHAIN_CODE_LENGTH, HALF_ED25519_KEYPAIR_LENGTH, MINI_SECRET_KEY_LENGTH, PUBLIC_KEY_LENGTH,
    RISTRETTO_POINT_LENGTH, SECRET_KEY_LENGTH, SIGNATURE_LENGTH,
};
pub use crypto::transcript::SigningTranscript;
#[cfg(feature = "legacy_compatibility")]
pub use crypto::transcript::signing_context_legacy;
pub use crypto::transcript::signing_context;
