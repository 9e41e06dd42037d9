//! Signing-context construction and the `SigningTranscript` extension
//! trait, layered on top of `merlin::Transcript`.
//!
//! Based on schnorrkel's `context` module.
//! Source: https://github.com/w3f/schnorrkel
//! Authors: Isis Lovecruft, Jeff Burdges, Web3 Foundation

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};

use crate::crypto::curve25519_dalek::ristretto::CompressedRistretto;
use crate::crypto::curve25519_dalek::scalar::Scalar;

/// Build a signing-context transcript for the application domain `context`.
///
/// Modern (schnorrkel 0.8.5+) construction: initialise STROBE with a fixed
/// framing label, then absorb the caller's context as an unlabeled message.
/// This is the only construction wire-compatible with Substrate/Polkadot.
pub fn signing_context(context: &[u8]) -> Transcript {
    let mut t = Transcript::new(b"SigningContext");
    t.append_message(b"", context);
    t
}

/// The pre-0.8.5 signing-context construction, kept only for decoding
/// signatures produced by that era. The application context was used
/// directly as the transcript's initial Merlin label, giving weaker
/// domain separation between different protocols; do not use this for
/// new signing paths.
#[cfg(feature = "legacy_compatibility")]
pub fn signing_context_legacy(context: &[u8]) -> Transcript {
    Transcript::new(context)
}

/// Operations a Schnorr-style signing/verification protocol needs from
/// a public-coin transcript: committing public data, extracting a
/// challenge scalar, and deriving a nonce bound to both the transcript
/// state and a secret witness.
pub trait SigningTranscript {
    /// Absorb `bytes` under `label`.
    fn commit_bytes(&mut self, label: &'static [u8], bytes: &[u8]);

    /// Absorb a compressed point's 32-byte encoding under `label`.
    fn commit_point(&mut self, label: &'static [u8], point: &CompressedRistretto) {
        self.commit_bytes(label, point.as_bytes());
    }

    /// Squeeze `dest.len()` challenge bytes under `label`.
    fn challenge_bytes(&mut self, label: &'static [u8], dest: &mut [u8]);

    /// Squeeze a 64-byte challenge and wide-reduce it to a `Scalar`.
    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar {
        let mut buf = [0u8; 64];
        self.challenge_bytes(label, &mut buf);
        Scalar::from_bytes_mod_order_wide(&buf)
    }

    /// Fork this transcript into an RNG keyed on `nonce_seeds` (typically
    /// a signer's secret nonce seed) plus `rng` for external entropy,
    /// then fill `dest` by squeezing from it.
    ///
    /// Nonce safety relies on at least one of `nonce_seeds` being secret;
    /// if it is, the result is secure even against a broken `rng`.
    fn witness_bytes<R: RngCore + CryptoRng>(
        &self,
        label: &'static [u8],
        dest: &mut [u8],
        nonce_seeds: &[&[u8]],
        rng: &mut R,
    );

    /// As [`Self::witness_bytes`], squeezing a 64-byte witness and
    /// wide-reducing it to a `Scalar`.
    fn witness_scalar<R: RngCore + CryptoRng>(
        &self,
        label: &'static [u8],
        nonce_seeds: &[&[u8]],
        rng: &mut R,
    ) -> Scalar {
        let mut buf = [0u8; 64];
        self.witness_bytes(label, &mut buf, nonce_seeds, rng);
        Scalar::from_bytes_mod_order_wide(&buf)
    }
}

impl SigningTranscript for Transcript {
    fn commit_bytes(&mut self, label: &'static [u8], bytes: &[u8]) {
        self.append_message(label, bytes);
    }

    fn challenge_bytes(&mut self, label: &'static [u8], dest: &mut [u8]) {
        Transcript::challenge_bytes(self, label, dest);
    }

    fn witness_bytes<R: RngCore + CryptoRng>(
        &self,
        label: &'static [u8],
        dest: &mut [u8],
        nonce_seeds: &[&[u8]],
        rng: &mut R,
    ) {
        let mut builder = self.build_rng();
        for ns in nonce_seeds {
            builder = builder.rekey_with_witness_bytes(label, ns);
        }
        let mut transcript_rng = builder.finalize(rng);
        transcript_rng.fill_bytes(dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rng::ChaCha20Rng;

    #[test]
    fn same_inputs_give_same_challenge() {
        let mut t1 = signing_context(b"substrate");
        let mut t2 = signing_context(b"substrate");
        t1.commit_bytes(b"sign-bytes", b"hello");
        t2.commit_bytes(b"sign-bytes", b"hello");
        assert_eq!(
            t1.challenge_scalar(b"sign:c").to_bytes(),
            t2.challenge_scalar(b"sign:c").to_bytes()
        );
    }

    #[test]
    fn different_context_gives_different_challenge() {
        let mut t1 = signing_context(b"substrate");
        let mut t2 = signing_context(b"other-chain");
        t1.commit_bytes(b"sign-bytes", b"hello");
        t2.commit_bytes(b"sign-bytes", b"hello");
        assert_ne!(
            t1.challenge_scalar(b"sign:c").to_bytes(),
            t2.challenge_scalar(b"sign:c").to_bytes()
        );
    }

    #[test]
    fn witness_scalar_is_deterministic_for_fixed_rng() {
        let t = signing_context(b"substrate");
        let mut rng1 = ChaCha20Rng::from_seed([7u8; 32]);
        let mut rng2 = ChaCha20Rng::from_seed([7u8; 32]);
        let r1 = t.witness_scalar(b"signing", &[&b"nonce-seed"[..]], &mut rng1);
        let r2 = t.witness_scalar(b"signing", &[&b"nonce-seed"[..]], &mut rng2);
        assert_eq!(r1.to_bytes(), r2.to_bytes());
    }

    #[test]
    fn witness_scalar_differs_with_nonce_seed() {
        let t = signing_context(b"substrate");
        let mut rng1 = ChaCha20Rng::from_seed([7u8; 32]);
        let mut rng2 = ChaCha20Rng::from_seed([7u8; 32]);
        let r1 = t.witness_scalar(b"signing", &[&b"seed-a"[..]], &mut rng1);
        let r2 = t.witness_scalar(b"signing", &[&b"seed-b"[..]], &mut rng2);
        assert_ne!(r1.to_bytes(), r2.to_bytes());
    }
}
