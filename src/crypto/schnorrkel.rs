//! Schnorr signatures on Ristretto25519 for SR25519 key generation
//!
//! Based on schnorrkel v0.11.5
//! Source: https://github.com/w3f/schnorrkel
//! Authors: Isis Lovecruft, Jeff Burdges, Web3 Foundation
//! License: BSD-3-Clause

use core::convert::AsRef;
use core::fmt::{Debug, Display};
use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use sha2::{Sha512, digest::{Update, FixedOutput}};
use zeroize::Zeroize;

use crate::crypto::curve25519_dalek::constants;
use crate::crypto::curve25519_dalek::edwards::EdwardsPoint;
use crate::crypto::curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use crate::crypto::curve25519_dalek::scalar::Scalar;
use crate::crypto::subtle::{Choice, ConstantTimeEq};
use crate::crypto::transcript::{signing_context, SigningTranscript};

#[cfg(feature = "legacy_compatibility")]
use crate::crypto::transcript::signing_context_legacy;

// ===== Constants =====

/// The length of a Ristretto Schnorr `MiniSecretKey`, in bytes.
pub const MINI_SECRET_KEY_LENGTH: usize = 32;

/// The length of a Ristretto Schnorr `PublicKey`, in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// The length of the "key" portion of a Ristretto Schnorr secret key, in bytes.
const SECRET_KEY_KEY_LENGTH: usize = 32;

/// The length of the "nonce" portion of a Ristretto Schnorr secret key, in bytes.
const SECRET_KEY_NONCE_LENGTH: usize = 32;

/// The length of a Ristretto Schnorr key, `SecretKey`, in bytes.
pub const SECRET_KEY_LENGTH: usize = SECRET_KEY_KEY_LENGTH + SECRET_KEY_NONCE_LENGTH;

/// Compressed Ristretto point length
pub const RISTRETTO_POINT_LENGTH: usize = 32;

// ===== Error Types =====

/// `Result` specialized to this crate for convenience.
pub type SignatureResult<T> = Result<T, SignatureError>;

/// Errors which may occur while decoding signatures and keypairs.
///
/// These all correspond to malformed input: wrong-length buffers, a
/// signature whose marker bit says it isn't one of ours, or 32 bytes
/// that don't decompress to a valid Ristretto point.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SignatureError {
    /// Invalid point provided, usually to `verify` methods.
    PointDecompressionError,
    /// A scalar encoding was not the canonical representative mod `l`.
    ScalarFormatError,
    /// A signature's high bit was not set, so it cannot have been
    /// produced by this crate's `Signature::to_bytes`.
    NotMarkedSchnorrkel,
    /// An error in the length of bytes handed to a constructor.
    BytesLengthError {
        /// Identifies the type returning the error
        name: &'static str,
        /// Describes the type returning the error
        description: &'static str,
        /// Length expected by the constructor in bytes
        length: usize,
    },
}

impl Display for SignatureError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use self::SignatureError::*;
        match *self {
            PointDecompressionError =>
                write!(f, "Cannot decompress Ristretto point"),
            ScalarFormatError =>
                write!(f, "Scalar bytes are not canonical mod l"),
            NotMarkedSchnorrkel =>
                write!(f, "Signature is not marked as an sr25519 signature"),
            BytesLengthError { name, length, .. } =>
                write!(f, "{name} must be {length} bytes in length"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SignatureError {}

/// Errors arising from the transcript/RNG machinery underneath signing,
/// as distinct from malformed input (see [`SignatureError`]).
///
/// Both variants correspond to a failure of the `merlin`/`rand_core`
/// primitives this module is built on, which do not fail in practice;
/// they exist so the public API has somewhere to report it if they ever
/// did, rather than panicking.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ProtocolError {
    /// The underlying transcript's sponge construction failed to absorb
    /// or squeeze data.
    TranscriptFailure,
    /// The supplied RNG returned fewer bytes than were requested.
    InsufficientRandomness,
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use self::ProtocolError::*;
        match *self {
            TranscriptFailure => write!(f, "Transcript operation failed"),
            InsufficientRandomness => write!(f, "RNG returned fewer bytes than requested"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

// ===== Scalar Utilities =====

/// Divide scalar bytes by cofactor (8) for Ed25519 compatibility
pub(crate) fn divide_scalar_bytes_by_cofactor(scalar: &mut [u8; 32]) {
    let mut low = 0u8;
    for i in scalar.iter_mut().rev() {
        let r = *i & 0b00000111; // save remainder
        *i >>= 3; // divide by 8
        *i += low;
        low = r << 5;
    }
}

/// Multiply scalar bytes by cofactor (8) for Ed25519 compatibility
pub(crate) fn multiply_scalar_bytes_by_cofactor(scalar: &mut [u8; 32]) {
    let mut high = 0u8;
    for i in scalar.iter_mut() {
        let r = *i & 0b11100000; // carry bits
        *i <<= 3; // multiply by 8
        *i += high;
        high = r >> 5;
    }
}

// ===== Ristretto Point Utilities =====

/// A `RistrettoBoth` contains both an uncompressed `RistrettoPoint`
/// as well as the corresponding `CompressedRistretto`. This provides
/// a convenient middle ground for protocols that both hash compressed
/// points to derive scalars for use with uncompressed points.
#[derive(Copy, Clone, Default, Eq)]
pub struct RistrettoBoth {
    compressed: CompressedRistretto,
    point: RistrettoPoint,
}


impl ConstantTimeEq for RistrettoBoth {
    fn ct_eq(&self, other: &RistrettoBoth) -> Choice {
        self.compressed.ct_eq(&other.compressed)
    }
}

impl RistrettoBoth {
    /// Access the compressed Ristretto form
    pub fn as_compressed(&self) -> &CompressedRistretto {
        &self.compressed
    }

    /// Access the uncompressed Ristretto form.
    pub(crate) fn as_point(&self) -> &RistrettoPoint {
        &self.point
    }

    /// Decompress into the `RistrettoBoth` format that also retains the compressed form.
    pub fn from_compressed(compressed: CompressedRistretto) -> SignatureResult<RistrettoBoth> {
        Ok(RistrettoBoth {
            point: compressed.decompress().ok_or(SignatureError::PointDecompressionError)?,
            compressed,
        })
    }

    /// Compress into the `RistrettoBoth` format that also retains the uncompressed form.
    pub fn from_point(point: RistrettoPoint) -> RistrettoBoth {
        RistrettoBoth {
            compressed: point.compress(),
            point,
        }
    }

    /// Create from bytes with detailed error information
    #[inline]
    pub fn from_bytes_ser(name: &'static str, description: &'static str, bytes: &[u8]) -> SignatureResult<RistrettoBoth> {
        if bytes.len() != RISTRETTO_POINT_LENGTH {
            return Err(SignatureError::BytesLengthError{
                name, description, length: RISTRETTO_POINT_LENGTH,
            });
        }
        let mut compressed = CompressedRistretto([0u8; RISTRETTO_POINT_LENGTH]);
        compressed.0.copy_from_slice(&bytes[..32]);
        RistrettoBoth::from_compressed(compressed)
    }
}

/// Compare only the compressed forms for efficiency
impl PartialEq<Self> for RistrettoBoth {
    fn eq(&self, other: &Self) -> bool {
        let r = self.compressed.eq(&other.compressed);
        debug_assert_eq!(r, self.point.eq(&other.point));
        r
    }
}

impl PartialOrd<RistrettoBoth> for RistrettoBoth {
    fn partial_cmp(&self, other: &RistrettoBoth) -> Option<::core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RistrettoBoth {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.compressed.0.cmp(&other.compressed.0)
    }
}

impl core::hash::Hash for RistrettoBoth {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.compressed.0.hash(state);
    }
}

// ===== Key Types =====

/// Methods for expanding a `MiniSecretKey` into a `SecretKey`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ExpansionMode {
    /// Expand this `MiniSecretKey` into a `SecretKey` using ed25519-style bit clamping.
    ///
    /// Produces a `SecretKey` whose scalar, multiplied by the cofactor,
    /// is a valid Ed25519 expanded secret key, so the same seed can be
    /// used to derive both an sr25519 and an ed25519 keypair.
    Ed25519,
    /// Expand this `MiniSecretKey` into a `SecretKey` via a Merlin
    /// transcript rather than raw SHA-512 bit clamping.
    ///
    /// Has no Ed25519 compatibility properties, but avoids the
    /// cofactor-division dance above and is preferred when only
    /// sr25519 keys are needed.
    Uniform,
}

/// An EdDSA-like "secret" key seed.
///
/// These are seeds from which we produce a real `SecretKey` by hashing.
/// We require homomorphic properties unavailable from these seeds, so we
/// reserve `SecretKey` for what EdDSA calls an extended secret key.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct MiniSecretKey(pub(crate) [u8; MINI_SECRET_KEY_LENGTH]);

impl Debug for MiniSecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "MiniSecretKey: {:?}", &self.0[..])
    }
}

impl Eq for MiniSecretKey {}
impl PartialEq for MiniSecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).unwrap_u8() == 1u8
    }
}

impl ConstantTimeEq for MiniSecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl MiniSecretKey {
    const DESCRIPTION: &'static str = "Analogous to ed25519 secret key as 32 bytes, see RFC8032.";

    /// Expand this `MiniSecretKey` into a `SecretKey` using ed25519-style bit clamping.
    ///
    /// This method permits compatible schnorrkel and ed25519 keys by using
    /// the same expansion method as Ed25519.
    fn expand_ed25519(&self) -> SecretKey {
        let mut h = Sha512::default();
        h.update(self.as_bytes());
        let r = h.finalize_fixed();

        // Apply Ed25519 bit clamping for compatibility
        let mut key = [0u8; 32];
        key.copy_from_slice(&r.as_slice()[0..32]);
        key[0] &= 248;
        key[31] &= 63;
        key[31] |= 64;
        
        // Divide by cofactor to keep clean representation mod l
        divide_scalar_bytes_by_cofactor(&mut key);

        #[allow(deprecated)] // Scalar's always reduced here, so this is OK.
        let key = Scalar::from_bits(key);

        let mut nonce = [0u8; 32];
        nonce.copy_from_slice(&r.as_slice()[32..64]);

        SecretKey { key, nonce }
    }

    /// Expand this `MiniSecretKey` into a `SecretKey` using a Merlin transcript.
    ///
    /// Unlike [`Self::expand_ed25519`], this has no relationship to any
    /// Ed25519 expanded secret key and only ever produces sr25519 keys.
    fn expand_uniform(&self) -> SecretKey {
        let mut t = Transcript::new(b"ExpandSecretKeys");
        t.commit_bytes(b"mini", self.as_bytes());

        let mut scalar_bytes = [0u8; 64];
        t.challenge_bytes(b"sk", &mut scalar_bytes);
        let key = Scalar::from_bytes_mod_order_wide(&scalar_bytes);

        let mut nonce = [0u8; 32];
        t.challenge_bytes(b"no", &mut nonce);

        SecretKey { key, nonce }
    }

    /// Derive the `SecretKey` corresponding to this `MiniSecretKey`.
    pub fn expand(&self, mode: ExpansionMode) -> SecretKey {
        match mode {
            ExpansionMode::Ed25519 => self.expand_ed25519(),
            ExpansionMode::Uniform => self.expand_uniform(),
        }
    }

    /// Derive the `Keypair` corresponding to this `MiniSecretKey`.
    pub fn expand_to_keypair(&self, mode: ExpansionMode) -> Keypair {
        self.expand(mode).into()
    }

    /// View this secret key as a byte array.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; MINI_SECRET_KEY_LENGTH] {
        &self.0
    }

    /// Construct a `MiniSecretKey` from a slice of bytes.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> SignatureResult<MiniSecretKey> {
        if bytes.len() != MINI_SECRET_KEY_LENGTH {
            return Err(SignatureError::BytesLengthError {
                name: "MiniSecretKey",
                description: MiniSecretKey::DESCRIPTION,
                length: MINI_SECRET_KEY_LENGTH,
            });
        }
        let mut bits: [u8; 32] = [0u8; 32];
        bits.copy_from_slice(&bytes[..32]);
        Ok(MiniSecretKey(bits))
    }
}

/// A secret key for use with Ristretto Schnorr signatures.
///
/// Internally, these consist of a scalar mod l along with a seed for
/// nonce generation. This ensures all scalar arithmetic works smoothly
/// in operations like threshold or multi-signatures.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey {
    /// Actual secret key represented as a scalar.
    pub(crate) key: Scalar,
    /// Seed for deriving the nonces used in signing.
    pub(crate) nonce: [u8; 32],
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SecretKey {{ key: {:?} nonce: {:?} }}", &self.key, &self.nonce)
    }
}

impl Eq for SecretKey {}
impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).unwrap_u8() == 1u8
    }
}

impl ConstantTimeEq for SecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.key.ct_eq(&other.key)
    }
}

impl SecretKey {
    const DESCRIPTION: &'static str = "A Ristretto Schnorr secret key as 64 bytes, the concatenation of the secret scalar and nonce seed";

    /// Convert this `SecretKey` to 64 bytes: the native `scalar ‖
    /// nonce` layout (no cofactor scaling).
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        let mut bytes = [0u8; SECRET_KEY_LENGTH];
        bytes[..32].copy_from_slice(&self.key.to_bytes());
        bytes[32..].copy_from_slice(&self.nonce);
        bytes
    }

    /// Construct a `SecretKey` from 64 bytes in the native `scalar ‖
    /// nonce` layout; inverse of [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> SignatureResult<SecretKey> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(SignatureError::BytesLengthError {
                name: "SecretKey",
                description: SecretKey::DESCRIPTION,
                length: SECRET_KEY_LENGTH,
            });
        }

        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&bytes[..32]);
        let key = Scalar::from_canonical_bytes(key_bytes).ok_or(SignatureError::ScalarFormatError)?;

        let mut nonce = [0u8; 32];
        nonce.copy_from_slice(&bytes[32..64]);

        Ok(SecretKey { key, nonce })
    }

    /// Convert this `SecretKey` into an array of 64 bytes, corresponding to
    /// an Ed25519 expanded secret key.
    #[inline]
    pub fn to_ed25519_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        let mut bytes: [u8; 64] = [0u8; 64];
        let mut key = self.key.to_bytes();
        // Multiply by cofactor for ed25519 compatibility
        multiply_scalar_bytes_by_cofactor(&mut key);
        bytes[..32].copy_from_slice(&key[..]);
        bytes[32..].copy_from_slice(&self.nonce[..]);
        bytes
    }

    /// Construct a `SecretKey` from 64 bytes laid out as `(scalar ×
    /// 8) ‖ nonce`, the Ed25519-compatible expanded-key encoding;
    /// inverse of [`Self::to_ed25519_bytes`].
    pub fn from_ed25519_bytes(bytes: &[u8]) -> SignatureResult<SecretKey> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(SignatureError::BytesLengthError {
                name: "SecretKey",
                description: SecretKey::DESCRIPTION,
                length: SECRET_KEY_LENGTH,
            });
        }

        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&bytes[..32]);
        divide_scalar_bytes_by_cofactor(&mut key_bytes);
        let key = Scalar::from_bits(key_bytes);

        let mut nonce = [0u8; 32];
        nonce.copy_from_slice(&bytes[32..64]);

        Ok(SecretKey { key, nonce })
    }

    /// Derive the `PublicKey` corresponding to this `SecretKey`.
    pub fn to_public(&self) -> PublicKey {
        // No clamping necessary in the ristretto255 group
        PublicKey::from_point(&self.key * &*constants::RISTRETTO_BASEPOINT_TABLE)
    }
}

/// A Ristretto Schnorr public key.
///
/// Internally, these are represented as a `RistrettoPoint`, meaning
/// an Edwards point with a static guarantee to be 2-torsion free.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey(pub(crate) RistrettoBoth);


impl ConstantTimeEq for PublicKey {
    fn ct_eq(&self, other: &PublicKey) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        self.as_compressed().as_bytes()
    }
}

impl PublicKey {
    const DESCRIPTION: &'static str = "A Ristretto Schnorr public key represented as a 32-byte Ristretto compressed point";

    /// Convert this public key to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.as_compressed().to_bytes()
    }

    /// Access the compressed Ristretto form
    pub fn as_compressed(&self) -> &CompressedRistretto { 
        self.0.as_compressed() 
    }

    /// Compress into the `PublicKey` format that also retains the uncompressed form.
    pub fn from_point(point: RistrettoPoint) -> PublicKey {
        PublicKey(RistrettoBoth::from_point(point))
    }

    /// Construct a `PublicKey` from a slice of bytes.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> SignatureResult<PublicKey> {
        Ok(PublicKey(RistrettoBoth::from_bytes_ser("PublicKey", PublicKey::DESCRIPTION, bytes)?))
    }
}

impl From<SecretKey> for PublicKey {
    fn from(source: SecretKey) -> PublicKey {
        source.to_public()
    }
}

/// A Ristretto Schnorr keypair.
#[derive(Clone)]
pub struct Keypair {
    /// The secret half of this keypair.
    pub secret: SecretKey,
    /// The public half of this keypair.
    pub public: PublicKey,
}

impl Zeroize for Keypair {
    fn zeroize(&mut self) {
        self.secret.zeroize();
    }
}

impl Drop for Keypair {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl From<SecretKey> for Keypair {
    fn from(secret: SecretKey) -> Keypair {
        let public = secret.to_public();
        Keypair { secret, public }
    }
}

/// The length of a keypair serialized in the Ed25519-compatible half
/// layout: a 64-byte expanded secret key followed by the 32-byte
/// public key.
pub const HALF_ED25519_KEYPAIR_LENGTH: usize = SECRET_KEY_LENGTH + PUBLIC_KEY_LENGTH;

impl Keypair {
    const DESCRIPTION: &'static str =
        "A Ristretto Schnorr keypair as 96 bytes, an Ed25519-compatible expanded secret key followed by the public key";

    /// Serialize as `(scalar × 8) ‖ nonce ‖ public`, the layout used
    /// by tools expecting an Ed25519 expanded keypair.
    pub fn to_half_ed25519_bytes(&self) -> [u8; HALF_ED25519_KEYPAIR_LENGTH] {
        let mut bytes = [0u8; HALF_ED25519_KEYPAIR_LENGTH];
        bytes[..SECRET_KEY_LENGTH].copy_from_slice(&self.secret.to_ed25519_bytes());
        bytes[SECRET_KEY_LENGTH..].copy_from_slice(&self.public.to_bytes());
        bytes
    }

    /// Inverse of [`Self::to_half_ed25519_bytes`]: the secret half is
    /// divided back by the cofactor, and the public key is decoded
    /// independently rather than recomputed.
    pub fn from_half_ed25519_bytes(bytes: &[u8]) -> SignatureResult<Keypair> {
        if bytes.len() != HALF_ED25519_KEYPAIR_LENGTH {
            return Err(SignatureError::BytesLengthError {
                name: "Keypair",
                description: Keypair::DESCRIPTION,
                length: HALF_ED25519_KEYPAIR_LENGTH,
            });
        }

        let secret = SecretKey::from_ed25519_bytes(&bytes[..SECRET_KEY_LENGTH])?;
        let public = PublicKey::from_bytes(&bytes[SECRET_KEY_LENGTH..])?;

        Ok(Keypair { secret, public })
    }
}

// ===== Signature Encoding =====

/// The length of a Ristretto Schnorr `Signature`, in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// A Ristretto Schnorr signature, consisting of a commitment point `R`
/// and a response scalar `s`.
#[derive(Copy, Clone)]
#[allow(non_snake_case)]
pub struct Signature {
    pub(crate) R: CompressedRistretto,
    pub(crate) s: Scalar,
}

impl Signature {
    const DESCRIPTION: &'static str = "A Ristretto Schnorr signature as 64 bytes, as specified in RFC8032";

    /// Encode this signature as 64 bytes, `R` followed by `s`, with the
    /// high bit of the last byte set as a marker that this is an
    /// sr25519 signature rather than some other 64-byte blob.
    ///
    /// `s` is always less than `l < 2^253`, so this bit is otherwise unused.
    #[allow(non_snake_case)]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(self.R.as_bytes());
        bytes[32..].copy_from_slice(&self.s.to_bytes());
        bytes[63] |= 0b1000_0000;
        bytes
    }

    /// Decode a signature from 64 bytes, reversing [`Self::to_bytes`].
    ///
    /// Rejects any input whose marker bit is not set, and any `s` whose
    /// remaining bits do not encode a canonical scalar mod `l`.
    #[allow(non_snake_case)]
    pub fn from_bytes(bytes: &[u8]) -> SignatureResult<Signature> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(SignatureError::BytesLengthError {
                name: "Signature",
                description: Signature::DESCRIPTION,
                length: SIGNATURE_LENGTH,
            });
        }
        if bytes[63] & 0b1000_0000 == 0 {
            return Err(SignatureError::NotMarkedSchnorrkel);
        }

        let mut r_bytes = [0u8; 32];
        r_bytes.copy_from_slice(&bytes[..32]);
        let R = CompressedRistretto(r_bytes);

        let mut s_bytes = [0u8; 32];
        s_bytes.copy_from_slice(&bytes[32..64]);
        s_bytes[31] &= 0b0111_1111;
        let s = Scalar::from_canonical_bytes(s_bytes).ok_or(SignatureError::ScalarFormatError)?;

        Ok(Signature { R, s })
    }
}

// ===== Signing and Verification =====

/// Absorb the data common to both signing and verification: the
/// message, a protocol name, and the signer's public key.
fn bind_message(t: &mut Transcript, message: &[u8], public: &PublicKey) {
    t.commit_bytes(b"sign-bytes", message);
    t.commit_bytes(b"proto-name", b"Schnorr-sig");
    t.commit_point(b"sign:pk", public.as_compressed());
}

impl Keypair {
    /// Sign `message` under application domain `context`, drawing
    /// nonce entropy from both `rng` and this key's nonce seed.
    pub fn sign<R: RngCore + CryptoRng>(&self, context: &[u8], message: &[u8], rng: &mut R) -> Signature {
        self.sign_with_transcript(signing_context(context), message, rng)
    }

    /// As [`Self::sign`], but using the pre-0.8.5 signing-context
    /// construction, for producing signatures interoperable with that
    /// era of schnorrkel.
    #[cfg(feature = "legacy_compatibility")]
    pub fn sign_legacy<R: RngCore + CryptoRng>(&self, context: &[u8], message: &[u8], rng: &mut R) -> Signature {
        self.sign_with_transcript(signing_context_legacy(context), message, rng)
    }

    fn sign_with_transcript<R: RngCore + CryptoRng>(
        &self,
        t0: Transcript,
        message: &[u8],
        rng: &mut R,
    ) -> Signature {
        let mut t = t0;
        bind_message(&mut t, message, &self.public);

        let r = t.witness_scalar(b"signing", &[&self.secret.nonce[..]], rng);
        #[allow(non_snake_case)]
        let R = (&r * &*constants::RISTRETTO_BASEPOINT_TABLE).compress();
        t.commit_point(b"sign:R", &R);

        let k = t.challenge_scalar(b"sign:c");
        let s = &(&k * &self.secret.key) + &r;

        Signature { R, s }
    }

    /// Verify a signature over `message` under application domain `context`.
    pub fn verify(&self, context: &[u8], message: &[u8], signature: &Signature) -> bool {
        self.public.verify(context, message, signature)
    }
}

impl PublicKey {
    /// Verify a signature over `message` under application domain `context`.
    pub fn verify(&self, context: &[u8], message: &[u8], signature: &Signature) -> bool {
        let mut t = signing_context(context);
        bind_message(&mut t, message, self);
        t.commit_point(b"sign:R", &signature.R);

        let k = t.challenge_scalar(b"sign:c");
        let neg_a = -self.0.as_point();

        #[allow(non_snake_case)]
        let X = EdwardsPoint::vartime_double_scalar_mul_basepoint(&k, &neg_a.0, &signature.s);
        RistrettoPoint(X).compress() == signature.R
    }

    /// As [`Self::verify`], checking against a legacy-construction signing context.
    #[cfg(feature = "legacy_compatibility")]
    pub fn verify_legacy(&self, context: &[u8], message: &[u8], signature: &Signature) -> bool {
        let mut t = signing_context_legacy(context);
        bind_message(&mut t, message, self);
        t.commit_point(b"sign:R", &signature.R);

        let k = t.challenge_scalar(b"sign:c");
        let neg_a = -self.0.as_point();

        #[allow(non_snake_case)]
        let X = EdwardsPoint::vartime_double_scalar_mul_basepoint(&k, &neg_a.0, &signature.s);
        RistrettoPoint(X).compress() == signature.R
    }
}

// ===== Hierarchical Deterministic Key Derivation =====

/// The length of a HDKD chain code, in bytes.
pub const CHAIN_CODE_LENGTH: usize = 32;

/// An opaque 32-byte chain code, mixed into hierarchical key derivation
/// alongside the parent key, following the same `(key, chain code) ->
/// (child key, child chain code)` shape as BIP32.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, Zeroize)]
pub struct ChainCode(pub [u8; CHAIN_CODE_LENGTH]);

/// Build the transcript shared by soft derivation: bind the chain code
/// and the parent's public key so that sibling derivations under
/// different chain codes, or from different parents, can never
/// collide.
fn soft_hdkd_transcript(chain_code: &ChainCode, public: &PublicKey) -> Transcript {
    let mut t = Transcript::new(b"SchnorrRistrettoHDKD");
    t.commit_bytes(b"sign-bytes", b"");
    t.commit_bytes(b"chain-code", &chain_code.0);
    t.commit_point(b"public-key", public.as_compressed());
    t
}

impl SecretKey {
    /// Derive a soft (non-hardened) child `SecretKey`.
    ///
    /// Soft derivation is homomorphic: the child public key can also be
    /// computed from just the parent `PublicKey` and the same chain
    /// code, via [`PublicKey::derive_soft`], without ever touching the
    /// parent's secret scalar. `rng` only ever feeds the child's nonce,
    /// never the child scalar, so the homomorphism holds regardless of
    /// what it produces.
    pub fn derive_soft<R: RngCore + CryptoRng>(
        &self,
        chain_code: &ChainCode,
        public: &PublicKey,
        rng: &mut R,
    ) -> (SecretKey, ChainCode) {
        let mut t = soft_hdkd_transcript(chain_code, public);

        let delta = t.challenge_scalar(b"HDKD-scalar");

        let mut new_chain_code = ChainCode::default();
        t.challenge_bytes(b"HDKD-chaincode", &mut new_chain_code.0);

        let mut nonce = [0u8; 32];
        t.witness_bytes(b"HDKD-nonce", &mut nonce, &[&self.nonce[..], &self.key.as_bytes()[..]], rng);

        let key = &self.key + &delta;
        (SecretKey { key, nonce }, new_chain_code)
    }

    /// Derive a hard (hardened) child `SecretKey`.
    ///
    /// Unlike soft derivation, the child key here is an independent
    /// `MiniSecretKey` expanded Ed25519-style, with no algebraic
    /// relationship to the parent: there is no public-only equivalent,
    /// and recovering the parent key from a hard-derived child is
    /// infeasible even knowing the chain code. Purely a function of the
    /// parent scalar and the chain code, so no RNG is involved.
    pub fn derive_hard(&self, chain_code: &ChainCode) -> (SecretKey, ChainCode) {
        let mut t = Transcript::new(b"SchnorrRistrettoHDKD");
        t.commit_bytes(b"sign-bytes", b"");
        t.commit_bytes(b"chain-code", &chain_code.0);
        t.commit_bytes(b"secret-key", self.key.as_bytes());

        let mut mini = [0u8; MINI_SECRET_KEY_LENGTH];
        t.challenge_bytes(b"HDKD-hard", &mut mini);

        let mut new_chain_code = ChainCode::default();
        t.challenge_bytes(b"HDKD-chaincode", &mut new_chain_code.0);

        let secret = MiniSecretKey(mini).expand(ExpansionMode::Ed25519);
        (secret, new_chain_code)
    }
}

impl PublicKey {
    /// Derive the public half of [`SecretKey::derive_soft`]'s child key,
    /// given only this parent public key and the same chain code.
    ///
    /// Soft derivation's homomorphism means `derive_soft(pk) ==
    /// to_public(derive_soft(sk).0)` for the matching `(sk, pk)` pair.
    pub fn derive_soft(&self, chain_code: &ChainCode) -> (PublicKey, ChainCode) {
        let mut t = soft_hdkd_transcript(chain_code, self);

        let delta = t.challenge_scalar(b"HDKD-scalar");

        let mut new_chain_code = ChainCode::default();
        t.challenge_bytes(b"HDKD-chaincode", &mut new_chain_code.0);

        let point = self.0.as_point() + &(&delta * &*constants::RISTRETTO_BASEPOINT_TABLE);
        (PublicKey::from_point(point), new_chain_code)
    }
}

impl Keypair {
    /// Derive a soft child `Keypair`.
    ///
    /// `self.secret.derive_soft(cc).0.to_public() ==
    /// self.public.derive_soft(cc).0` always holds; see
    /// [`PublicKey::derive_soft`].
    pub fn derive_soft<R: RngCore + CryptoRng>(&self, chain_code: &ChainCode, rng: &mut R) -> (Keypair, ChainCode) {
        let (secret, cc) = self.secret.derive_soft(chain_code, &self.public, rng);
        let public = secret.to_public();
        (Keypair { secret, public }, cc)
    }

    /// Derive a hard child `Keypair`.
    pub fn derive_hard(&self, chain_code: &ChainCode) -> (Keypair, ChainCode) {
        let (secret, cc) = self.secret.derive_hard(chain_code);
        let public = secret.to_public();
        (Keypair { secret, public }, cc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rng::ChaCha20Rng;

    fn keypair_from_seed(seed: [u8; 32]) -> Keypair {
        MiniSecretKey::from_bytes(&seed)
            .unwrap()
            .expand_to_keypair(ExpansionMode::Ed25519)
    }

    // S2: expand_to_keypair agrees with expand(..).to_public() for the all-zero seed.
    #[test]
    fn key_expansion_is_consistent_with_separate_expand_and_to_public() {
        let mini = MiniSecretKey::from_bytes(&[0u8; 32]).unwrap();
        let via_keypair = mini.expand_to_keypair(ExpansionMode::Ed25519).public;
        let via_separate = mini.expand(ExpansionMode::Ed25519).to_public();
        assert_eq!(via_keypair.to_bytes(), via_separate.to_bytes());
    }

    #[test]
    fn uniform_expansion_differs_from_ed25519_expansion() {
        let mini = MiniSecretKey::from_bytes(&[3u8; 32]).unwrap();
        let a = mini.expand(ExpansionMode::Ed25519);
        let b = mini.expand(ExpansionMode::Uniform);
        assert_ne!(a.key.to_bytes(), b.key.to_bytes());
    }

    // S4: sign/verify round trip, with bit-flip negative cases.
    #[test]
    fn sign_then_verify_round_trips() {
        let keypair = keypair_from_seed([9u8; 32]);
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        let message = b"hello";

        let signature = keypair.sign(b"substrate", message, &mut rng);
        assert!(keypair.public.verify(b"substrate", message, &signature));
    }

    #[test]
    fn verify_rejects_flipped_message() {
        let keypair = keypair_from_seed([9u8; 32]);
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        let signature = keypair.sign(b"substrate", b"hello", &mut rng);
        assert!(!keypair.public.verify(b"substrate", b"jello", &signature));
    }

    #[test]
    fn verify_rejects_flipped_signature_bytes() {
        let keypair = keypair_from_seed([9u8; 32]);
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        let message = b"hello";
        let signature = keypair.sign(b"substrate", message, &mut rng);

        let mut bytes = signature.to_bytes();
        bytes[0] ^= 1;
        let tampered = Signature::from_bytes(&bytes).unwrap();
        assert!(!keypair.public.verify(b"substrate", message, &tampered));

        let mut bytes = signature.to_bytes();
        bytes[40] ^= 1;
        let tampered = Signature::from_bytes(&bytes).unwrap();
        assert!(!keypair.public.verify(b"substrate", message, &tampered));
    }

    #[test]
    fn verify_rejects_wrong_context() {
        let keypair = keypair_from_seed([9u8; 32]);
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        let signature = keypair.sign(b"substrate", b"hello", &mut rng);
        assert!(!keypair.public.verify(b"other-chain", b"hello", &signature));
    }

    // S5: marker bit enforcement.
    #[test]
    fn signature_decode_rejects_missing_marker_bit() {
        let keypair = keypair_from_seed([9u8; 32]);
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        let signature = keypair.sign(b"substrate", b"hello", &mut rng);

        let mut bytes = signature.to_bytes();
        assert_eq!(bytes[63] & 0x80, 0x80);
        bytes[63] &= 0x7f;

        assert_eq!(Signature::from_bytes(&bytes).unwrap_err(), SignatureError::NotMarkedSchnorrkel);
    }

    #[test]
    fn signature_decode_rejects_wrong_length() {
        let err = Signature::from_bytes(&[0u8; 63]).unwrap_err();
        assert!(matches!(err, SignatureError::BytesLengthError { length: 64, .. }));
    }

    #[test]
    fn to_ed25519_bytes_round_trips_through_cofactor_scaling() {
        let keypair = keypair_from_seed([5u8; 32]);
        let ed_bytes = keypair.secret.to_ed25519_bytes();

        let mut scalar_bytes = [0u8; 32];
        scalar_bytes.copy_from_slice(&ed_bytes[..32]);
        divide_scalar_bytes_by_cofactor(&mut scalar_bytes);

        assert_eq!(scalar_bytes, keypair.secret.key.to_bytes());
    }

    // S3: half-Ed25519 96-byte keypair round trip, against a fixed fixture.
    #[test]
    fn half_ed25519_keypair_round_trips() {
        #[rustfmt::skip]
        let kp_bytes: [u8; HALF_ED25519_KEYPAIR_LENGTH] = [
            0x28, 0xb0, 0xae, 0x22, 0x1c, 0x6b, 0xb0, 0x68, 0x56, 0xb2, 0x87, 0xf6, 0x0d, 0x7e,
            0xa0, 0xd9, 0x85, 0x52, 0xea, 0x5a, 0x16, 0xdb, 0x16, 0x95, 0x68, 0x49, 0xaa, 0x37,
            0x1d, 0xb3, 0xeb, 0x51, 0xfd, 0x19, 0x0c, 0xce, 0x74, 0xdf, 0x35, 0x64, 0x32, 0xb4,
            0x10, 0xbd, 0x64, 0x68, 0x23, 0x09, 0xd6, 0xde, 0xdb, 0x27, 0xc7, 0x68, 0x45, 0xda,
            0xf3, 0x88, 0x55, 0x7c, 0xba, 0xc3, 0xca, 0x34, 0x46, 0xeb, 0xdd, 0xef, 0x8c, 0xd9,
            0xbb, 0x16, 0x7d, 0xc3, 0x08, 0x78, 0xd7, 0x11, 0x3b, 0x7e, 0x16, 0x8e, 0x6f, 0x06,
            0x46, 0xbe, 0xff, 0xd7, 0x7d, 0x69, 0xd3, 0x9b, 0xad, 0x76, 0xb4, 0x7a,
        ];

        let keypair = Keypair::from_half_ed25519_bytes(&kp_bytes).unwrap();
        assert_eq!(keypair.to_half_ed25519_bytes(), kp_bytes);
    }

    #[test]
    fn secret_key_native_bytes_round_trip() {
        let keypair = keypair_from_seed([13u8; 32]);
        let bytes = keypair.secret.to_bytes();
        let decoded = SecretKey::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.key.to_bytes(), keypair.secret.key.to_bytes());
        assert_eq!(decoded.nonce, keypair.secret.nonce);
    }

    #[test]
    fn secret_key_ed25519_bytes_round_trip() {
        let keypair = keypair_from_seed([14u8; 32]);
        let bytes = keypair.secret.to_ed25519_bytes();
        let decoded = SecretKey::from_ed25519_bytes(&bytes).unwrap();
        assert_eq!(decoded.key.to_bytes(), keypair.secret.key.to_bytes());
        assert_eq!(decoded.nonce, keypair.secret.nonce);
    }

    // Property 10: soft derivation homomorphism.
    #[test]
    fn soft_derivation_is_homomorphic() {
        let keypair = keypair_from_seed([11u8; 32]);
        let chain_code = ChainCode([2u8; 32]);
        let mut rng = ChaCha20Rng::from_seed([4u8; 32]);

        let (child_keypair, cc1) = keypair.derive_soft(&chain_code, &mut rng);
        let (child_public, cc2) = keypair.public.derive_soft(&chain_code);

        assert_eq!(cc1.0, cc2.0);
        assert_eq!(child_keypair.public.to_bytes(), child_public.to_bytes());
    }

    #[test]
    fn soft_derivation_changes_the_key() {
        let keypair = keypair_from_seed([11u8; 32]);
        let chain_code = ChainCode([6u8; 32]);
        let mut rng = ChaCha20Rng::from_seed([4u8; 32]);

        let (child, _) = keypair.derive_soft(&chain_code, &mut rng);
        assert_ne!(child.public.to_bytes(), keypair.public.to_bytes());

        let child_signature = child.sign(b"substrate", b"hello", &mut rng);
        assert!(!keypair.public.verify(b"substrate", b"hello", &child_signature));
        assert!(child.public.verify(b"substrate", b"hello", &child_signature));
    }

    #[test]
    fn hard_derivation_is_deterministic_and_unrelated_to_soft() {
        let keypair = keypair_from_seed([11u8; 32]);
        let chain_code = ChainCode([6u8; 32]);

        let (hard_a, cc_a) = keypair.derive_hard(&chain_code);
        let (hard_b, cc_b) = keypair.derive_hard(&chain_code);
        assert_eq!(hard_a.public.to_bytes(), hard_b.public.to_bytes());
        assert_eq!(cc_a.0, cc_b.0);

        let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
        let (soft, _) = keypair.derive_soft(&chain_code, &mut rng);
        assert_ne!(hard_a.public.to_bytes(), soft.public.to_bytes());
    }

    #[cfg(feature = "legacy_compatibility")]
    #[test]
    fn legacy_signing_context_is_not_interoperable_with_modern() {
        let keypair = keypair_from_seed([9u8; 32]);
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        let message = b"hello";

        let modern = keypair.sign(b"substrate", message, &mut rng);
        assert!(!keypair.public.verify_legacy(b"substrate", message, &modern));

        let legacy = keypair.sign_legacy(b"substrate", message, &mut rng);
        assert!(keypair.public.verify_legacy(b"substrate", message, &legacy));
        assert!(!keypair.public.verify(b"substrate", message, &legacy));
    }
}

