//! Digital signature traits for meds
//!
//! This module defines the traits that every MEDS parameter set implements.
//! The design prioritizes security by not requiring mutable access to secret keys.

use crate::Result;
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

/// Core trait for digital signature algorithms
///
/// Secret keys are opaque types that cannot be directly manipulated as bytes.
/// Use [`SignatureSerialize`] to move keys in and out of storage.
pub trait Signature {
    /// Public key type for this algorithm
    type PublicKey: Clone;

    /// Secret key type - must be zeroizable but not byte-accessible
    type SecretKey: Zeroize + Clone;

    /// Signature data type
    type SignatureData: Clone;

    /// Key pair type (typically a tuple of public and secret keys)
    type KeyPair;

    /// Returns the name of this signature algorithm
    fn name() -> &'static str;

    /// Generate a new key pair using the provided RNG
    ///
    /// # Security Requirements
    ///
    /// Implementations must use the provided cryptographically secure RNG
    /// for all random number generation.
    fn keypair<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Self::KeyPair>;

    /// Extract the public key from a key pair
    fn public_key(keypair: &Self::KeyPair) -> Self::PublicKey;

    /// Extract the secret key from a key pair
    fn secret_key(keypair: &Self::KeyPair) -> Self::SecretKey;

    /// Sign a message with the given secret key
    fn sign(message: &[u8], secret_key: &Self::SecretKey) -> Result<Self::SignatureData>;

    /// Verify a signature against a message and public key
    ///
    /// Returns `Err(Error::InvalidSignature { .. })` when the signature does
    /// not verify, and a length or parameter error when the inputs are
    /// malformed.
    fn verify(
        message: &[u8],
        signature: &Self::SignatureData,
        public_key: &Self::PublicKey,
    ) -> Result<()>;
}

/// Signature algorithms whose keys and signatures have a fixed byte layout
pub trait SignatureSerialize: Signature {
    /// Size of serialized public keys in bytes
    const PUBLIC_KEY_SIZE: usize;

    /// Size of serialized secret keys in bytes
    const SECRET_KEY_SIZE: usize;

    /// Size of serialized signatures in bytes
    const SIGNATURE_SIZE: usize;

    /// Export a public key to bytes
    fn serialize_public_key(key: &Self::PublicKey) -> Vec<u8>;

    /// Import a public key from bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes have the wrong length
    fn deserialize_public_key(bytes: &[u8]) -> Result<Self::PublicKey>;

    /// Export a secret key to bytes
    ///
    /// # Security Warning
    ///
    /// The returned bytes contain sensitive key material. The `Zeroizing`
    /// wrapper clears them from memory when dropped.
    fn serialize_secret_key(key: &Self::SecretKey) -> Zeroizing<Vec<u8>>;

    /// Import a secret key from bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes have the wrong length
    fn deserialize_secret_key(bytes: &[u8]) -> Result<Self::SecretKey>;

    /// Export a signature to bytes
    fn serialize_signature(sig: &Self::SignatureData) -> Vec<u8>;

    /// Import a signature from bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes have the wrong length
    fn deserialize_signature(bytes: &[u8]) -> Result<Self::SignatureData>;
}

/// Signature algorithms that can produce a signed message (signature followed
/// by the message) and recover the message from it.
pub trait SignatureAttached: Signature {
    /// Sign `message` and return `signature || message`
    fn sign_attached(message: &[u8], secret_key: &Self::SecretKey) -> Result<Vec<u8>>;

    /// Verify a signed message and return the message it carries
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSignature` if the signature does not verify and
    /// a length error if `signed_message` is shorter than a signature.
    fn open(signed_message: &[u8], public_key: &Self::PublicKey) -> Result<Vec<u8>>;
}
