//! MEDS: Matrix Equivalence Digital Signature
//!
//! A Fiat-Shamir signature whose hardness rests on the matrix code
//! equivalence problem over GF(q). The typed API is [`Meds<P>`] with one
//! alias per parameter set; the free functions at the bottom of this module
//! take a [`ParameterSet`] chosen at runtime instead.
//!
//! Submodules:
//! - `expand`: seed expansion into field elements and matrices, challenge parsing
//! - `generator`: the `Pi` map and the generator matrix codec
//! - `solve`: recovery of the secret transform during key generation
//! - `seed_tree`: derivation and partial disclosure of per-round seeds
//! - `encoding`: key and signature byte layouts
//! - `sign`: `keypair_internal`, `sign_internal` and `verify_internal`

use api::{Result as ApiResult, Signature as SignatureTrait, SignatureAttached, SignatureSerialize};
use core::marker::PhantomData;
use params::pqc::meds::{
    Meds134180Params, Meds13220Params, Meds167717Params, Meds41711Params, Meds69497Params,
    Meds9923Params, MedsParams, ParameterSet,
};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Error, Result};

pub mod expand;
pub mod generator;
pub mod seed_tree;
pub mod solve;

mod encoding;
mod sign;

pub use seed_tree::SeedTree;

/// MEDS public key: `sigma_G0 || CompressG(G_1) || ...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MedsPublicKey(pub(crate) Vec<u8>);

/// MEDS secret key
///
/// Holds the key generation seed, the public seed and the inverted secret
/// transforms. Cleared on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MedsSecretKey(pub(crate) Vec<u8>);

impl core::fmt::Debug for MedsSecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "MedsSecretKey([REDACTED; {}])", self.0.len())
    }
}

/// Detached MEDS signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MedsSignatureData(pub(crate) Vec<u8>);

impl AsRef<[u8]> for MedsPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
impl AsRef<[u8]> for MedsSecretKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
impl AsRef<[u8]> for MedsSignatureData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// MEDS instantiated with the compile-time parameter set `P`.
pub struct Meds<P: MedsParams> {
    _params: PhantomData<P>,
}

impl<P: MedsParams> SignatureTrait for Meds<P> {
    type PublicKey = MedsPublicKey;
    type SecretKey = MedsSecretKey;
    type SignatureData = MedsSignatureData;
    type KeyPair = (Self::PublicKey, Self::SecretKey);

    fn name() -> &'static str {
        P::NAME
    }

    fn keypair<R: CryptoRng + RngCore>(rng: &mut R) -> ApiResult<Self::KeyPair> {
        let (pk, sk) = sign::keypair_internal(&P::PARAMS, rng)?;
        Ok((MedsPublicKey(pk), MedsSecretKey(sk.to_vec())))
    }

    fn public_key(keypair: &Self::KeyPair) -> Self::PublicKey {
        keypair.0.clone()
    }

    fn secret_key(keypair: &Self::KeyPair) -> Self::SecretKey {
        keypair.1.clone()
    }

    fn sign(message: &[u8], secret_key: &Self::SecretKey) -> ApiResult<Self::SignatureData> {
        // Signing is randomized: the tree seed and the salt come from fresh randomness
        let mut rng = rand::rngs::OsRng;
        let sig = sign::sign_internal(&P::PARAMS, message, &secret_key.0, &mut rng)?;
        Ok(MedsSignatureData(sig))
    }

    fn verify(
        message: &[u8],
        signature: &Self::SignatureData,
        public_key: &Self::PublicKey,
    ) -> ApiResult<()> {
        sign::verify_internal(&P::PARAMS, message, &signature.0, &public_key.0)?;
        Ok(())
    }
}

impl<P: MedsParams> SignatureSerialize for Meds<P> {
    const PUBLIC_KEY_SIZE: usize = P::PUBLIC_KEY_BYTES;
    const SECRET_KEY_SIZE: usize = P::SECRET_KEY_BYTES;
    const SIGNATURE_SIZE: usize = P::SIGNATURE_SIZE;

    fn serialize_public_key(key: &Self::PublicKey) -> Vec<u8> {
        key.0.clone()
    }

    fn deserialize_public_key(bytes: &[u8]) -> ApiResult<Self::PublicKey> {
        check_size(bytes, Self::PUBLIC_KEY_SIZE, "MEDS public key")?;
        Ok(MedsPublicKey(bytes.to_vec()))
    }

    fn serialize_secret_key(key: &Self::SecretKey) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(key.0.clone())
    }

    fn deserialize_secret_key(bytes: &[u8]) -> ApiResult<Self::SecretKey> {
        check_size(bytes, Self::SECRET_KEY_SIZE, "MEDS secret key")?;
        Ok(MedsSecretKey(bytes.to_vec()))
    }

    fn serialize_signature(sig: &Self::SignatureData) -> Vec<u8> {
        sig.0.clone()
    }

    fn deserialize_signature(bytes: &[u8]) -> ApiResult<Self::SignatureData> {
        check_size(bytes, Self::SIGNATURE_SIZE, "MEDS signature")?;
        Ok(MedsSignatureData(bytes.to_vec()))
    }
}

impl<P: MedsParams> SignatureAttached for Meds<P> {
    fn sign_attached(message: &[u8], secret_key: &Self::SecretKey) -> ApiResult<Vec<u8>> {
        let mut rng = rand::rngs::OsRng;
        Ok(sign_attached(&P::PARAMS, message, &secret_key.0, &mut rng)?)
    }

    fn open(signed_message: &[u8], public_key: &Self::PublicKey) -> ApiResult<Vec<u8>> {
        Ok(open(&P::PARAMS, signed_message, &public_key.0)?)
    }
}

fn check_size(bytes: &[u8], expected: usize, context: &'static str) -> ApiResult<()> {
    if bytes.len() != expected {
        return Err(api::Error::InvalidLength {
            context,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

/// MEDS-9923 (NIST level I)
pub type Meds9923 = Meds<Meds9923Params>;
/// MEDS-13220 (NIST level I)
pub type Meds13220 = Meds<Meds13220Params>;
/// MEDS-41711 (NIST level III)
pub type Meds41711 = Meds<Meds41711Params>;
/// MEDS-69497 (NIST level III)
pub type Meds69497 = Meds<Meds69497Params>;
/// MEDS-134180 (NIST level V)
pub type Meds134180 = Meds<Meds134180Params>;
/// MEDS-167717 (NIST level V)
pub type Meds167717 = Meds<Meds167717Params>;

/// Generates a key pair for a parameter set chosen at runtime.
///
/// Returns `(pk, sk)` as byte strings of exactly
/// `params.public_key_bytes()` and `params.secret_key_bytes()` bytes.
pub fn keypair<R: RngCore + CryptoRng>(
    params: &ParameterSet,
    rng: &mut R,
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)> {
    sign::keypair_internal(params, rng)
}

/// Signs `message`, returning a detached signature of
/// `params.signature_bytes()` bytes.
pub fn sign<R: RngCore + CryptoRng>(
    params: &ParameterSet,
    message: &[u8],
    sk: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    sign::sign_internal(params, message, sk, rng)
}

/// Verifies a detached signature.
pub fn verify(params: &ParameterSet, message: &[u8], sig: &[u8], pk: &[u8]) -> Result<()> {
    sign::verify_internal(params, message, sig, pk)
}

/// Signs `message` and returns `signature || message`.
pub fn sign_attached<R: RngCore + CryptoRng>(
    params: &ParameterSet,
    message: &[u8],
    sk: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let mut signed = sign::sign_internal(params, message, sk, rng)?;
    signed.extend_from_slice(message);
    Ok(signed)
}

/// Verifies `signature || message` and returns the message.
pub fn open(params: &ParameterSet, signed_message: &[u8], pk: &[u8]) -> Result<Vec<u8>> {
    let sig_len = params.signature_bytes();
    if signed_message.len() < sig_len {
        return Err(Error::InvalidSignatureSize {
            expected: sig_len,
            actual: signed_message.len(),
        });
    }
    let (sig, message) = signed_message.split_at(sig_len);
    sign::verify_internal(params, message, sig, pk)?;
    Ok(message.to_vec())
}
