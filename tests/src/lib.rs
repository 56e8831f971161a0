//! Shared helpers for the meds integration tests

use meds_api::{Signature, SignatureAttached, SignatureSerialize};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// The message used throughout the test suite
pub const MESSAGE: &[u8] = b"This is my message";

/// Deterministic RNG for reproducible keys
pub fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// Returns a copy of `bytes` with one bit of byte `pos` flipped.
pub fn flip(bytes: &[u8], pos: usize) -> Vec<u8> {
    let mut out = bytes.to_vec();
    out[pos] ^= 0x01;
    out
}

/// Key generation, signing, verification, serialization and the attached
/// form for one scheme, panicking on the first failure.
pub fn exercise_scheme<S>(seed: u64)
where
    S: Signature + SignatureSerialize + SignatureAttached,
{
    let mut rng = rng(seed);
    let keypair = S::keypair(&mut rng).expect("key generation");
    let pk = S::public_key(&keypair);
    let sk = S::secret_key(&keypair);

    let pk_bytes = S::serialize_public_key(&pk);
    let sk_bytes = S::serialize_secret_key(&sk);
    assert_eq!(pk_bytes.len(), S::PUBLIC_KEY_SIZE, "{} public key", S::name());
    assert_eq!(sk_bytes.len(), S::SECRET_KEY_SIZE, "{} secret key", S::name());

    let sig = S::sign(MESSAGE, &sk).expect("signing");
    let sig_bytes = S::serialize_signature(&sig);
    assert_eq!(sig_bytes.len(), S::SIGNATURE_SIZE, "{} signature", S::name());

    // Everything survives a trip through bytes
    let pk2 = S::deserialize_public_key(&pk_bytes).expect("public key bytes");
    let sig2 = S::deserialize_signature(&sig_bytes).expect("signature bytes");
    S::verify(MESSAGE, &sig2, &pk2).expect("valid signature rejected");

    let sk2 = S::deserialize_secret_key(&sk_bytes).expect("secret key bytes");
    let sig3 = S::sign(MESSAGE, &sk2).expect("signing with restored key");
    S::verify(MESSAGE, &sig3, &pk).expect("signature from restored key rejected");

    assert!(S::verify(b"This is my massage", &sig, &pk).is_err());

    let signed = S::sign_attached(MESSAGE, &sk).expect("attached signing");
    assert_eq!(signed.len(), S::SIGNATURE_SIZE + MESSAGE.len());
    assert_eq!(S::open(&signed, &pk).expect("open"), MESSAGE);
}
