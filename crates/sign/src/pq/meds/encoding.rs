//! Byte layout of MEDS keys and signatures
//!
//! ```text
//! pk  = sigma_G0 || CompressG(G_1) || ... || CompressG(G_{s-1})
//! sk  = delta || sigma_G0 || A_1^-1 .. A_{s-1}^-1 || B_1^-1 .. B_{s-1}^-1
//! sig = (mu_i || nu_i for every round with h_i > 0) || path || d || alpha
//! ```
//!
//! Matrices use the 2-byte big-endian element codec.

use algorithms::Matrix;
use params::pqc::meds::ParameterSet;
use zeroize::Zeroizing;

use super::generator::{compress_g, decompress_g};
use crate::error::{Error, Result};

/// Parsed secret key.
pub(crate) struct SecretKeyParts<'a> {
    pub sigma_g0: &'a [u8],
    pub a_inv: Vec<Matrix>,
    pub b_inv: Vec<Matrix>,
}

/// Parsed public key.
pub(crate) struct PublicKeyParts<'a> {
    pub sigma_g0: &'a [u8],
    pub generators: Vec<Matrix>,
}

/// Borrowed views into a detached signature.
pub(crate) struct SignatureParts<'a> {
    pub responses: &'a [u8],
    pub path: &'a [u8],
    pub digest: &'a [u8],
    pub salt: &'a [u8],
}

pub(crate) fn pack_public_key(
    p: &ParameterSet,
    sigma_g0: &[u8],
    generators: &[Matrix],
) -> Result<Vec<u8>> {
    let mut pk = Vec::with_capacity(p.public_key_bytes());
    pk.extend_from_slice(sigma_g0);
    for g in generators {
        pk.extend_from_slice(&compress_g(g, p)?);
    }
    check_len(&pk, p.public_key_bytes())?;
    Ok(pk)
}

pub(crate) fn unpack_public_key<'a>(p: &ParameterSet, pk: &'a [u8]) -> Result<PublicKeyParts<'a>> {
    if pk.len() != p.public_key_bytes() {
        return Err(Error::InvalidKeySize {
            expected: p.public_key_bytes(),
            actual: pk.len(),
        });
    }
    let (sigma_g0, rest) = pk.split_at(p.l_pub_seed);
    let generators = rest
        .chunks_exact(p.l_g_i())
        .map(|chunk| {
            decompress_g(chunk, p)
                .map_err(|e| Error::InvalidKey(format!("public generator matrix: {}", e)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(PublicKeyParts {
        sigma_g0,
        generators,
    })
}

pub(crate) fn pack_secret_key(
    p: &ParameterSet,
    delta: &[u8],
    sigma_g0: &[u8],
    a_inv: &[Matrix],
    b_inv: &[Matrix],
) -> Result<Zeroizing<Vec<u8>>> {
    let mut sk = Zeroizing::new(Vec::with_capacity(p.secret_key_bytes()));
    sk.extend_from_slice(delta);
    sk.extend_from_slice(sigma_g0);
    for m in a_inv.iter().chain(b_inv) {
        m.compress_into(&mut sk);
    }
    check_len(&sk, p.secret_key_bytes())?;
    Ok(sk)
}

pub(crate) fn unpack_secret_key<'a>(p: &ParameterSet, sk: &'a [u8]) -> Result<SecretKeyParts<'a>> {
    if sk.len() != p.secret_key_bytes() {
        return Err(Error::InvalidKeySize {
            expected: p.secret_key_bytes(),
            actual: sk.len(),
        });
    }
    let rest = &sk[p.l_sec_seed..];
    let (sigma_g0, rest) = rest.split_at(p.l_pub_seed);
    let (a_bytes, b_bytes) = rest.split_at((p.s - 1) * p.l_f_mm());

    let decode = |bytes: &[u8], d: usize| {
        Matrix::decompress(bytes, d, d, p.q)
            .map_err(|e| Error::InvalidKey(format!("secret transform: {}", e)))
    };
    let a_inv = a_bytes
        .chunks_exact(p.l_f_mm())
        .map(|c| decode(c, p.m))
        .collect::<Result<Vec<_>>>()?;
    let b_inv = b_bytes
        .chunks_exact(p.l_f_nn())
        .map(|c| decode(c, p.n))
        .collect::<Result<Vec<_>>>()?;

    Ok(SecretKeyParts {
        sigma_g0,
        a_inv,
        b_inv,
    })
}

/// Length of the (mu, nu) responses in a signature
pub(crate) const fn responses_len(p: &ParameterSet) -> usize {
    p.w * (p.l_f_mm() + p.l_f_nn())
}

pub(crate) fn split_signature<'a>(p: &ParameterSet, sig: &'a [u8]) -> Result<SignatureParts<'a>> {
    if sig.len() != p.signature_bytes() {
        return Err(Error::InvalidSignatureSize {
            expected: p.signature_bytes(),
            actual: sig.len(),
        });
    }
    let (responses, rest) = sig.split_at(responses_len(p));
    let (path, rest) = rest.split_at(p.path_bytes());
    let (digest, salt) = rest.split_at(p.l_digest);
    Ok(SignatureParts {
        responses,
        path,
        digest,
        salt,
    })
}

fn check_len(buf: &[u8], expected: usize) -> Result<()> {
    if buf.len() != expected {
        return Err(Error::Internal(format!(
            "encoded {} bytes, layout requires {}",
            buf.len(),
            expected
        )));
    }
    Ok(())
}
