//! Key generation, signing and verification.
//!
//! MEDS is a Fiat-Shamir signature over `t` rounds of a commit/challenge
//! identification protocol for matrix code equivalence:
//!
//! - the secret is `s - 1` equivalences `(A_i, B_i)` from the public base
//!   code G0 to the published codes `G_i`;
//! - every round commits to a random equivalent `G~ = SF(Pi(A~, G0, B~))`;
//! - the challenge picks `w` rounds and a public code for each. For those
//!   rounds the signer reveals the composed map from `G_{h_i}` to `G~`, for
//!   all other rounds the seed of `(A~, B~)` via the seed tree.
//!
//! Internal module: use the `Meds*` types instead.

use algorithms::xof::{ExtendableOutputFunction, ShakeXof256};
use algorithms::Matrix;
use params::pqc::meds::{ParameterSet, MAX_REJECTION_ITERATIONS};
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use tracing::{debug, debug_span, trace};
use zeroize::Zeroizing;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::encoding::{
    pack_public_key, pack_secret_key, split_signature, unpack_public_key, unpack_secret_key,
};
use super::expand::{expand_fqs, expand_inv_mat, expand_syst_mat, parse_hash};
use super::generator::pi;
use super::seed_tree::SeedTree;
use super::solve::solve;
use crate::error::{Error, Result};

/// One commitment: the random equivalence and the code it produces
struct Commitment {
    a: Matrix,
    b: Matrix,
    g: Matrix,
}

/// Rejects parameter sets the solver and codecs cannot handle.
fn check_params(p: &ParameterSet) -> Result<()> {
    if p.m != p.n || p.k != p.m || p.m < 3 || p.s < 2 || p.w > p.t || p.t == 0 {
        return Err(Error::InvalidParameter(format!(
            "{} is not a supported MEDS shape",
            p.name
        )));
    }
    Ok(())
}

/// Splits `SHAKE256(seed)` into consecutive seeds of the given lengths.
fn squeeze_seeds<const N: usize>(
    seed: &[u8],
    lens: [usize; N],
) -> Result<[Zeroizing<Vec<u8>>; N]> {
    let mut xof = ShakeXof256::with_input(seed);
    let mut out: [Zeroizing<Vec<u8>>; N] = core::array::from_fn(|_| Zeroizing::new(Vec::new()));
    for (slot, len) in out.iter_mut().zip(lens) {
        **slot = xof.squeeze_into_vec(len)?;
    }
    Ok(out)
}

/// Samples the commitment of round `i` from its leaf seed.
///
/// The seed is rehashed with the salt and the round number until the
/// resulting code has a systematic form.
fn commit_round(
    p: &ParameterSet,
    g0: &Matrix,
    salt: &[u8],
    leaf: &[u8],
    round: usize,
) -> Result<Commitment> {
    let domain = (p.round_domain() + round as u32).to_le_bytes();
    let mut seed = Zeroizing::new(leaf.to_vec());

    for attempt in 0..MAX_REJECTION_ITERATIONS {
        let mut xof = ShakeXof256::new();
        xof.update(salt)?;
        xof.update(&seed)?;
        xof.update(&domain)?;
        let sigma_a = Zeroizing::new(xof.squeeze_into_vec(p.l_pub_seed)?);
        let sigma_b = Zeroizing::new(xof.squeeze_into_vec(p.l_pub_seed)?);
        xof.squeeze(&mut seed)?;

        let a = expand_inv_mat(&sigma_a, p.q, p.m)?;
        let b = expand_inv_mat(&sigma_b, p.q, p.n)?;
        match pi(&a, g0, &b)?.systematic_form() {
            Some(g) => return Ok(Commitment { a, b, g }),
            None => trace!(round, attempt, "commitment has no systematic form, resampling"),
        }
    }
    Err(Error::Internal(format!(
        "round {} commitment did not succeed within {} attempts",
        round, MAX_REJECTION_ITERATIONS
    )))
}

/// `d = SHAKE256(G~_0[:, k..] || ... || G~_{t-1}[:, k..] || msg)`
fn challenge_digest<'a>(
    p: &ParameterSet,
    codes: impl Iterator<Item = &'a Matrix>,
    message: &[u8],
) -> Result<Vec<u8>> {
    let mn = p.m * p.n;
    let mut xof = ShakeXof256::new();
    for g in codes {
        xof.update(&g.submatrix(0..p.k, p.k..mn)?.compress())?;
    }
    xof.update(message)?;
    Ok(xof.squeeze_into_vec(p.l_digest)?)
}

/// Key generation
///
/// Returns `(pk, sk)` in their serialized layouts.
pub(crate) fn keypair_internal<R>(
    p: &ParameterSet,
    rng: &mut R,
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)>
where
    R: RngCore + CryptoRng,
{
    check_params(p)?;
    let _span = debug_span!("meds_keygen", set = p.name).entered();

    let mut delta = Zeroizing::new(vec![0u8; p.l_sec_seed]);
    rng.try_fill_bytes(&mut delta)
        .map_err(|e| Error::Sampling(format!("random source failed: {}", e)))?;

    let [sigma_g0, mut sigma] = squeeze_seeds(&delta, [p.l_pub_seed, p.l_sec_seed])?;
    let g0 = expand_syst_mat(&sigma_g0, p)?;

    let mut generators = Vec::with_capacity(p.s - 1);
    let mut a_invs = Vec::with_capacity(p.s - 1);
    let mut b_invs = Vec::with_capacity(p.s - 1);

    for i in 1..p.s {
        let mut found = None;
        for attempt in 0..MAX_REJECTION_ITERATIONS {
            let [sigma_a, sigma_t, next] =
                squeeze_seeds(&sigma, [p.l_sec_seed, p.l_sec_seed, p.l_sec_seed])?;
            sigma = next;

            let t = expand_inv_mat(&sigma_t, p.q, p.k)?;
            let a_mm = expand_fqs(&sigma_a, 1, p.q)?[0];
            let g0_prime = t.mul(&g0)?;

            let Some((a, b_inv)) = solve(&g0_prime, a_mm, p.m, p.n)? else {
                trace!(i, attempt, "solve failed, resampling");
                continue;
            };
            let (Some(a_inv), Some(b)) = (a.inverse(), b_inv.inverse()) else {
                trace!(i, attempt, "solution not invertible, resampling");
                continue;
            };
            match pi(&a, &g0, &b)?.systematic_form() {
                Some(g) => {
                    found = Some((g, a_inv, b_inv));
                    break;
                }
                None => trace!(i, attempt, "public code has no systematic form, resampling"),
            }
        }

        let (g, a_inv, b_inv) = found.ok_or_else(|| Error::KeyGeneration {
            algorithm: p.name,
            details: format!("no valid equivalence after {} attempts", MAX_REJECTION_ITERATIONS),
        })?;
        generators.push(g);
        a_invs.push(a_inv);
        b_invs.push(b_inv);
    }

    let pk = pack_public_key(p, &sigma_g0, &generators)?;
    let sk = pack_secret_key(p, &delta, &sigma_g0, &a_invs, &b_invs)?;
    debug!(pk_len = pk.len(), sk_len = sk.len(), "key pair generated");
    Ok((pk, sk))
}

/// Signing
///
/// Returns the detached signature.
pub(crate) fn sign_internal<R>(
    p: &ParameterSet,
    message: &[u8],
    sk: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>>
where
    R: RngCore + CryptoRng,
{
    check_params(p)?;
    let _span = debug_span!("meds_sign", set = p.name, msg_len = message.len()).entered();

    let key = unpack_secret_key(p, sk)?;
    let g0 = expand_syst_mat(key.sigma_g0, p)?;

    let mut delta = Zeroizing::new(vec![0u8; p.l_sec_seed]);
    rng.try_fill_bytes(&mut delta)
        .map_err(|e| Error::Sampling(format!("random source failed: {}", e)))?;
    let [rho, alpha] = squeeze_seeds(&delta, [p.l_tree_seed, p.l_salt])?;

    let mut tree = SeedTree::new(&rho, &alpha, p.t)?;
    let leaves = tree.leaves();

    let commit = |i: usize| -> Result<Commitment> {
        let leaf = leaves[i]
            .as_deref()
            .ok_or_else(|| Error::Internal(format!("seed tree is missing leaf {}", i)))?;
        commit_round(p, &g0, &alpha, leaf, i)
    };

    #[cfg(feature = "parallel")]
    let rounds = (0..p.t)
        .into_par_iter()
        .map(commit)
        .collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let rounds = (0..p.t).map(commit).collect::<Result<Vec<_>>>()?;

    let digest = challenge_digest(p, rounds.iter().map(|c| &c.g), message)?;
    let h = parse_hash(p.s, p.t, p.w, &digest)?;

    let mut sig = Vec::with_capacity(p.signature_bytes());
    for (round, &hi) in rounds.iter().zip(&h) {
        if hi == 0 {
            continue;
        }
        let idx = usize::from(hi) - 1;
        round.a.mul(&key.a_inv[idx])?.compress_into(&mut sig);
        key.b_inv[idx].mul(&round.b)?.compress_into(&mut sig);
    }

    tree.hide_challenged(&h);
    sig.extend_from_slice(&tree.to_path(p.path_bytes())?);
    sig.extend_from_slice(&digest);
    sig.extend_from_slice(&alpha);

    if sig.len() != p.signature_bytes() {
        return Err(Error::SignatureGeneration {
            algorithm: p.name,
            details: format!(
                "encoded {} bytes, expected {}",
                sig.len(),
                p.signature_bytes()
            ),
        });
    }
    debug!(sig_len = sig.len(), "message signed");
    Ok(sig)
}

fn reject(p: &ParameterSet, details: impl Into<String>) -> Error {
    let details = details.into();
    debug!(set = p.name, reason = %details, "signature rejected");
    Error::Verification {
        algorithm: p.name,
        details,
    }
}

/// Verification
///
/// Malformed keys and signatures of the wrong length are reported as such;
/// everything wrong with a well-formed signature is a `Verification` error.
pub(crate) fn verify_internal(
    p: &ParameterSet,
    message: &[u8],
    sig: &[u8],
    pk: &[u8],
) -> Result<()> {
    check_params(p)?;
    let _span = debug_span!("meds_verify", set = p.name, msg_len = message.len()).entered();

    let key = unpack_public_key(p, pk)?;
    let parts = split_signature(p, sig)?;
    let g0 = expand_syst_mat(key.sigma_g0, p)?;

    let h = parse_hash(p.s, p.t, p.w, parts.digest)?;
    let tree = SeedTree::from_path(&h, parts.path, parts.salt, p.l_tree_seed)
        .map_err(|e| reject(p, e.to_string()))?;

    // Offsets of the (mu, nu) pair of each challenged round, in order
    let pair_len = p.l_f_mm() + p.l_f_nn();
    let mut offsets = vec![None; p.t];
    let mut next = 0;
    for (slot, &hi) in offsets.iter_mut().zip(&h) {
        if hi != 0 {
            *slot = Some(next);
            next += pair_len;
        }
    }

    let rebuild = |i: usize| -> Result<Matrix> {
        match offsets[i] {
            Some(off) => {
                let mu_bytes = &parts.responses[off..off + p.l_f_mm()];
                let nu_bytes = &parts.responses[off + p.l_f_mm()..off + pair_len];
                let mu = Matrix::decompress(mu_bytes, p.m, p.m, p.q)
                    .map_err(|e| reject(p, format!("round {}: {}", i, e)))?;
                let nu = Matrix::decompress(nu_bytes, p.n, p.n, p.q)
                    .map_err(|e| reject(p, format!("round {}: {}", i, e)))?;
                if !mu.is_invertible() || !nu.is_invertible() {
                    return Err(reject(p, format!("round {}: mu or nu not invertible", i)));
                }
                let target = &key.generators[usize::from(h[i]) - 1];
                pi(&mu, target, &nu)?
                    .systematic_form()
                    .ok_or_else(|| reject(p, format!("round {}: no systematic form", i)))
            }
            None => {
                let leaf = tree
                    .leaf(i)
                    .ok_or_else(|| reject(p, format!("round {}: seed not revealed", i)))?;
                Ok(commit_round(p, &g0, parts.salt, leaf, i)?.g)
            }
        }
    };

    #[cfg(feature = "parallel")]
    let codes = (0..p.t)
        .into_par_iter()
        .map(rebuild)
        .collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let codes = (0..p.t).map(rebuild).collect::<Result<Vec<_>>>()?;

    let digest = challenge_digest(p, codes.iter(), message)?;
    if bool::from(digest.ct_eq(parts.digest)) {
        debug!("signature valid");
        Ok(())
    } else {
        Err(reject(p, "digest mismatch"))
    }
}
