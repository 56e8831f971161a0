//! File-level operations behind the `meds` subcommands.

use anyhow::{anyhow, Context, Result};
use meds_sign::pq::meds;
use params::pqc::meds::ParameterSet;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SECRET_KEY_FILE: &str = "meds_key";
pub const PUBLIC_KEY_FILE: &str = "meds_key.pub";
const SIGNED_SUFFIX: &str = "signed";

fn lookup(id: u32) -> Result<&'static ParameterSet> {
    ParameterSet::from_id(id).ok_or_else(|| {
        let known: Vec<String> = ParameterSet::ALL.iter().map(|p| p.id.to_string()).collect();
        anyhow!("unknown parameter set {} (known: {})", id, known.join(", "))
    })
}

fn read_exact_len(path: &Path, expected: usize, what: &str) -> Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("reading {} {}", what, path.display()))?;
    if bytes.len() != expected {
        return Err(anyhow!(
            "{} {} has {} bytes, expected {}",
            what,
            path.display(),
            bytes.len(),
            expected
        ));
    }
    Ok(bytes)
}

#[cfg(unix)]
fn write_secret(path: &Path, bytes: &[u8]) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .with_context(|| format!("creating {}", path.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(not(unix))]
fn write_secret(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

/// Generates a key pair and stores it in `dir`.
///
/// Returns the secret and public key paths.
pub fn keygen(set: u32, dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let params = lookup(set)?;
    info!(set = params.name, "generating key pair");

    let (pk, sk) = meds::keypair(params, &mut rand::rngs::OsRng)
        .with_context(|| format!("{} key generation", params.name))?;

    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let sk_path = dir.join(SECRET_KEY_FILE);
    let pk_path = dir.join(PUBLIC_KEY_FILE);
    write_secret(&sk_path, &sk)?;
    fs::write(&pk_path, &pk).with_context(|| format!("writing {}", pk_path.display()))?;
    Ok((sk_path, pk_path))
}

/// Signs `msg` and writes `signature || message` next to it.
pub fn sign(set: u32, msg: &Path, key: &Path) -> Result<PathBuf> {
    let params = lookup(set)?;
    let sk = read_exact_len(key, params.secret_key_bytes(), "secret key")?;
    let message = fs::read(msg).with_context(|| format!("reading {}", msg.display()))?;
    debug!(set = params.name, len = message.len(), "signing");

    let signed = meds::sign_attached(params, &message, &sk, &mut rand::rngs::OsRng)
        .with_context(|| format!("{} signing", params.name))?;

    let mut out = msg.as_os_str().to_owned();
    out.push(".");
    out.push(SIGNED_SUFFIX);
    let out = PathBuf::from(out);
    fs::write(&out, &signed).with_context(|| format!("writing {}", out.display()))?;
    Ok(out)
}

/// Verifies a signed file.
///
/// A rejected or truncated signature is `Ok(false)`; unreadable files and
/// malformed keys are errors.
pub fn verify(set: u32, signed: &Path, key: &Path, out: Option<&Path>) -> Result<bool> {
    let params = lookup(set)?;
    let pk = read_exact_len(key, params.public_key_bytes(), "public key")?;
    let bytes = fs::read(signed).with_context(|| format!("reading {}", signed.display()))?;

    let message = match meds::open(params, &bytes, &pk) {
        Ok(message) => message,
        Err(e @ meds_sign::Error::Verification { .. })
        | Err(e @ meds_sign::Error::InvalidSignatureSize { .. }) => {
            debug!(error = %e, "signature rejected");
            return Ok(false);
        }
        Err(e) => return Err(e).context("verifying signed message"),
    };

    if let Some(path) = out {
        fs::write(path, &message).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(true)
}

#[derive(Serialize)]
struct ParamsReport {
    #[serde(flatten)]
    set: &'static ParameterSet,
    public_key_bytes: usize,
    secret_key_bytes: usize,
    signature_bytes: usize,
    path_bytes: usize,
}

impl From<&'static ParameterSet> for ParamsReport {
    fn from(set: &'static ParameterSet) -> Self {
        Self {
            set,
            public_key_bytes: set.public_key_bytes(),
            secret_key_bytes: set.secret_key_bytes(),
            signature_bytes: set.signature_bytes(),
            path_bytes: set.path_bytes(),
        }
    }
}

/// JSON description of one or all parameter sets.
pub fn params_json(set: Option<u32>) -> Result<String> {
    let json = match set {
        Some(id) => serde_json::to_string_pretty(&ParamsReport::from(lookup(id)?))?,
        None => {
            let all: Vec<ParamsReport> = ParameterSet::ALL
                .iter()
                .copied()
                .map(ParamsReport::from)
                .collect();
            serde_json::to_string_pretty(&all)?
        }
    };
    Ok(json)
}

#[cfg(test)]
mod tests;
