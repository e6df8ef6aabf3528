//! Signature verification functions.
//!
//! One-shot wrappers around [`Verifier`] and [`DetachedVerifier`].

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::cert::Cert;
use crate::error::{Result, Status};
use crate::io::IoReader;
use crate::policy::{Policy, StandardPolicy};
use crate::reader::{DetachedVerifier, KeyringHelper, VerificationHelper, Verifier};
use crate::structure::MessageStructure;

/// Verify an inline signed message with a caller-supplied helper.
///
/// # Returns
/// The plaintext and the structure the helper accepted.
pub fn verify<H: VerificationHelper>(
    input: &[u8],
    helper: H,
    policy: &dyn Policy,
    time: Option<DateTime<Utc>>,
) -> Result<(Vec<u8>, MessageStructure)> {
    let mut reader = Verifier::from_bytes(policy, input, helper, time)?;
    let plaintext = reader.read_to_vec()?;
    Ok((plaintext, reader.into_structure()))
}

/// Verify detached signatures over `data`.
///
/// Failures to even parse the signatures are reported as a status too, so
/// callers can branch on the kind.
pub fn verify_detached<H: VerificationHelper>(
    data: &[u8],
    signatures: &[u8],
    helper: H,
    policy: &dyn Policy,
    time: Option<DateTime<Utc>>,
) -> Status {
    match DetachedVerifier::from_bytes(policy, signatures, helper, time) {
        Ok(mut verifier) => verifier.verify_status(data),
        Err(e) => e.status(),
    }
}

/// Verify an inline signed message against a set of certificates.
///
/// Every signature group needs at least one good signature.
///
/// # Example
///
/// ```no_run
/// use openpgp_stack::{sign, verify_with_certs, Cert, CipherSuite, Signer, StandardPolicy};
///
/// let cert = Cert::generate("secret", &["Alice <alice@example.com>"], CipherSuite::Cv25519).unwrap();
/// let signers = Signer::all_for(&cert, &StandardPolicy::new(), None, "secret").unwrap();
/// let signed = sign(b"Hello world!", &signers, false, true).unwrap();
/// let plaintext = verify_with_certs(&signed, &[cert.strip_secret()]).unwrap();
/// assert_eq!(plaintext, b"Hello world!");
/// ```
pub fn verify_with_certs(input: &[u8], certs: &[Cert]) -> Result<Vec<u8>> {
    let policy = StandardPolicy::new();
    let helper = KeyringHelper::new(certs.to_vec(), &policy, None);
    verify(input, helper, &policy, None).map(|(plaintext, _)| plaintext)
}

/// Verify detached signatures over `data` against a set of certificates.
pub fn verify_detached_with_certs(data: &[u8], signatures: &[u8], certs: &[Cert]) -> Status {
    let policy = StandardPolicy::new();
    let helper = KeyringHelper::new(certs.to_vec(), &policy, None);
    verify_detached(data, signatures, helper, &policy, None)
}

/// Verify a detached signature file over a data file.
pub fn verify_detached_file(
    data: impl AsRef<Path>,
    signatures: impl AsRef<Path>,
    certs: &[Cert],
) -> Result<Status> {
    let content = IoReader::from_file(data)?.read_all()?;
    let sigs = IoReader::from_file(signatures)?.read_all()?;
    Ok(verify_detached_with_certs(&content, &sigs, certs))
}
