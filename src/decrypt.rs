//! Decryption functions.
//!
//! One-shot wrappers around [`Decryptor`] that return the whole plaintext
//! together with the decoded message structure.

use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::armor::{ArmorKind, ArmorReader};
use crate::cert::Cert;
use crate::error::{Error, Result, Status};
use crate::io::IoWriter;
use crate::policy::{Policy, StandardPolicy};
use crate::reader::{DecryptionHelper, Decryptor, KeyringHelper};
use crate::structure::MessageStructure;

/// Decrypt a message with a caller-supplied helper.
///
/// The helper resolves certificates and the session key and gets the final
/// say over the message structure. Armored and binary input are both
/// accepted.
///
/// # Returns
/// The plaintext and the structure the helper accepted.
///
/// # Errors
/// * [`Error::MissingSessionKey`] - If the helper found nothing to unlock the message
/// * [`Error::UnsupportedCert`] - If the helper returned no certificates
/// * any error the helper's check signalled
pub fn decrypt<H: DecryptionHelper>(
    ciphertext: &[u8],
    helper: H,
    policy: &dyn Policy,
    time: Option<DateTime<Utc>>,
) -> Result<(Vec<u8>, MessageStructure)> {
    let mut reader = Decryptor::from_bytes(policy, ciphertext, helper, time)?;
    let plaintext = reader.read_to_vec()?;
    Ok((plaintext, reader.into_structure()))
}

/// Decrypt a password-protected message.
///
/// # Errors
/// * [`Error::InvalidPassword`] - If the password is wrong
///
/// # Example
///
/// ```no_run
/// use openpgp_stack::{decrypt_with_password, encrypt};
///
/// let ciphertext = encrypt(b"Hello world!", &[], &["p"], &[], false).unwrap();
/// assert_eq!(decrypt_with_password(&ciphertext, "p").unwrap(), b"Hello world!");
/// assert!(decrypt_with_password(&ciphertext, "q").is_err());
/// ```
pub fn decrypt_with_password(ciphertext: &[u8], password: &str) -> Result<Vec<u8>> {
    let policy = StandardPolicy::new();
    let helper = KeyringHelper::new(Vec::new(), &policy, None).with_password(password);
    decrypt(ciphertext, helper, &policy, None).map(|(plaintext, _)| plaintext)
}

/// Decrypt a message addressed to `recipient`.
///
/// `key_password` unlocks the recipient's secret keys. Signatures, if any,
/// are reported in the structure but not enforced.
pub fn decrypt_for(ciphertext: &[u8], recipient: &Cert, key_password: &str) -> Result<Vec<u8>> {
    let policy = StandardPolicy::new();
    let helper = recipient_helper(recipient, key_password, &policy)?;
    decrypt(ciphertext, helper, &policy, None).map(|(plaintext, _)| plaintext)
}

/// Decrypt an armored file addressed to `recipient`.
///
/// The file is decoded as it is read. With `outfile` the plaintext is
/// written there and an empty buffer is returned; otherwise the plaintext
/// is returned.
pub fn decrypt_file_for(
    infile: impl AsRef<Path>,
    recipient: &Cert,
    key_password: &str,
    outfile: Option<&Path>,
) -> Result<Vec<u8>> {
    let policy = StandardPolicy::new();
    let helper = recipient_helper(recipient, key_password, &policy)?;
    let armored = ArmorReader::from_file(infile, Some(ArmorKind::File))?;
    let mut reader = Decryptor::from_reader(&policy, armored, helper, None)?;

    match outfile {
        Some(path) => {
            let mut sink = IoWriter::from_file(path)?;
            io::copy(&mut reader, &mut sink)?;
            sink.flush()?;
            Ok(Vec::new())
        }
        None => reader.read_to_vec(),
    }
}

/// A keyring of one secret certificate that accepts any structure.
fn recipient_helper<'a>(
    recipient: &Cert,
    key_password: &str,
    policy: &'a dyn Policy,
) -> Result<KeyringHelper<'a>> {
    if !recipient.is_tsk() {
        return Err(Error::InvalidArgument(format!(
            "certificate {} has no secret keys",
            recipient.fingerprint()
        )));
    }
    Ok(KeyringHelper::new(vec![recipient.clone()], policy, None)
        .with_key_password(key_password)
        .with_check(|_| Status::Success))
}
