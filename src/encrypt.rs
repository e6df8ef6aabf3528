//! Encryption functions.
//!
//! One-shot wrappers around [`WriterStack`] for the common case of
//! encrypting a buffer or a file to certificates and passwords.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;

use crate::armor::{armor, ArmorKind, ArmorWriter};
use crate::cert::{Cert, Recipient, Signer};
use crate::error::Result;
use crate::io::{IoReader, IoWriter};
use crate::policy::Policy;
use crate::writer::WriterStack;

/// Encrypt bytes to recipients and passwords, optionally signing them.
///
/// Builds the stack encrypt, sign (only when `signers` is non-empty),
/// literal. Any one recipient key or password decrypts the result.
///
/// # Arguments
/// * `plaintext` - The data to encrypt
/// * `recipients` - Keys to address one PKESK each to
/// * `passwords` - Passwords to derive one SKESK each from
/// * `signers` - Keys to sign the plaintext with, may be empty
/// * `armored` - If true, output ASCII-armored; otherwise binary
///
/// # Errors
/// * [`Error::InvalidArgument`](crate::Error::InvalidArgument) - If there
///   is neither a recipient nor a password
///
/// # Example
///
/// ```no_run
/// use openpgp_stack::encrypt;
///
/// let ciphertext = encrypt(b"Hello world!", &[], &["p"], &[], true).unwrap();
/// assert!(ciphertext.starts_with(b"-----BEGIN PGP MESSAGE-----"));
/// ```
pub fn encrypt(
    plaintext: &[u8],
    recipients: &[Recipient],
    passwords: &[&str],
    signers: &[Signer],
    armored: bool,
) -> Result<Vec<u8>> {
    let mut stack = WriterStack::new(Vec::new()).push_encrypt(passwords, recipients, 0)?;
    if !signers.is_empty() {
        stack = stack.push_sign(signers, None)?;
    }
    let mut stack = stack.push_literal();
    stack.write_all(plaintext)?;
    let ciphertext = stack.finalize()?;

    if armored {
        Ok(armor(&ciphertext, ArmorKind::Message, &[])?.into_bytes())
    } else {
        Ok(ciphertext)
    }
}

/// Encrypt bytes to every transport-encryption key of the given certificates.
///
/// Each certificate must have at least one encryption key valid under
/// `policy` at `time` (or now).
pub fn encrypt_for(
    plaintext: &[u8],
    certs: &[Cert],
    passwords: &[&str],
    policy: &dyn Policy,
    time: Option<DateTime<Utc>>,
    armored: bool,
) -> Result<Vec<u8>> {
    let mut recipients = Vec::new();
    for cert in certs {
        recipients.extend(Recipient::all_for(cert, policy, time)?);
    }
    debug!("encrypting to {} key(s) from {} certificate(s)", recipients.len(), certs.len());
    encrypt(plaintext, &recipients, passwords, &[], armored)
}

/// Encrypt a file to certificates, writing an armored file to `outfile`.
///
/// The output uses the `PGP ARMORED FILE` armor label.
pub fn encrypt_file_for(
    infile: impl AsRef<Path>,
    certs: &[Cert],
    policy: &dyn Policy,
    outfile: impl AsRef<Path>,
) -> Result<()> {
    let mut recipients = Vec::new();
    for cert in certs {
        recipients.extend(Recipient::all_for(cert, policy, None)?);
    }

    let armorer = ArmorWriter::new(IoWriter::from_file(outfile)?, ArmorKind::File, &[])?;
    let mut stack = WriterStack::new(armorer)
        .push_encrypt(&[], &recipients, 0)?
        .push_literal();
    let copied = IoReader::from_file(infile)?.copy_to(&mut stack, None)?;
    debug!("encrypted {} byte(s) to {} key(s)", copied, recipients.len());
    stack.finalize()?.finalize()?.flush()?;
    Ok(())
}
