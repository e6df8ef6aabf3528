//! Signing functions.
//!
//! One-shot wrappers around [`WriterStack`] that produce inline signed
//! messages or detached signatures.

use std::io::Write;
use std::path::Path;

use crate::armor::{armor, ArmorKind};
use crate::cert::Signer;
use crate::error::Result;
use crate::io::{IoReader, IoWriter};
use crate::writer::WriterStack;

/// Sign bytes with every signer.
///
/// Inline signing wraps the plaintext in a literal data packet preceded by
/// one-pass signatures. Detached signing returns only the signatures.
///
/// # Arguments
/// * `plaintext` - The data to sign
/// * `signers` - One signature is made per signer
/// * `detached` - Produce detached signatures instead of a signed message
/// * `armored` - If true, output ASCII-armored; otherwise binary
///
/// # Errors
/// * [`Error::InvalidArgument`](crate::Error::InvalidArgument) - If `signers` is empty
///
/// # Example
///
/// ```no_run
/// use openpgp_stack::{sign, Cert, CipherSuite, Signer, StandardPolicy};
///
/// let cert = Cert::generate("secret", &["Alice <alice@example.com>"], CipherSuite::Cv25519).unwrap();
/// let signers = Signer::all_for(&cert, &StandardPolicy::new(), None, "secret").unwrap();
/// let signature = sign(b"Hello world!", &signers, true, true).unwrap();
/// assert!(signature.starts_with(b"-----BEGIN PGP SIGNATURE-----"));
/// ```
pub fn sign(plaintext: &[u8], signers: &[Signer], detached: bool, armored: bool) -> Result<Vec<u8>> {
    let (mut stack, kind) = if detached {
        (
            WriterStack::new(Vec::new()).push_sign_detached(signers, None)?,
            ArmorKind::Signature,
        )
    } else {
        (
            WriterStack::new(Vec::new())
                .push_sign(signers, None)?
                .push_literal(),
            ArmorKind::Message,
        )
    };
    stack.write_all(plaintext)?;
    let signed = stack.finalize()?;

    if armored {
        Ok(armor(&signed, kind, &[])?.into_bytes())
    } else {
        Ok(signed)
    }
}

/// Sign a file, writing the (armored) result to `outfile`.
pub fn sign_file(
    infile: impl AsRef<Path>,
    signers: &[Signer],
    detached: bool,
    outfile: impl AsRef<Path>,
) -> Result<()> {
    let plaintext = IoReader::from_file(infile)?.read_all()?;
    let signed = sign(&plaintext, signers, detached, true)?;
    let mut sink = IoWriter::from_file(outfile)?;
    sink.write_all(&signed)?;
    sink.flush()?;
    Ok(())
}
