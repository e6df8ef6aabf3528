//! Internal helper functions.

use std::io::Cursor;

use pgp::composed::{Deserializable, SignedPublicKey, SignedSecretKey};
use pgp::crypto::hash::HashAlgorithm;
use pgp::crypto::public_key::PublicKeyAlgorithm;
use pgp::types::{KeyDetails, PublicParams};

use crate::error::{Error, Result};

/// Parse a transferable secret key from bytes (armored or binary).
pub(crate) fn parse_secret_key(data: &[u8]) -> Result<SignedSecretKey> {
    match SignedSecretKey::from_armor_single(Cursor::new(data)) {
        Ok((key, _headers)) => Ok(key),
        Err(_) => SignedSecretKey::from_bytes(Cursor::new(data))
            .map_err(|e| Error::MalformedCert(e.to_string())),
    }
}

/// Parse a public certificate from bytes (armored or binary).
pub(crate) fn parse_public_key(data: &[u8]) -> Result<SignedPublicKey> {
    if let Ok((key, _headers)) = SignedPublicKey::from_armor_single(Cursor::new(data)) {
        return Ok(key);
    }
    SignedPublicKey::from_bytes(Cursor::new(data)).map_err(|e| Error::MalformedCert(e.to_string()))
}

/// Parse either kind of certificate, keeping secret material when present.
pub(crate) fn parse_cert(data: &[u8]) -> Result<(SignedPublicKey, Option<SignedSecretKey>)> {
    if let Ok(secret_key) = parse_secret_key(data) {
        let public_key = secret_key.to_public_key();
        return Ok((public_key, Some(secret_key)));
    }
    let public_key = parse_public_key(data)?;
    Ok((public_key, None))
}

/// Get a normalized algorithm name for display.
pub(crate) fn algorithm_name(algo: PublicKeyAlgorithm) -> String {
    match algo {
        PublicKeyAlgorithm::RSA | PublicKeyAlgorithm::RSAEncrypt | PublicKeyAlgorithm::RSASign => {
            "RSA".to_string()
        }
        PublicKeyAlgorithm::EdDSALegacy | PublicKeyAlgorithm::Ed25519 => "EdDSA".to_string(),
        PublicKeyAlgorithm::ECDH => "ECDH".to_string(),
        PublicKeyAlgorithm::ECDSA => "ECDSA".to_string(),
        PublicKeyAlgorithm::X25519 => "X25519".to_string(),
        PublicKeyAlgorithm::X448 => "X448".to_string(),
        PublicKeyAlgorithm::Ed448 => "Ed448".to_string(),
        PublicKeyAlgorithm::DSA => "DSA".to_string(),
        PublicKeyAlgorithm::Elgamal => "Elgamal".to_string(),
        algo => format!("{:?}", algo),
    }
}

/// Bit length of a key, derived from its public parameters.
/// Returns 0 if it cannot be determined.
pub(crate) fn key_bit_size(key: &impl KeyDetails) -> usize {
    match key.public_params() {
        // The modulus is behind the rsa crate's traits; report the common size.
        PublicParams::RSA(_) => 2048,
        PublicParams::EdDSALegacy(_) | PublicParams::Ed25519(_) | PublicParams::X25519(_) => 256,
        PublicParams::X448(_) | PublicParams::Ed448(_) => 448,
        PublicParams::ECDSA(ecdsa) => {
            use pgp::types::EcdsaPublicParams;
            match ecdsa {
                EcdsaPublicParams::P256 { .. } => 256,
                EcdsaPublicParams::P384 { .. } => 384,
                EcdsaPublicParams::P521 { .. } => 521,
                _ => 0,
            }
        }
        PublicParams::ECDH(_) => 256,
        _ => 0,
    }
}

/// Select a hash algorithm that matches the strength of a signing key.
/// ECDSA keys require hashes that match or exceed their curve size.
pub(crate) fn select_hash_for_params(params: &PublicParams) -> HashAlgorithm {
    match params {
        PublicParams::ECDSA(ecdsa) => {
            use pgp::types::EcdsaPublicParams;
            match ecdsa {
                EcdsaPublicParams::P256 { .. } => HashAlgorithm::Sha256,
                EcdsaPublicParams::P384 { .. } => HashAlgorithm::Sha384,
                EcdsaPublicParams::P521 { .. } => HashAlgorithm::Sha512,
                _ => HashAlgorithm::Sha256,
            }
        }
        _ => HashAlgorithm::Sha256,
    }
}
