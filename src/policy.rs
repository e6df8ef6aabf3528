//! Algorithm acceptance policy.
//!
//! A [`Policy`] is consulted by every component that decides whether a key,
//! signature or cipher is usable. Key lifetimes are evaluated separately
//! against an explicit reference time, see [`crate::Cert::keys`].

use std::fmt;

use pgp::crypto::hash::HashAlgorithm;
use pgp::crypto::public_key::PublicKeyAlgorithm;
use pgp::crypto::sym::SymmetricKeyAlgorithm;

use crate::error::{Error, Result};

/// Decides which algorithms are acceptable.
pub trait Policy: fmt::Debug {
    /// Accept or reject a hash algorithm used by a signature.
    fn hash(&self, algo: HashAlgorithm) -> Result<()>;

    /// Accept or reject a symmetric cipher protecting a message.
    fn symmetric(&self, algo: SymmetricKeyAlgorithm) -> Result<()>;

    /// Accept or reject a public key algorithm.
    fn public_key(&self, algo: PublicKeyAlgorithm) -> Result<()>;
}

/// The standard policy: rejects broken hashes and ciphers.
#[derive(Debug, Clone, Default)]
pub struct StandardPolicy {
    allow_sha1: bool,
}

impl StandardPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept SHA-1 signatures. Only useful for verifying legacy data.
    pub fn allow_sha1(mut self, allow: bool) -> Self {
        self.allow_sha1 = allow;
        self
    }
}

impl Policy for StandardPolicy {
    fn hash(&self, algo: HashAlgorithm) -> Result<()> {
        match algo {
            HashAlgorithm::Sha256
            | HashAlgorithm::Sha384
            | HashAlgorithm::Sha512
            | HashAlgorithm::Sha224
            | HashAlgorithm::Sha3_256
            | HashAlgorithm::Sha3_512 => Ok(()),
            HashAlgorithm::Sha1 if self.allow_sha1 => Ok(()),
            other => Err(Error::UnsupportedHashAlgorithm(format!("{:?}", other))),
        }
    }

    fn symmetric(&self, algo: SymmetricKeyAlgorithm) -> Result<()> {
        match algo {
            SymmetricKeyAlgorithm::Plaintext | SymmetricKeyAlgorithm::IDEA => Err(
                Error::UnsupportedSymmetricAlgorithm(format!("{:?}", algo)),
            ),
            _ => Ok(()),
        }
    }

    fn public_key(&self, algo: PublicKeyAlgorithm) -> Result<()> {
        match algo {
            PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSAEncrypt
            | PublicKeyAlgorithm::RSASign
            | PublicKeyAlgorithm::ECDH
            | PublicKeyAlgorithm::ECDSA
            | PublicKeyAlgorithm::EdDSALegacy
            | PublicKeyAlgorithm::Ed25519
            | PublicKeyAlgorithm::X25519
            | PublicKeyAlgorithm::Ed448
            | PublicKeyAlgorithm::X448 => Ok(()),
            other => Err(Error::UnsupportedPublicKeyAlgorithm(format!("{:?}", other))),
        }
    }
}

/// A policy that accepts everything the codec understands.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPolicy;

impl Policy for NullPolicy {
    fn hash(&self, _algo: HashAlgorithm) -> Result<()> {
        Ok(())
    }

    fn symmetric(&self, _algo: SymmetricKeyAlgorithm) -> Result<()> {
        Ok(())
    }

    fn public_key(&self, _algo: PublicKeyAlgorithm) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_policy_rejects_weak_hashes() {
        let policy = StandardPolicy::new();
        assert!(policy.hash(HashAlgorithm::Sha256).is_ok());
        assert!(matches!(
            policy.hash(HashAlgorithm::Sha1),
            Err(Error::UnsupportedHashAlgorithm(_))
        ));
        assert!(StandardPolicy::new().allow_sha1(true).hash(HashAlgorithm::Sha1).is_ok());
    }

    #[test]
    fn test_standard_policy_symmetric() {
        let policy = StandardPolicy::new();
        assert!(policy.symmetric(SymmetricKeyAlgorithm::AES256).is_ok());
        assert!(policy.symmetric(SymmetricKeyAlgorithm::Plaintext).is_err());
        assert!(NullPolicy.symmetric(SymmetricKeyAlgorithm::Plaintext).is_ok());
    }
}
