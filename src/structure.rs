//! The decoded shape of a message.
//!
//! A [`MessageStructure`] lists the container layers the reader peeled, in
//! order from the outside in. It is fully built before the structure check
//! runs, so policy code always sees the whole shape.

use std::fmt;

use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::packet::Signature;

use crate::cert::{Cert, Key, RevocationStatus};
use crate::error::Error;
use crate::packet::Packet;
use crate::types::KeyId;

/// Outcome of checking one signature.
#[derive(Debug)]
pub enum VerificationResult {
    /// The signature is cryptographically valid and was made by a key
    /// valid at the evaluation time.
    GoodChecksum(GoodChecksum),
    /// No certificate holds the issuing key.
    MissingKey { sig: Signature, issuers: Vec<KeyId> },
    /// The issuing key exists but is not usable at the evaluation time.
    UnboundKey { sig: Signature, cert: Cert, error: Error },
    /// The signature does not verify, or is rejected by policy.
    BadChecksum { sig: Signature, cert: Option<Cert>, error: Error },
}

/// Details of a good signature.
#[derive(Debug)]
pub struct GoodChecksum {
    pub sig: Signature,
    pub cert: Cert,
    pub key: Key,
    pub revocation_status: RevocationStatus,
}

impl VerificationResult {
    /// Details of a good signature, or `None` for any failure.
    pub fn good_checksum(&self) -> Option<&GoodChecksum> {
        match self {
            VerificationResult::GoodChecksum(good) => Some(good),
            _ => None,
        }
    }

    pub fn is_good(&self) -> bool {
        self.good_checksum().is_some()
    }

    pub fn signature(&self) -> &Signature {
        match self {
            VerificationResult::GoodChecksum(good) => &good.sig,
            VerificationResult::MissingKey { sig, .. }
            | VerificationResult::UnboundKey { sig, .. }
            | VerificationResult::BadChecksum { sig, .. } => sig,
        }
    }

    /// The signature as a packet of this crate's packet model.
    pub fn packet(&self) -> Packet {
        Packet::Signature(self.signature().clone())
    }

    /// The error explaining a failed result.
    pub fn error(&self) -> Option<&Error> {
        match self {
            VerificationResult::UnboundKey { error, .. }
            | VerificationResult::BadChecksum { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationResult::GoodChecksum(good) => {
                write!(f, "good signature from {}", good.key.fingerprint())
            }
            VerificationResult::MissingKey { issuers, .. } => {
                let ids: Vec<String> = issuers.iter().map(|id| id.to_hex()).collect();
                write!(f, "no key for issuer(s) [{}]", ids.join(", "))
            }
            VerificationResult::UnboundKey { cert, error, .. } => {
                write!(f, "key of {} not usable: {}", cert.fingerprint(), error)
            }
            VerificationResult::BadChecksum { error, .. } => write!(f, "bad signature: {}", error),
        }
    }
}

/// One container layer of a message.
#[derive(Debug)]
pub enum MessageLayer {
    /// Compressed data; the codec inflates it transparently.
    Compression,
    /// Encrypted data, with the cipher when it is known.
    Encryption { sym_algo: Option<SymmetricKeyAlgorithm> },
    /// A group of signatures over the same data.
    SignatureGroup { results: Vec<VerificationResult> },
}

impl MessageLayer {
    /// Stable numeric kind: 1 compression, 2 encryption, 3 signature group.
    pub fn variant(&self) -> u8 {
        match self {
            MessageLayer::Compression => 1,
            MessageLayer::Encryption { .. } => 2,
            MessageLayer::SignatureGroup { .. } => 3,
        }
    }

    pub fn is_compression(&self) -> bool {
        matches!(self, MessageLayer::Compression)
    }

    pub fn is_encryption(&self) -> bool {
        matches!(self, MessageLayer::Encryption { .. })
    }

    /// Verification results if this is a signature group.
    pub fn signature_group(&self) -> Option<&[VerificationResult]> {
        match self {
            MessageLayer::SignatureGroup { results } => Some(results),
            _ => None,
        }
    }
}

/// Ordered layers of a decoded message, outermost first.
#[derive(Debug, Default)]
pub struct MessageStructure {
    layers: Vec<MessageLayer>,
}

impl MessageStructure {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, layer: MessageLayer) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[MessageLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MessageLayer> {
        self.layers.iter()
    }

    /// Layer kinds in order, e.g. `[2, 3]` for encrypted then signed.
    pub fn shape(&self) -> Vec<u8> {
        self.layers.iter().map(MessageLayer::variant).collect()
    }

    /// All verification results across signature groups.
    pub fn results(&self) -> impl Iterator<Item = &VerificationResult> {
        self.layers
            .iter()
            .filter_map(MessageLayer::signature_group)
            .flatten()
    }

    pub fn is_encrypted(&self) -> bool {
        self.layers.iter().any(MessageLayer::is_encryption)
    }

    /// Number of good signatures across all groups.
    pub fn good_signatures(&self) -> usize {
        self.results().filter(|r| r.is_good()).count()
    }
}

impl<'a> IntoIterator for &'a MessageStructure {
    type Item = &'a MessageLayer;
    type IntoIter = std::slice::Iter<'a, MessageLayer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_variants() {
        let mut structure = MessageStructure::new();
        assert!(structure.is_empty());
        structure.push(MessageLayer::Encryption {
            sym_algo: Some(SymmetricKeyAlgorithm::AES256),
        });
        structure.push(MessageLayer::Compression);
        structure.push(MessageLayer::SignatureGroup { results: vec![] });

        assert_eq!(structure.shape(), vec![2, 1, 3]);
        assert!(structure.is_encrypted());
        assert_eq!(structure.good_signatures(), 0);
        assert_eq!(structure.results().count(), 0);
        assert!(structure.layers()[2].signature_group().is_some());
    }
}
