//! Public value types shared across the writer and reader stacks.
//!
//! Key identifiers, fingerprints and session keys are plain values: they
//! compare and hash by their bytes and can be freely cloned.

use std::fmt;
use std::str::FromStr;

use pgp::composed::{PlainSessionKey, RawSessionKey};
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Cipher used when a caller asks for the engine default.
pub const DEFAULT_CIPHER: SymmetricKeyAlgorithm = SymmetricKeyAlgorithm::AES256;

/// Cipher suite options for key generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherSuite {
    /// RSA with 2048-bit keys
    Rsa2k,
    /// RSA with 4096-bit keys
    Rsa4k,
    /// Curve25519 legacy format (EdDSA for signing, ECDH for encryption)
    #[default]
    Cv25519,
    /// Modern Curve25519 (Ed25519 for signing, X25519 for encryption)
    Cv25519Modern,
    /// NIST P-256 curve (ECDSA for signing, ECDH for encryption)
    NistP256,
    /// NIST P-384 curve (ECDSA for signing, ECDH for encryption)
    NistP384,
}

impl FromStr for CipherSuite {
    type Err = Error;

    /// Parse cipher suite from string (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rsa2k" | "rsa2048" => Ok(CipherSuite::Rsa2k),
            "rsa4k" | "rsa4096" => Ok(CipherSuite::Rsa4k),
            "cv25519" | "curve25519" | "ed25519legacy" => Ok(CipherSuite::Cv25519),
            "cv25519modern" | "x25519" | "ed25519" => Ok(CipherSuite::Cv25519Modern),
            "nistp256" | "p256" => Ok(CipherSuite::NistP256),
            "nistp384" | "p384" => Ok(CipherSuite::NistP384),
            _ => Err(Error::InvalidArgument(format!("unknown cipher suite: {}", s))),
        }
    }
}

impl CipherSuite {
    /// Get the rpgp KeyType for the primary key (signing/certification).
    pub(crate) fn primary_key_type(&self) -> pgp::composed::KeyType {
        use pgp::composed::KeyType;
        use pgp::crypto::ecc_curve::ECCCurve;

        match self {
            CipherSuite::Rsa2k => KeyType::Rsa(2048),
            CipherSuite::Rsa4k => KeyType::Rsa(4096),
            CipherSuite::Cv25519 => KeyType::Ed25519Legacy,
            CipherSuite::Cv25519Modern => KeyType::Ed25519,
            CipherSuite::NistP256 => KeyType::ECDSA(ECCCurve::P256),
            CipherSuite::NistP384 => KeyType::ECDSA(ECCCurve::P384),
        }
    }

    /// Get the rpgp KeyType for encryption subkeys.
    pub(crate) fn encryption_key_type(&self) -> pgp::composed::KeyType {
        use pgp::composed::KeyType;
        use pgp::crypto::ecc_curve::ECCCurve;

        match self {
            CipherSuite::Rsa2k => KeyType::Rsa(2048),
            CipherSuite::Rsa4k => KeyType::Rsa(4096),
            CipherSuite::Cv25519 => KeyType::ECDH(ECCCurve::Curve25519),
            CipherSuite::Cv25519Modern => KeyType::X25519,
            CipherSuite::NistP256 => KeyType::ECDH(ECCCurve::P256),
            CipherSuite::NistP384 => KeyType::ECDH(ECCCurve::P384),
        }
    }
}

/// Map a numeric symmetric algorithm identifier to an algorithm.
///
/// `0` selects [`DEFAULT_CIPHER`]. Identifiers the codec cannot encrypt with
/// are rejected.
pub fn cipher_from_id(id: u8) -> Result<SymmetricKeyAlgorithm> {
    if id == 0 {
        return Ok(DEFAULT_CIPHER);
    }
    let algo = SymmetricKeyAlgorithm::from(id);
    match algo {
        SymmetricKeyAlgorithm::AES128
        | SymmetricKeyAlgorithm::AES192
        | SymmetricKeyAlgorithm::AES256
        | SymmetricKeyAlgorithm::Twofish
        | SymmetricKeyAlgorithm::Camellia128
        | SymmetricKeyAlgorithm::Camellia192
        | SymmetricKeyAlgorithm::Camellia256
        | SymmetricKeyAlgorithm::CAST5
        | SymmetricKeyAlgorithm::Blowfish
        | SymmetricKeyAlgorithm::TripleDES => Ok(algo),
        _ => Err(Error::UnsupportedSymmetricAlgorithm(format!("{:?} ({})", algo, id))),
    }
}

/// A 64-bit OpenPGP key identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId([u8; 8]);

impl KeyId {
    /// The wildcard ID used by anonymous recipients.
    pub const WILDCARD: KeyId = KeyId([0u8; 8]);

    /// Build a key ID from exactly eight bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| {
            Error::InvalidArgument(format!("key ID must be 8 bytes, got {}", bytes.len()))
        })?;
        Ok(KeyId(raw))
    }

    /// Parse a key ID from hex, ignoring spaces and an optional `0x` prefix.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = decode_hex(hex_str)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Uppercase hex without separators.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    pub fn is_wildcard(&self) -> bool {
        *self == Self::WILDCARD
    }

    pub(crate) fn from_pgp(id: &pgp::types::KeyId) -> Self {
        let mut raw = [0u8; 8];
        let bytes: &[u8] = id.as_ref();
        let n = bytes.len().min(8);
        raw[..n].copy_from_slice(&bytes[..n]);
        KeyId(raw)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", self.to_hex())
    }
}

impl FromStr for KeyId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl From<&Fingerprint> for KeyId {
    fn from(fp: &Fingerprint) -> Self {
        fp.to_keyid()
    }
}

/// A full key fingerprint (20 bytes for v4 keys, 32 bytes for v6 keys).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 16 {
            return Err(Error::InvalidArgument(format!(
                "fingerprint too short: {} bytes",
                bytes.len()
            )));
        }
        Ok(Fingerprint(bytes.to_vec()))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = decode_hex(hex_str)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }

    /// Truncate to the key ID.
    ///
    /// v4 key IDs are the low 64 bits, v6 key IDs the high 64 bits.
    pub fn to_keyid(&self) -> KeyId {
        let mut raw = [0u8; 8];
        if self.0.len() == 32 {
            raw.copy_from_slice(&self.0[..8]);
        } else {
            raw.copy_from_slice(&self.0[self.0.len() - 8..]);
        }
        KeyId(raw)
    }

    pub(crate) fn from_pgp(fp: &pgp::types::Fingerprint) -> Self {
        Fingerprint(fp.as_bytes().to_vec())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let trimmed = s.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).map_err(|e| Error::InvalidArgument(format!("invalid hex {:?}: {}", s, e)))
}

/// A plain symmetric session key.
///
/// The key bytes are wiped when the value is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey {
    algo: SymmetricKeyAlgorithm,
    key: Zeroizing<Vec<u8>>,
}

impl SessionKey {
    /// Take ownership of raw key bytes for the given cipher.
    pub fn new(algo: SymmetricKeyAlgorithm, key: Vec<u8>) -> Result<Self> {
        if key.len() != algo.key_size() {
            return Err(Error::InvalidArgument(format!(
                "{:?} needs a {} byte key, got {}",
                algo,
                algo.key_size(),
                key.len()
            )));
        }
        Ok(SessionKey {
            algo,
            key: Zeroizing::new(key),
        })
    }

    pub fn algorithm(&self) -> SymmetricKeyAlgorithm {
        self.algo
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Take a session key the codec decrypted from a v3 PKESK or v4 SKESK.
    ///
    /// Later packet versions bind the cipher to the encrypted data instead
    /// of the session key and are refused.
    pub(crate) fn from_plain(plain: &PlainSessionKey) -> Result<Self> {
        match plain {
            PlainSessionKey::V3_4 { sym_alg, key } => {
                let bytes: &[u8] = key.as_ref();
                SessionKey::new(*sym_alg, bytes.to_vec())
            }
            _ => Err(Error::UnsupportedSymmetricAlgorithm(
                "session key carries no cipher".to_string(),
            )),
        }
    }

    pub(crate) fn to_plain(&self) -> PlainSessionKey {
        PlainSessionKey::V3_4 {
            sym_alg: self.algo,
            key: RawSessionKey::from(&self.key[..]),
        }
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKey")
            .field("algo", &self.algo)
            .field("key", &"..")
            .finish()
    }
}
