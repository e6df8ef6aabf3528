//! Packets surfaced to callers during message processing.
//!
//! Only the packet kinds a caller needs to inspect are modelled: the
//! encrypted session key packets handed to the session key resolver and
//! signatures carried in verification results.

use std::fmt;

use pgp::packet::{
    PacketTrait, PublicKeyEncryptedSessionKey, Signature, SymKeyEncryptedSessionKey,
};
use pgp::types::{EskType, PkeskVersion, Tag};

use crate::cert::{Key, SecretPart};
use crate::error::{Error, Result};
use crate::types::{Fingerprint, KeyId, SessionKey};

/// A public-key encrypted session key packet.
#[derive(Clone, Debug)]
pub struct Pkesk {
    packet: PublicKeyEncryptedSessionKey,
}

impl Pkesk {
    pub(crate) fn new(packet: PublicKeyEncryptedSessionKey) -> Self {
        Pkesk { packet }
    }

    /// Key ID of the addressed key. Anonymous recipients yield
    /// [`KeyId::WILDCARD`]; unknown packet versions yield `None`.
    pub fn recipient(&self) -> Option<KeyId> {
        match &self.packet {
            PublicKeyEncryptedSessionKey::V3 { id, .. } => Some(KeyId::from_pgp(id)),
            PublicKeyEncryptedSessionKey::V6 { fingerprint, .. } => Some(match fingerprint {
                Some(fp) => Fingerprint::from_pgp(fp).to_keyid(),
                None => KeyId::WILDCARD,
            }),
            PublicKeyEncryptedSessionKey::Other { .. } => None,
        }
    }

    /// True if this packet is addressed to `key`, or to anyone.
    pub fn is_for(&self, key: &Key) -> bool {
        match self.recipient() {
            Some(id) => id.is_wildcard() || id == key.keyid(),
            None => false,
        }
    }

    /// Decrypt the session key with the secret half of `key`.
    ///
    /// The key must be unlocked (see [`Key::decrypt_secret`]) unless its
    /// secret material is unprotected.
    ///
    /// # Errors
    /// * [`Error::InvalidArgument`] - The packet is not addressed to `key`
    /// * [`Error::MissingSessionKey`] - `key` has no secret material
    /// * [`Error::InvalidPassword`] - The secret material stays locked
    /// * [`Error::InvalidSessionKey`] - `key` does not decrypt this packet
    pub fn decrypt(&self, key: &Key) -> Result<SessionKey> {
        if !self.is_for(key) {
            return Err(Error::InvalidArgument(format!(
                "PKESK is not addressed to {}",
                key.keyid()
            )));
        }
        let typ = match self.packet.version() {
            PkeskVersion::V3 => EskType::V3_4,
            PkeskVersion::V6 => EskType::V6,
            PkeskVersion::Other(v) => {
                return Err(Error::MalformedPacket(format!("unsupported PKESK version {}", v)))
            }
        };
        let values = self
            .packet
            .values()
            .map_err(|e| Error::MalformedPacket(e.to_string()))?;

        let pw = key.password();
        let unlocked = match key.secret_part() {
            Some(SecretPart::Primary(k)) => k.unlock(&pw, |pub_params, priv_key| {
                priv_key.decrypt(pub_params, values, typ, &k.public_key())
            }),
            Some(SecretPart::Subkey(k)) => k.unlock(&pw, |pub_params, priv_key| {
                priv_key.decrypt(pub_params, values, typ, &k.public_key())
            }),
            None => {
                return Err(Error::MissingSessionKey(format!(
                    "key {} has no secret key material",
                    key.keyid()
                )))
            }
        };
        let plain = unlocked
            .map_err(|_| Error::InvalidPassword)?
            .map_err(|_| Error::InvalidSessionKey)?;
        SessionKey::from_plain(&plain)
    }

    pub fn packet(&self) -> &PublicKeyEncryptedSessionKey {
        &self.packet
    }
}

/// A symmetric-key (password) encrypted session key packet.
#[derive(Clone, Debug)]
pub struct Skesk {
    packet: SymKeyEncryptedSessionKey,
}

impl Skesk {
    pub(crate) fn new(packet: SymKeyEncryptedSessionKey) -> Self {
        Skesk { packet }
    }

    pub fn packet(&self) -> &SymKeyEncryptedSessionKey {
        &self.packet
    }
}

/// The packet kinds exposed by this crate.
#[derive(Clone, Debug)]
pub enum Packet {
    Pkesk(Pkesk),
    Skesk(Skesk),
    Signature(Signature),
}

impl Packet {
    pub fn tag(&self) -> Tag {
        match self {
            Packet::Pkesk(p) => p.packet.tag(),
            Packet::Skesk(p) => p.packet.tag(),
            Packet::Signature(s) => s.tag(),
        }
    }

    /// Numeric packet type as it appears on the wire.
    pub fn kind(&self) -> u8 {
        self.tag().into()
    }
}

impl PartialEq for Packet {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Packet::Pkesk(a), Packet::Pkesk(b)) => a.packet == b.packet,
            (Packet::Skesk(a), Packet::Skesk(b)) => a.packet == b.packet,
            (Packet::Signature(a), Packet::Signature(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packet::Pkesk(p) => match p.recipient() {
                Some(id) => write!(f, "PKESK for {}", id),
                None => f.write_str("PKESK (unknown version)"),
            },
            Packet::Skesk(_) => f.write_str("SKESK"),
            Packet::Signature(sig) => write!(f, "Signature ({:?})", sig.typ()),
        }
    }
}

impl From<Pkesk> for Packet {
    fn from(p: Pkesk) -> Self {
        Packet::Pkesk(p)
    }
}

impl From<Skesk> for Packet {
    fn from(p: Skesk) -> Self {
        Packet::Skesk(p)
    }
}

impl From<Signature> for Packet {
    fn from(s: Signature) -> Self {
        Packet::Signature(s)
    }
}
