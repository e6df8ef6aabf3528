//! Key lifetime checks evaluated at an explicit reference time.
//!
//! rpgp doesn't have a policy system like sequoia, so expiration,
//! revocation and key flag checks are done by hand here.

use chrono::{DateTime, Duration, Utc};
use pgp::composed::{SignedPublicKey, SignedPublicSubKey};
use pgp::packet::{KeyFlags, Signature, SignatureType};
use pgp::types::KeyDetails;

/// Convert a key creation timestamp to a UTC date.
pub(crate) fn created_at(key: &impl KeyDetails) -> DateTime<Utc> {
    DateTime::from_timestamp(key.created_at().as_secs() as i64, 0).unwrap_or_default()
}

/// Expiration instant for a key created at `creation` with the given
/// validity period. A zero period means the key does not expire.
pub(crate) fn expiration_from(creation: DateTime<Utc>, validity_secs: u64) -> Option<DateTime<Utc>> {
    if validity_secs == 0 {
        return None;
    }
    Some(creation + Duration::seconds(validity_secs as i64))
}

/// Most recent self-signature expiry carried by a set of binding signatures.
fn validity_from(signatures: &[Signature]) -> Option<u64> {
    signatures
        .iter()
        .rev()
        .find_map(|sig| sig.key_expiration_time().map(|d| d.as_secs() as u64))
}

/// Expiration of the primary key, taken from user binding signatures.
pub(crate) fn primary_expiration(key: &SignedPublicKey) -> Option<DateTime<Utc>> {
    let creation = created_at(&key.primary_key);
    key.details
        .users
        .iter()
        .find_map(|user| validity_from(&user.signatures))
        .and_then(|secs| expiration_from(creation, secs))
}

/// Expiration of a subkey, taken from its most recent binding signature.
pub(crate) fn subkey_expiration(subkey: &SignedPublicSubKey) -> Option<DateTime<Utc>> {
    let creation = created_at(&subkey.key);
    validity_from(&subkey.signatures).and_then(|secs| expiration_from(creation, secs))
}

/// Revocation signatures on the primary key in effect at `time`.
pub(crate) fn primary_revocations(key: &SignedPublicKey, time: DateTime<Utc>) -> Vec<Signature> {
    in_effect(&key.details.revocation_signatures, SignatureType::KeyRevocation, time)
}

/// Revocation signatures on a subkey in effect at `time`.
pub(crate) fn subkey_revocations(subkey: &SignedPublicSubKey, time: DateTime<Utc>) -> Vec<Signature> {
    in_effect(&subkey.signatures, SignatureType::SubkeyRevocation, time)
}

fn in_effect(signatures: &[Signature], typ: SignatureType, time: DateTime<Utc>) -> Vec<Signature> {
    signatures
        .iter()
        .filter(|sig| sig.typ() == Some(typ))
        .filter(|sig| match sig.created() {
            Some(created) => {
                DateTime::from_timestamp(created.as_secs() as i64, 0).map_or(true, |c| c <= time)
            }
            None => true,
        })
        .cloned()
        .collect()
}

/// Key flags of the primary key, merged over all user binding signatures.
pub(crate) fn primary_flags(key: &SignedPublicKey) -> Flags {
    let mut flags = Flags::default();
    for user in &key.details.users {
        for sig in &user.signatures {
            flags.merge(&sig.key_flags());
        }
    }
    flags
}

/// Key flags of a subkey, from its most recent binding signature.
pub(crate) fn subkey_flags(subkey: &SignedPublicSubKey) -> Flags {
    let mut flags = Flags::default();
    if let Some(sig) = subkey
        .signatures
        .iter()
        .rev()
        .find(|sig| sig.typ() == Some(SignatureType::SubkeyBinding))
    {
        flags.merge(&sig.key_flags());
    }
    flags
}

/// Capability bits relevant to key selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Flags {
    pub certify: bool,
    pub sign: bool,
    pub encrypt_comms: bool,
    pub encrypt_storage: bool,
}

impl Flags {
    fn merge(&mut self, flags: &KeyFlags) {
        self.certify |= flags.certify();
        self.sign |= flags.sign();
        self.encrypt_comms |= flags.encrypt_comms();
        self.encrypt_storage |= flags.encrypt_storage();
    }
}
