//! Certificates, keys and the handles derived from them.
//!
//! A [`Cert`] is an immutable, cheaply clonable view of a transferable
//! public or secret key. [`Key`] values are extracted from it through a
//! [`KeyQuery`], which filters by capability and by validity at a given
//! reference time under a [`Policy`].

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use pgp::composed::{
    SecretKeyParamsBuilder, SignedPublicKey, SignedPublicSubKey, SignedSecretKey,
    SubkeyParamsBuilder,
};
use pgp::crypto::hash::HashAlgorithm;
use pgp::crypto::public_key::PublicKeyAlgorithm;
use pgp::packet::{PublicKey, PublicSubkey, SecretKey, SecretSubkey, Signature};
use pgp::types::{KeyDetails, Password, PublicParams};
use rand::thread_rng;
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::internal::{
    algorithm_name, created_at, key_bit_size, parse_cert, primary_expiration, primary_flags,
    primary_revocations, select_hash_for_params, subkey_expiration, subkey_flags,
    subkey_revocations, Flags,
};
use crate::policy::Policy;
use crate::types::{CipherSuite, Fingerprint, KeyId};

/// An OpenPGP certificate, optionally carrying secret key material.
#[derive(Clone)]
pub struct Cert {
    inner: Arc<CertInner>,
}

struct CertInner {
    public: SignedPublicKey,
    secret: Option<SignedSecretKey>,
}

impl Cert {
    /// Load a certificate from bytes (armored or binary, public or secret).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let (public, secret) = parse_cert(data)?;
        Ok(Self::from_parts(public, secret))
    }

    /// Load a certificate from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// Load a certificate from any reader.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Wrap an rpgp secret key.
    pub fn from_secret_key(secret: SignedSecretKey) -> Self {
        let public = secret.to_public_key();
        Self::from_parts(public, Some(secret))
    }

    /// Wrap an rpgp public key.
    pub fn from_public_key(public: SignedPublicKey) -> Self {
        Self::from_parts(public, None)
    }

    fn from_parts(public: SignedPublicKey, secret: Option<SignedSecretKey>) -> Self {
        Cert {
            inner: Arc::new(CertInner { public, secret }),
        }
    }

    /// Generate a new certificate with a signing and an encryption subkey.
    ///
    /// The primary key certifies only. An empty `password` leaves the
    /// secret material unprotected.
    pub fn generate(password: &str, user_ids: &[&str], cipher: CipherSuite) -> Result<Self> {
        if user_ids.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one user ID is required".to_string(),
            ));
        }

        let mut rng = thread_rng();
        let passphrase = (!password.is_empty()).then(|| password.to_string());

        let mut enc_builder = SubkeyParamsBuilder::default();
        enc_builder
            .key_type(cipher.encryption_key_type())
            .can_encrypt(true)
            .can_sign(false)
            .can_authenticate(false)
            .passphrase(passphrase.clone());
        let encryption = enc_builder
            .build()
            .map_err(|e| Error::InvalidArgument(e.to_string()))?;

        let mut sign_builder = SubkeyParamsBuilder::default();
        sign_builder
            .key_type(cipher.primary_key_type())
            .can_encrypt(false)
            .can_sign(true)
            .can_authenticate(false)
            .passphrase(passphrase.clone());
        let signing = sign_builder
            .build()
            .map_err(|e| Error::InvalidArgument(e.to_string()))?;

        let mut key_params = SecretKeyParamsBuilder::default();
        key_params
            .key_type(cipher.primary_key_type())
            .can_certify(true)
            .can_sign(false)
            .can_encrypt(false)
            .primary_user_id(user_ids[0].to_string())
            .user_ids(user_ids[1..].iter().map(|s| s.to_string()).collect())
            .passphrase(passphrase)
            .subkeys(vec![encryption, signing]);

        let secret_key = key_params
            .build()
            .map_err(|e| Error::InvalidArgument(e.to_string()))?
            .generate(&mut rng)
            .map_err(|e| Error::InvalidOperation(e.to_string()))?;

        let cert = Self::from_secret_key(secret_key);
        debug!("generated certificate {}", cert.fingerprint());
        Ok(cert)
    }

    /// A copy of this certificate without secret key material.
    pub fn strip_secret(&self) -> Cert {
        Self::from_parts(self.inner.public.clone(), None)
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from_pgp(&self.inner.public.primary_key.fingerprint())
    }

    pub fn keyid(&self) -> KeyId {
        KeyId::from_pgp(&self.inner.public.primary_key.legacy_key_id())
    }

    /// User IDs bound to this certificate, in certificate order.
    pub fn user_ids(&self) -> Vec<String> {
        self.inner
            .public
            .details
            .users
            .iter()
            .map(|u| String::from_utf8_lossy(u.id.id()).to_string())
            .collect()
    }

    /// True if this is a transferable secret key.
    pub fn is_tsk(&self) -> bool {
        self.inner.secret.is_some()
    }

    pub fn primary_key(&self) -> Key {
        Key::new(self.clone(), Slot::Primary)
    }

    /// Start a query over every key of this certificate, primary first.
    pub fn keys(&self) -> KeyQuery<'_> {
        KeyQuery::new(self)
    }

    /// Find a key by key ID.
    pub fn key_by_id(&self, id: &KeyId) -> Option<Key> {
        self.keys().iter().find(|k| k.keyid() == *id)
    }

    /// Revocation state of the whole certificate at `time`.
    pub fn revocation_status(&self, time: DateTime<Utc>) -> RevocationStatus {
        self.primary_key().revocation_status(time)
    }

    pub(crate) fn public(&self) -> &SignedPublicKey {
        &self.inner.public
    }

    pub(crate) fn secret(&self) -> Option<&SignedSecretKey> {
        self.inner.secret.as_ref()
    }

    fn subkey_count(&self) -> usize {
        self.inner.public.public_subkeys.len()
    }
}

impl PartialEq for Cert {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint() && self.is_tsk() == other.is_tsk()
    }
}

impl fmt::Debug for Cert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cert")
            .field("fingerprint", &self.fingerprint())
            .field("user_ids", &self.user_ids())
            .field("tsk", &self.is_tsk())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Primary,
    Subkey(usize),
}

/// Borrowed public half of a key, usable for verification and encryption.
pub(crate) enum PublicPart<'a> {
    Primary(&'a PublicKey),
    Subkey(&'a SignedPublicSubKey),
}

/// Borrowed secret half of a key, usable for signing and decryption.
pub(crate) enum SecretPart<'a> {
    Primary(&'a SecretKey),
    Subkey(&'a SecretSubkey),
}

/// One key of a certificate.
///
/// Keys compare by fingerprint. A key remembers the passphrase it was
/// unlocked with so signing and decryption need no further input.
#[derive(Clone)]
pub struct Key {
    cert: Cert,
    slot: Slot,
    password: Option<Arc<Zeroizing<String>>>,
}

impl Key {
    fn new(cert: Cert, slot: Slot) -> Self {
        Key {
            cert,
            slot,
            password: None,
        }
    }

    /// The certificate this key belongs to.
    pub fn cert(&self) -> &Cert {
        &self.cert
    }

    pub fn is_primary(&self) -> bool {
        self.slot == Slot::Primary
    }

    fn subkey(&self) -> Option<&SignedPublicSubKey> {
        match self.slot {
            Slot::Primary => None,
            Slot::Subkey(i) => self.cert.public().public_subkeys.get(i),
        }
    }

    pub(crate) fn public_part(&self) -> Result<PublicPart<'_>> {
        match self.slot {
            Slot::Primary => Ok(PublicPart::Primary(&self.cert.public().primary_key)),
            Slot::Subkey(_) => self
                .subkey()
                .map(PublicPart::Subkey)
                .ok_or(Error::IndexOutOfRange),
        }
    }

    fn public_subkey_packet(&self) -> Option<&PublicSubkey> {
        self.subkey().map(|s| &s.key)
    }

    pub fn keyid(&self) -> KeyId {
        match self.public_subkey_packet() {
            Some(k) => KeyId::from_pgp(&k.legacy_key_id()),
            None => self.cert.keyid(),
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        match self.public_subkey_packet() {
            Some(k) => Fingerprint::from_pgp(&k.fingerprint()),
            None => self.cert.fingerprint(),
        }
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        match self.public_subkey_packet() {
            Some(k) => created_at(k),
            None => created_at(&self.cert.public().primary_key),
        }
    }

    /// When this key stops being valid, if ever.
    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        match self.subkey() {
            Some(s) => subkey_expiration(s),
            None => primary_expiration(self.cert.public()),
        }
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        match self.public_subkey_packet() {
            Some(k) => k.algorithm(),
            None => self.cert.public().primary_key.algorithm(),
        }
    }

    /// Display name of the public key algorithm.
    pub fn algorithm_name(&self) -> String {
        algorithm_name(self.algorithm())
    }

    pub fn bit_length(&self) -> usize {
        match self.public_subkey_packet() {
            Some(k) => key_bit_size(k),
            None => key_bit_size(&self.cert.public().primary_key),
        }
    }

    fn public_params(&self) -> &PublicParams {
        match self.public_subkey_packet() {
            Some(k) => k.public_params(),
            None => self.cert.public().primary_key.public_params(),
        }
    }

    /// Hash algorithm that suits this key when none is requested.
    pub(crate) fn default_hash(&self) -> HashAlgorithm {
        select_hash_for_params(self.public_params())
    }

    fn flags(&self) -> Flags {
        match self.subkey() {
            Some(s) => subkey_flags(s),
            None => primary_flags(self.cert.public()),
        }
    }

    pub(crate) fn secret_part(&self) -> Option<SecretPart<'_>> {
        let secret = self.cert.secret()?;
        match self.slot {
            Slot::Primary => Some(SecretPart::Primary(&secret.primary_key)),
            Slot::Subkey(_) => {
                let fp = self.public_subkey_packet()?.fingerprint();
                secret
                    .secret_subkeys
                    .iter()
                    .find(|sk| sk.key.fingerprint() == fp)
                    .map(|sk| SecretPart::Subkey(&sk.key))
            }
        }
    }

    /// True if secret key material for this key is present.
    pub fn has_secret(&self) -> bool {
        self.secret_part().is_some()
    }

    /// Unlock the secret material with `password`.
    ///
    /// Returns a new key that remembers the passphrase. Fails with
    /// [`Error::InvalidPassword`] if the passphrase is wrong and with
    /// [`Error::InvalidOperation`] if there is no secret material.
    pub fn decrypt_secret(&self, password: &str) -> Result<Key> {
        let pw = Password::from(password);
        let unlocked = match self.secret_part() {
            Some(SecretPart::Primary(k)) => k.unlock(&pw, |_, _| Ok(())),
            Some(SecretPart::Subkey(k)) => k.unlock(&pw, |_, _| Ok(())),
            None => {
                return Err(Error::InvalidOperation(format!(
                    "key {} has no secret key material",
                    self.keyid()
                )))
            }
        };
        unlocked.map_err(|_| Error::InvalidPassword)?;

        Ok(Key {
            cert: self.cert.clone(),
            slot: self.slot,
            password: Some(Arc::new(Zeroizing::new(password.to_string()))),
        })
    }

    /// Passphrase for the secret material (empty if none was supplied).
    pub(crate) fn password(&self) -> Password {
        match &self.password {
            Some(pw) => Password::from(pw.as_str()),
            None => Password::from(""),
        }
    }

    /// Revocation state of this key at `time`.
    ///
    /// A revoked primary key revokes every subkey.
    pub fn revocation_status(&self, time: DateTime<Utc>) -> RevocationStatus {
        let mut sigs = primary_revocations(self.cert.public(), time);
        if let Some(sub) = self.subkey() {
            sigs.extend(subkey_revocations(sub, time));
        }
        if sigs.is_empty() {
            RevocationStatus::NotAsFarAsWeKnow
        } else {
            RevocationStatus::Revoked(sigs)
        }
    }

    /// Check that this key is usable at `time` under `policy`.
    pub fn check_validity(&self, policy: &dyn Policy, time: DateTime<Utc>) -> Result<()> {
        policy.public_key(self.algorithm())?;

        if self.creation_time() > time {
            return Err(Error::NotYetLive(format!("key {}", self.keyid())));
        }
        if let Some(exp) = primary_expiration(self.cert.public()) {
            if exp <= time {
                return Err(Error::Expired(format!("certificate {}", self.cert.keyid())));
            }
        }
        if let Some(exp) = self.expiration_time() {
            if exp <= time {
                return Err(Error::Expired(format!("key {}", self.keyid())));
            }
        }
        if let RevocationStatus::Revoked(_) = self.revocation_status(time) {
            return Err(Error::Expired(format!("key {} is revoked", self.keyid())));
        }
        Ok(())
    }

    pub fn can_sign(&self) -> bool {
        self.flags().sign && self.algorithm().can_sign()
    }

    pub fn can_encrypt_for_transport(&self) -> bool {
        self.flags().encrypt_comms && self.algorithm().can_encrypt()
    }

    pub fn can_encrypt_at_rest(&self) -> bool {
        self.flags().encrypt_storage && self.algorithm().can_encrypt()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.fingerprint().hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("fingerprint", &self.fingerprint())
            .field("algorithm", &self.algorithm_name())
            .field("primary", &self.is_primary())
            .field("secret", &self.has_secret())
            .finish()
    }
}

/// Filtered view over the keys of a certificate.
///
/// Capability filters are additive: asking for signing and transport
/// encryption yields keys that can do either. Without a policy every key
/// is returned regardless of its lifetime.
#[derive(Clone)]
pub struct KeyQuery<'a> {
    cert: &'a Cert,
    policy: Option<(&'a dyn Policy, DateTime<Utc>)>,
    signing: bool,
    transport: bool,
    storage: bool,
    secret: bool,
    unlocked_with: Option<&'a str>,
}

impl<'a> KeyQuery<'a> {
    fn new(cert: &'a Cert) -> Self {
        KeyQuery {
            cert,
            policy: None,
            signing: false,
            transport: false,
            storage: false,
            secret: false,
            unlocked_with: None,
        }
    }

    /// Only keys valid at `time` under `policy`.
    pub fn with_policy(mut self, policy: &'a dyn Policy, time: Option<DateTime<Utc>>) -> Self {
        self.policy = Some((policy, time.unwrap_or_else(Utc::now)));
        self
    }

    pub fn for_signing(mut self) -> Self {
        self.signing = true;
        self
    }

    pub fn for_transport_encryption(mut self) -> Self {
        self.transport = true;
        self
    }

    pub fn for_storage_encryption(mut self) -> Self {
        self.storage = true;
        self
    }

    /// Only keys with secret material.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Unlock every returned key with `password`, skipping keys it fails on.
    pub fn unlocked_with(mut self, password: &'a str) -> Self {
        self.secret = true;
        self.unlocked_with = Some(password);
        self
    }

    fn matches(&self, key: &Key) -> bool {
        if let Some((policy, time)) = self.policy {
            if let Err(e) = key.check_validity(policy, time) {
                debug!("skipping key {}: {}", key.keyid(), e);
                return false;
            }
        }
        if self.secret && !key.has_secret() {
            return false;
        }
        if self.signing || self.transport || self.storage {
            let capable = (self.signing && key.can_sign())
                || (self.transport && key.can_encrypt_for_transport())
                || (self.storage && key.can_encrypt_at_rest());
            if !capable {
                return false;
            }
        }
        true
    }

    /// Iterate over the matching keys, primary first then subkeys in order.
    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        let cert = self.cert;
        std::iter::once(Slot::Primary)
            .chain((0..cert.subkey_count()).map(Slot::Subkey))
            .map(move |slot| Key::new(cert.clone(), slot))
            .filter(move |key| self.matches(key))
            .filter_map(move |key| match self.unlocked_with {
                Some(pw) => key.decrypt_secret(pw).ok(),
                None => Some(key),
            })
    }

    pub fn collect(&self) -> Vec<Key> {
        self.iter().collect()
    }
}

/// Whether a key or certificate has been revoked.
#[derive(Debug, Clone)]
pub enum RevocationStatus {
    /// Revoked by its owner; carries the revocation signatures.
    Revoked(Vec<Signature>),
    NotAsFarAsWeKnow,
}

impl RevocationStatus {
    pub fn is_revoked(&self) -> bool {
        matches!(self, RevocationStatus::Revoked(_))
    }
}

impl fmt::Display for RevocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevocationStatus::Revoked(sigs) => write!(f, "Revoked ({} signatures)", sigs.len()),
            RevocationStatus::NotAsFarAsWeKnow => f.write_str("Not revoked as far as we know"),
        }
    }
}

/// One addressee of an encryption layer: a key ID paired with its public key.
#[derive(Clone, Debug)]
pub struct Recipient {
    keyid: KeyId,
    key: Key,
}

impl Recipient {
    /// Address a key. The key must be able to encrypt.
    pub fn new(key: &Key) -> Result<Self> {
        if !key.algorithm().can_encrypt() {
            return Err(Error::InvalidArgument(format!(
                "{} key {} cannot encrypt",
                key.algorithm_name(),
                key.keyid()
            )));
        }
        Ok(Recipient {
            keyid: key.keyid(),
            key: key.clone(),
        })
    }

    /// All transport-encryption keys of `cert` valid at `time`.
    pub fn all_for(cert: &Cert, policy: &dyn Policy, time: Option<DateTime<Utc>>) -> Result<Vec<Self>> {
        let recipients = cert
            .keys()
            .with_policy(policy, time)
            .for_transport_encryption()
            .iter()
            .map(|k| Recipient::new(&k))
            .collect::<Result<Vec<_>>>()?;
        if recipients.is_empty() {
            return Err(Error::UnsupportedCert(format!(
                "certificate {} has no usable encryption key",
                cert.fingerprint()
            )));
        }
        Ok(recipients)
    }

    pub fn keyid(&self) -> KeyId {
        self.keyid
    }

    pub fn key(&self) -> &Key {
        &self.key
    }
}

/// A key pair able to produce signatures.
#[derive(Clone, Debug)]
pub struct Signer {
    key: Key,
}

impl Signer {
    /// Turn an unlocked secret key into a signer.
    pub fn new(key: Key) -> Result<Self> {
        if !key.has_secret() {
            return Err(Error::InvalidArgument(format!(
                "key {} has no secret key material",
                key.keyid()
            )));
        }
        if !key.algorithm().can_sign() {
            return Err(Error::InvalidArgument(format!(
                "{} key {} cannot sign",
                key.algorithm_name(),
                key.keyid()
            )));
        }
        Ok(Signer { key })
    }

    /// Every signing key of `cert` valid at `time`, unlocked with `password`.
    pub fn all_for(
        cert: &Cert,
        policy: &dyn Policy,
        time: Option<DateTime<Utc>>,
        password: &str,
    ) -> Result<Vec<Self>> {
        let signers = cert
            .keys()
            .with_policy(policy, time)
            .for_signing()
            .unlocked_with(password)
            .iter()
            .map(Signer::new)
            .collect::<Result<Vec<_>>>()?;
        if signers.is_empty() {
            return Err(Error::UnsupportedCert(format!(
                "certificate {} has no usable signing key",
                cert.fingerprint()
            )));
        }
        Ok(signers)
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn keyid(&self) -> KeyId {
        self.key.keyid()
    }

    pub(crate) fn secret_part(&self) -> Result<SecretPart<'_>> {
        self.key.secret_part().ok_or_else(|| {
            Error::InvalidOperation(format!("secret material for {} vanished", self.keyid()))
        })
    }

    pub(crate) fn password(&self) -> Password {
        self.key.password()
    }
}

impl TryFrom<Key> for Signer {
    type Error = Error;

    fn try_from(key: Key) -> Result<Self> {
        Signer::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::StandardPolicy;

    const PASSWORD: &str = "cert-test";

    fn test_cert() -> Cert {
        Cert::generate(PASSWORD, &["Test User <test@example.com>"], CipherSuite::Cv25519).unwrap()
    }

    #[test]
    fn test_key_capabilities() {
        let cert = test_cert();
        let policy = StandardPolicy::new();

        let all = cert.keys().collect();
        assert_eq!(all.len(), 3);
        assert!(all[0].is_primary());

        let signing = cert.keys().with_policy(&policy, None).for_signing().collect();
        assert_eq!(signing.len(), 1);
        assert!(!signing[0].is_primary());

        let transport = cert.keys().with_policy(&policy, None).for_transport_encryption().collect();
        assert_eq!(transport.len(), 1);
        assert_ne!(transport[0], signing[0]);

        let either = cert
            .keys()
            .with_policy(&policy, None)
            .for_signing()
            .for_transport_encryption()
            .collect();
        assert_eq!(either.len(), 2);
    }

    #[test]
    fn test_secret_filter_on_public_cert() {
        let cert = test_cert();
        assert!(cert.is_tsk());
        assert_eq!(cert.keys().secret().collect().len(), 3);

        let public = cert.strip_secret();
        assert!(!public.is_tsk());
        assert!(public.keys().secret().collect().is_empty());
        assert_eq!(public.fingerprint(), cert.fingerprint());
    }

    #[test]
    fn test_not_yet_live() {
        let cert = test_cert();
        let policy = StandardPolicy::new();
        let past = Utc::now() - chrono::Duration::days(365);
        assert!(cert.keys().with_policy(&policy, Some(past)).collect().is_empty());
        assert!(matches!(
            cert.primary_key().check_validity(&policy, past),
            Err(Error::NotYetLive(_))
        ));
    }

    #[test]
    fn test_decrypt_secret() {
        let cert = test_cert();
        let key = cert.keys().for_signing().collect().remove(0);

        assert!(matches!(key.decrypt_secret("wrong"), Err(Error::InvalidPassword)));
        let unlocked = key.decrypt_secret(PASSWORD).unwrap();
        assert_eq!(unlocked, key);

        let public_key = cert.strip_secret().primary_key();
        assert!(matches!(
            public_key.decrypt_secret(PASSWORD),
            Err(Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_signer_requires_secret() {
        let cert = test_cert();
        let public = cert.strip_secret();
        let key = public.keys().for_signing().collect().remove(0);
        assert!(matches!(Signer::new(key), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_user_ids_and_lookup() {
        let cert = Cert::generate(
            "",
            &["Alice <alice@example.com>", "Alice <alice@work.example>"],
            CipherSuite::Cv25519,
        )
        .unwrap();
        assert_eq!(cert.user_ids().len(), 2);
        let sub = cert.keys().for_transport_encryption().collect().remove(0);
        assert_eq!(cert.key_by_id(&sub.keyid()), Some(sub));
        assert!(!cert.revocation_status(Utc::now()).is_revoked());
    }
}
