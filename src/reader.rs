//! The reader, decryptor and verifier engines.
//!
//! A message is decoded in a fixed order: session key packets are
//! collected and (for encrypted messages) the session key is resolved
//! through the caller's helper, the containers are peeled, certificates for
//! every recipient and signer are requested, every signature is checked,
//! and finally the helper's `check` sees the complete [`MessageStructure`].
//! Only when `check` accepts it does the caller get to read plaintext.
//!
//! Input is parsed as it is pulled from the source, armored or not. The
//! plaintext is held back until the check has passed.

use std::io::{self, BufRead, BufReader, Cursor, Read};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use pgp::composed::{DetachedSignature, Esk, Message};
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::packet::{Packet as PgpPacket, PacketParser, Signature};
use pgp::types::Password;
use zeroize::Zeroizing;

use crate::armor::{dearmor, is_armored, ArmorReader};
use crate::cert::{Cert, Key, PublicPart};
use crate::error::{Error, Result, Status};
use crate::packet::{Packet, Pkesk, Skesk};
use crate::policy::Policy;
use crate::structure::{GoodChecksum, MessageLayer, MessageStructure, VerificationResult};
use crate::types::{Fingerprint, KeyId, SessionKey};

/// Supplies certificates and accepts or rejects decoded messages.
pub trait VerificationHelper {
    /// Certificates that may hold the given keys.
    ///
    /// Called once per message, after the body was read and before the
    /// structure check. The IDs are the PKESK recipients together with the
    /// signature issuers, sorted and without duplicates.
    fn get_certificates(&mut self, ids: &[KeyId]) -> Result<Vec<Cert>>;

    /// Accept or reject the fully decoded message structure.
    fn check(&mut self, structure: &MessageStructure) -> Result<()>;
}

/// Additionally resolves session keys for encrypted messages.
pub trait DecryptionHelper: VerificationHelper {
    /// Pick the material that unlocks the message.
    fn get_session_key(&mut self, pkesks: &[Pkesk], skesks: &[Skesk])
        -> Result<ResolvedSessionKey>;
}

/// What unlocks an encrypted message.
#[derive(Debug, Clone)]
pub enum SessionKeySource {
    /// A session key decrypted by the caller.
    SessionKey(SessionKey),
    /// A secret key whose PKESK the codec decrypts.
    Key(Key),
    /// A password for one of the SKESKs.
    Password(Zeroizing<String>),
}

/// Result of session key resolution: the material plus the fingerprint of
/// the key it came from, if any.
#[derive(Debug, Clone)]
pub struct ResolvedSessionKey {
    source: SessionKeySource,
    fingerprint: Option<Fingerprint>,
}

impl ResolvedSessionKey {
    pub fn from_session_key(session_key: SessionKey, fingerprint: Option<Fingerprint>) -> Self {
        ResolvedSessionKey {
            source: SessionKeySource::SessionKey(session_key),
            fingerprint,
        }
    }

    pub fn from_key(key: Key) -> Self {
        ResolvedSessionKey {
            fingerprint: Some(key.fingerprint()),
            source: SessionKeySource::Key(key),
        }
    }

    pub fn from_password(password: &str) -> Self {
        ResolvedSessionKey {
            source: SessionKeySource::Password(Zeroizing::new(password.to_string())),
            fingerprint: None,
        }
    }

    pub fn source(&self) -> &SessionKeySource {
        &self.source
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    /// The cipher, when the caller decrypted the session key itself.
    pub fn algorithm(&self) -> Option<SymmetricKeyAlgorithm> {
        match &self.source {
            SessionKeySource::SessionKey(sk) => Some(sk.algorithm()),
            _ => None,
        }
    }
}

type CertsFn<'a> = Box<dyn FnMut(&[KeyId]) -> Result<Vec<Cert>> + 'a>;
type SessionKeyFn<'a> = Box<dyn FnMut(&[Pkesk], &[Skesk]) -> Result<ResolvedSessionKey> + 'a>;
type CheckFn<'a> = Box<dyn FnMut(&MessageStructure) -> Status + 'a>;

/// A helper assembled from closures.
///
/// The check closure returns a [`Status`]; anything but success aborts the
/// read with an error of that kind.
pub struct Callbacks<'a> {
    get_certificates: CertsFn<'a>,
    get_session_key: Option<SessionKeyFn<'a>>,
    check: CheckFn<'a>,
}

impl<'a> Callbacks<'a> {
    pub fn new<G, C>(get_certificates: G, check: C) -> Self
    where
        G: FnMut(&[KeyId]) -> Result<Vec<Cert>> + 'a,
        C: FnMut(&MessageStructure) -> Status + 'a,
    {
        Callbacks {
            get_certificates: Box::new(get_certificates),
            get_session_key: None,
            check: Box::new(check),
        }
    }

    /// Add a session key resolver, needed for decryption.
    pub fn with_session_key<S>(mut self, get_session_key: S) -> Self
    where
        S: FnMut(&[Pkesk], &[Skesk]) -> Result<ResolvedSessionKey> + 'a,
    {
        self.get_session_key = Some(Box::new(get_session_key));
        self
    }
}

impl VerificationHelper for Callbacks<'_> {
    fn get_certificates(&mut self, ids: &[KeyId]) -> Result<Vec<Cert>> {
        (self.get_certificates)(ids)
    }

    fn check(&mut self, structure: &MessageStructure) -> Result<()> {
        (self.check)(structure).into_result("message structure rejected")
    }
}

impl DecryptionHelper for Callbacks<'_> {
    fn get_session_key(&mut self, pkesks: &[Pkesk], skesks: &[Skesk]) -> Result<ResolvedSessionKey> {
        match self.get_session_key.as_mut() {
            Some(f) => f(pkesks, skesks),
            None => Err(Error::MissingSessionKey(
                "no session key callback configured".to_string(),
            )),
        }
    }
}

/// A helper backed by a fixed set of certificates and passwords.
///
/// Session keys are resolved PKESK by PKESK: every secret key valid at the
/// evaluation time whose key ID matches is tried in keyring order, and the
/// first one that decrypts the packet wins. Passwords are tried only when
/// no PKESK yields a session key. The default check accepts a message when
/// every signature group has at least one good signature, and refuses
/// plain messages that carry no signature at all.
pub struct KeyringHelper<'a> {
    certs: Vec<Cert>,
    passwords: Vec<Zeroizing<String>>,
    key_password: Option<Zeroizing<String>>,
    policy: &'a dyn Policy,
    time: DateTime<Utc>,
    check: Option<CheckFn<'a>>,
}

impl<'a> KeyringHelper<'a> {
    pub fn new(certs: Vec<Cert>, policy: &'a dyn Policy, time: Option<DateTime<Utc>>) -> Self {
        KeyringHelper {
            certs,
            passwords: Vec::new(),
            key_password: None,
            policy,
            time: time.unwrap_or_else(Utc::now),
            check: None,
        }
    }

    /// Also try this message password.
    pub fn with_password(mut self, password: &str) -> Self {
        self.passwords.push(Zeroizing::new(password.to_string()));
        self
    }

    /// Passphrase protecting the secret keys.
    pub fn with_key_password(mut self, password: &str) -> Self {
        self.key_password = Some(Zeroizing::new(password.to_string()));
        self
    }

    /// Replace the default structure check.
    pub fn with_check<C>(mut self, check: C) -> Self
    where
        C: FnMut(&MessageStructure) -> Status + 'a,
    {
        self.check = Some(Box::new(check));
        self
    }

    pub fn certs(&self) -> &[Cert] {
        &self.certs
    }

    fn secret_keys(&self) -> Vec<Key> {
        self.certs
            .iter()
            .flat_map(|cert| {
                cert.keys()
                    .with_policy(self.policy, Some(self.time))
                    .for_transport_encryption()
                    .for_storage_encryption()
                    .secret()
                    .collect()
            })
            .collect()
    }
}

impl VerificationHelper for KeyringHelper<'_> {
    fn get_certificates(&mut self, ids: &[KeyId]) -> Result<Vec<Cert>> {
        if ids.is_empty() {
            return Ok(self.certs.clone());
        }
        Ok(self
            .certs
            .iter()
            .filter(|cert| ids.iter().any(|id| cert.key_by_id(id).is_some()))
            .cloned()
            .collect())
    }

    fn check(&mut self, structure: &MessageStructure) -> Result<()> {
        if let Some(check) = self.check.as_mut() {
            return check(structure).into_result("message structure rejected");
        }
        if !structure.is_encrypted() && structure.results().next().is_none() {
            return Err(Error::BadSignature("message is not signed".to_string()));
        }
        for layer in structure {
            if let Some(results) = layer.signature_group() {
                if !results.iter().any(VerificationResult::is_good) {
                    let reason = results
                        .iter()
                        .map(|r| r.to_string())
                        .collect::<Vec<_>>()
                        .join("; ");
                    return Err(Error::BadSignature(reason));
                }
            }
        }
        Ok(())
    }
}

impl DecryptionHelper for KeyringHelper<'_> {
    fn get_session_key(&mut self, pkesks: &[Pkesk], skesks: &[Skesk]) -> Result<ResolvedSessionKey> {
        let keys = self.secret_keys();
        let mut locked = None;
        for pkesk in pkesks {
            for key in keys.iter().filter(|key| pkesk.is_for(key)) {
                debug!("trying {} with key {}", Packet::from(pkesk.clone()), key.fingerprint());
                let key = match &self.key_password {
                    Some(pw) => match key.decrypt_secret(pw) {
                        Ok(unlocked) => unlocked,
                        Err(e) => {
                            debug!("cannot unlock {}: {}", key.fingerprint(), e);
                            locked = Some(e);
                            continue;
                        }
                    },
                    None => key.clone(),
                };
                match pkesk.decrypt(&key) {
                    Ok(session_key) => {
                        return Ok(ResolvedSessionKey::from_session_key(
                            session_key,
                            Some(key.fingerprint()),
                        ))
                    }
                    // v6 session keys leave the cipher to the encrypted data
                    Err(Error::UnsupportedSymmetricAlgorithm(_)) => {
                        return Ok(ResolvedSessionKey::from_key(key))
                    }
                    Err(e) => debug!("key {} does not decrypt the PKESK: {}", key.fingerprint(), e),
                }
            }
        }
        if !skesks.is_empty() {
            if let Some(pw) = self.passwords.first() {
                return Ok(ResolvedSessionKey::from_password(pw));
            }
        }
        Err(locked.unwrap_or_else(|| Error::MissingSessionKey("no valid decryption key".to_string())))
    }
}

/// Plaintext of a decoded message, available once the structure check passed.
pub struct MessageReader<H> {
    plaintext: Cursor<Vec<u8>>,
    structure: MessageStructure,
    helper: H,
}

impl<H> MessageReader<H> {
    /// The decoded structure, as the helper's check saw it.
    pub fn structure(&self) -> &MessageStructure {
        &self.structure
    }

    pub fn helper(&self) -> &H {
        &self.helper
    }

    pub fn into_helper(self) -> H {
        self.helper
    }

    /// Drop the reader, keeping the decoded structure.
    pub fn into_structure(self) -> MessageStructure {
        self.structure
    }

    /// True once every plaintext byte has been read.
    pub fn message_processed(&self) -> bool {
        self.plaintext.position() as usize >= self.plaintext.get_ref().len()
    }

    /// Read all remaining plaintext.
    pub fn read_to_vec(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.plaintext.read_to_end(&mut out)?;
        Ok(out)
    }
}

impl<H> Read for MessageReader<H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.plaintext.read(buf)
    }
}

/// Decrypts (and verifies) messages.
pub struct Decryptor;

impl Decryptor {
    pub fn from_bytes<H: DecryptionHelper>(
        policy: &dyn Policy,
        data: &[u8],
        helper: H,
        time: Option<DateTime<Utc>>,
    ) -> Result<MessageReader<H>> {
        Self::from_buf_read(policy, data, helper, time)
    }

    /// Decode a message pulled from `reader`.
    pub fn from_reader<H: DecryptionHelper>(
        policy: &dyn Policy,
        reader: impl Read + std::fmt::Debug + Send,
        helper: H,
        time: Option<DateTime<Utc>>,
    ) -> Result<MessageReader<H>> {
        Self::from_buf_read(policy, BufReader::new(reader), helper, time)
    }

    fn from_buf_read<H: DecryptionHelper>(
        policy: &dyn Policy,
        input: impl BufRead + std::fmt::Debug + Send,
        mut helper: H,
        time: Option<DateTime<Utc>>,
    ) -> Result<MessageReader<H>> {
        let engine = Engine::new(policy, time);
        let (plaintext, structure) = engine.decode(input, &mut helper, |h, p, s| {
            h.get_session_key(p, s)
        })?;
        Ok(MessageReader {
            plaintext: Cursor::new(plaintext),
            structure,
            helper,
        })
    }
}

/// Verifies signed messages.
pub struct Verifier;

impl Verifier {
    pub fn from_bytes<H: VerificationHelper>(
        policy: &dyn Policy,
        data: &[u8],
        helper: H,
        time: Option<DateTime<Utc>>,
    ) -> Result<MessageReader<H>> {
        Self::from_buf_read(policy, data, helper, time)
    }

    /// Verify a message pulled from `reader`.
    pub fn from_reader<H: VerificationHelper>(
        policy: &dyn Policy,
        reader: impl Read + std::fmt::Debug + Send,
        helper: H,
        time: Option<DateTime<Utc>>,
    ) -> Result<MessageReader<H>> {
        Self::from_buf_read(policy, BufReader::new(reader), helper, time)
    }

    fn from_buf_read<H: VerificationHelper>(
        policy: &dyn Policy,
        input: impl BufRead + std::fmt::Debug + Send,
        mut helper: H,
        time: Option<DateTime<Utc>>,
    ) -> Result<MessageReader<H>> {
        let engine = Engine::new(policy, time);
        let (plaintext, structure) = engine.decode(input, &mut helper, |_, _, _| {
            Err(Error::InvalidOperation(
                "message is encrypted, use a decryptor".to_string(),
            ))
        })?;
        Ok(MessageReader {
            plaintext: Cursor::new(plaintext),
            structure,
            helper,
        })
    }
}

/// Verifies detached signatures against separately supplied data.
pub struct DetachedVerifier<'p, H> {
    engine: Engine<'p>,
    signatures: Vec<Signature>,
    helper: H,
}

impl<'p, H: VerificationHelper> DetachedVerifier<'p, H> {
    /// Parse one or more signatures, armored or binary.
    pub fn from_bytes(
        policy: &'p dyn Policy,
        signatures: &[u8],
        helper: H,
        time: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        let raw = unarmor(signatures)?;
        let mut sigs = Vec::new();
        for packet in PacketParser::new(Cursor::new(&raw[..])) {
            match packet.map_err(|e| Error::MalformedPacket(e.to_string()))? {
                PgpPacket::Signature(sig) => sigs.push(sig),
                _ => {
                    return Err(Error::MalformedMessage(
                        "detached signatures may only contain signature packets".to_string(),
                    ))
                }
            }
        }
        if sigs.is_empty() {
            return Err(Error::MalformedMessage("no signature found".to_string()));
        }
        Ok(DetachedVerifier {
            engine: Engine::new(policy, time),
            signatures: sigs,
            helper,
        })
    }

    pub fn from_reader(
        policy: &'p dyn Policy,
        mut signatures: impl Read,
        helper: H,
        time: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        let mut data = Vec::new();
        signatures.read_to_end(&mut data)?;
        Self::from_bytes(policy, &data, helper, time)
    }

    /// Check the signatures over `data`; the helper's check decides.
    pub fn verify(&mut self, mut data: impl Read) -> Result<()> {
        let mut content = Vec::new();
        data.read_to_end(&mut content)?;

        let ids = issuers_of(&self.signatures);
        let certs = self.engine.certificates(&mut self.helper, &ids, true)?;
        let results = self
            .signatures
            .iter()
            .map(|sig| self.engine.verify_signature(sig, &content, &certs))
            .collect();

        let mut structure = MessageStructure::new();
        structure.push(MessageLayer::SignatureGroup { results });
        self.helper.check(&structure)
    }

    /// Like [`DetachedVerifier::verify`], reporting the outcome as a status.
    pub fn verify_status(&mut self, data: impl Read) -> Status {
        Status::of(&self.verify(data))
    }

    pub fn into_helper(self) -> H {
        self.helper
    }
}

fn unarmor(data: &[u8]) -> Result<Vec<u8>> {
    if is_armored(data) {
        dearmor(data).map(|(_, body)| body)
    } else {
        Ok(data.to_vec())
    }
}

fn issuers_of(sigs: &[Signature]) -> Vec<KeyId> {
    let mut ids: Vec<KeyId> = sigs
        .iter()
        .flat_map(|sig| sig.issuer_key_id().into_iter().map(KeyId::from_pgp))
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Parse a message as it is read, removing armor on the way if present.
fn open_message<'a, R: BufRead + std::fmt::Debug + Send + 'a>(mut input: R) -> Result<Message<'a>> {
    let parsed = if is_armored(input.fill_buf()?) {
        let armored = ArmorReader::new(input, None)?;
        Message::from_bytes(BufReader::new(armored))
    } else {
        Message::from_bytes(input)
    };
    parsed.map_err(|e| Error::MalformedMessage(e.to_string()))
}

/// Signatures of every signed layer, one-pass or prefixed, outermost first.
fn collect_signatures(message: &Message<'_>) -> Vec<Signature> {
    let mut sigs = Vec::new();
    let mut current = message;
    loop {
        current = match current {
            Message::SignedOnePass { reader, .. } => {
                if let Some(sig) = reader.signature() {
                    sigs.push(sig.clone());
                }
                reader.get_ref()
            }
            Message::Signed { reader, .. } => {
                sigs.push(reader.signature().clone());
                reader.get_ref()
            }
            _ => break,
        };
    }
    sigs
}

/// Shared decoding logic, bound to a policy and an evaluation time.
struct Engine<'p> {
    policy: &'p dyn Policy,
    time: DateTime<Utc>,
}

impl<'p> Engine<'p> {
    fn new(policy: &'p dyn Policy, time: Option<DateTime<Utc>>) -> Self {
        Engine {
            policy,
            time: time.unwrap_or_else(Utc::now),
        }
    }

    /// Ask the helper for certificates. An empty answer is an error when
    /// something actually needs a key.
    fn certificates<H: VerificationHelper>(
        &self,
        helper: &mut H,
        ids: &[KeyId],
        required: bool,
    ) -> Result<Vec<Cert>> {
        let certs = helper.get_certificates(ids)?;
        debug!("helper returned {} certificate(s) for {} key ID(s)", certs.len(), ids.len());
        if certs.is_empty() && required {
            return Err(Error::UnsupportedCert("no certificate found".to_string()));
        }
        Ok(certs)
    }

    fn decode<R, H, F>(
        &self,
        input: R,
        helper: &mut H,
        mut resolve: F,
    ) -> Result<(Vec<u8>, MessageStructure)>
    where
        R: BufRead + std::fmt::Debug + Send,
        H: VerificationHelper,
        F: FnMut(&mut H, &[Pkesk], &[Skesk]) -> Result<ResolvedSessionKey>,
    {
        let message = open_message(input)?;
        let mut structure = MessageStructure::new();

        let mut recipients: Vec<KeyId> = Vec::new();
        let mut key_resolved = false;
        let mut read_failure = ReadFailure::Plain;

        let esk = match &message {
            Message::Encrypted { esk, .. } => Some(esk.clone()),
            _ => None,
        };
        let message = match esk {
            Some(esk) => {
                let mut pkesks = Vec::new();
                let mut skesks = Vec::new();
                for packet in esk {
                    match packet {
                        Esk::PublicKeyEncryptedSessionKey(p) => pkesks.push(Pkesk::new(p)),
                        Esk::SymKeyEncryptedSessionKey(s) => skesks.push(Skesk::new(s)),
                    }
                }
                debug!("encrypted message: {} PKESK(s), {} SKESK(s)", pkesks.len(), skesks.len());

                recipients = pkesks
                    .iter()
                    .filter_map(Pkesk::recipient)
                    .filter(|id| !id.is_wildcard())
                    .collect();

                let resolved = resolve(helper, &pkesks, &skesks)?;
                key_resolved = resolved.fingerprint().is_some();
                let sym_algo = resolved.algorithm();
                if let Some(algo) = sym_algo {
                    self.policy.symmetric(algo)?;
                }
                let (decrypted, failure) = decrypt(message, resolved)?;
                read_failure = failure;
                structure.push(MessageLayer::Encryption { sym_algo });
                decrypted
            }
            None => message,
        };

        let mut message = if message.is_compressed() {
            structure.push(MessageLayer::Compression);
            message
                .decompress()
                .map_err(|e| read_failure.error(e.to_string()))?
        } else {
            message
        };

        let body = message
            .as_data_vec()
            .map_err(|e| read_failure.error(e.to_string()))?;
        let sigs = collect_signatures(&message);

        let mut ids = recipients;
        ids.extend(issuers_of(&sigs));
        ids.sort();
        ids.dedup();
        let certs = self.certificates(helper, &ids, !sigs.is_empty() || key_resolved)?;

        if !sigs.is_empty() {
            let results = sigs
                .iter()
                .map(|sig| self.verify_signature(sig, &body, &certs))
                .collect();
            structure.push(MessageLayer::SignatureGroup { results });
        }

        debug!("message structure {:?}", structure.shape());
        helper.check(&structure)?;
        Ok((body, structure))
    }

    fn verify_signature(&self, sig: &Signature, data: &[u8], certs: &[Cert]) -> VerificationResult {
        let issuers: Vec<KeyId> = sig.issuer_key_id().into_iter().map(KeyId::from_pgp).collect();

        let candidates: Vec<Key> = certs
            .iter()
            .flat_map(|cert| cert.keys().collect())
            .filter(|key| issuers.is_empty() || issuers.contains(&key.keyid()))
            .collect();
        if candidates.is_empty() {
            return VerificationResult::MissingKey {
                sig: sig.clone(),
                issuers,
            };
        }

        if let Some(hash) = sig.hash_alg() {
            if let Err(error) = self.policy.hash(hash) {
                return VerificationResult::BadChecksum {
                    sig: sig.clone(),
                    cert: Some(candidates[0].cert().clone()),
                    error,
                };
            }
        }

        let checked = DetachedSignature::new(sig.clone());
        let mut last_error = None;
        for key in candidates {
            let verified = match key.public_part() {
                Ok(PublicPart::Primary(k)) => checked.verify(k, data),
                Ok(PublicPart::Subkey(k)) => checked.verify(&k.key, data),
                Err(e) => {
                    last_error = Some((key, e));
                    continue;
                }
            };
            if let Err(e) = verified {
                last_error = Some((key, Error::BadSignature(e.to_string())));
                continue;
            }

            if let Some(created) = sig.created() {
                let created = DateTime::from_timestamp(created.as_secs() as i64, 0);
                if created.is_some_and(|c| c > self.time) {
                    return VerificationResult::BadChecksum {
                        sig: sig.clone(),
                        cert: Some(key.cert().clone()),
                        error: Error::NotYetLive("signature created after evaluation time".to_string()),
                    };
                }
            }

            let cert = key.cert().clone();
            if let Err(error) = key.check_validity(self.policy, self.time) {
                return VerificationResult::UnboundKey {
                    sig: sig.clone(),
                    cert,
                    error,
                };
            }
            if !key.can_sign() {
                return VerificationResult::UnboundKey {
                    sig: sig.clone(),
                    cert,
                    error: Error::InvalidOperation(format!("key {} is not signing-capable", key.keyid())),
                };
            }

            debug!("good signature from {}", key.fingerprint());
            return VerificationResult::GoodChecksum(GoodChecksum {
                sig: sig.clone(),
                revocation_status: key.revocation_status(self.time),
                cert,
                key,
            });
        }

        let (key, error) = match last_error {
            Some(found) => found,
            None => {
                return VerificationResult::MissingKey {
                    sig: sig.clone(),
                    issuers,
                }
            }
        };
        warn!("bad signature for issuer {}: {}", key.keyid(), error);
        VerificationResult::BadChecksum {
            sig: sig.clone(),
            cert: Some(key.cert().clone()),
            error,
        }
    }
}

/// How failures while reading decrypted data are reported.
#[derive(Debug, Clone, Copy)]
enum ReadFailure {
    Plain,
    Password,
    Integrity,
}

impl ReadFailure {
    fn error(self, msg: String) -> Error {
        match self {
            ReadFailure::Plain => Error::MalformedMessage(msg),
            // A wrong password is only noticed once the integrity check fails.
            ReadFailure::Password => Error::InvalidPassword,
            ReadFailure::Integrity => {
                debug!("integrity failure: {}", msg);
                Error::ManipulatedMessage
            }
        }
    }
}

fn decrypt<'a>(message: Message<'a>, resolved: ResolvedSessionKey) -> Result<(Message<'a>, ReadFailure)> {
    match resolved.source {
        SessionKeySource::SessionKey(sk) => {
            let msg = message
                .decrypt_with_session_key(sk.to_plain())
                .map_err(|_| Error::InvalidSessionKey)?;
            Ok((msg, ReadFailure::Integrity))
        }
        SessionKeySource::Key(key) => {
            let secret = key.cert().secret().ok_or_else(|| {
                Error::MissingSessionKey(format!("key {} has no secret key material", key.keyid()))
            })?;
            let msg = message
                .decrypt(&key.password(), secret)
                .map_err(|_| Error::InvalidSessionKey)?;
            Ok((msg, ReadFailure::Integrity))
        }
        SessionKeySource::Password(pw) => {
            let msg = message
                .decrypt_with_password(&Password::from(pw.as_str()))
                .map_err(|_| Error::InvalidPassword)?;
            Ok((msg, ReadFailure::Password))
        }
    }
}
