//! The writer transform stack.
//!
//! A [`WriterStack`] wraps a sink in layers: encryption, compression,
//! signing, literal data framing and raw packet framing. Layers pushed
//! later sit closer to the plaintext, so the usual encrypt, sign, literal
//! message is built with:
//!
//! ```no_run
//! # use openpgp_stack::{WriterStack, Recipient, Signer};
//! # fn demo(recipients: Vec<Recipient>, signers: Vec<Signer>) -> openpgp_stack::Result<Vec<u8>> {
//! let mut stack = WriterStack::new(Vec::new())
//!     .push_encrypt(&[], &recipients, 0)?
//!     .push_sign(&signers, None)?
//!     .push_literal();
//! stack.write_all(b"Hello world!")?;
//! let ciphertext = stack.finalize()?;
//! # Ok(ciphertext) }
//! ```
//!
//! Each layer collects what the layer beneath it hands over and turns it
//! into its own output when it is closed. Literal data stays structured
//! until a layer needs its wire form, so signatures and encryption are
//! produced together by one rpgp message builder and nest correctly.

use std::io::{self, Cursor, Write};

use log::debug;
use pgp::composed::{DetachedSignature, MessageBuilder};
use pgp::crypto::hash::HashAlgorithm;
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::ser::Serialize;
use pgp::types::{CompressionAlgorithm, Password, StringToKey};
use rand::thread_rng;
use zeroize::Zeroizing;

use crate::cert::{PublicPart, Recipient, SecretPart, Signer};
use crate::error::{Error, Result};
use crate::types::cipher_from_id;

/// Run `$body` with `$key` bound to the signer's secret key packet,
/// whichever slot of the certificate it lives in.
macro_rules! with_signing_key {
    ($signer:expr, |$key:ident| $body:expr) => {
        match $signer.secret_part()? {
            SecretPart::Primary($key) => $body,
            SecretPart::Subkey($key) => $body,
        }
    };
}

/// A signer together with the hash it signs with.
#[derive(Clone, Debug)]
struct SigningParams {
    signer: Signer,
    hash: HashAlgorithm,
}

impl SigningParams {
    fn resolve(signers: &[Signer], hash: Option<HashAlgorithm>) -> Vec<SigningParams> {
        signers
            .iter()
            .map(|signer| SigningParams {
                hash: hash.unwrap_or_else(|| signer.key().default_hash()),
                signer: signer.clone(),
            })
            .collect()
    }
}

/// Recipients and passwords an encryption layer seals the message to.
#[derive(Debug)]
struct EncryptionParams {
    passwords: Vec<Zeroizing<String>>,
    recipients: Vec<Recipient>,
    cipher: SymmetricKeyAlgorithm,
}

/// Apply the compression and signers of a pending literal to a builder.
macro_rules! configure_builder {
    ($builder:expr, $compression:expr, $signers:expr) => {
        if let Some(algo) = $compression {
            $builder.compression(algo);
        }
        for entry in $signers {
            with_signing_key!(entry.signer, |key| {
                $builder.sign(key, entry.signer.password(), entry.hash);
            });
        }
    };
}

/// A literal data packet that has not been serialized yet, along with the
/// signing, compression and encryption requested by the layers above it.
#[derive(Debug, Default)]
struct PendingLiteral {
    name: String,
    body: Vec<u8>,
    signers: Vec<SigningParams>,
    compression: Option<CompressionAlgorithm>,
    encryption: Option<EncryptionParams>,
}

impl PendingLiteral {
    /// Serialize the whole message into `sink` in one builder pass.
    fn write_to<S: Write>(self, sink: S) -> Result<()> {
        let mut rng = thread_rng();
        let PendingLiteral {
            name,
            body,
            signers,
            compression,
            encryption,
        } = self;

        let Some(enc) = encryption else {
            let mut builder = MessageBuilder::from_bytes(name, body);
            configure_builder!(builder, compression, &signers);
            return builder
                .to_writer(&mut rng, sink)
                .map_err(|e| Error::InvalidOperation(format!("serializing message: {}", e)));
        };

        let mut builder = MessageBuilder::from_bytes(name, body).seipd_v1(&mut rng, enc.cipher);
        configure_builder!(builder, compression, &signers);
        for recipient in &enc.recipients {
            let res = match recipient.key().public_part()? {
                PublicPart::Primary(key) => builder.encrypt_to_key(&mut rng, key),
                PublicPart::Subkey(key) => builder.encrypt_to_key(&mut rng, key),
            };
            res.map_err(|e| {
                Error::UnsupportedCert(format!("encrypting to {}: {}", recipient.keyid(), e))
            })?;
        }
        for password in &enc.passwords {
            let pw = Password::from(password.as_str());
            builder
                .encrypt_with_password(StringToKey::new_default(&mut rng), &pw)
                .map_err(|e| Error::InvalidOperation(format!("password encryption: {}", e)))?;
        }

        debug!(
            "encrypting {} recipient(s), {} password(s) with {:?}",
            enc.recipients.len(),
            enc.passwords.len(),
            enc.cipher
        );
        builder
            .to_writer(&mut rng, sink)
            .map_err(|e| Error::InvalidOperation(format!("encrypting message: {}", e)))
    }
}

/// What a layer has received from the layer beneath it so far.
#[derive(Debug, Default)]
enum Payload {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    Literal(PendingLiteral),
}

impl Payload {
    fn push_bytes(&mut self, buf: &[u8]) -> Result<()> {
        match self {
            Payload::Empty => *self = Payload::Bytes(buf.to_vec()),
            Payload::Bytes(v) => v.extend_from_slice(buf),
            Payload::Literal(_) => {
                return Err(Error::InvalidOperation(
                    "cannot write raw bytes after a literal data packet".to_string(),
                ))
            }
        }
        Ok(())
    }

    fn push(&mut self, other: Payload) -> Result<()> {
        match other {
            Payload::Empty => Ok(()),
            Payload::Bytes(v) => self.push_bytes(&v),
            Payload::Literal(lit) => match self {
                Payload::Empty => {
                    *self = Payload::Literal(lit);
                    Ok(())
                }
                _ => Err(Error::InvalidOperation(
                    "a layer holds at most one literal data packet".to_string(),
                )),
            },
        }
    }

    /// Write the wire form of everything received to `sink`.
    fn write_to<S: Write>(self, mut sink: S) -> Result<()> {
        match self {
            Payload::Empty => Ok(()),
            Payload::Bytes(v) => Ok(sink.write_all(&v)?),
            Payload::Literal(lit) => lit.write_to(sink),
        }
    }

    fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Payload::Bytes(v) => Ok(v),
            other => {
                let mut out = Vec::new();
                other.write_to(&mut out)?;
                Ok(out)
            }
        }
    }

    /// The unsealed literal beneath a signing, compression or encryption layer.
    fn into_literal(self, layer: &str) -> Result<PendingLiteral> {
        match self {
            Payload::Literal(lit) if lit.encryption.is_none() => Ok(lit),
            Payload::Literal(_) => Err(Error::InvalidOperation(format!(
                "{} layer cannot wrap an encrypted message",
                layer
            ))),
            _ => Err(Error::InvalidOperation(format!(
                "{} layer needs a literal data layer beneath it",
                layer
            ))),
        }
    }
}

#[derive(Debug)]
enum LayerKind {
    Literal {
        name: String,
    },
    Arbitrary {
        tag: u8,
    },
    Signer {
        entries: Vec<SigningParams>,
        detached: bool,
    },
    Compressor {
        algo: CompressionAlgorithm,
    },
    Encryptor {
        passwords: Vec<Zeroizing<String>>,
        recipients: Vec<Recipient>,
        cipher: SymmetricKeyAlgorithm,
    },
}

#[derive(Debug)]
struct Layer {
    kind: LayerKind,
    input: Payload,
}

impl Layer {
    fn new(kind: LayerKind) -> Self {
        Layer {
            kind,
            input: Payload::Empty,
        }
    }

    fn name(&self) -> &'static str {
        match self.kind {
            LayerKind::Literal { .. } => "literal",
            LayerKind::Arbitrary { .. } => "arbitrary packet",
            LayerKind::Signer { detached: false, .. } => "signer",
            LayerKind::Signer { detached: true, .. } => "detached signer",
            LayerKind::Compressor { .. } => "compressor",
            LayerKind::Encryptor { .. } => "encryptor",
        }
    }

    /// Close this layer and produce what it hands to the layer above.
    fn close(self) -> Result<Payload> {
        let layer = self.name();
        match self.kind {
            LayerKind::Literal { name } => match self.input {
                Payload::Literal(ref lit) if lit.encryption.is_none() => Err(Error::InvalidOperation(
                    "literal data layers cannot nest".to_string(),
                )),
                input => Ok(Payload::Literal(PendingLiteral {
                    name,
                    body: input.into_bytes()?,
                    ..PendingLiteral::default()
                })),
            },
            LayerKind::Arbitrary { tag } => {
                let body = self.input.into_bytes()?;
                let mut packet = packet_header(tag, body.len())?;
                packet.extend_from_slice(&body);
                Ok(Payload::Bytes(packet))
            }
            LayerKind::Signer {
                entries,
                detached: false,
            } => {
                let mut lit = self.input.into_literal(layer)?;
                if lit.compression.is_some() {
                    return Err(Error::InvalidOperation(
                        "signatures over compressed data are not supported".to_string(),
                    ));
                }
                lit.signers.extend(entries);
                Ok(Payload::Literal(lit))
            }
            LayerKind::Signer {
                entries,
                detached: true,
            } => {
                let data = self.input.into_bytes()?;
                let mut out = Vec::new();
                for entry in &entries {
                    out.extend(detached_signature(entry, &data)?);
                }
                Ok(Payload::Bytes(out))
            }
            LayerKind::Compressor { algo } => {
                let mut lit = self.input.into_literal(layer)?;
                if lit.compression.is_some() {
                    return Err(Error::InvalidOperation(
                        "compression layers cannot nest".to_string(),
                    ));
                }
                lit.compression = Some(algo);
                Ok(Payload::Literal(lit))
            }
            LayerKind::Encryptor {
                passwords,
                recipients,
                cipher,
            } => {
                let mut lit = self.input.into_literal(layer)?;
                lit.encryption = Some(EncryptionParams {
                    passwords,
                    recipients,
                    cipher,
                });
                Ok(Payload::Literal(lit))
            }
        }
    }
}

fn detached_signature(entry: &SigningParams, data: &[u8]) -> Result<Vec<u8>> {
    let mut rng = thread_rng();
    let password = entry.signer.password();
    let signature = with_signing_key!(entry.signer, |key| {
        DetachedSignature::sign_binary_data(&mut rng, key, &password, entry.hash, Cursor::new(data))
    })
    .map_err(|e| Error::BadSignature(format!("signing with {}: {}", entry.signer.keyid(), e)))?;
    signature
        .to_bytes()
        .map_err(|e| Error::InvalidOperation(format!("serializing signature: {}", e)))
}

/// New-format packet header for `tag` and a body of `len` bytes.
fn packet_header(tag: u8, len: usize) -> Result<Vec<u8>> {
    let wide = u32::try_from(len).map_err(|_| {
        Error::InvalidArgument(format!("packet body of {} bytes does not fit a length field", len))
    })?;
    let mut header = vec![0xC0 | tag];
    if len < 192 {
        header.push(len as u8);
    } else if len < 8384 {
        let n = len - 192;
        header.push(((n >> 8) + 192) as u8);
        header.push((n & 0xFF) as u8);
    } else {
        header.push(0xFF);
        header.extend_from_slice(&wide.to_be_bytes());
    }
    Ok(header)
}

/// An ordered chain of writer layers over a sink.
///
/// Pushing a layer consumes the stack and returns the deeper one. Bytes
/// written go to the innermost layer. Nothing reaches the sink until the
/// outermost layer is closed, by [`WriterStack::finalize`] or by popping
/// layers one at a time with [`WriterStack::finalize_one`].
#[derive(Debug)]
pub struct WriterStack<W: Write> {
    sink: W,
    layers: Vec<Layer>,
}

impl<W: Write> WriterStack<W> {
    /// A stack with no layers: writes go straight to `sink`.
    pub fn new(sink: W) -> Self {
        WriterStack {
            sink,
            layers: Vec::new(),
        }
    }

    /// Number of open layers.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    fn push(mut self, kind: LayerKind) -> Self {
        let layer = Layer::new(kind);
        debug!("pushing {} layer at depth {}", layer.name(), self.layers.len());
        self.layers.push(layer);
        self
    }

    /// Wrap everything written from now on in a literal data packet.
    pub fn push_literal(self) -> Self {
        self.push_literal_named("")
    }

    /// Like [`WriterStack::push_literal`], recording a file name.
    pub fn push_literal_named(self, name: &str) -> Self {
        self.push(LayerKind::Literal {
            name: name.to_string(),
        })
    }

    /// Wrap everything written from now on in a packet with the given tag.
    pub fn push_arbitrary(self, tag: u8) -> Result<Self> {
        if tag == 0 || tag > 63 {
            return Err(Error::InvalidArgument(format!(
                "packet tag must be in 1..=63, got {}",
                tag
            )));
        }
        Ok(self.push(LayerKind::Arbitrary { tag }))
    }

    /// Encrypt the message to every password and recipient.
    ///
    /// Every password gets its own SKESK and every recipient its own PKESK,
    /// all protecting the same session key. A `cipher_algo` of 0 picks the
    /// default cipher.
    pub fn push_encrypt(
        self,
        passwords: &[&str],
        recipients: &[Recipient],
        cipher_algo: u8,
    ) -> Result<Self> {
        if passwords.is_empty() && recipients.is_empty() {
            return Err(Error::InvalidArgument(
                "encryption needs at least one password or recipient".to_string(),
            ));
        }
        let cipher = cipher_from_id(cipher_algo)?;
        Ok(self.push(LayerKind::Encryptor {
            passwords: passwords
                .iter()
                .map(|p| Zeroizing::new(p.to_string()))
                .collect(),
            recipients: recipients.to_vec(),
            cipher,
        }))
    }

    /// Compress the literal data beneath this layer.
    pub fn push_compress(self, algo: CompressionAlgorithm) -> Result<Self> {
        match algo {
            CompressionAlgorithm::ZIP | CompressionAlgorithm::ZLIB => {
                Ok(self.push(LayerKind::Compressor { algo }))
            }
            other => Err(Error::UnsupportedCompressionAlgorithm(format!("{:?}", other))),
        }
    }

    /// Sign the literal data beneath this layer, one signature per signer.
    ///
    /// Without `hash_algo` each signer uses the hash suited to its key.
    pub fn push_sign(self, signers: &[Signer], hash_algo: Option<HashAlgorithm>) -> Result<Self> {
        if signers.is_empty() {
            return Err(Error::InvalidArgument(
                "signing needs at least one signer".to_string(),
            ));
        }
        Ok(self.push(LayerKind::Signer {
            entries: SigningParams::resolve(signers, hash_algo),
            detached: false,
        }))
    }

    /// Replace everything written from now on with detached signatures
    /// over it, one per signer.
    pub fn push_sign_detached(
        self,
        signers: &[Signer],
        hash_algo: Option<HashAlgorithm>,
    ) -> Result<Self> {
        if signers.is_empty() {
            return Err(Error::InvalidArgument(
                "signing needs at least one signer".to_string(),
            ));
        }
        Ok(self.push(LayerKind::Signer {
            entries: SigningParams::resolve(signers, hash_algo),
            detached: true,
        }))
    }

    /// Hand bytes to the innermost layer, returning how many were taken.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        match self.layers.last_mut() {
            Some(layer) => {
                layer.input.push_bytes(buf)?;
                Ok(buf.len())
            }
            None => Ok(self.sink.write(buf)?),
        }
    }

    /// Hand all of `buf` to the innermost layer.
    pub fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        match self.layers.last_mut() {
            Some(layer) => layer.input.push_bytes(buf),
            None => Ok(self.sink.write_all(buf)?),
        }
    }

    /// Close the innermost layer, handing its output to the next one out.
    pub fn finalize_one(mut self) -> Result<Self> {
        let layer = self.layers.pop().ok_or_else(|| {
            Error::InvalidOperation("no layer left to finalize".to_string())
        })?;
        debug!("closing {} layer", layer.name());
        let output = layer.close()?;
        match self.layers.last_mut() {
            Some(parent) => parent.input.push(output)?,
            None => output.write_to(&mut self.sink)?,
        }
        Ok(self)
    }

    /// Close every layer, flush the sink and return it.
    pub fn finalize(mut self) -> Result<W> {
        while !self.layers.is_empty() {
            self = self.finalize_one()?;
        }
        self.sink.flush()?;
        Ok(self.sink)
    }
}

impl<W: Write> Write for WriterStack<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        WriterStack::write(self, buf).map_err(Error::into_io)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.layers.is_empty() {
            self.sink.flush()
        } else {
            Ok(())
        }
    }
}
