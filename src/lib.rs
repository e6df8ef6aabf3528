//! # openpgp-stack
//!
//! Streaming OpenPGP message composition and decoding on top of [rpgp](https://docs.rs/pgp).
//!
//! Messages are built by pushing transform layers onto a [`WriterStack`]
//! and decoded by a [`Decryptor`], [`Verifier`] or [`DetachedVerifier`]
//! that asks a caller-supplied helper for certificates, session keys and a
//! final verdict on the decoded [`MessageStructure`]:
//!
//! - **Writer stack**: literal data, raw packets, signing (inline and
//!   detached), compression and encryption to recipients and passwords
//! - **Reader engines**: certificate lookup, session key resolution and a
//!   structure check, all driven through [`VerificationHelper`] and
//!   [`DecryptionHelper`]
//! - **Certificates**: capability and policy filtered key queries
//! - **Armor and streams**: ASCII armor framing over any byte stream
//!
//! ## Quick Start
//!
//! ```no_run
//! use openpgp_stack::*;
//!
//! // Encrypt with a password
//! let mut stack = WriterStack::new(Vec::new())
//!     .push_encrypt(&["p"], &[], 0).unwrap()
//!     .push_literal();
//! stack.write_all(b"Hello world!").unwrap();
//! let ciphertext = stack.finalize().unwrap();
//!
//! // Decrypt it again
//! let policy = StandardPolicy::new();
//! let helper = KeyringHelper::new(Vec::new(), &policy, None).with_password("p");
//! let mut reader = Decryptor::from_bytes(&policy, &ciphertext, helper, None).unwrap();
//! assert_eq!(reader.read_to_vec().unwrap(), b"Hello world!");
//! assert_eq!(reader.structure().shape(), vec![2]);
//! ```
//!
//! ## Layer order
//!
//! Layers pushed later sit closer to the plaintext. Pushing encrypt, sign,
//! literal yields a message that decodes as `[Encryption, SignatureGroup]`,
//! or `[Encryption, Compression, SignatureGroup]` when a compression layer
//! is pushed between encrypt and sign.
//!
//! ## Status codes
//!
//! Every [`Error`] maps to a [`Status`], the closed set of outcome codes
//! helpers return from their structure checks.

// The underlying OpenPGP implementation
pub use pgp;

// Modules
mod error;
mod types;
mod internal;

mod armor;
mod cert;
mod io;
mod packet;
mod policy;
mod reader;
mod structure;
mod writer;

mod encrypt;
mod decrypt;
mod sign;
mod verify;

// Re-export error types
pub use error::{Error, Result, Status};

// Re-export value types
pub use types::{cipher_from_id, CipherSuite, Fingerprint, KeyId, SessionKey, DEFAULT_CIPHER};

// Re-export policies
pub use policy::{NullPolicy, Policy, StandardPolicy};

// Re-export the certificate model
pub use cert::{Cert, Key, KeyQuery, Recipient, RevocationStatus, Signer};

// Re-export streams and armor
pub use armor::{armor, dearmor, is_armored, ArmorKind, ArmorReader, ArmorWriter};
pub use io::{IoReader, IoWriter};

// Re-export packets and message structure
pub use packet::{Packet, Pkesk, Skesk};
pub use structure::{GoodChecksum, MessageLayer, MessageStructure, VerificationResult};

// Re-export the writer and reader stacks
pub use writer::WriterStack;
pub use reader::{
    Callbacks,
    DecryptionHelper,
    Decryptor,
    DetachedVerifier,
    KeyringHelper,
    MessageReader,
    ResolvedSessionKey,
    SessionKeySource,
    VerificationHelper,
    Verifier,
};

// Re-export one-shot functions
pub use encrypt::{encrypt, encrypt_file_for, encrypt_for};
pub use decrypt::{decrypt, decrypt_file_for, decrypt_for, decrypt_with_password};
pub use sign::{sign, sign_file};
pub use verify::{
    verify,
    verify_detached,
    verify_detached_file,
    verify_detached_with_certs,
    verify_with_certs,
};
