//! Error types for openpgp-stack.
//!
//! Every failure is one of a closed set of kinds. [`Status`] is the flat,
//! code-like view of the same set and is what helpers and policy callbacks
//! branch on.

use std::fmt;

use thiserror::Error;

/// The main error type for openpgp-stack operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying byte stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A caller supplied an argument that can never work
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A single packet could not be decoded
    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    /// The packet sequence does not form a valid message
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// A certificate could not be decoded
    #[error("Malformed certificate: {0}")]
    MalformedCert(String),

    /// A multiprecision integer is out of shape
    #[error("Malformed MPI: {0}")]
    MalformedMpi(String),

    /// Packet type is not supported
    #[error("Unsupported packet type: {0}")]
    UnsupportedPacketType(String),

    /// Hash algorithm is not supported or rejected by policy
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(String),

    /// Public key algorithm is not supported
    #[error("Unsupported public key algorithm: {0}")]
    UnsupportedPublicKeyAlgorithm(String),

    /// Elliptic curve is not supported
    #[error("Unsupported elliptic curve: {0}")]
    UnsupportedEllipticCurve(String),

    /// Symmetric algorithm is not supported or rejected by policy
    #[error("Unsupported symmetric algorithm: {0}")]
    UnsupportedSymmetricAlgorithm(String),

    /// AEAD mode is not supported
    #[error("Unsupported AEAD algorithm: {0}")]
    UnsupportedAeadAlgorithm(String),

    /// Compression algorithm is not supported
    #[error("Unsupported compression algorithm: {0}")]
    UnsupportedCompressionAlgorithm(String),

    /// Signature type is not supported
    #[error("Unsupported signature type: {0}")]
    UnsupportedSignatureType(String),

    /// No usable certificate was found, or the certificate cannot be used
    #[error("Unsupported certificate: {0}")]
    UnsupportedCert(String),

    /// Invalid password or unable to decrypt secret key material
    #[error("Invalid password")]
    InvalidPassword,

    /// The session key does not decrypt the message
    #[error("Invalid session key")]
    InvalidSessionKey,

    /// No session key could be resolved for an encrypted message
    #[error("Missing session key: {0}")]
    MissingSessionKey(String),

    /// A signature failed to verify
    #[error("Bad signature: {0}")]
    BadSignature(String),

    /// The integrity protection of the message failed
    #[error("Message has been manipulated")]
    ManipulatedMessage,

    /// An index was out of range
    #[error("Index out of range")]
    IndexOutOfRange,

    /// A key or signature has expired at the evaluation time
    #[error("Expired: {0}")]
    Expired(String),

    /// A key or signature is not yet valid at the evaluation time
    #[error("Not yet live: {0}")]
    NotYetLive(String),

    /// A network access was denied by policy
    #[error("Network policy violation: {0}")]
    NetworkPolicyViolation(String),

    /// The operation is not valid in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Error raised by caller code without an explicit status
    #[error("Unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}

/// A specialized Result type for openpgp-stack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Flat outcome code of an operation.
///
/// The discriminants are stable and match the conventional OpenPGP
/// status numbering used at foreign boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    Success = 0,
    UnknownError = -1,
    NetworkPolicyViolation = -2,
    IoError = -3,
    InvalidArgument = -15,
    InvalidOperation = -4,
    MalformedPacket = -5,
    UnsupportedPacketType = -14,
    UnsupportedHashAlgorithm = -9,
    UnsupportedPublicKeyAlgorithm = -18,
    UnsupportedEllipticCurve = -21,
    UnsupportedSymmetricAlgorithm = -22,
    UnsupportedAeadAlgorithm = -26,
    UnsupportedCompressionAlgorithm = -28,
    UnsupportedSignatureType = -20,
    InvalidPassword = -11,
    InvalidSessionKey = -12,
    MissingSessionKey = -27,
    MalformedCert = -13,
    UnsupportedCert = -23,
    BadSignature = -19,
    MalformedMpi = -25,
    ManipulatedMessage = -29,
    MalformedMessage = -31,
    IndexOutOfRange = -32,
    Expired = -33,
    NotYetLive = -34,
}

impl Status {
    /// Numeric code of this status.
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    /// Status of a finished operation.
    pub fn of<T>(result: &Result<T>) -> Status {
        match result {
            Ok(_) => Status::Success,
            Err(e) => e.status(),
        }
    }

    /// Turn a status signalled by caller code back into a result, keeping
    /// its kind. `context` becomes the error message where the kind has one.
    pub fn into_result(self, context: &str) -> Result<()> {
        let msg = context.to_string();
        Err(match self {
            Status::Success => return Ok(()),
            Status::UnknownError => Error::Unknown(anyhow::anyhow!(msg)),
            Status::NetworkPolicyViolation => Error::NetworkPolicyViolation(msg),
            Status::IoError => Error::Io(std::io::Error::other(msg)),
            Status::InvalidArgument => Error::InvalidArgument(msg),
            Status::InvalidOperation => Error::InvalidOperation(msg),
            Status::MalformedPacket => Error::MalformedPacket(msg),
            Status::UnsupportedPacketType => Error::UnsupportedPacketType(msg),
            Status::UnsupportedHashAlgorithm => Error::UnsupportedHashAlgorithm(msg),
            Status::UnsupportedPublicKeyAlgorithm => Error::UnsupportedPublicKeyAlgorithm(msg),
            Status::UnsupportedEllipticCurve => Error::UnsupportedEllipticCurve(msg),
            Status::UnsupportedSymmetricAlgorithm => Error::UnsupportedSymmetricAlgorithm(msg),
            Status::UnsupportedAeadAlgorithm => Error::UnsupportedAeadAlgorithm(msg),
            Status::UnsupportedCompressionAlgorithm => Error::UnsupportedCompressionAlgorithm(msg),
            Status::UnsupportedSignatureType => Error::UnsupportedSignatureType(msg),
            Status::InvalidPassword => Error::InvalidPassword,
            Status::InvalidSessionKey => Error::InvalidSessionKey,
            Status::MissingSessionKey => Error::MissingSessionKey(msg),
            Status::MalformedCert => Error::MalformedCert(msg),
            Status::UnsupportedCert => Error::UnsupportedCert(msg),
            Status::BadSignature => Error::BadSignature(msg),
            Status::MalformedMpi => Error::MalformedMpi(msg),
            Status::ManipulatedMessage => Error::ManipulatedMessage,
            Status::MalformedMessage => Error::MalformedMessage(msg),
            Status::IndexOutOfRange => Error::IndexOutOfRange,
            Status::Expired => Error::Expired(msg),
            Status::NotYetLive => Error::NotYetLive(msg),
        })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

impl Error {
    /// The status code this error surfaces as.
    pub fn status(&self) -> Status {
        match self {
            Error::Io(_) => Status::IoError,
            Error::InvalidArgument(_) => Status::InvalidArgument,
            Error::MalformedPacket(_) => Status::MalformedPacket,
            Error::MalformedMessage(_) => Status::MalformedMessage,
            Error::MalformedCert(_) => Status::MalformedCert,
            Error::MalformedMpi(_) => Status::MalformedMpi,
            Error::UnsupportedPacketType(_) => Status::UnsupportedPacketType,
            Error::UnsupportedHashAlgorithm(_) => Status::UnsupportedHashAlgorithm,
            Error::UnsupportedPublicKeyAlgorithm(_) => Status::UnsupportedPublicKeyAlgorithm,
            Error::UnsupportedEllipticCurve(_) => Status::UnsupportedEllipticCurve,
            Error::UnsupportedSymmetricAlgorithm(_) => Status::UnsupportedSymmetricAlgorithm,
            Error::UnsupportedAeadAlgorithm(_) => Status::UnsupportedAeadAlgorithm,
            Error::UnsupportedCompressionAlgorithm(_) => Status::UnsupportedCompressionAlgorithm,
            Error::UnsupportedSignatureType(_) => Status::UnsupportedSignatureType,
            Error::UnsupportedCert(_) => Status::UnsupportedCert,
            Error::InvalidPassword => Status::InvalidPassword,
            Error::InvalidSessionKey => Status::InvalidSessionKey,
            Error::MissingSessionKey(_) => Status::MissingSessionKey,
            Error::BadSignature(_) => Status::BadSignature,
            Error::ManipulatedMessage => Status::ManipulatedMessage,
            Error::IndexOutOfRange => Status::IndexOutOfRange,
            Error::Expired(_) => Status::Expired,
            Error::NotYetLive(_) => Status::NotYetLive,
            Error::NetworkPolicyViolation(_) => Status::NetworkPolicyViolation,
            Error::InvalidOperation(_) => Status::InvalidOperation,
            Error::Unknown(_) => Status::UnknownError,
        }
    }

    /// Unwrap an I/O error that carries one of our errors back into it.
    ///
    /// Readers and writers report failures through [`std::io::Error`]; this
    /// recovers the original kind when it round-tripped through that layer.
    pub(crate) fn from_io(err: std::io::Error) -> Error {
        if err.get_ref().map(|inner| inner.is::<Error>()).unwrap_or(false) {
            match err.into_inner().map(|inner| inner.downcast::<Error>()) {
                Some(Ok(inner)) => *inner,
                Some(Err(other)) => Error::Io(std::io::Error::other(other)),
                None => Error::InvalidOperation("empty I/O error".to_string()),
            }
        } else {
            Error::Io(err)
        }
    }

    /// Wrap this error so it can travel through [`std::io::Read`]/[`std::io::Write`].
    pub(crate) fn into_io(self) -> std::io::Error {
        match self {
            Error::Io(e) => e,
            other => std::io::Error::other(other),
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::InvalidOperation(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::InvalidOperation(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_of_result() {
        let ok: Result<()> = Ok(());
        assert_eq!(Status::of(&ok), Status::Success);
        assert!(Status::of(&ok).is_success());

        let err: Result<()> = Err(Error::BadSignature("digest mismatch".into()));
        assert_eq!(Status::of(&err), Status::BadSignature);
        assert_eq!(Status::BadSignature.code(), -19);
    }

    #[test]
    fn test_io_round_trip_keeps_kind() {
        let io = Error::InvalidPassword.into_io();
        assert!(matches!(Error::from_io(io), Error::InvalidPassword));

        let plain = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(Error::from_io(plain).status(), Status::IoError);
    }

    #[test]
    fn test_status_into_result_keeps_kind() {
        assert!(Status::Success.into_result("check").is_ok());
        let err = Status::BadSignature.into_result("policy rejected").unwrap_err();
        assert_eq!(err.status(), Status::BadSignature);
        assert_eq!(
            Status::Expired.into_result("x").unwrap_err().status(),
            Status::Expired
        );
    }

    #[test]
    fn test_status_into_result_keeps_context() {
        let err = Status::UnsupportedPacketType
            .into_result("marker packet inside a signature group")
            .unwrap_err();
        assert_eq!(err.status(), Status::UnsupportedPacketType);
        assert!(err.to_string().contains("marker packet inside a signature group"));

        for status in [Status::MalformedMessage, Status::UnsupportedCert, Status::NotYetLive] {
            let err = status.into_result("rejected by caller").unwrap_err();
            assert_eq!(err.status(), status);
            assert!(err.to_string().contains("rejected by caller"));
        }
    }

    #[test]
    fn test_callback_errors_are_unknown() {
        let err: Error = anyhow::anyhow!("lookup service down").into();
        assert_eq!(err.status(), Status::UnknownError);
    }
}
