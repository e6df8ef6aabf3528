//! Internal helpers for the certificate model.
//!
//! Parsing of transferable keys and interpretation of self-signatures
//! (creation, expiry, revocation and key flags). Nothing here is public API.

mod helpers;
mod policy;

pub(crate) use helpers::*;
pub(crate) use policy::*;
