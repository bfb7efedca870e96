//! Cryptographic primitives for the JadeGate security gateway.
//!
//! This crate is deliberately a thin, boring wrapper over `ed25519-dalek`
//! and `blake3`. Nothing above it should need to reach past this crate's
//! types to touch key bytes directly.
//!
//! - Ed25519 key pairs with secure memory handling (zeroized on drop)
//! - Signatures for certificate signing
//! - BLAKE3 content hashing for fingerprinting
//!
//! Key generation and signature verification are treated as a black-box
//! primitive by the rest of the gateway: the certificate subsystem calls
//! into this crate and never touches `ed25519_dalek` or `blake3` directly.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod hash;
mod keypair;
mod signature;
mod verifier;

pub use error::{CryptoError, CryptoResult};
pub use hash::ContentHash;
pub use keypair::{KeyPair, PublicKey};
pub use signature::Signature;
pub use verifier::{KeyId, SignatureVerifier};
