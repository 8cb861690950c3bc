//! Cryptographic primitives.
//!
//! - RSA key generation and PEM export
//! - URL-safe random secrets
//!
//! All randomness comes from the operating system (`OsRng`).

pub mod password;
pub mod rsa_key;
