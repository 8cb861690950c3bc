//! Error types for varsgen.
//!
//! Every failure the generator can hit is one variant of [`VarsGenError`].
//! None of them are recoverable: they are carried up to `main`, printed
//! once and turned into a non-zero exit status.

use std::fmt;
use thiserror::Error;

/// Which kind of certificate a key or certificate failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertRole {
    /// A self-signed certificate authority.
    Ca,
    /// A leaf certificate signed by a CA.
    Host,
}

impl fmt::Display for CertRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertRole::Ca => f.write_str("ca"),
            CertRole::Host => f.write_str("host"),
        }
    }
}

/// The main error type for varsgen operations.
#[derive(Error, Debug)]
pub enum VarsGenError {
    /// The random source could not produce bytes
    #[error("unable to read rand bytes: {0}")]
    EntropyError(String),

    /// Raw RSA operation failed
    #[error("crypto: {0}")]
    CryptoError(String),

    /// Key generation for a named certificate failed
    #[error("create {role} key for '{subject}': {reason}")]
    KeyGenerationError {
        role: CertRole,
        subject: String,
        reason: String,
    },

    /// Self-signed CA certificate could not be built
    #[error("create ca cert for '{subject}': {reason}")]
    CertificateError { subject: String, reason: String },

    /// Certificate signing request could not be built
    #[error("create host csr for '{subject}': {reason}")]
    CsrError { subject: String, reason: String },

    /// CA refused or failed to sign a request
    #[error("sign host csr for '{subject}' with '{issuer}': {reason}")]
    SigningError {
        issuer: String,
        subject: String,
        reason: String,
    },

    /// Leaf would outlive the CA that signs it
    #[error("host cert for '{subject}' would expire after its issuer '{issuer}'")]
    ValidityError { issuer: String, subject: String },

    /// A subject alternative name is not a valid DNS string
    #[error("invalid domain: {0}")]
    InvalidDomainError(String),

    /// PEM encoding/decoding error
    #[error("pem: {0}")]
    PemError(String),

    /// Certificate parsing error
    #[error("parse certificate: {0}")]
    ParseError(String),

    /// Certificate does not chain to the expected CA
    #[error("verify certificate: {0}")]
    VerificationError(String),

    /// The same manifest key was written twice
    #[error("duplicate manifest field: {0}")]
    DuplicateFieldError(String),

    /// YAML serialization/deserialization error
    #[error("marshaling output as yaml: {0}")]
    SerializationError(#[from] serde_yaml::Error),

    /// Writing the document failed
    #[error("writing output: {0}")]
    OutputError(#[from] std::io::Error),
}

impl VarsGenError {
    /// Key generation failure for the named certificate.
    pub fn key_generation(role: CertRole, subject: &str, reason: impl fmt::Display) -> Self {
        VarsGenError::KeyGenerationError {
            role,
            subject: subject.to_string(),
            reason: reason.to_string(),
        }
    }

    /// CA certificate construction failure.
    pub fn certificate(subject: &str, reason: impl fmt::Display) -> Self {
        VarsGenError::CertificateError {
            subject: subject.to_string(),
            reason: reason.to_string(),
        }
    }

    /// CSR construction failure.
    pub fn csr(subject: &str, reason: impl fmt::Display) -> Self {
        VarsGenError::CsrError {
            subject: subject.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Signing failure of `subject` by `issuer`.
    pub fn signing(issuer: &str, subject: &str, reason: impl fmt::Display) -> Self {
        VarsGenError::SigningError {
            issuer: issuer.to_string(),
            subject: subject.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A specialized Result type for varsgen operations.
pub type Result<T> = std::result::Result<T, VarsGenError>;
