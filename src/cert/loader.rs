//! Certificate inspection.
//!
//! Parses PEM certificates back with x509-parser so the generated material
//! can be checked: subject, CA flag, SANs, validity window and signature.

use crate::error::{Result, VarsGenError};
use x509_parser::extensions::GeneralName;
use x509_parser::prelude::*;

/// The parts of a certificate the generator cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDetails {
    /// Subject common name
    pub common_name: String,
    /// Issuer common name
    pub issuer_common_name: String,
    /// Basic constraints CA flag
    pub is_ca: bool,
    /// DNS subject alternative names, in certificate order
    pub dns_names: Vec<String>,
    /// Start of validity (Unix timestamp)
    pub not_before: i64,
    /// End of validity (Unix timestamp)
    pub not_after: i64,
}

impl CertificateDetails {
    /// Length of the validity window in whole days.
    pub fn validity_days(&self) -> i64 {
        (self.not_after - self.not_before) / (24 * 60 * 60)
    }
}

/// Extract the DER bytes of a single PEM certificate.
///
/// # Example
///
/// ```
/// use varsgen::cert::loader::certificate_der_from_pem;
///
/// assert!(certificate_der_from_pem("not a valid pem").is_err());
/// ```
pub fn certificate_der_from_pem(pem_str: &str) -> Result<Vec<u8>> {
    let pem = ::pem::parse(pem_str)
        .map_err(|e| VarsGenError::PemError(format!("parse: {}", e)))?;

    if pem.tag() != "CERTIFICATE" {
        return Err(VarsGenError::PemError(format!(
            "expected CERTIFICATE, got {}",
            pem.tag()
        )));
    }

    Ok(pem.into_contents())
}

/// Parse a PEM certificate into [`CertificateDetails`].
pub fn inspect_certificate(pem_str: &str) -> Result<CertificateDetails> {
    let der = certificate_der_from_pem(pem_str)?;
    let (_, cert) = X509Certificate::from_der(&der)
        .map_err(|e| VarsGenError::ParseError(e.to_string()))?;

    let is_ca = cert
        .basic_constraints()
        .map_err(|e| VarsGenError::ParseError(format!("bad basic constraints: {}", e)))?
        .map(|bc| bc.value.ca)
        .unwrap_or(false);

    let dns_names = match cert
        .subject_alternative_name()
        .map_err(|e| VarsGenError::ParseError(format!("bad subject alternative name: {}", e)))?
    {
        Some(san) => san
            .value
            .general_names
            .iter()
            .filter_map(|name| match name {
                GeneralName::DNSName(dns) => Some(dns.to_string()),
                _ => None,
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(CertificateDetails {
        common_name: first_common_name(cert.subject()),
        issuer_common_name: first_common_name(cert.issuer()),
        is_ca,
        dns_names,
        not_before: cert.validity().not_before.timestamp(),
        not_after: cert.validity().not_after.timestamp(),
    })
}

/// Check that `cert_pem` was issued by the CA in `ca_cert_pem`.
///
/// The issuer name must equal the CA subject and the signature must
/// validate with the CA public key.
pub fn verify_issued_by(cert_pem: &str, ca_cert_pem: &str) -> Result<()> {
    let cert_der = certificate_der_from_pem(cert_pem)?;
    let ca_der = certificate_der_from_pem(ca_cert_pem)?;

    let (_, cert) = X509Certificate::from_der(&cert_der)
        .map_err(|e| VarsGenError::ParseError(e.to_string()))?;
    let (_, ca) = X509Certificate::from_der(&ca_der)
        .map_err(|e| VarsGenError::ParseError(format!("issuer: {}", e)))?;

    if cert.issuer().as_raw() != ca.subject().as_raw() {
        return Err(VarsGenError::VerificationError(format!(
            "issuer '{}' does not match CA subject '{}'",
            cert.issuer(),
            ca.subject()
        )));
    }

    cert.verify_signature(Some(ca.public_key()))
        .map_err(|e| VarsGenError::VerificationError(format!("signature does not validate: {}", e)))
}

fn first_common_name(name: &X509Name<'_>) -> String {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .unwrap_or("")
        .to_string()
}
