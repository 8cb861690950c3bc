//! Leaf certificate issuance.
//!
//! Every leaf gets a fresh RSA key, a CSR built from that key, and a
//! certificate signed by the CA from the CSR. The CA never reuses a leaf key
//! and no key is shared between leaves.

use crate::cert::builder::set_validity;
use crate::cert::ca::CertificateAuthority;
use crate::cert::csr::create_certificate_request;
use crate::crypto::rsa_key::{generate_rsa_keypair, KEY_BITS};
use crate::error::{CertRole, Result, VarsGenError};
use rcgen::{
    CertificateSigningRequestParams, ExtendedKeyUsagePurpose, IsCa, Issuer, KeyUsagePurpose,
};
use std::fmt;
use tracing::{debug, info};

/// Validity period for host (leaf) certificates.
pub const HOST_CERT_VALIDITY_YEARS: u32 = 2;

/// A signed leaf certificate and its private key.
///
/// The two are kept apart so callers can route the key somewhere other than
/// the certificate.
#[derive(Clone)]
pub struct IssuedCertificate {
    common_name: String,
    cert_pem: String,
    key_pem: String,
}

impl fmt::Debug for IssuedCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedCertificate")
            .field("common_name", &self.common_name)
            .finish_non_exhaustive()
    }
}

impl IssuedCertificate {
    /// Common name of the certificate subject.
    pub fn common_name(&self) -> &str {
        &self.common_name
    }

    /// The signed certificate in PEM format.
    pub fn cert_pem(&self) -> &str {
        &self.cert_pem
    }

    /// The leaf private key in PKCS#1 PEM format.
    pub fn private_key_pem(&self) -> &str {
        &self.key_pem
    }
}

/// Issue a leaf certificate signed by `ca`.
///
/// # Arguments
///
/// * `ca` - The CA that signs the certificate
/// * `common_name` - Common Name of the leaf
/// * `domains` - DNS subject alternative names, wildcards allowed; may be empty
/// * `validity_years` - Number of years the certificate is valid for
///
/// # Example
///
/// ```no_run
/// use varsgen::cert::ca::{create_root_ca, CA_VALIDITY_YEARS};
/// use varsgen::cert::entity::{issue_leaf_certificate, HOST_CERT_VALIDITY_YEARS};
///
/// # fn example() -> varsgen::error::Result<()> {
/// let ca = create_root_ca("etcdCA", CA_VALIDITY_YEARS)?;
/// let server = issue_leaf_certificate(
///     &ca,
///     "etcd.service.cf.internal",
///     &["*.etcd.service.cf.internal", "etcd.service.cf.internal"],
///     HOST_CERT_VALIDITY_YEARS,
/// )?;
/// assert!(server.cert_pem().contains("BEGIN CERTIFICATE"));
/// # Ok(())
/// # }
/// ```
pub fn issue_leaf_certificate(
    ca: &CertificateAuthority,
    common_name: &str,
    domains: &[&str],
    validity_years: u32,
) -> Result<IssuedCertificate> {
    let keypair = generate_rsa_keypair(KEY_BITS)
        .map_err(|e| VarsGenError::key_generation(CertRole::Host, common_name, e))?;
    let key_pem = keypair
        .private_key_pem()
        .map_err(|e| VarsGenError::key_generation(CertRole::Host, common_name, e))?;

    let csr_pem = create_certificate_request(&keypair, common_name, domains)?;
    let cert_pem = sign_request(ca, &csr_pem, common_name, validity_years)?;

    info!(
        common_name,
        issuer = ca.common_name(),
        sans = domains.len(),
        "issued host certificate"
    );

    Ok(IssuedCertificate {
        common_name: common_name.to_string(),
        cert_pem,
        key_pem,
    })
}

/// Sign a PEM-encoded CSR with `ca`, returning the certificate PEM.
///
/// The subject and SANs come from the request. The certificate is never a
/// CA, may be used for server and client authentication, and may not
/// outlive `ca`.
pub fn sign_request(
    ca: &CertificateAuthority,
    csr_pem: &str,
    subject: &str,
    validity_years: u32,
) -> Result<String> {
    let issuer_name = ca.common_name();

    let mut csr = CertificateSigningRequestParams::from_pem(csr_pem)
        .map_err(|e| VarsGenError::signing(issuer_name, subject, format!("parse CSR: {}", e)))?;

    csr.params.is_ca = IsCa::NoCa;
    csr.params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyEncipherment,
    ];
    csr.params.extended_key_usages = vec![
        ExtendedKeyUsagePurpose::ServerAuth,
        ExtendedKeyUsagePurpose::ClientAuth,
    ];
    set_validity(&mut csr.params, validity_years)
        .map_err(|e| VarsGenError::signing(issuer_name, subject, e))?;

    if csr.params.not_after > ca.not_after() {
        return Err(VarsGenError::ValidityError {
            issuer: issuer_name.to_string(),
            subject: subject.to_string(),
        });
    }

    let issuer = Issuer::from_ca_cert_pem(ca.ca_cert_pem(), ca.signing_key())
        .map_err(|e| VarsGenError::signing(issuer_name, subject, format!("load issuer: {}", e)))?;
    let cert = csr
        .signed_by(&issuer)
        .map_err(|e| VarsGenError::signing(issuer_name, subject, e))?;

    debug!(subject, issuer = issuer_name, "signed certificate request");
    Ok(cert.pem())
}
