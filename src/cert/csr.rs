//! Certificate signing requests.
//!
//! A request carries the common name, the DNS subject alternative names and
//! the requester's public key, signed with the requester's private key.

use crate::cert::builder::{common_name_dn, dns_sans};
use crate::crypto::rsa_key::RsaKeypair;
use crate::error::{Result, VarsGenError};
use rcgen::CertificateParams;
use tracing::debug;

/// Build a PEM-encoded CSR for `common_name` covering `domains`.
///
/// With no domains the request carries no SAN extension at all, which is
/// what client-authentication certificates want.
///
/// # Example
///
/// ```no_run
/// use varsgen::cert::csr::create_certificate_request;
/// use varsgen::crypto::rsa_key::{generate_rsa_keypair, KEY_BITS};
///
/// # fn example() -> varsgen::error::Result<()> {
/// let keypair = generate_rsa_keypair(KEY_BITS)?;
/// let csr = create_certificate_request(&keypair, "etcd.service.cf.internal", &["*.etcd.service.cf.internal"])?;
/// assert!(csr.contains("BEGIN CERTIFICATE REQUEST"));
/// # Ok(())
/// # }
/// ```
pub fn create_certificate_request(
    keypair: &RsaKeypair,
    common_name: &str,
    domains: &[&str],
) -> Result<String> {
    let key = keypair
        .to_signing_key()
        .map_err(|e| VarsGenError::csr(common_name, e))?;

    let mut params = CertificateParams::default();
    params.distinguished_name = common_name_dn(common_name);
    params.subject_alt_names = dns_sans(domains).map_err(|e| VarsGenError::csr(common_name, e))?;

    let csr = params
        .serialize_request(&key)
        .map_err(|e| VarsGenError::csr(common_name, e))?;
    let pem = csr.pem().map_err(|e| VarsGenError::csr(common_name, e))?;

    debug!(common_name, sans = domains.len(), "built certificate signing request");
    Ok(pem)
}
