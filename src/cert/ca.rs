//! Root CA certificate operations.
//!
//! A [`CertificateAuthority`] only exists once its key and self-signed
//! certificate have been generated, so every value of the type is ready to
//! sign leaves.

use crate::cert::builder::{common_name_dn, set_validity};
use crate::crypto::rsa_key::{generate_rsa_keypair, KEY_BITS};
use crate::error::{CertRole, Result, VarsGenError};
use rcgen::{BasicConstraints, CertificateParams, IsCa, KeyPair, KeyUsagePurpose};
use std::fmt;
use time::OffsetDateTime;
use tracing::debug;

/// Validity period for CA certificates.
pub const CA_VALIDITY_YEARS: u32 = 10;

/// A self-signed certificate authority.
///
/// The private key never leaves this value; only the certificate is exported.
pub struct CertificateAuthority {
    common_name: String,
    key: KeyPair,
    cert_pem: String,
    not_after: OffsetDateTime,
}

impl fmt::Debug for CertificateAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateAuthority")
            .field("common_name", &self.common_name)
            .field("not_after", &self.not_after)
            .finish_non_exhaustive()
    }
}

impl CertificateAuthority {
    /// Common name of the CA subject.
    pub fn common_name(&self) -> &str {
        &self.common_name
    }

    /// The CA certificate in PEM format.
    pub fn ca_cert_pem(&self) -> &str {
        &self.cert_pem
    }

    /// End of the CA's validity window.
    pub fn not_after(&self) -> OffsetDateTime {
        self.not_after
    }

    pub(crate) fn signing_key(&self) -> &KeyPair {
        &self.key
    }
}

/// Create a self-signed Root CA with a fresh RSA key.
///
/// # Arguments
///
/// * `common_name` - Common Name of the CA (e.g., "etcdCA")
/// * `validity_years` - Number of years the certificate is valid for
///
/// # Example
///
/// ```no_run
/// use varsgen::cert::ca::{create_root_ca, CA_VALIDITY_YEARS};
///
/// # fn example() -> varsgen::error::Result<()> {
/// let ca = create_root_ca("etcdCA", CA_VALIDITY_YEARS)?;
/// assert!(ca.ca_cert_pem().contains("BEGIN CERTIFICATE"));
/// # Ok(())
/// # }
/// ```
pub fn create_root_ca(common_name: &str, validity_years: u32) -> Result<CertificateAuthority> {
    let mut params = CertificateParams::default();
    params.distinguished_name = common_name_dn(common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    set_validity(&mut params, validity_years)
        .map_err(|e| VarsGenError::certificate(common_name, e))?;
    let not_after = params.not_after;

    let key = generate_rsa_keypair(KEY_BITS)
        .and_then(|keypair| keypair.to_signing_key())
        .map_err(|e| VarsGenError::key_generation(CertRole::Ca, common_name, e))?;

    let cert = params
        .self_signed(&key)
        .map_err(|e| VarsGenError::certificate(common_name, e))?;

    debug!(common_name, %not_after, "created certificate authority");

    Ok(CertificateAuthority {
        common_name: common_name.to_string(),
        key,
        cert_pem: cert.pem(),
        not_after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::loader::inspect_certificate;

    #[test]
    fn test_create_root_ca_pem_format() {
        let ca = create_root_ca("Test Root CA", CA_VALIDITY_YEARS).unwrap();
        assert!(ca.ca_cert_pem().contains("BEGIN CERTIFICATE"));
        assert!(ca.ca_cert_pem().contains("END CERTIFICATE"));
        assert!(!ca.ca_cert_pem().contains("PRIVATE KEY"));
        assert_eq!(ca.common_name(), "Test Root CA");
    }

    #[test]
    fn test_root_ca_is_ca() {
        let ca = create_root_ca("etcdCA", CA_VALIDITY_YEARS).unwrap();
        let details = inspect_certificate(ca.ca_cert_pem()).unwrap();

        assert!(details.is_ca);
        assert_eq!(details.common_name, "etcdCA");
        assert_eq!(details.issuer_common_name, "etcdCA");
        assert!(details.dns_names.is_empty());
    }

    #[test]
    fn test_root_ca_validity_is_ten_years() {
        let ca = create_root_ca("etcdCA", CA_VALIDITY_YEARS).unwrap();
        let details = inspect_certificate(ca.ca_cert_pem()).unwrap();

        let days = details.validity_days();
        assert!((3652..=3653).contains(&days), "got {} days", days);
        assert_eq!(details.not_after, ca.not_after().unix_timestamp());
    }

    #[test]
    fn test_create_root_ca_rejects_bad_validity() {
        for years in [0, u32::MAX, i32::MAX as u32] {
            match create_root_ca("etcdCA", years) {
                Err(VarsGenError::CertificateError { subject, reason }) => {
                    assert_eq!(subject, "etcdCA");
                    assert!(reason.contains("validity period"), "{}", reason);
                }
                other => panic!("Expected CertificateError for {} years, got {:?}", years, other),
            }
        }
    }

    #[test]
    fn test_debug_hides_key() {
        let ca = create_root_ca("peerCA", CA_VALIDITY_YEARS).unwrap();
        let debug = format!("{:?}", ca);
        assert!(debug.contains("peerCA"));
        assert!(!debug.contains("key"));
    }
}
