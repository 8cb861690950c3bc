//! Certificate builder utilities.
//!
//! Small helpers shared by the CA, CSR and leaf code paths.

use crate::error::{Result, VarsGenError};
use rcgen::string::Ia5String;
use rcgen::{CertificateParams, DistinguishedName, DnType, DnValue, SanType};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// A validity period that cannot be turned into a certificate window.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityPeriodError {
    #[error("validity period must be at least one year")]
    Empty,

    #[error("validity period of {0} years is out of range")]
    OutOfRange(u32),
}

/// Build a subject holding only a common name.
///
/// # Example
///
/// ```
/// use varsgen::cert::builder::common_name_dn;
///
/// let dn = common_name_dn("etcdCA");
/// assert_eq!(dn.iter().count(), 1);
/// ```
pub fn common_name_dn(common_name: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(
        DnType::CommonName,
        DnValue::Utf8String(common_name.to_string()),
    );
    dn
}

/// Convert DNS names (wildcards included) into subject alternative names.
///
/// Names are kept verbatim and in order. Empty or non-ASCII names are rejected.
pub fn dns_sans(domains: &[&str]) -> Result<Vec<SanType>> {
    domains
        .iter()
        .map(|domain| {
            if domain.trim().is_empty() {
                return Err(VarsGenError::InvalidDomainError(
                    "domain names cannot be empty".to_string(),
                ));
            }
            Ia5String::try_from(domain.to_string())
                .map(SanType::DnsName)
                .map_err(|e| {
                    VarsGenError::InvalidDomainError(format!("'{}': {}", domain, e))
                })
        })
        .collect()
}

/// Add whole calendar years to a timestamp. 29 February maps to 28 February.
pub fn add_years(
    start: OffsetDateTime,
    years: u32,
) -> std::result::Result<OffsetDateTime, ValidityPeriodError> {
    let out_of_range = ValidityPeriodError::OutOfRange(years);
    let year = i32::try_from(years)
        .ok()
        .and_then(|years| start.year().checked_add(years))
        .ok_or(out_of_range)?;

    start
        .replace_year(year)
        .or_else(|_| (start - Duration::days(1)).replace_year(year))
        .map_err(|_| out_of_range)
}

/// Set a validity period of `years` starting now. Zero years is refused.
pub fn set_validity(
    params: &mut CertificateParams,
    years: u32,
) -> std::result::Result<(), ValidityPeriodError> {
    if years == 0 {
        return Err(ValidityPeriodError::Empty);
    }
    let not_before = OffsetDateTime::now_utc();
    params.not_after = add_years(not_before, years)?;
    params.not_before = not_before;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_common_name_dn() {
        let dn = common_name_dn("etcd.service.cf.internal");
        let (dn_type, value) = dn.iter().next().unwrap();
        assert_eq!(dn_type, &DnType::CommonName);
        assert_eq!(
            value,
            &DnValue::Utf8String("etcd.service.cf.internal".to_string())
        );
    }

    #[test]
    fn test_dns_sans_keeps_wildcards_and_order() {
        let sans = dns_sans(&["*.etcd.service.cf.internal", "etcd.service.cf.internal"]).unwrap();
        assert_eq!(sans.len(), 2);
        match &sans[0] {
            SanType::DnsName(name) => assert_eq!(name.as_str(), "*.etcd.service.cf.internal"),
            other => panic!("unexpected SAN {:?}", other),
        }
        match &sans[1] {
            SanType::DnsName(name) => assert_eq!(name.as_str(), "etcd.service.cf.internal"),
            other => panic!("unexpected SAN {:?}", other),
        }
    }

    #[test]
    fn test_dns_sans_empty_list() {
        assert!(dns_sans(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_dns_sans_rejects_empty_name() {
        let result = dns_sans(&["etcd.service.cf.internal", " "]);
        assert!(matches!(result, Err(VarsGenError::InvalidDomainError(_))));
    }

    #[test]
    fn test_dns_sans_rejects_non_ascii() {
        let result = dns_sans(&["bücher.example.com"]);
        assert!(matches!(result, Err(VarsGenError::InvalidDomainError(_))));
    }

    #[test]
    fn test_add_years() {
        let start = datetime!(2024-03-15 12:00 UTC);
        assert_eq!(add_years(start, 10).unwrap(), datetime!(2034-03-15 12:00 UTC));
    }

    #[test]
    fn test_add_years_leap_day() {
        let start = datetime!(2024-02-29 08:30 UTC);
        assert_eq!(add_years(start, 2).unwrap(), datetime!(2026-02-28 08:30 UTC));
    }

    #[test]
    fn test_set_validity() {
        let mut params = CertificateParams::default();
        set_validity(&mut params, 2).unwrap();

        let days = (params.not_after - params.not_before).whole_days();
        assert!((730..=731).contains(&days), "got {} days", days);
        assert!(params.not_before <= OffsetDateTime::now_utc());
    }

    #[test]
    fn test_set_validity_rejects_zero_years() {
        let mut params = CertificateParams::default();
        let before = params.not_after;

        assert_eq!(set_validity(&mut params, 0), Err(ValidityPeriodError::Empty));
        assert_eq!(params.not_after, before);
    }

    #[test]
    fn test_add_years_rejects_values_past_i32() {
        let start = datetime!(2024-03-15 12:00 UTC);
        assert_eq!(
            add_years(start, u32::MAX),
            Err(ValidityPeriodError::OutOfRange(u32::MAX))
        );
    }

    #[test]
    fn test_add_years_overflow_is_an_error() {
        let start = datetime!(2024-03-15 12:00 UTC);
        let years = i32::MAX as u32;
        assert_eq!(add_years(start, years), Err(ValidityPeriodError::OutOfRange(years)));
    }

    #[test]
    fn test_set_validity_rejects_unrepresentable_years() {
        let mut params = CertificateParams::default();
        for years in [u32::MAX, i32::MAX as u32, 1_000_000] {
            assert_eq!(
                set_validity(&mut params, years),
                Err(ValidityPeriodError::OutOfRange(years))
            );
        }
    }
}
