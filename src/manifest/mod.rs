//! The generated document.
//!
//! A [`ManifestBuilder`] collects fields while the generator runs; once every
//! step has succeeded it is frozen into a [`Manifest`] and serialized. Nothing
//! is written anywhere before that point, so a failed run never leaves half
//! a document behind.

pub mod assembler;
pub mod builder;
pub mod catalog;

pub use assembler::assemble;
pub use builder::ManifestBuilder;
pub use catalog::Catalog;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A finished, read-only mapping from field name to value.
///
/// Keys serialize in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    fields: BTreeMap<String, String>,
}

impl Manifest {
    pub(crate) fn from_fields(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as a YAML mapping.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse a YAML mapping of strings.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Manifest {
        let mut fields = BTreeMap::new();
        fields.insert("system_domain".to_string(), "myenv.example.com".to_string());
        fields.insert(
            "etcd_ca_cert".to_string(),
            "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n".to_string(),
        );
        fields.insert("nats_user".to_string(), "nats".to_string());
        Manifest::from_fields(fields)
    }

    #[test]
    fn test_to_yaml_sorted_keys() {
        let yaml = sample().to_yaml().unwrap();
        let ca = yaml.find("etcd_ca_cert").unwrap();
        let nats = yaml.find("nats_user").unwrap();
        let domain = yaml.find("system_domain").unwrap();
        assert!(ca < nats && nats < domain);
        assert!(yaml.contains("system_domain: myenv.example.com"));
    }

    #[test]
    fn test_yaml_round_trip_keeps_multiline_values() {
        let manifest = sample();
        let parsed = Manifest::from_yaml(&manifest.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, manifest);
        assert!(parsed.get("etcd_ca_cert").unwrap().ends_with("-----\n"));
    }

    #[test]
    fn test_from_yaml_rejects_non_mapping() {
        let result = Manifest::from_yaml("- a\n- b\n");
        assert!(matches!(
            result,
            Err(crate::error::VarsGenError::SerializationError(_))
        ));
    }

    #[test]
    fn test_accessors() {
        let manifest = sample();
        assert_eq!(manifest.len(), 3);
        assert!(!manifest.is_empty());
        assert!(manifest.contains_key("nats_user"));
        assert_eq!(manifest.get("nats_user"), Some("nats"));
        assert_eq!(manifest.get("missing"), None);
        assert_eq!(
            manifest.keys().collect::<Vec<_>>(),
            vec!["etcd_ca_cert", "nats_user", "system_domain"]
        );
        assert_eq!(manifest.iter().count(), 3);
    }
}
