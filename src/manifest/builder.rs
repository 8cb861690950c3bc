//! Incremental manifest construction.

use crate::cert::ca::{create_root_ca, CA_VALIDITY_YEARS};
use crate::cert::entity::{issue_leaf_certificate, HOST_CERT_VALIDITY_YEARS};
use crate::config::Environment;
use crate::crypto::password::generate_password;
use crate::error::{Result, VarsGenError};
use crate::manifest::catalog::{CertificateSet, FixedField, SystemComponent, UriFlags};
use crate::manifest::Manifest;
use std::collections::BTreeMap;
use tracing::debug;

/// Owned accumulator for manifest fields. Every key may be written once.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    fields: BTreeMap<String, String>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, refusing to overwrite an existing one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        if self.fields.contains_key(&key) {
            return Err(VarsGenError::DuplicateFieldError(key));
        }
        self.fields.insert(key, value.into());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Write fields computed from the environment.
    pub fn add_fixed_fields(&mut self, env: &Environment, fields: &[FixedField]) -> Result<()> {
        for field in fields {
            self.insert(field.key, field.value.render(env))?;
        }
        Ok(())
    }

    /// Write `<name>_uri` plus whatever extra entries the component's flags ask for.
    pub fn add_system_component(
        &mut self,
        env: &Environment,
        component: &SystemComponent,
    ) -> Result<()> {
        let uri = env.component_uri(component.name);

        if component.flags.contains(UriFlags::SUBDOMAIN_URI) {
            self.insert(component.subdomain_uri_field(), format!("*.{}", uri))?;
        }
        if component.flags.contains(UriFlags::HTTPS_URL) {
            self.insert(component.url_field(), format!("https://{}", uri))?;
        }
        self.insert(component.uri_field(), uri)
    }

    /// Write a fresh random secret under each name.
    pub fn generate_passwords(&mut self, names: &[&str]) -> Result<()> {
        for name in names {
            let password = generate_password()?;
            self.insert(*name, password)?;
        }
        debug!(count = names.len(), "generated secrets");
        Ok(())
    }

    /// Create the set's CA, issue each of its leaves, and write the PEMs.
    pub fn generate_certs(&mut self, set: &CertificateSet) -> Result<()> {
        let ca = create_root_ca(set.ca.common_name, CA_VALIDITY_YEARS)?;
        self.insert(set.ca.field, ca.ca_cert_pem())?;

        for leaf in set.leaves {
            let issued = issue_leaf_certificate(
                &ca,
                leaf.common_name,
                leaf.domains,
                HOST_CERT_VALIDITY_YEARS,
            )?;
            self.insert(leaf.cert_field, issued.cert_pem())?;
            self.insert(leaf.key_field, issued.private_key_pem())?;
        }
        Ok(())
    }

    /// Freeze the collected fields.
    pub fn finish(self) -> Manifest {
        Manifest::from_fields(self.fields)
    }
}
