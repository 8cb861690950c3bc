//! Turns a catalog and an environment into a finished manifest.

use crate::config::Environment;
use crate::error::Result;
use crate::manifest::builder::ManifestBuilder;
use crate::manifest::catalog::Catalog;
use crate::manifest::Manifest;
use tracing::info;

/// Generate every field of `catalog` for `env`.
///
/// Steps run in a fixed order: environment-derived fields, component URIs,
/// secrets, usernames, then one CA with its leaves per certificate set. The
/// first failure stops the run and nothing is returned.
///
/// # Example
///
/// ```no_run
/// use varsgen::config::Environment;
/// use varsgen::manifest::{assemble, Catalog};
///
/// # fn example() -> varsgen::error::Result<()> {
/// let manifest = assemble(&Environment::default(), Catalog::standard())?;
/// assert_eq!(manifest.get("uaa_uri"), Some("uaa.myenv.example.com"));
/// # Ok(())
/// # }
/// ```
pub fn assemble(env: &Environment, catalog: &Catalog) -> Result<Manifest> {
    let mut builder = ManifestBuilder::new();

    builder.add_fixed_fields(env, catalog.derived)?;
    for component in catalog.components {
        builder.add_system_component(env, component)?;
    }
    builder.generate_passwords(catalog.secrets)?;
    builder.add_fixed_fields(env, catalog.usernames)?;
    for set in catalog.certificate_sets {
        builder.generate_certs(set)?;
    }

    info!(
        system_domain = %env.system_domain(),
        fields = builder.len(),
        "assembled manifest"
    );
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::catalog::{FieldValue, FixedField, SystemComponent, UriFlags};

    const URI_ONLY: Catalog = Catalog {
        components: &[
            SystemComponent::new("uaa", UriFlags::SUBDOMAIN_URI.union(UriFlags::HTTPS_URL)),
            SystemComponent::new("api", UriFlags::HTTPS_URL),
        ],
        derived: &[FixedField::new("system_domain", FieldValue::SystemDomain)],
        secrets: &["nats_password"],
        usernames: &[FixedField::new("nats_user", FieldValue::Literal("nats"))],
        certificate_sets: &[],
    };

    #[test]
    fn test_assemble_without_certificates() {
        let env = Environment::new("example.net", "dev");
        let manifest = assemble(&env, &URI_ONLY).unwrap();

        let mut expected = URI_ONLY.field_names();
        expected.sort();
        assert_eq!(manifest.keys().collect::<Vec<_>>(), expected);

        assert_eq!(manifest.get("system_domain"), Some("dev.example.net"));
        assert_eq!(manifest.get("api_url"), Some("https://api.dev.example.net"));
        assert_eq!(manifest.get("nats_user"), Some("nats"));
    }

    #[test]
    fn test_assemble_rejects_colliding_catalog() {
        const COLLIDING: Catalog = Catalog {
            components: &[SystemComponent::new("uaa", UriFlags::NONE)],
            derived: &[FixedField::new("uaa_uri", FieldValue::Literal("taken"))],
            secrets: &[],
            usernames: &[],
            certificate_sets: &[],
        };

        let result = assemble(&Environment::default(), &COLLIDING);
        assert!(matches!(
            result,
            Err(crate::error::VarsGenError::DuplicateFieldError(key)) if key == "uaa_uri"
        ));
    }
}
