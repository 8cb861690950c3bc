//! The manifest schema.
//!
//! Every key the generator writes is listed here as data, so the schema can
//! be enumerated without generating any secret or certificate.

use crate::config::Environment;
use std::ops::BitOr;

/// Which extra URI entries a system component gets besides `<name>_uri`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UriFlags(u8);

impl UriFlags {
    /// Only `<name>_uri`.
    pub const NONE: UriFlags = UriFlags(0);
    /// Adds `<name>_subdomain_uri = *.<name>.<system-domain>`.
    pub const SUBDOMAIN_URI: UriFlags = UriFlags(1 << 0);
    /// Adds `<name>_url = https://<name>.<system-domain>`.
    pub const HTTPS_URL: UriFlags = UriFlags(1 << 1);

    pub const fn union(self, other: UriFlags) -> UriFlags {
        UriFlags(self.0 | other.0)
    }

    pub const fn contains(self, other: UriFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for UriFlags {
    type Output = UriFlags;

    fn bitor(self, rhs: UriFlags) -> UriFlags {
        self.union(rhs)
    }
}

/// A named subsystem reachable under the system domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemComponent {
    pub name: &'static str,
    pub flags: UriFlags,
}

impl SystemComponent {
    pub const fn new(name: &'static str, flags: UriFlags) -> Self {
        Self { name, flags }
    }

    /// `<name>_uri`
    pub fn uri_field(&self) -> String {
        format!("{}_uri", self.name)
    }

    /// `<name>_subdomain_uri`
    pub fn subdomain_uri_field(&self) -> String {
        format!("{}_subdomain_uri", self.name)
    }

    /// `<name>_url`
    pub fn url_field(&self) -> String {
        format!("{}_url", self.name)
    }

    /// The keys this component contributes, in write order.
    pub fn field_names(&self) -> Vec<String> {
        let mut names = vec![self.uri_field()];
        if self.flags.contains(UriFlags::SUBDOMAIN_URI) {
            names.push(self.subdomain_uri_field());
        }
        if self.flags.contains(UriFlags::HTTPS_URL) {
            names.push(self.url_field());
        }
        names
    }
}

/// How the value of a non-generated field is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    /// The same text in every environment.
    Literal(&'static str),
    /// `<env>.<dns-base>`
    SystemDomain,
    /// Currently identical to the system domain.
    AppDomain,
    /// `<scheme>://<component>.<system-domain><path>`
    ComponentUrl {
        scheme: &'static str,
        component: &'static str,
        path: &'static str,
    },
    /// `<env><suffix>`
    EnvironmentName { suffix: &'static str },
}

impl FieldValue {
    pub fn render(&self, env: &Environment) -> String {
        match self {
            FieldValue::Literal(value) => value.to_string(),
            FieldValue::SystemDomain => env.system_domain(),
            FieldValue::AppDomain => env.app_domain(),
            FieldValue::ComponentUrl {
                scheme,
                component,
                path,
            } => format!("{}://{}{}", scheme, env.component_uri(component), path),
            FieldValue::EnvironmentName { suffix } => format!("{}{}", env.name(), suffix),
        }
    }
}

/// A field whose value is computed from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedField {
    pub key: &'static str,
    pub value: FieldValue,
}

impl FixedField {
    pub const fn new(key: &'static str, value: FieldValue) -> Self {
        Self { key, value }
    }
}

/// A certificate authority and the field its certificate is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaSpec {
    pub field: &'static str,
    pub common_name: &'static str,
}

/// A leaf certificate, the fields it is written to, and its SANs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafSpec {
    pub cert_field: &'static str,
    pub key_field: &'static str,
    pub common_name: &'static str,
    pub domains: &'static [&'static str],
}

/// One CA plus the leaves it signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateSet {
    pub ca: CaSpec,
    pub leaves: &'static [LeafSpec],
}

impl CertificateSet {
    /// CA field first, then each leaf's certificate and key field.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = vec![self.ca.field];
        for leaf in self.leaves {
            names.push(leaf.cert_field);
            names.push(leaf.key_field);
        }
        names
    }
}

/// The complete output schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    pub components: &'static [SystemComponent],
    pub derived: &'static [FixedField],
    pub secrets: &'static [&'static str],
    pub usernames: &'static [FixedField],
    pub certificate_sets: &'static [CertificateSet],
}

const ETCD_DOMAINS: &[&str] = &["*.etcd.service.cf.internal", "etcd.service.cf.internal"];

/// The schema of the Cloud Foundry deployment variables.
pub const STANDARD_CATALOG: Catalog = Catalog {
    components: &[
        SystemComponent::new("uaa", UriFlags::SUBDOMAIN_URI.union(UriFlags::HTTPS_URL)),
        SystemComponent::new("login", UriFlags::SUBDOMAIN_URI),
        SystemComponent::new("api", UriFlags::HTTPS_URL),
        SystemComponent::new("loggregator", UriFlags::NONE),
        SystemComponent::new("doppler", UriFlags::SUBDOMAIN_URI),
        SystemComponent::new("blobstore", UriFlags::NONE),
    ],
    derived: &[
        FixedField::new("system_domain", FieldValue::SystemDomain),
        FixedField::new("app_domain", FieldValue::AppDomain),
        FixedField::new(
            "uaa_token_url",
            FieldValue::ComponentUrl {
                scheme: "https",
                component: "uaa",
                path: "/oauth/token",
            },
        ),
        FixedField::new(
            "blobstore_public_url",
            FieldValue::ComponentUrl {
                scheme: "http",
                component: "blobstore",
                path: "",
            },
        ),
        FixedField::new(
            "blobstore_private_url",
            FieldValue::Literal("https://blobstore.service.cf.internal:4443"),
        ),
        FixedField::new(
            "metron_agent_deployment_name",
            FieldValue::EnvironmentName { suffix: "-cf" },
        ),
    ],
    secrets: &[
        "blobstore_admin_users_password",
        "blobstore_secure_link_secret",
        "cc_bulk_api_password",
        "cc_db_encryption_key",
        "cc_internal_api_password",
        "cc_staging_upload_password",
        "cf_mysql_mysql_admin_password",
        "cf_mysql_mysql_cluster_health_password",
        "cf_mysql_mysql_galera_healthcheck_endpoint_password",
        "cf_mysql_mysql_galera_healthcheck_password",
        "cf_mysql_mysql_roadmin_password",
        "cf_mysql_mysql_seeded_databases_cc_password",
        "cf_mysql_mysql_seeded_databases_diego_password",
        "cf_mysql_mysql_seeded_databases_uaa_password",
        "nats_password",
        "router_status_password",
        "uaa_scim_users_admin_password",
        "dropsonde_shared_secret",
        "router_route_services_secret",
        "uaa_admin_client_secret",
        "uaa_clients_cc-routing_secret",
        "uaa_clients_cc-service-dashboards_secret",
        "uaa_clients_cloud_controller_username_lookup_secret",
        "uaa_clients_doppler_secret",
        "uaa_clients_gorouter_secret",
        "uaa_clients_ssh-proxy_secret",
        "uaa_clients_tcp_emitter_secret",
        "uaa_clients_tcp_router_secret",
        "uaa_login_client_secret",
        "consul_encrypt_keys",
        "diego_bbs_encryption_keys_passphrase",
    ],
    usernames: &[
        FixedField::new("uaa_scim_users_admin_name", FieldValue::Literal("admin")),
        FixedField::new(
            "blobstore_admin_users_username",
            FieldValue::Literal("blobstore-user"),
        ),
        FixedField::new("cc_staging_upload_user", FieldValue::Literal("staging_user")),
        FixedField::new(
            "cf_mysql_mysql_galera_healthcheck_endpoint_username",
            FieldValue::Literal("galera_healthcheck"),
        ),
        FixedField::new(
            "cf_mysql_mysql_seeded_databases_cc_username",
            FieldValue::Literal("cloud_controller"),
        ),
        FixedField::new(
            "cf_mysql_mysql_seeded_databases_diego_username",
            FieldValue::Literal("diego"),
        ),
        FixedField::new(
            "cf_mysql_mysql_seeded_databases_uaa_username",
            FieldValue::Literal("uaa"),
        ),
        FixedField::new("nats_user", FieldValue::Literal("nats")),
        FixedField::new("router_status_user", FieldValue::Literal("router-status")),
    ],
    certificate_sets: &[
        CertificateSet {
            ca: CaSpec {
                field: "etcd_ca_cert",
                common_name: "etcdCA",
            },
            leaves: &[
                LeafSpec {
                    cert_field: "etcd_server_cert",
                    key_field: "etcd_server_key",
                    common_name: "etcd.service.cf.internal",
                    domains: ETCD_DOMAINS,
                },
                LeafSpec {
                    cert_field: "etcd_client_cert",
                    key_field: "etcd_client_key",
                    common_name: "clientName",
                    domains: &[],
                },
            ],
        },
        CertificateSet {
            ca: CaSpec {
                field: "etcd_peer_ca_cert",
                common_name: "peerCA",
            },
            leaves: &[LeafSpec {
                cert_field: "etcd_peer_cert",
                key_field: "etcd_peer_key",
                common_name: "etcd.service.cf.internal",
                domains: ETCD_DOMAINS,
            }],
        },
    ],
};

impl Catalog {
    /// The built-in schema.
    pub fn standard() -> &'static Catalog {
        &STANDARD_CATALOG
    }

    /// Every key a manifest built from this catalog contains.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.derived.iter().map(|f| f.key.to_string()).collect();
        names.extend(self.components.iter().flat_map(|c| c.field_names()));
        names.extend(self.secrets.iter().map(|s| s.to_string()));
        names.extend(self.usernames.iter().map(|f| f.key.to_string()));
        names.extend(
            self.certificate_sets
                .iter()
                .flat_map(|set| set.field_names())
                .map(str::to_string),
        );
        names
    }

    /// Number of CA certificates a manifest will hold.
    pub fn ca_count(&self) -> usize {
        self.certificate_sets.len()
    }

    /// Number of leaf certificate/key pairs a manifest will hold.
    pub fn leaf_count(&self) -> usize {
        self.certificate_sets.iter().map(|set| set.leaves.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uri_flags() {
        let both = UriFlags::SUBDOMAIN_URI | UriFlags::HTTPS_URL;
        assert!(both.contains(UriFlags::SUBDOMAIN_URI));
        assert!(both.contains(UriFlags::HTTPS_URL));
        assert!(!UriFlags::NONE.contains(UriFlags::HTTPS_URL));
        assert!(UriFlags::HTTPS_URL.contains(UriFlags::NONE));
        assert_eq!(UriFlags::default(), UriFlags::NONE);
    }

    #[test]
    fn test_component_field_names_per_flag_combination() {
        let cases = [
            (UriFlags::NONE, vec!["x_uri"]),
            (UriFlags::SUBDOMAIN_URI, vec!["x_uri", "x_subdomain_uri"]),
            (UriFlags::HTTPS_URL, vec!["x_uri", "x_url"]),
            (
                UriFlags::SUBDOMAIN_URI | UriFlags::HTTPS_URL,
                vec!["x_uri", "x_subdomain_uri", "x_url"],
            ),
        ];

        for (flags, expected) in cases {
            let component = SystemComponent::new("x", flags);
            assert_eq!(component.field_names(), expected, "flags {:?}", flags);
        }
    }

    #[test]
    fn test_field_value_render() {
        let env = Environment::new("example.com", "myenv");

        assert_eq!(FieldValue::Literal("admin").render(&env), "admin");
        assert_eq!(FieldValue::SystemDomain.render(&env), "myenv.example.com");
        assert_eq!(FieldValue::AppDomain.render(&env), "myenv.example.com");
        assert_eq!(
            FieldValue::ComponentUrl {
                scheme: "https",
                component: "uaa",
                path: "/oauth/token",
            }
            .render(&env),
            "https://uaa.myenv.example.com/oauth/token"
        );
        assert_eq!(
            FieldValue::EnvironmentName { suffix: "-cf" }.render(&env),
            "myenv-cf"
        );
    }

    #[test]
    fn test_standard_catalog_has_unique_fields() {
        let names = Catalog::standard().field_names();
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
    }

    #[test]
    fn test_standard_catalog_shape() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.components.len(), 6);
        assert_eq!(catalog.secrets.len(), 31);
        assert_eq!(catalog.usernames.len(), 9);
        assert_eq!(catalog.ca_count(), 2);
        assert_eq!(catalog.leaf_count(), 3);
        // 6 derived + 11 URIs + 31 secrets + 9 usernames + 8 certificate fields
        assert_eq!(catalog.field_names().len(), 65);
    }

    #[test]
    fn test_standard_catalog_certificate_fields() {
        let fields: Vec<&str> = Catalog::standard()
            .certificate_sets
            .iter()
            .flat_map(|set| set.field_names())
            .collect();
        assert_eq!(
            fields,
            vec![
                "etcd_ca_cert",
                "etcd_server_cert",
                "etcd_server_key",
                "etcd_client_cert",
                "etcd_client_key",
                "etcd_peer_ca_cert",
                "etcd_peer_cert",
                "etcd_peer_key",
            ]
        );
    }

    #[test]
    fn test_secret_names_follow_schema() {
        for name in Catalog::standard().secrets {
            assert!(
                name.ends_with("_password")
                    || name.ends_with("_secret")
                    || name.ends_with("_key")
                    || name.ends_with("_keys")
                    || name.ends_with("_passphrase"),
                "unexpected secret field {}",
                name
            );
        }
    }
}
