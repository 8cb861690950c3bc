//! Deployment environment settings.
//!
//! Everything the generator derives from the command line lives here: the
//! DNS base name and the environment's short name.

/// Default DNS base name.
pub const DEFAULT_DNS_BASE: &str = "example.com";

/// Default environment short name.
pub const DEFAULT_ENV_NAME: &str = "myenv";

/// The environment a manifest is generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    dns_base: String,
    name: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(DEFAULT_DNS_BASE, DEFAULT_ENV_NAME)
    }
}

impl Environment {
    /// Create an environment from a DNS base (e.g. `example.com`) and a
    /// short name (e.g. `myenv`).
    pub fn new(dns_base: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            dns_base: dns_base.into(),
            name: name.into(),
        }
    }

    pub fn dns_base(&self) -> &str {
        &self.dns_base
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<env>.<dns-base>`
    pub fn system_domain(&self) -> String {
        format!("{}.{}", self.name, self.dns_base)
    }

    /// Applications share the system domain.
    pub fn app_domain(&self) -> String {
        self.system_domain()
    }

    /// `<component>.<system-domain>`
    pub fn component_uri(&self, component: &str) -> String {
        format!("{}.{}", component, self.system_domain())
    }
}
