//! varsgen: deployment variables for a Cloud Foundry style installation.
//!
//! Given a DNS base name and an environment name, the generator produces a
//! flat key/value manifest holding:
//!
//! - component URIs and URLs derived from `<env>.<dns-base>`
//! - random URL-safe secrets
//! - fixed service usernames
//! - RSA certificate authorities and the leaf certificates/keys they sign
//!
//! The manifest is built entirely in memory and serialized as YAML.
//!
//! # Example
//!
//! ```rust,no_run
//! use varsgen::config::Environment;
//! use varsgen::error::Result;
//! use varsgen::manifest::{assemble, Catalog};
//!
//! fn example() -> Result<()> {
//!     let manifest = assemble(&Environment::new("example.com", "myenv"), Catalog::standard())?;
//!     print!("{}", manifest.to_yaml()?);
//!     Ok(())
//! }
//! ```

pub mod cert;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod manifest;

// Re-export commonly used types
pub use error::{Result, VarsGenError};
pub use manifest::Manifest;
