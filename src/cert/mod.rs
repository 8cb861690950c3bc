//! Certificate generation module.
//!
//! One CA level: self-signed certificate authorities and the leaf
//! certificates they sign from CSRs.

pub mod builder;
pub mod ca;
pub mod csr;
pub mod entity;
pub mod loader;
