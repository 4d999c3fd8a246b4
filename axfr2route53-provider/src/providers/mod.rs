//! Hosted-zone provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod route53;

pub use route53::{Route53Provider, Route53ProviderBuilder};
