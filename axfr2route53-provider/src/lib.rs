//! # axfr2route53-provider
//!
//! Binding for a managed DNS provider's hosted-zone change API. It submits
//! bounded change batches (create-or-update per record set) and reports their
//! propagation status.
//!
//! ## Supported Providers
//!
//! | Provider | Auth Method |
//! |----------|-------------|
//! | [Amazon Route 53](https://aws.amazon.com/route53/) | `SigV4` (`AWS4-HMAC-SHA256`) |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for static and cross-compiled builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use axfr2route53_provider::{
//!     AwsCredentials, Change, ChangeBatch, HostedZoneProvider, ResourceRecordSet,
//!     Route53Provider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Route53Provider::new(AwsCredentials::from_env()?)?;
//!
//!     let batch = ChangeBatch::new(
//!         Some("Managed by axfr2route53".to_string()),
//!         vec![Change::upsert(ResourceRecordSet {
//!             name: "www.example.com.".to_string(),
//!             record_type: "A".to_string(),
//!             ttl: 300,
//!             values: vec!["192.0.2.1".to_string()],
//!         })],
//!     );
//!
//!     let info = provider.change_record_sets("Z1234567891011", &batch).await?;
//!     println!("change {} is {:?}", info.id, info.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). Nothing is
//! retried internally; a failed batch is reported once and left to the caller.
//!
//! - [`ProviderError::InvalidCredentials`] — signature or key rejected
//! - [`ProviderError::HostedZoneNotFound`] — the destination zone does not exist
//! - [`ProviderError::InvalidChangeBatch`] — the batch was refused, with diagnostics
//! - [`ProviderError::ConcurrentModification`] — another change is still in flight

mod credentials;
mod error;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use credentials::{AwsCredentials, ENV_ACCESS_KEY_ID, ENV_SECRET_ACCESS_KEY, ENV_SESSION_TOKEN};

pub use error::{ProviderError, Result};

pub use traits::HostedZoneProvider;

pub use types::{
    Change, ChangeAction, ChangeBatch, ChangeInfo, ChangeStatus, MAX_CHANGES_PER_BATCH,
    ResourceRecordSet, normalize_change_id, normalize_zone_id,
};

pub use providers::{Route53Provider, Route53ProviderBuilder};
