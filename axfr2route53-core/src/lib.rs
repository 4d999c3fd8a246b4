//! axfr2route53 core library
//!
//! Carries the records of one type from an authoritative DNS server into a
//! hosted zone:
//! - Transfer Fetcher: one AXFR query over TCP, then type filtering
//! - Batch Upserter: ordered UPSERT batches of at most 100 changes
//! - `SyncService`: the fetch → filter → chunk → submit pipeline
//!
//! The destination is abstracted behind
//! [`HostedZoneProvider`](axfr2route53_provider::HostedZoneProvider), so the
//! pipeline runs the same against Route 53 and against a test double.

pub mod batch;
pub mod config;
pub mod error;
pub mod services;
pub mod transfer;
pub mod types;
pub mod upsert;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{ServerAddress, SyncConfig};
pub use error::{Stage, SyncError, SyncResult};
pub use services::{SyncReport, SyncService};
pub use types::{RecordKind, ResourceRecord};
pub use upsert::{BatchOutcome, BatchUpserter};
