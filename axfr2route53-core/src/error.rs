//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

pub use axfr2route53_provider::ProviderError;

/// Pipeline stage an error belongs to, used in operator-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Config,
    Transfer,
    Upsert,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Config => "config",
            Self::Transfer => "transfer",
            Self::Upsert => "upsert",
        })
    }
}

/// Sync pipeline error type
///
/// Every variant is terminal for the run. Re-running is safe because each
/// submitted change is an UPSERT.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum SyncError {
    /// Invalid command-line or programmatic configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not reach the source server, or the connection broke mid-transfer
    #[error("Zone transfer from {server} failed: {detail}")]
    Transfer { server: String, detail: String },

    /// The source server refused the AXFR request
    #[error("Zone transfer of {domain} refused by {server} ({rcode})")]
    TransferDenied {
        server: String,
        domain: String,
        rcode: String,
    },

    /// The zone transfer response could not be understood
    #[error("Malformed zone transfer response: {0}")]
    Protocol(String),

    /// The transfer completed but carried no records at all
    #[error("Zone transfer of {domain} returned no records (is AXFR enabled for this client?)")]
    NoRecords { domain: String },

    /// The transfer carried no records of the requested type
    #[error("No {record_type} records found in {domain}")]
    NoMatchingRecords { record_type: String, domain: String },

    /// The destination rejected a change batch
    #[error(
        "Batch {batch_index} ({batch_len} changes, {first_record} .. {last_record}) rejected: {source}"
    )]
    Upsert {
        /// 1-based index of the failing batch
        batch_index: usize,
        batch_len: usize,
        first_record: String,
        last_record: String,
        /// Every record set name in the batch, in submission order
        record_names: Vec<String>,
        #[source]
        source: ProviderError,
    },

    /// A batch was accepted but did not reach INSYNC in time
    #[error("Batch {batch_index} (change {change_id}) not in sync after {waited_secs}s")]
    SyncTimeout {
        batch_index: usize,
        change_id: String,
        waited_secs: u64,
    },

    /// Provider error outside of a batch submission (credentials, client setup)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl SyncError {
    /// Stage of the pipeline that failed.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidConfig(_) => Stage::Config,
            Self::Transfer { .. }
            | Self::TransferDenied { .. }
            | Self::Protocol(_)
            | Self::NoRecords { .. }
            | Self::NoMatchingRecords { .. } => Stage::Transfer,
            Self::Upsert { .. } | Self::SyncTimeout { .. } | Self::Provider(_) => Stage::Upsert,
        }
    }

    /// 是否为预期行为（配置错误、源服务器拒绝等），用于日志分级。
    ///
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidConfig(_)
            | Self::TransferDenied { .. }
            | Self::NoRecords { .. }
            | Self::NoMatchingRecords { .. } => true,
            Self::Upsert { source, .. } => source.is_expected(),
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Sync Result type alias
pub type SyncResult<T> = std::result::Result<T, SyncError>;
