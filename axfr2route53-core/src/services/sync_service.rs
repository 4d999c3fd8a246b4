//! Zone sync pipeline: fetch → filter → chunk → submit

use std::sync::Arc;

use axfr2route53_provider::HostedZoneProvider;
use serde::Serialize;

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::transfer::{AxfrClient, Record, filter_records};
use crate::types::RecordKind;
use crate::upsert::{BatchOutcome, BatchUpserter};

/// What a successful run did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub domain: String,
    pub zone_id: String,
    pub record_type: RecordKind,
    /// Address the zone was transferred from.
    pub server: String,
    /// Records in the transfer, opening SOA included.
    pub records_transferred: usize,
    /// Record sets of the requested type.
    pub record_sets_matched: usize,
    pub batches: Vec<BatchOutcome>,
}

impl SyncReport {
    /// Changes submitted over all batches.
    #[must_use]
    pub fn changes_submitted(&self) -> usize {
        self.batches.iter().map(|b| b.size).sum()
    }
}

/// Zone sync service
pub struct SyncService {
    upserter: BatchUpserter,
}

impl SyncService {
    /// 创建同步服务实例
    #[must_use]
    pub fn new(provider: Arc<dyn HostedZoneProvider>) -> Self {
        Self {
            upserter: BatchUpserter::new(provider),
        }
    }

    /// Use a pre-configured upserter (batch size, polling).
    #[must_use]
    pub fn with_upserter(upserter: BatchUpserter) -> Self {
        Self { upserter }
    }

    /// Run the whole pipeline once.
    pub async fn run(&self, config: &SyncConfig) -> SyncResult<SyncReport> {
        config.validate()?;
        let zone = config.zone_name()?;
        let server = config.server.resolve().await?;

        let records = AxfrClient::new(zone, config.transfer_timeout)
            .fetch(server)
            .await?;

        self.sync_records(config, &server.to_string(), &records)
            .await
    }

    /// Filter, chunk and submit records that were already transferred.
    pub async fn sync_records(
        &self,
        config: &SyncConfig,
        server: &str,
        records: &[Record],
    ) -> SyncResult<SyncReport> {
        let zone = config.zone_name()?;

        if records.is_empty() {
            return Err(SyncError::NoRecords {
                domain: zone.to_string(),
            });
        }

        let sets = filter_records(records, &zone, config.record_kind, config.include_apex)?;
        if sets.is_empty() {
            return Err(SyncError::NoMatchingRecords {
                record_type: config.record_kind.to_string(),
                domain: zone.to_string(),
            });
        }
        log::info!(
            "Matched {} {} record set(s) out of {} transferred record(s)",
            sets.len(),
            config.record_kind,
            records.len()
        );

        let batches = self.upserter.upsert_all(config, &sets).await?;

        Ok(SyncReport {
            domain: zone.to_string(),
            zone_id: config.hosted_zone_id(),
            record_type: config.record_kind,
            server: server.to_string(),
            records_transferred: records.len(),
            record_sets_matched: sets.len(),
            batches,
        })
    }
}
