//! Batch Upserter

use std::sync::Arc;
use std::time::Duration;

use axfr2route53_provider::{
    ChangeStatus, HostedZoneProvider, MAX_CHANGES_PER_BATCH, ProviderError,
};
use serde::Serialize;

use crate::batch::{build_change_batch, chunk_records};
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::types::ResourceRecord;

/// Interval between propagation checks while waiting for INSYNC.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Longest wait for one batch to reach INSYNC.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(600);

/// Outcome of one accepted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// 1-based position of the batch in the run.
    pub index: usize,
    pub size: usize,
    pub change_id: String,
    pub status: ChangeStatus,
    pub first_record: String,
    pub last_record: String,
}

/// Submits record sets as UPSERT batches, one at a time, in order.
pub struct BatchUpserter {
    provider: Arc<dyn HostedZoneProvider>,
    batch_size: usize,
    poll_interval: Duration,
    max_wait: Duration,
}

impl BatchUpserter {
    #[must_use]
    pub fn new(provider: Arc<dyn HostedZoneProvider>) -> Self {
        Self {
            provider,
            batch_size: MAX_CHANGES_PER_BATCH,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    /// Clamped to `1..=MAX_CHANGES_PER_BATCH`.
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.clamp(1, MAX_CHANGES_PER_BATCH);
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Submit every record set to `config.zone_id`.
    ///
    /// Batch `i + 1` is only built once batch `i` has been acknowledged (and,
    /// with `wait_for_sync`, has reached INSYNC). The first rejected batch ends
    /// the run; nothing after it is submitted.
    pub async fn upsert_all(
        &self,
        config: &SyncConfig,
        records: &[ResourceRecord],
    ) -> SyncResult<Vec<BatchOutcome>> {
        let zone_id = config.hosted_zone_id();
        let chunks = chunk_records(records, self.batch_size);
        let total = chunks.len();
        let mut outcomes = Vec::with_capacity(total);

        for (i, chunk) in chunks.into_iter().enumerate() {
            let index = i + 1;
            let (first_record, last_record) = record_range(chunk);
            let batch = build_change_batch(chunk, config.comment.as_deref());

            log::info!(
                "[upsert] Batch {index}/{total}: {} change(s), {first_record} .. {last_record}",
                batch.len()
            );

            let info = self
                .provider
                .change_record_sets(&zone_id, &batch)
                .await
                .map_err(|source| rejected(index, chunk, source))?;

            let mut outcome = BatchOutcome {
                index,
                size: chunk.len(),
                change_id: info.id,
                status: info.status,
                first_record,
                last_record,
            };

            if config.wait_for_sync && outcome.status != ChangeStatus::InSync {
                outcome.status = self.wait_until_in_sync(&outcome, chunk).await?;
            }

            log::info!(
                "[upsert] Batch {index}/{total} accepted: change {} ({:?})",
                outcome.change_id,
                outcome.status
            );
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    async fn wait_until_in_sync(
        &self,
        outcome: &BatchOutcome,
        chunk: &[ResourceRecord],
    ) -> SyncResult<ChangeStatus> {
        let started = tokio::time::Instant::now();

        loop {
            if started.elapsed() >= self.max_wait {
                return Err(SyncError::SyncTimeout {
                    batch_index: outcome.index,
                    change_id: outcome.change_id.clone(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;

            let info = self
                .provider
                .get_change(&outcome.change_id)
                .await
                .map_err(|source| rejected(outcome.index, chunk, source))?;

            log::debug!(
                "[upsert] Change {} is {:?} after {}s",
                outcome.change_id,
                info.status,
                started.elapsed().as_secs()
            );
            if info.status == ChangeStatus::InSync {
                return Ok(ChangeStatus::InSync);
            }
        }
    }
}

fn record_range(chunk: &[ResourceRecord]) -> (String, String) {
    let first = chunk.first().map(|r| r.name.clone()).unwrap_or_default();
    let last = chunk.last().map(|r| r.name.clone()).unwrap_or_default();
    (first, last)
}

/// Log the failing batch with its full content and turn it into the run's error.
fn rejected(index: usize, chunk: &[ResourceRecord], source: ProviderError) -> SyncError {
    if source.is_expected() {
        log::warn!("[upsert] Batch {index} rejected: {source}");
    } else {
        log::error!("[upsert] Batch {index} failed: {source}");
    }

    let record_names: Vec<String> = chunk.iter().map(|r| r.name.clone()).collect();
    log::error!(
        "[upsert] Batch {index} content ({} record set(s)): {}",
        record_names.len(),
        record_names.join(", ")
    );

    let (first_record, last_record) = record_range(chunk);
    SyncError::Upsert {
        batch_index: index,
        batch_len: chunk.len(),
        first_record,
        last_record,
        record_names,
        source,
    }
}
