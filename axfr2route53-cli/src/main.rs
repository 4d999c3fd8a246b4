//! `axfr2route53` entry point
//!
//! Transfers a zone from an authoritative server and upserts the records of
//! one type into a Route 53 hosted zone. Credentials come from the standard
//! `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`
//! environment variables.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use axfr2route53_core::config::DEFAULT_COMMENT;
use axfr2route53_core::{
    BatchUpserter, RecordKind, ServerAddress, SyncConfig, SyncError, SyncReport, SyncService,
};
use axfr2route53_provider::{AwsCredentials, MAX_CHANGES_PER_BATCH, Route53Provider};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    name = "axfr2route53",
    version,
    about = "Copy the records of one type from an AXFR-enabled DNS server into a Route 53 hosted zone"
)]
struct Args {
    /// DNS server to transfer the zone from (host, host:port or IP literal)
    #[arg(short = 's', long = "server", value_name = "ADDRESS")]
    server: ServerAddress,

    /// Zone to transfer
    #[arg(short = 'd', long = "domain")]
    domain: String,

    /// Destination hosted zone id (Z123... or /hostedzone/Z123...)
    #[arg(short = 'z', long = "zone-id", value_name = "ZONE_ID")]
    zone_id: String,

    /// Record type to copy: A, AAAA, CNAME, MX, NS, PTR, SPF, TXT or SRV
    #[arg(short = 't', long = "record-type", value_name = "TYPE")]
    record_type: RecordKind,

    /// Comment attached to every change batch (empty for none)
    #[arg(short = 'c', long = "comment", default_value = DEFAULT_COMMENT)]
    comment: String,

    /// Also copy records owned by the zone apex
    #[arg(long)]
    include_apex: bool,

    /// Wait for each batch to reach INSYNC before sending the next
    #[arg(long)]
    wait: bool,

    /// Zone transfer connect/read timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Record sets per change batch (1-100)
    #[arg(
        long,
        value_name = "N",
        default_value_t = MAX_CHANGES_PER_BATCH,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=100)
    )]
    batch_size: usize,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Debug logging for axfr2route53 itself (RUST_LOG overrides)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Log targets raised by `-v`.
const OWN_TARGETS: [&str; 3] = ["axfr2route53", "axfr2route53_core", "axfr2route53_provider"];

/// `RUST_LOG` wins when set and valid; otherwise dependencies stay at warn.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty())
        && let Ok(filter) = EnvFilter::try_new(directives)
    {
        return filter;
    }

    let level = if verbose { "debug" } else { "info" };
    let mut directives = vec!["warn".to_string()];
    directives.extend(OWN_TARGETS.iter().map(|target| format!("{target}={level}")));
    EnvFilter::new(directives.join(","))
}

impl Args {
    fn sync_config(&self) -> SyncConfig {
        let comment = Some(self.comment.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        SyncConfig::new(
            self.server.clone(),
            self.domain.clone(),
            self.zone_id.clone(),
            self.record_type,
        )
        .with_comment(comment)
        .with_include_apex(self.include_apex)
        .with_wait_for_sync(self.wait)
        .with_transfer_timeout(Duration::from_secs(self.timeout))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr, stdout is reserved for the report
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(log_filter(args.verbose, rust_log.as_deref()))
        .init();

    match run(&args).await {
        Ok(report) => {
            print_report(&report, args.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_failure(&e, args.json);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<SyncReport, SyncError> {
    let config = args.sync_config();
    config.validate()?;

    // 凭证缺失属于配置错误，在发起任何网络请求之前报告
    let credentials =
        AwsCredentials::from_env().map_err(|e| SyncError::InvalidConfig(e.to_string()))?;
    let provider = Route53Provider::new(credentials)?;

    tracing::info!(
        "Syncing {} records of {} from {} into hosted zone {}",
        config.record_kind,
        config.domain,
        config.server,
        config.hosted_zone_id()
    );

    let upserter = BatchUpserter::new(Arc::new(provider)).with_batch_size(args.batch_size);
    SyncService::with_upserter(upserter).run(&config).await
}

fn print_report(report: &SyncReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(out) => println!("{out}"),
            Err(e) => tracing::error!("Failed to serialize report: {e}"),
        }
        return;
    }

    println!(
        "Upserted {} {} record set(s) of {} into {} in {} batch(es) ({} records transferred from {})",
        report.record_sets_matched,
        report.record_type,
        report.domain,
        report.zone_id,
        report.batches.len(),
        report.records_transferred,
        report.server
    );
    for batch in &report.batches {
        println!(
            "  batch {}: {} change(s), {} .. {}, change {} {:?}",
            batch.index,
            batch.size,
            batch.first_record,
            batch.last_record,
            batch.change_id,
            batch.status
        );
    }
}

fn print_failure(error: &SyncError, json: bool) {
    // 预期内的失败（拒绝传输、批次被拒）只记 warn
    if error.is_expected() {
        tracing::warn!("Run stopped at the {} stage", error.stage());
    } else {
        tracing::error!("Unexpected {} failure: {error:?}", error.stage());
    }

    if json {
        let body = serde_json::json!({
            "stage": error.stage(),
            "error": error,
            "message": error.to_string(),
        });
        println!("{body:#}");
    }
    eprintln!("axfr2route53: {} failed: {error}", error.stage());
}
