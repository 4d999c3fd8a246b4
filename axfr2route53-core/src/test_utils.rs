//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;

use async_trait::async_trait;
use axfr2route53_provider::{
    ChangeBatch, ChangeInfo, ChangeStatus, HostedZoneProvider, ProviderError, Result,
};
use tokio::sync::Mutex;

use crate::types::{RecordKind, ResourceRecord};

// ===== MockZoneProvider =====

/// 记录所有提交的 mock hosted zone
pub struct MockZoneProvider {
    /// 成功提交的 (zone_id, batch)，按提交顺序
    submitted: Mutex<Vec<(String, ChangeBatch)>>,
    /// change_record_sets 被调用的次数（含失败）
    attempts: Mutex<usize>,
    /// 每个 change id 已被轮询的次数
    polls: Mutex<HashMap<String, usize>>,
    /// 如果 Some(k)，第 k 次提交（1-based）返回 InvalidChangeBatch
    fail_on: Option<usize>,
    /// 每个 change 在变为 INSYNC 之前返回 PENDING 的次数
    pending_polls: usize,
}

impl MockZoneProvider {
    pub fn new() -> Self {
        Self {
            submitted: Mutex::new(Vec::new()),
            attempts: Mutex::new(0),
            polls: Mutex::new(HashMap::new()),
            fail_on: None,
            pending_polls: 0,
        }
    }

    pub fn fail_on_batch(mut self, k: usize) -> Self {
        self.fail_on = Some(k);
        self
    }

    pub fn pending_polls(mut self, n: usize) -> Self {
        self.pending_polls = n;
        self
    }

    pub async fn submitted(&self) -> Vec<(String, ChangeBatch)> {
        self.submitted.lock().await.clone()
    }

    pub async fn attempts(&self) -> usize {
        *self.attempts.lock().await
    }

    /// 所有 change 的轮询总次数
    pub async fn polls(&self) -> usize {
        self.polls.lock().await.values().sum()
    }
}

#[async_trait]
impl HostedZoneProvider for MockZoneProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn change_record_sets(&self, zone_id: &str, batch: &ChangeBatch) -> Result<ChangeInfo> {
        let attempt = {
            let mut attempts = self.attempts.lock().await;
            *attempts += 1;
            *attempts
        };

        if self.fail_on == Some(attempt) {
            return Err(ProviderError::InvalidChangeBatch {
                provider: "mock".to_string(),
                messages: vec![format!("batch {attempt} rejected")],
            });
        }

        self.submitted
            .lock()
            .await
            .push((zone_id.to_string(), batch.clone()));

        Ok(ChangeInfo {
            id: format!("C{attempt:04}"),
            status: ChangeStatus::Pending,
            submitted_at: None,
            comment: batch.comment.clone(),
        })
    }

    async fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        let mut polls = self.polls.lock().await;
        let count = polls.entry(change_id.to_string()).or_insert(0);
        *count += 1;

        let status = if *count > self.pending_polls {
            ChangeStatus::InSync
        } else {
            ChangeStatus::Pending
        };
        Ok(ChangeInfo {
            id: change_id.to_string(),
            status,
            submitted_at: None,
            comment: None,
        })
    }
}

// ===== 工厂函数 =====

/// `n` 个 A 记录集：h0.my.dns.example. .. h{n-1}.my.dns.example.
pub fn record_sets(n: usize) -> Vec<ResourceRecord> {
    (0..n)
        .map(|i| ResourceRecord {
            name: format!("h{i}.my.dns.example."),
            kind: RecordKind::A,
            ttl: 300,
            values: vec![format!("10.0.{}.{}", i / 256, i % 256)],
        })
        .collect()
}
