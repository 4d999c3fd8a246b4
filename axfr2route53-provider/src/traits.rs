use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{ChangeBatch, ChangeInfo, MAX_CHANGES_PER_BATCH};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（如 `NoSuchHostedZone`）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
    /// HTTP 状态码
    pub status: u16,
}

impl RawApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            status,
        }
    }

    pub fn with_code(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            status,
        }
    }
}

/// 错误上下文信息（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 目标 hosted zone
    pub zone_id: Option<String>,
    /// 请求参数名（用于 `InvalidParameter`）
    pub param: Option<String>,
}

/// Provider 错误映射 Trait（内部使用）
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Hosted-zone provider trait.
///
/// Submits change batches to a managed DNS zone and reports their status.
#[async_trait]
pub trait HostedZoneProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// Submit one change batch to `zone_id` and wait for the API to accept it.
    ///
    /// The batch is applied atomically by the provider: either every change
    /// lands or none does.
    async fn change_record_sets(&self, zone_id: &str, batch: &ChangeBatch) -> Result<ChangeInfo>;

    /// Fetch the current status of a previously submitted change.
    async fn get_change(&self, change_id: &str) -> Result<ChangeInfo>;
}

/// Reject batches the API would refuse anyway, before any request is sent.
pub(crate) fn validate_batch(provider: &str, batch: &ChangeBatch) -> Result<()> {
    if batch.is_empty() {
        return Err(ProviderError::InvalidParameter {
            provider: provider.to_string(),
            param: "changes".to_string(),
            detail: "change batch is empty".to_string(),
        });
    }
    if batch.len() > MAX_CHANGES_PER_BATCH {
        return Err(ProviderError::InvalidParameter {
            provider: provider.to_string(),
            param: "changes".to_string(),
            detail: format!(
                "change batch holds {} changes, limit is {MAX_CHANGES_PER_BATCH}",
                batch.len()
            ),
        });
    }
    if let Some(change) = batch
        .changes
        .iter()
        .find(|c| c.record_set.values.is_empty())
    {
        return Err(ProviderError::InvalidParameter {
            provider: provider.to_string(),
            param: "values".to_string(),
            detail: format!("record set '{}' has no values", change.record_set.name),
        });
    }
    Ok(())
}
