//! Route 53 错误映射
//!
//! 参考: <https://docs.aws.amazon.com/Route53/latest/APIReference/CommonErrors.html>
//! 以及 `ChangeResourceRecordSets` / `GetChange` 的专有错误码。

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::Route53Provider;

impl ProviderErrorMapper for Route53Provider {
    fn provider_name(&self) -> &'static str {
        "route53"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // ============ 认证错误 ============
            Some(
                "InvalidClientTokenId"
                | "SignatureDoesNotMatch"
                | "IncompleteSignature"
                | "MissingAuthenticationToken"
                | "ExpiredToken"
                | "UnrecognizedClientException",
            ) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ 权限拒绝 ============
            Some("AccessDenied" | "AccessDeniedException" | "OptInRequired") => {
                ProviderError::PermissionDenied {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            // ============ Hosted zone 不存在 ============
            Some("NoSuchHostedZone") => ProviderError::HostedZoneNotFound {
                provider: self.provider_name().to_string(),
                zone_id: context.zone_id.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ Change batch 被拒绝 ============
            Some("InvalidChangeBatch") => ProviderError::InvalidChangeBatch {
                provider: self.provider_name().to_string(),
                messages: vec![raw.message],
            },

            // ============ 并发修改 ============
            Some("PriorRequestNotComplete") => ProviderError::ConcurrentModification {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ 频率限制 ============
            Some("Throttling" | "ThrottlingException" | "RequestLimitExceeded") => {
                ProviderError::RateLimited {
                    provider: self.provider_name().to_string(),
                    retry_after: None,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 参数无效 ============
            Some("InvalidInput" | "InvalidParameterValue" | "MissingParameter") => {
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: context.param.unwrap_or_else(|| "request".to_string()),
                    detail: raw.message,
                }
            }
            Some("NoSuchChange") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "change_id".to_string(),
                detail: raw.message,
            },

            // ============ 服务端错误 ============
            Some("InternalFailure" | "ServiceUnavailable") => ProviderError::NetworkError {
                provider: self.provider_name().to_string(),
                detail: raw.message,
            },

            // ============ 无错误码时按 HTTP 状态兜底 ============
            None if raw.status == 403 => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            None if raw.status >= 500 => ProviderError::NetworkError {
                provider: self.provider_name().to_string(),
                detail: raw.message,
            },

            _ => self.unknown_error(raw),
        }
    }
}
