//! Route 53 HTTP 请求方法

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::{mask_key_id, truncate_for_log};

use super::Route53Provider;
use super::types::{ErrorResponse, InvalidChangeBatchResponse};

impl Route53Provider {
    // ==================== 辅助方法 ====================

    /// Signed header set shared by every request.
    fn base_headers(&self, amz_date: &str) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Host".to_string(), self.host.clone()),
            ("X-Amz-Date".to_string(), amz_date.to_string()),
        ];
        if let Some(token) = &self.credentials.session_token {
            headers.push(("X-Amz-Security-Token".to_string(), token.clone()));
        }
        headers
    }

    /// 统一处理 Route 53 响应错误
    fn handle_response_error(
        &self,
        status: u16,
        response_text: &str,
        ctx: ErrorContext,
    ) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        // quick-xml 不校验根元素名，只能先看根元素再选类型
        if response_text.contains("<InvalidChangeBatch")
            && let Ok(body) = quick_xml::de::from_str::<InvalidChangeBatchResponse>(response_text)
        {
            return Err(crate::error::ProviderError::InvalidChangeBatch {
                provider: self.provider_name().to_string(),
                messages: body.into_messages(),
            });
        }

        if let Ok(body) = quick_xml::de::from_str::<ErrorResponse>(response_text) {
            if let Some(request_id) = &body.request_id {
                log::debug!("[route53] RequestId: {request_id}");
            }
            let message = body.error.message.unwrap_or_default();
            let raw = match body.error.code {
                Some(code) => RawApiError::with_code(status, code, message),
                None => RawApiError::new(status, message),
            };
            return Err(self.map_error(raw, ctx));
        }

        Err(self.map_error(
            RawApiError::new(
                status,
                format!("HTTP {status}: {}", truncate_for_log(response_text)),
            ),
            ctx,
        ))
    }

    // ==================== 公开 API 方法 ====================

    /// 执行签名后的 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, ctx: ErrorContext) -> Result<T> {
        let amz_date = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        let headers = self.base_headers(&amz_date);
        let authorization = self.sign("GET", path, "", &headers, "", &amz_date);

        let url = format!("https://{}{path}", self.host);
        let mut request = self.client.get(&url);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let request = request.header("Authorization", authorization);

        let (status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), "GET", &url).await?;

        self.handle_response_error(status, &response_text, ctx)?;
        HttpUtils::parse_xml(&response_text, self.provider_name())
    }

    /// 执行签名后的 POST 请求（XML body）
    pub(crate) async fn post_xml<T, B>(&self, path: &str, body: &B, ctx: ErrorContext) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let payload = HttpUtils::to_xml(body, self.provider_name())?;
        log::debug!("[route53] Request Body: {}", truncate_for_log(&payload));

        let amz_date = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        let mut headers = self.base_headers(&amz_date);
        headers.push(("Content-Type".to_string(), "text/xml".to_string()));

        let authorization = self.sign("POST", path, "", &headers, &payload, &amz_date);
        log::debug!(
            "[route53] Signed POST {path} with key {}",
            mask_key_id(&self.credentials.access_key_id)
        );

        let url = format!("https://{}{path}", self.host);
        let mut request = self.client.post(&url);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let request = request.header("Authorization", authorization).body(payload);

        let (status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), "POST", &url).await?;

        self.handle_response_error(status, &response_text, ctx)?;
        HttpUtils::parse_xml(&response_text, self.provider_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::AwsCredentials;
    use crate::error::ProviderError;

    fn provider() -> Option<Route53Provider> {
        Route53Provider::new(AwsCredentials::new("AKID", "secret").with_session_token("tok")).ok()
    }

    #[test]
    fn session_token_is_signed() {
        let Some(p) = provider() else {
            return;
        };
        let headers = p.base_headers("20240101T000000Z");
        assert!(
            headers
                .iter()
                .any(|(k, v)| k == "X-Amz-Security-Token" && v == "tok")
        );
    }

    #[test]
    fn success_status_passes() {
        let Some(p) = provider() else {
            return;
        };
        assert!(
            p.handle_response_error(200, "<ok/>", ErrorContext::default())
                .is_ok()
        );
    }

    #[test]
    fn invalid_change_batch_body_is_mapped() {
        let Some(p) = provider() else {
            return;
        };
        let body = r#"<?xml version="1.0"?>
<InvalidChangeBatch xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <Messages><Message>Tried to create resource record set but it already exists</Message></Messages>
</InvalidChangeBatch>"#;
        let result = p.handle_response_error(400, body, ErrorContext::default());
        assert!(
            matches!(&result, Err(ProviderError::InvalidChangeBatch { messages, .. }) if messages.len() == 1),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn error_response_body_is_mapped() {
        let Some(p) = provider() else {
            return;
        };
        let body = r#"<ErrorResponse><Error><Type>Sender</Type><Code>NoSuchHostedZone</Code><Message>nope</Message></Error><RequestId>r1</RequestId></ErrorResponse>"#;
        let ctx = ErrorContext {
            zone_id: Some("Z9".to_string()),
            ..Default::default()
        };
        let result = p.handle_response_error(404, body, ctx);
        assert!(
            matches!(&result, Err(ProviderError::HostedZoneNotFound { zone_id, .. }) if zone_id == "Z9"),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn unparseable_error_body_falls_back() {
        let Some(p) = provider() else {
            return;
        };
        let result = p.handle_response_error(418, "teapot", ErrorContext::default());
        assert!(
            matches!(&result, Err(ProviderError::Unknown { raw_message, .. }) if raw_message.contains("HTTP 418")),
            "unexpected result: {result:?}"
        );
    }
}
