//! Generic HTTP client tools
//!
//! Shared request execution for provider implementations. Each provider signs
//! and builds its own `RequestBuilder`; this module sends it, logs it and turns
//! transport failures into [`ProviderError`].
//!
//! Requests are sent exactly once. Transient failures surface to the caller.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns status code plus response text.
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, headers, body)
    /// * `provider_name` - provider name, for logs and errors
    /// * `method_name` - HTTP method, for logs
    /// * `url_or_action` - URL or action name, for logs
    ///
    /// # Returns
    /// * `Ok((status_code, response_text))` for any HTTP status except 429 and 502..=504
    /// * `Err(ProviderError::RateLimited)` for HTTP 429
    /// * `Err(ProviderError::NetworkError)` for 502..=504 and transport failures
    /// * `Err(ProviderError::Timeout)` when reqwest reports a timeout
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_name}] {method_name} {url_or_action}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status_code}");

        // Retry-After 必须在读取 body 之前取出
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                provider: provider_name.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Server error (HTTP {status_code})");
            return Err(ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{provider_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse an XML response body.
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(ProviderError::ParseError)` - parsing failed
    pub fn parse_xml<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        quick_xml::de::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] XML parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Serialize a request body to XML, prefixed with the XML declaration.
    pub fn to_xml<T>(body: &T, provider_name: &str) -> Result<String, ProviderError>
    where
        T: serde::Serialize,
    {
        quick_xml::se::to_string(body)
            .map(|xml| format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>{xml}"))
            .map_err(|e| ProviderError::SerializationError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            })
    }
}
