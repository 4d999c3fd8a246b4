//! AWS Signature Version 4 (`AWS4-HMAC-SHA256`)

use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::credentials::AwsCredentials;
use crate::providers::common::hmac_sha256;
use crate::utils::log_sanitizer::truncate_for_log;

use super::{Route53Provider, SIGNING_SERVICE};

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

impl Route53Provider {
    /// Generate the `Authorization` header for a Route 53 request.
    pub(crate) fn sign(
        &self,
        method: &str,
        uri: &str,
        query: &str,
        headers: &[(String, String)],
        payload: &str,
        amz_date: &str,
    ) -> String {
        sign_v4(
            &self.credentials,
            &self.region,
            SIGNING_SERVICE,
            method,
            uri,
            query,
            headers,
            payload,
            amz_date,
        )
    }
}

/// Derive the per-day signing key.
pub(crate) fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Sign a request and return the `Authorization` header value.
///
/// Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html>
#[allow(clippy::too_many_arguments)]
pub(crate) fn sign_v4(
    credentials: &AwsCredentials,
    region: &str,
    service: &str,
    method: &str,
    uri: &str,
    query: &str,
    headers: &[(String, String)],
    payload: &str,
    amz_date: &str,
) -> String {
    // 1. Canonical URI: path as-is, "/" when empty
    let canonical_uri = if uri.is_empty() { "/" } else { uri };

    // 2. Query string sorted by parameter name
    let canonical_query = if query.is_empty() {
        String::new()
    } else {
        let mut params: Vec<&str> = query.split('&').collect();
        params.sort_unstable();
        params.join("&")
    };

    // 3. Canonical headers: lowercase names, sorted, trimmed values
    let mut sorted_headers: Vec<_> = headers.iter().collect();
    sorted_headers.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));

    let canonical_headers: String =
        sorted_headers
            .iter()
            .fold(String::new(), |mut acc, (k, v)| {
                let _ = writeln!(acc, "{}:{}", k.to_lowercase(), v.trim());
                acc
            });

    let signed_headers: String = sorted_headers
        .iter()
        .map(|(k, _)| k.to_lowercase())
        .collect::<Vec<_>>()
        .join(";");

    // 4. Payload hash
    let hashed_payload = hex::encode(Sha256::digest(payload.as_bytes()));

    // 5. Canonical request
    let canonical_request = format!(
        "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{hashed_payload}"
    );

    log::debug!("CanonicalRequest:\n{}", truncate_for_log(&canonical_request));

    // 6. String to sign
    let date = amz_date.get(..8).unwrap_or(amz_date);
    let scope = format!("{date}/{region}/{service}/aws4_request");
    let hashed_canonical_request = hex::encode(Sha256::digest(canonical_request.as_bytes()));
    let string_to_sign = format!("{ALGORITHM}\n{amz_date}\n{scope}\n{hashed_canonical_request}");

    log::debug!("StringToSign:\n{string_to_sign}");

    // 7. Signature
    let key = signing_key(&credentials.secret_access_key, date, region, service);
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

    // 8. Authorization header
    format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
        credentials.access_key_id
    )
}
