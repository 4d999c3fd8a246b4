//! Route 53 `HostedZoneProvider` trait 实现

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{ErrorContext, HostedZoneProvider, validate_batch};
use crate::types::{ChangeBatch, ChangeInfo, normalize_change_id, normalize_zone_id};

use super::types::{ChangeInfoResponse, ChangeResourceRecordSetsRequest};
use super::{API_VERSION, Route53Provider};

#[async_trait]
impl HostedZoneProvider for Route53Provider {
    fn id(&self) -> &'static str {
        "route53"
    }

    async fn change_record_sets(&self, zone_id: &str, batch: &ChangeBatch) -> Result<ChangeInfo> {
        validate_batch(self.id(), batch)?;

        let zone_id = normalize_zone_id(zone_id);
        let path = format!(
            "/{API_VERSION}/hostedzone/{}/rrset/",
            urlencoding::encode(&zone_id)
        );
        let ctx = ErrorContext {
            zone_id: Some(zone_id.clone()),
            param: Some("change_batch".to_string()),
        };

        let body = ChangeResourceRecordSetsRequest::from_batch(batch);
        let response: ChangeInfoResponse = self.post_xml(&path, &body, ctx).await?;
        let info = ChangeInfo::from(response.change_info);

        log::info!(
            "[route53] Accepted {} change(s) for zone {zone_id} as change {} ({:?})",
            batch.len(),
            info.id,
            info.status
        );
        Ok(info)
    }

    async fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        let change_id = normalize_change_id(change_id);
        let path = format!(
            "/{API_VERSION}/change/{}",
            urlencoding::encode(&change_id)
        );
        let ctx = ErrorContext {
            param: Some("change_id".to_string()),
            ..Default::default()
        };

        let response: ChangeInfoResponse = self.get(&path, ctx).await?;
        Ok(ChangeInfo::from(response.change_info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::AwsCredentials;
    use crate::error::ProviderError;

    #[tokio::test]
    async fn empty_batch_rejected_before_network() {
        // 不可达的 host：若校验失效，请求会以网络错误失败而非参数错误
        let provider = Route53Provider::builder(AwsCredentials::new("AKID", "secret"))
            .host("127.0.0.1:9")
            .build();
        assert!(provider.is_ok());
        let Ok(provider) = provider else {
            return;
        };
        let result = provider
            .change_record_sets("Z1", &ChangeBatch::default())
            .await;
        assert!(
            matches!(&result, Err(ProviderError::InvalidParameter { param, .. }) if param == "changes"),
            "unexpected result: {result:?}"
        );
    }
}
