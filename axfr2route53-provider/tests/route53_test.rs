//! Route 53 provider integration test
//!
//! Operation mode:
//! ```bash
//! AWS_ACCESS_KEY_ID=xxx AWS_SECRET_ACCESS_KEY=xxx TEST_HOSTED_ZONE_ID=Z123 TEST_DOMAIN=example.com \
//!     cargo test -p axfr2route53-provider --test route53_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use axfr2route53_provider::{
    Change, ChangeAction, ChangeBatch, HostedZoneProvider, ProviderError,
};
use common::TestContext;

#[tokio::test]
#[ignore = "integration test: requires AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, TEST_HOSTED_ZONE_ID and TEST_DOMAIN"]
async fn test_route53_upsert_then_delete() {
    skip_if_no_credentials!(
        "AWS_ACCESS_KEY_ID",
        "AWS_SECRET_ACCESS_KEY",
        "TEST_HOSTED_ZONE_ID",
        "TEST_DOMAIN"
    );

    let ctx = require_some!(TestContext::route53(), "创建测试上下文失败");
    let record_set = ctx.test_record_set();

    let upsert = ChangeBatch::new(
        Some("axfr2route53 integration test".to_string()),
        vec![Change::upsert(record_set.clone())],
    );
    let info = require_ok!(
        ctx.provider.change_record_sets(&ctx.zone_id, &upsert).await,
        "change_record_sets 调用失败"
    );
    assert!(!info.id.is_empty(), "change id 不应为空");

    // 同一批次再次 UPSERT 必须成功（幂等）
    require_ok!(
        ctx.provider.change_record_sets(&ctx.zone_id, &upsert).await,
        "重复 UPSERT 失败"
    );

    let status = require_ok!(
        ctx.provider.get_change(&info.id).await,
        "get_change 调用失败"
    );
    assert_eq!(status.id, info.id);

    let delete = ChangeBatch::new(
        None,
        vec![Change {
            action: ChangeAction::Delete,
            record_set,
        }],
    );
    require_ok!(
        ctx.provider.change_record_sets(&ctx.zone_id, &delete).await,
        "清理测试记录失败"
    );

    println!("✓ upsert/get_change/delete 测试通过: {}", info.id);
}

#[tokio::test]
#[ignore = "integration test: requires AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY"]
async fn test_route53_unknown_zone() {
    skip_if_no_credentials!("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "TEST_DOMAIN");

    // zone id 无需真实存在
    let ctx = require_some!(TestContext::route53_any_zone(), "创建测试上下文失败");
    let batch = ChangeBatch::new(None, vec![Change::upsert(ctx.test_record_set())]);

    let result = ctx
        .provider
        .change_record_sets("ZNONEXISTENT000000", &batch)
        .await;
    assert!(
        matches!(
            &result,
            Err(ProviderError::HostedZoneNotFound { .. } | ProviderError::PermissionDenied { .. })
        ),
        "unexpected result: {result:?}"
    );

    println!("✓ unknown zone 测试通过");
}
