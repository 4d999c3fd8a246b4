//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;

use axfr2route53_provider::{AwsCredentials, ResourceRecordSet, Route53Provider};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 集成测试上下文
pub struct TestContext {
    pub provider: Route53Provider,
    pub zone_id: String,
    pub domain: String,
}

impl TestContext {
    /// 从环境变量创建 Route 53 测试上下文
    pub fn route53() -> Option<Self> {
        let credentials = AwsCredentials::from_env().ok()?;
        let provider = Route53Provider::new(credentials).ok()?;
        Some(Self {
            provider,
            zone_id: env::var("TEST_HOSTED_ZONE_ID").ok()?,
            domain: env::var("TEST_DOMAIN").ok()?,
        })
    }

    /// 只需要凭证和域名的上下文（zone id 不使用）
    pub fn route53_any_zone() -> Option<Self> {
        let credentials = AwsCredentials::from_env().ok()?;
        let provider = Route53Provider::new(credentials).ok()?;
        Some(Self {
            provider,
            zone_id: String::new(),
            domain: env::var("TEST_DOMAIN").ok()?,
        })
    }

    /// 生成唯一的测试记录（TXT，不影响解析）
    pub fn test_record_set(&self) -> ResourceRecordSet {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or_default();
        ResourceRecordSet {
            name: format!(
                "_axfr2route53-test-{nanos:08x}.{}.",
                self.domain.trim_end_matches('.')
            ),
            record_type: "TXT".to_string(),
            ttl: 60,
            values: vec!["\"axfr2route53 integration test\"".to_string()],
        }
    }
}
