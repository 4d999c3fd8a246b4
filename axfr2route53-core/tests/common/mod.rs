//! 共享测试工具和辅助函数

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

use async_trait::async_trait;
use axfr2route53_provider::{
    ChangeBatch, ChangeInfo, ChangeStatus, HostedZoneProvider, ProviderError, Result,
};
use hickory_resolver::proto::{
    op::{Message, MessageType, OpCode, ResponseCode},
    rr::{Name, RData, Record, rdata::A, rdata::SOA},
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

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

pub const ZONE: &str = "my.dns.example.";

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

pub fn soa() -> Record {
    Record::from_rdata(
        name(ZONE),
        3600,
        RData::SOA(SOA::new(
            name("ns1.my.dns.example."),
            name("hostmaster.my.dns.example."),
            1,
            7200,
            900,
            1_209_600,
            300,
        )),
    )
}

/// `n` 个 A 记录：h0.my.dns.example. .. h{n-1}.my.dns.example.
pub fn a_records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let octets = u16::try_from(i).unwrap().to_be_bytes();
            Record::from_rdata(
                name(&format!("h{i}.{ZONE}")),
                300,
                RData::A(A::from(Ipv4Addr::new(10, 0, octets[0], octets[1]))),
            )
        })
        .collect()
}

/// 假 AXFR 服务器的应答方式
pub enum FakeAnswer {
    /// SOA + records + SOA，每条消息最多 `per_message` 条记录
    Zone {
        records: Vec<Record>,
        per_message: usize,
    },
    /// 只返回一个带 rcode 的空应答
    Rcode(ResponseCode),
}

/// 在 127.0.0.1 上启动一个只处理一次连接的假 AXFR 服务器
pub async fn fake_axfr_server(answer: FakeAnswer) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut len = [0u8; 2];
        stream.read_exact(&mut len).await.unwrap();
        let mut buf = vec![0u8; usize::from(u16::from_be_bytes(len))];
        stream.read_exact(&mut buf).await.unwrap();
        let query = Message::from_vec(&buf).unwrap();

        let messages: Vec<(ResponseCode, Vec<Record>)> = match answer {
            FakeAnswer::Rcode(code) => vec![(code, vec![])],
            FakeAnswer::Zone {
                records,
                per_message,
            } => {
                let mut all = vec![soa()];
                all.extend(records);
                all.push(soa());
                all.chunks(per_message.max(1))
                    .map(|c| (ResponseCode::NoError, c.to_vec()))
                    .collect()
            }
        };

        for (code, answers) in messages {
            let mut msg = Message::new();
            msg.set_id(query.id())
                .set_message_type(MessageType::Response)
                .set_op_code(OpCode::Query)
                .set_authoritative(true)
                .set_response_code(code);
            msg.add_queries(query.queries().to_vec());
            msg.add_answers(answers);

            let body = msg.to_vec().unwrap();
            stream
                .write_all(&u16::try_from(body.len()).unwrap().to_be_bytes())
                .await
                .unwrap();
            stream.write_all(&body).await.unwrap();
        }
        stream.flush().await.unwrap();
    });

    addr
}

// ===== RecordingProvider =====

/// 按顺序记录每次提交的 mock provider
#[derive(Default)]
pub struct RecordingProvider {
    pub submitted: Mutex<Vec<(String, ChangeBatch)>>,
    pub attempts: Mutex<usize>,
    /// 如果 Some(k)，第 k 次提交（1-based）被拒绝
    pub reject_batch: Option<usize>,
}

impl RecordingProvider {
    pub fn rejecting(k: usize) -> Self {
        Self {
            reject_batch: Some(k),
            ..Self::default()
        }
    }
}

#[async_trait]
impl HostedZoneProvider for RecordingProvider {
    fn id(&self) -> &'static str {
        "recording"
    }

    async fn change_record_sets(&self, zone_id: &str, batch: &ChangeBatch) -> Result<ChangeInfo> {
        let attempt = {
            let mut attempts = self.attempts.lock().await;
            *attempts += 1;
            *attempts
        };
        if self.reject_batch == Some(attempt) {
            return Err(ProviderError::InvalidChangeBatch {
                provider: "recording".to_string(),
                messages: vec!["Tried to create resource record set but it already exists".into()],
            });
        }

        self.submitted
            .lock()
            .await
            .push((zone_id.to_string(), batch.clone()));
        Ok(ChangeInfo {
            id: format!("C{attempt}"),
            status: ChangeStatus::Pending,
            submitted_at: None,
            comment: batch.comment.clone(),
        })
    }

    async fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        Ok(ChangeInfo {
            id: change_id.to_string(),
            status: ChangeStatus::InSync,
            submitted_at: None,
            comment: None,
        })
    }
}
