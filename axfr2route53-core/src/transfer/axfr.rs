//! AXFR client (RFC 5936) on top of hickory's TCP exchange

use std::net::SocketAddr;
use std::time::Duration;

use futures::StreamExt;
use hickory_resolver::proto::{
    ProtoError,
    op::{Message, MessageType, ResponseCode, update_message::zone_transfer},
    rr::{Name, Record, RecordType},
    runtime::{TokioRuntimeProvider, TokioTime},
    tcp::TcpClientStream,
    xfer::{DnsExchange, DnsHandle, DnsMultiplexer},
};

use crate::error::{SyncError, SyncResult};

/// Upper bound for a whole transfer, however steadily the server streams.
pub const DEFAULT_MAX_TRANSFER: Duration = Duration::from_secs(600);

/// Requests a full copy of one zone and collects its records.
#[derive(Debug, Clone)]
pub struct AxfrClient {
    zone: Name,
    timeout: Duration,
    max_duration: Duration,
}

impl AxfrClient {
    /// `timeout` bounds the connect and the wait for every single message.
    pub fn new(zone: Name, timeout: Duration) -> Self {
        Self {
            zone,
            timeout,
            max_duration: DEFAULT_MAX_TRANSFER.max(timeout),
        }
    }

    /// Connect to `server` and run the transfer.
    ///
    /// Returns every record between the opening SOA (included) and the closing
    /// SOA (excluded). A server that answers with no records at all yields an
    /// empty list.
    pub async fn fetch(&self, server: SocketAddr) -> SyncResult<Vec<Record>> {
        let label = server.to_string();
        log::info!("[axfr] Requesting transfer of {} from {label}", self.zone);

        let (connect, handle) = TcpClientStream::new(
            server,
            None,
            Some(self.timeout),
            TokioRuntimeProvider::new(),
        );
        let multiplexer = DnsMultiplexer::with_timeout(connect, handle, self.max_duration, None);
        let (exchange, background) = DnsExchange::connect::<_, _, TokioTime>(multiplexer)
            .await
            .map_err(|e| SyncError::Transfer {
                server: label.clone(),
                detail: format!("connect failed: {e}"),
            })?;

        let background = tokio::spawn(background);
        let result = self.collect(&exchange, &label).await;
        background.abort();
        result
    }

    async fn collect(&self, exchange: &DnsExchange, server: &str) -> SyncResult<Vec<Record>> {
        let mut responses = exchange.send(zone_transfer(self.zone.clone(), None));
        let mut records: Vec<Record> = Vec::new();
        let mut messages = 0usize;

        loop {
            let next = tokio::time::timeout(self.timeout, responses.next())
                .await
                .map_err(|_| SyncError::Transfer {
                    server: server.to_string(),
                    detail: format!("no response within {:?}", self.timeout),
                })?;
            let response = match next {
                Some(Ok(response)) => response,
                Some(Err(e)) => return Err(self.stream_error(&e, messages, server)),
                // 整个请求超时后 hickory 只结束流，不带错误
                None => {
                    return Err(SyncError::Transfer {
                        server: server.to_string(),
                        detail: format!(
                            "transfer did not complete within {:?}",
                            self.max_duration
                        ),
                    });
                }
            };
            messages += 1;

            self.check_response(&response, server)?;
            let answers = response.answers();
            log::debug!("[axfr] Message {messages}: {} answer(s)", answers.len());

            if messages == 1 && answers.is_empty() {
                log::warn!("[axfr] {server} answered the transfer of {} with no records", self.zone);
                return Ok(records);
            }

            for record in answers {
                let is_soa = record.record_type() == RecordType::SOA;
                if records.is_empty() {
                    if !is_soa {
                        return Err(SyncError::Protocol(format!(
                            "transfer starts with {} instead of SOA",
                            record.record_type()
                        )));
                    }
                } else if is_soa {
                    log::info!(
                        "[axfr] Transfer of {} complete: {} record(s) in {messages} message(s)",
                        self.zone,
                        records.len()
                    );
                    return Ok(records);
                }
                records.push(record.clone());
            }
        }
    }

    fn stream_error(&self, e: &ProtoError, messages: usize, server: &str) -> SyncError {
        if e.is_io() {
            return SyncError::Transfer {
                server: server.to_string(),
                detail: format!("read failed: {e}"),
            };
        }
        log::debug!("[axfr] Stream of {} ended with: {e}", self.zone);
        SyncError::Protocol(format!(
            "connection closed after {messages} message(s) before the closing SOA"
        ))
    }

    fn check_response(&self, response: &Message, server: &str) -> SyncResult<()> {
        if response.message_type() != MessageType::Response {
            return Err(SyncError::Protocol(
                "received a query where a response was expected".to_string(),
            ));
        }

        match response.response_code() {
            ResponseCode::NoError => Ok(()),
            code @ (ResponseCode::Refused | ResponseCode::NotAuth | ResponseCode::NotImp) => {
                Err(SyncError::TransferDenied {
                    server: server.to_string(),
                    domain: self.zone.to_string(),
                    rcode: rcode_mnemonic(code),
                })
            }
            code => Err(SyncError::Protocol(format!(
                "server answered {}",
                rcode_mnemonic(code)
            ))),
        }
    }
}

fn rcode_mnemonic(code: ResponseCode) -> String {
    match code {
        ResponseCode::NoError => "NOERROR".to_string(),
        ResponseCode::FormErr => "FORMERR".to_string(),
        ResponseCode::ServFail => "SERVFAIL".to_string(),
        ResponseCode::NXDomain => "NXDOMAIN".to_string(),
        ResponseCode::NotImp => "NOTIMP".to_string(),
        ResponseCode::Refused => "REFUSED".to_string(),
        ResponseCode::NotAuth => "NOTAUTH".to_string(),
        other => format!("RCODE{}", u16::from(other)),
    }
}
