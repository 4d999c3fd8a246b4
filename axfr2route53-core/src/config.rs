//! Immutable run configuration

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use axfr2route53_provider::normalize_zone_id;
use hickory_resolver::{
    TokioResolver,
    config::{ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
    proto::rr::Name,
};

use crate::error::{SyncError, SyncResult};
use crate::types::RecordKind;

/// Port zone transfers are requested on unless told otherwise.
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Comment attached to every submitted change batch by default.
pub const DEFAULT_COMMENT: &str = "Managed by axfr2route53";

/// Default bound on connecting to the source and on waiting for each message from it.
pub const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_secs(30);

/// Route 53 caps change batch comments at 256 characters.
const MAX_COMMENT_LEN: usize = 256;

/// Source server of the zone transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerAddress {
    /// Literal address, used as is.
    Socket(SocketAddr),
    /// Host name, resolved right before connecting.
    Host { name: String, port: u16 },
}

impl ServerAddress {
    /// Turn the address into something `TcpStream::connect` accepts.
    ///
    /// Host names go through the system resolver configuration, falling back
    /// to hickory's defaults when it cannot be read.
    pub async fn resolve(&self) -> SyncResult<SocketAddr> {
        let (name, port) = match self {
            Self::Socket(addr) => return Ok(*addr),
            Self::Host { name, port } => (name, *port),
        };

        let config = match hickory_resolver::system_conf::read_system_conf() {
            Ok((config, _opts)) => config,
            Err(e) => {
                log::warn!("Failed to load system DNS configuration, falling back to defaults: {e}");
                ResolverConfig::default()
            }
        };
        let resolver =
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
                .with_options(ResolverOpts::default())
                .build();

        let lookup = resolver
            .lookup_ip(name.as_str())
            .await
            .map_err(|e| SyncError::Transfer {
                server: self.to_string(),
                detail: format!("cannot resolve host name: {e}"),
            })?;

        let ip = lookup.iter().next().ok_or_else(|| SyncError::Transfer {
            server: self.to_string(),
            detail: "host name has no addresses".to_string(),
        })?;
        log::debug!("Resolved {name} to {ip}");
        Ok(SocketAddr::new(ip, port))
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Socket(addr) => write!(f, "{addr}"),
            Self::Host { name, port } => write!(f, "{name}:{port}"),
        }
    }
}

impl FromStr for ServerAddress {
    type Err = SyncError;

    /// Accepts `192.0.2.1`, `192.0.2.1:5353`, `2001:db8::1`, `[2001:db8::1]:5353`,
    /// `ns1.example.com` and `ns1.example.com:5353`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SyncError::InvalidConfig(
                "server address must not be empty".to_string(),
            ));
        }

        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(Self::Socket(addr));
        }
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Self::Socket(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
        }
        // "[v6]" without a port
        if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            return inner
                .parse::<IpAddr>()
                .map(|ip| Self::Socket(SocketAddr::new(ip, DEFAULT_DNS_PORT)))
                .map_err(|_| invalid_server(s, "not an IP address"));
        }

        let (name, port) = match s.rsplit_once(':') {
            Some((name, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| invalid_server(s, "invalid port"))?;
                (name, port)
            }
            None => (s, DEFAULT_DNS_PORT),
        };
        if port == 0 {
            return Err(invalid_server(s, "port must not be 0"));
        }
        if name.is_empty() || name.contains(':') || Name::from_ascii(name).is_err() {
            return Err(invalid_server(s, "not a host name or IP address"));
        }

        Ok(Self::Host {
            name: name.to_string(),
            port,
        })
    }
}

fn invalid_server(value: &str, detail: &str) -> SyncError {
    SyncError::InvalidConfig(format!("invalid server address '{value}': {detail}"))
}

/// Everything one run needs, fixed before the first packet is sent.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Server the zone is transferred from.
    pub server: ServerAddress,
    /// Zone to transfer.
    pub domain: String,
    /// Destination hosted zone.
    pub zone_id: String,
    /// Only records of this type are carried over.
    pub record_kind: RecordKind,
    /// Comment recorded with every change batch.
    pub comment: Option<String>,
    /// Carry over records owned by the zone apex as well.
    pub include_apex: bool,
    /// Bound on connecting to the source and on waiting for each message from it.
    pub transfer_timeout: Duration,
    /// Wait for every accepted batch to report INSYNC before submitting the next.
    pub wait_for_sync: bool,
}

impl SyncConfig {
    pub fn new(
        server: ServerAddress,
        domain: impl Into<String>,
        zone_id: impl Into<String>,
        record_kind: RecordKind,
    ) -> Self {
        Self {
            server,
            domain: domain.into(),
            zone_id: zone_id.into(),
            record_kind,
            comment: Some(DEFAULT_COMMENT.to_string()),
            include_apex: false,
            transfer_timeout: DEFAULT_TRANSFER_TIMEOUT,
            wait_for_sync: false,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    #[must_use]
    pub fn with_include_apex(mut self, include_apex: bool) -> Self {
        self.include_apex = include_apex;
        self
    }

    #[must_use]
    pub fn with_transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_wait_for_sync(mut self, wait: bool) -> Self {
        self.wait_for_sync = wait;
        self
    }

    /// Check the values that can be checked without touching the network.
    pub fn validate(&self) -> SyncResult<()> {
        self.zone_name()?;

        if normalize_zone_id(&self.zone_id).is_empty() {
            return Err(SyncError::InvalidConfig(
                "hosted zone id must not be empty".to_string(),
            ));
        }
        if self.transfer_timeout.is_zero() {
            return Err(SyncError::InvalidConfig(
                "transfer timeout must be greater than zero".to_string(),
            ));
        }
        if let Some(comment) = &self.comment
            && comment.chars().count() > MAX_COMMENT_LEN
        {
            return Err(SyncError::InvalidConfig(format!(
                "comment is longer than {MAX_COMMENT_LEN} characters"
            )));
        }
        Ok(())
    }

    /// The domain as an absolute DNS name.
    pub fn zone_name(&self) -> SyncResult<Name> {
        let domain = self.domain.trim();
        if domain.is_empty() {
            return Err(SyncError::InvalidConfig("domain must not be empty".to_string()));
        }

        let mut name = Name::from_ascii(domain).map_err(|e| {
            SyncError::InvalidConfig(format!("invalid domain '{domain}': {e}"))
        })?;
        if name.is_root() {
            return Err(SyncError::InvalidConfig(
                "domain must not be the DNS root".to_string(),
            ));
        }
        name.set_fqdn(true);
        Ok(name)
    }

    /// Destination zone id without any resource prefix.
    #[must_use]
    pub fn hosted_zone_id(&self) -> String {
        normalize_zone_id(&self.zone_id)
    }
}
