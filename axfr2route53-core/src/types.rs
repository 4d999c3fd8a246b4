//! Record model shared by the fetcher and the upserter

use std::fmt;
use std::str::FromStr;

use axfr2route53_provider::ResourceRecordSet;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Record types that can be carried from a zone transfer into a hosted zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Ptr,
    Spf,
    Txt,
    Srv,
}

impl RecordKind {
    /// Every supported kind, in the order they are listed to operators.
    pub const ALL: [Self; 9] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Mx,
        Self::Ns,
        Self::Ptr,
        Self::Spf,
        Self::Txt,
        Self::Srv,
    ];

    /// Record type mnemonic.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
            Self::Spf => "SPF",
            Self::Txt => "TXT",
            Self::Srv => "SRV",
        }
    }

    /// RR TYPE code on the wire (RFC 1035, RFC 3596, RFC 2782, RFC 4408).
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::A => 1,
            Self::Ns => 2,
            Self::Cname => 5,
            Self::Ptr => 12,
            Self::Mx => 15,
            Self::Txt => 16,
            Self::Aaaa => 28,
            Self::Srv => 33,
            Self::Spf => 99,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let supported: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                SyncError::InvalidConfig(format!(
                    "unsupported record type '{wanted}' (expected one of {})",
                    supported.join(", ")
                ))
            })
    }
}

/// A record set taken from the transfer: every value of one type at one owner name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Absolute owner name, trailing dot included.
    pub name: String,
    pub kind: RecordKind,
    pub ttl: u32,
    /// Presentation-format values, in transfer order.
    pub values: Vec<String>,
}

impl From<&ResourceRecord> for ResourceRecordSet {
    fn from(record: &ResourceRecord) -> Self {
        Self {
            name: record.name.clone(),
            record_type: record.kind.as_str().to_string(),
            ttl: record.ttl,
            values: record.values.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("a".parse::<RecordKind>().ok(), Some(RecordKind::A));
        assert_eq!("Aaaa".parse::<RecordKind>().ok(), Some(RecordKind::Aaaa));
        assert_eq!(" TXT ".parse::<RecordKind>().ok(), Some(RecordKind::Txt));
    }

    #[test]
    fn parse_rejects_unsupported_types() {
        let result = "SOA".parse::<RecordKind>();
        assert!(
            matches!(&result, Err(SyncError::InvalidConfig(msg)) if msg.contains("SOA")),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn display_matches_mnemonic() {
        for kind in RecordKind::ALL {
            assert_eq!(kind.to_string().parse::<RecordKind>().ok(), Some(kind));
        }
    }

    #[test]
    fn spf_uses_its_own_type_code() {
        assert_eq!(RecordKind::Spf.code(), 99);
        assert_eq!(RecordKind::Txt.code(), 16);
    }

    #[test]
    fn record_converts_to_record_set() {
        let record = ResourceRecord {
            name: "mail.my.dns.example.".to_string(),
            kind: RecordKind::Mx,
            ttl: 3600,
            values: vec!["10 mx1.my.dns.example.".to_string()],
        };
        let set = ResourceRecordSet::from(&record);
        assert_eq!(set.record_type, "MX");
        assert_eq!(set.name, record.name);
        assert_eq!(set.values, record.values);
        assert_eq!(set.ttl, 3600);
    }
}
