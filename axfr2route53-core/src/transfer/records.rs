//! Type filter and record-set grouping of transferred records

use std::collections::HashMap;
use std::fmt::Write as _;

use hickory_resolver::proto::{
    rr::{DNSClass, Name, RData, Record},
    serialize::binary::BinEncodable,
};

use crate::error::{SyncError, SyncResult};
use crate::types::{RecordKind, ResourceRecord};

/// Keep the records of `kind` and fold them into one record set per owner name.
///
/// Record sets come out in the order their owner name first appears in the
/// transfer, values in transfer order with exact duplicates dropped. A set's
/// TTL is the smallest TTL among its records. Records owned by the zone apex
/// are left out unless `include_apex` is set.
pub fn filter_records(
    records: &[Record],
    zone: &Name,
    kind: RecordKind,
    include_apex: bool,
) -> SyncResult<Vec<ResourceRecord>> {
    let mut sets: Vec<ResourceRecord> = Vec::new();
    let mut index: HashMap<Name, usize> = HashMap::new();

    for record in records {
        if u16::from(record.record_type()) != kind.code() || record.dns_class() != DNSClass::IN {
            continue;
        }

        let mut owner = record.name().clone();
        owner.set_fqdn(true);

        if !zone.zone_of(&owner) {
            log::warn!("[axfr] Ignoring out-of-zone record {owner} {kind}");
            continue;
        }
        if !include_apex && owner == *zone {
            log::debug!("[axfr] Skipping apex record {owner} {kind}");
            continue;
        }

        let value = present_rdata(record.data(), kind)?;
        let key = owner.to_lowercase();

        if let Some(&i) = index.get(&key) {
            let set = &mut sets[i];
            set.ttl = set.ttl.min(record.ttl());
            if !set.values.contains(&value) {
                set.values.push(value);
            }
        } else {
            index.insert(key, sets.len());
            sets.push(ResourceRecord {
                name: owner.to_string(),
                kind,
                ttl: record.ttl(),
                values: vec![value],
            });
        }
    }

    Ok(sets)
}

/// Render record data the way the hosted zone expects record values.
pub fn present_rdata(rdata: &RData, kind: RecordKind) -> SyncResult<String> {
    let value = match rdata {
        RData::MX(mx) => format!("{} {}", mx.preference(), mx.exchange()),
        RData::SRV(srv) => format!(
            "{} {} {} {}",
            srv.priority(),
            srv.weight(),
            srv.port(),
            srv.target()
        ),
        RData::TXT(txt) => join_character_strings(txt.txt_data().iter().map(|s| &**s)),
        // SPF has no dedicated variant; its wire data is a run of character-strings
        RData::Unknown { .. } if kind == RecordKind::Spf => {
            let wire = rdata
                .to_bytes()
                .map_err(|e| SyncError::Protocol(format!("cannot read SPF data: {e}")))?;
            join_character_strings(split_character_strings(&wire)?.into_iter())
        }
        other => other.to_string(),
    };
    Ok(value)
}

fn join_character_strings<'a>(strings: impl Iterator<Item = &'a [u8]>) -> String {
    strings.map(quote).collect::<Vec<_>>().join(" ")
}

fn split_character_strings(mut wire: &[u8]) -> SyncResult<Vec<&[u8]>> {
    let mut strings = Vec::new();
    while let Some((&len, rest)) = wire.split_first() {
        let len = usize::from(len);
        if rest.len() < len {
            return Err(SyncError::Protocol(
                "character-string runs past the end of the record".to_string(),
            ));
        }
        let (s, tail) = rest.split_at(len);
        strings.push(s);
        wire = tail;
    }
    Ok(strings)
}

/// Quote one character-string. `"` and `\` are backslash-escaped, anything
/// outside printable ASCII becomes a three-digit octal escape.
fn quote(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &b in bytes {
        match b {
            b'"' | b'\\' => {
                out.push('\\');
                out.push(char::from(b));
            }
            0x20..=0x7e => out.push(char::from(b)),
            _ => {
                let _ = write!(out, "\\{b:03o}");
            }
        }
    }
    out.push('"');
    out
}
