use serde::{Deserialize, Serialize};

/// Maximum number of changes a single change batch may carry.
///
/// Route 53 rejects larger `ChangeResourceRecordSets` requests outright.
pub const MAX_CHANGES_PER_BATCH: usize = 100;

// ============ Changes ============

/// Action applied to one record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    /// Create the record set if absent, replace it if present (keyed by name + type).
    Upsert,
    /// Delete the record set; the values must match exactly.
    Delete,
}

impl ChangeAction {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upsert => "UPSERT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record set as the hosted zone stores it: every value sharing a name and a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSet {
    /// Fully-qualified owner name (trailing dot included).
    pub name: String,
    /// Record type mnemonic, e.g. `A` or `TXT`.
    pub record_type: String,
    /// TTL in seconds.
    pub ttl: u32,
    /// Values in presentation format, in submission order.
    pub values: Vec<String>,
}

/// One entry of a [`ChangeBatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub action: ChangeAction,
    pub record_set: ResourceRecordSet,
}

impl Change {
    /// Shorthand for an UPSERT change.
    pub fn upsert(record_set: ResourceRecordSet) -> Self {
        Self {
            action: ChangeAction::Upsert,
            record_set,
        }
    }
}

/// A bounded group of changes submitted together and applied atomically.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBatch {
    /// Free-form comment recorded by the provider alongside the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub changes: Vec<Change>,
}

impl ChangeBatch {
    pub fn new(comment: Option<String>, changes: Vec<Change>) -> Self {
        Self { comment, changes }
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

// ============ Change status ============

/// Propagation status of a submitted change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeStatus {
    /// Accepted, not yet applied on every authoritative server.
    Pending,
    /// Applied everywhere.
    InSync,
}

impl ChangeStatus {
    /// Parse the wire value; anything unrecognized counts as pending.
    pub fn from_wire(value: &str) -> Self {
        if value.eq_ignore_ascii_case("INSYNC") {
            Self::InSync
        } else {
            Self::Pending
        }
    }
}

/// Acknowledgement returned for a submitted change batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    /// Change identifier without the `/change/` prefix.
    pub id: String,
    pub status: ChangeStatus,
    /// Submission time as reported by the provider (ISO 8601).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// ============ Helpers ============

/// Strip the resource prefix from a hosted zone id.
///
/// `Z123`, `/hostedzone/Z123` and `hostedzone/Z123` all become `Z123`.
pub fn normalize_zone_id(zone_id: &str) -> String {
    let trimmed = zone_id.trim().trim_start_matches('/');
    trimmed
        .strip_prefix("hostedzone/")
        .unwrap_or(trimmed)
        .to_string()
}

/// Strip the resource prefix from a change id (`/change/C123` → `C123`).
pub fn normalize_change_id(change_id: &str) -> String {
    let trimmed = change_id.trim().trim_start_matches('/');
    trimmed
        .strip_prefix("change/")
        .unwrap_or(trimmed)
        .to_string()
}
