//! Route 53 REST-XML type definitions

use serde::{Deserialize, Serialize};

use crate::types::{ChangeBatch, ChangeInfo, ChangeStatus, normalize_change_id};

use super::XML_NAMESPACE;

// ============ Request bodies ============

/// Body of `ChangeResourceRecordSets`.
#[derive(Debug, Serialize)]
#[serde(rename = "ChangeResourceRecordSetsRequest")]
pub struct ChangeResourceRecordSetsRequest<'a> {
    #[serde(rename = "@xmlns")]
    pub xmlns: &'static str,
    #[serde(rename = "ChangeBatch")]
    pub change_batch: XmlChangeBatch<'a>,
}

#[derive(Debug, Serialize)]
pub struct XmlChangeBatch<'a> {
    #[serde(rename = "Comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
    #[serde(rename = "Changes")]
    pub changes: XmlChanges<'a>,
}

#[derive(Debug, Serialize)]
pub struct XmlChanges<'a> {
    #[serde(rename = "Change")]
    pub change: Vec<XmlChange<'a>>,
}

#[derive(Debug, Serialize)]
pub struct XmlChange<'a> {
    #[serde(rename = "Action")]
    pub action: &'static str,
    #[serde(rename = "ResourceRecordSet")]
    pub record_set: XmlResourceRecordSet<'a>,
}

#[derive(Debug, Serialize)]
pub struct XmlResourceRecordSet<'a> {
    #[serde(rename = "Name")]
    pub name: &'a str,
    #[serde(rename = "Type")]
    pub record_type: &'a str,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    #[serde(rename = "ResourceRecords")]
    pub records: XmlResourceRecords<'a>,
}

#[derive(Debug, Serialize)]
pub struct XmlResourceRecords<'a> {
    #[serde(rename = "ResourceRecord")]
    pub record: Vec<XmlResourceRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub struct XmlResourceRecord<'a> {
    #[serde(rename = "Value")]
    pub value: &'a str,
}

impl<'a> ChangeResourceRecordSetsRequest<'a> {
    pub fn from_batch(batch: &'a ChangeBatch) -> Self {
        let change = batch
            .changes
            .iter()
            .map(|c| XmlChange {
                action: c.action.as_str(),
                record_set: XmlResourceRecordSet {
                    name: &c.record_set.name,
                    record_type: &c.record_set.record_type,
                    ttl: c.record_set.ttl,
                    records: XmlResourceRecords {
                        record: c
                            .record_set
                            .values
                            .iter()
                            .map(|v| XmlResourceRecord { value: v })
                            .collect(),
                    },
                },
            })
            .collect();

        Self {
            xmlns: XML_NAMESPACE,
            change_batch: XmlChangeBatch {
                comment: batch.comment.as_deref(),
                changes: XmlChanges { change },
            },
        }
    }
}

// ============ Response bodies ============

/// Response payload for `ChangeResourceRecordSets` and `GetChange`.
#[derive(Debug, Deserialize)]
pub struct ChangeInfoResponse {
    #[serde(rename = "ChangeInfo")]
    pub change_info: XmlChangeInfo,
}

#[derive(Debug, Deserialize)]
pub struct XmlChangeInfo {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "SubmittedAt")]
    pub submitted_at: Option<String>,
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
}

impl From<XmlChangeInfo> for ChangeInfo {
    fn from(info: XmlChangeInfo) -> Self {
        Self {
            id: normalize_change_id(&info.id),
            status: ChangeStatus::from_wire(&info.status),
            submitted_at: info.submitted_at,
            comment: info.comment.filter(|c| !c.is_empty()),
        }
    }
}

/// Generic error envelope.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: XmlError,
    #[serde(rename = "RequestId")]
    pub request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct XmlError {
    #[serde(rename = "Code")]
    pub code: Option<String>,
    #[serde(rename = "Message")]
    pub message: Option<String>,
}

/// Body returned when a change batch is rejected.
#[derive(Debug, Deserialize)]
pub struct InvalidChangeBatchResponse {
    #[serde(rename = "Messages")]
    pub messages: Option<XmlMessages>,
    #[serde(rename = "Message")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct XmlMessages {
    #[serde(rename = "Message", default)]
    pub message: Vec<String>,
}

impl InvalidChangeBatchResponse {
    /// Every diagnostic in the body, in document order.
    pub fn into_messages(self) -> Vec<String> {
        let mut out = self.messages.map(|m| m.message).unwrap_or_default();
        if let Some(extra) = self.message
            && !out.contains(&extra)
        {
            out.push(extra);
        }
        out
    }
}
