use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A caller-supplied audit record, before it has been assigned a
/// sequence number or an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub tenant_id: Uuid,
    pub producer: String,
    pub kind: String,
    pub payload: serde_json::Value,
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub producer: String,
    /// Monotonic per-`(tenant_id, producer)` sequence number. Readers
    /// can detect a gap, which a bounded batching sink must never
    /// produce once an entry has been ack'd.
    pub sequence: i64,
    pub kind: String,
    pub payload: serde_json::Value,
    pub request_id: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
