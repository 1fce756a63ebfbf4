//! Checksum audit log entries, audit decisions, and audit policy.
//!
//! `AuditLogEntry` is what the audit log stores, one per performed fixity
//! check. `AuditDecision` is derived on demand from the latest entry and is
//! never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{DatastreamId, ObjectId, VersionId};

/// A recorded outcome of one fixity check.
///
/// Entries are append-only: created by the auditor, never updated, and
/// removed only by retention pruning (which never removes a failing entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Store-assigned, strictly increasing identifier. Ties on `created_at`
    /// are broken by this value.
    pub id: u64,
    /// The audited object. A weak reference; the object may no longer exist.
    pub object_id: ObjectId,
    /// The audited datastream.
    pub datastream_id: DatastreamId,
    /// The audited version.
    pub version_id: VersionId,
    /// True when the store reported the version's checksum as valid.
    pub pass: bool,
    /// When the check ran. Absent only for history imported from stores that
    /// did not record it.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The fields of an entry before the log assigns it an `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuditLogEntry {
    pub object_id: ObjectId,
    pub datastream_id: DatastreamId,
    pub version_id: VersionId,
    pub pass: bool,
    pub created_at: DateTime<Utc>,
}

/// Why an audit is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DueReason {
    /// No audit has ever been recorded for the datastream.
    NoHistory,
    /// The latest entry carries no timestamp.
    MissingTimestamp,
    /// The configured interval has elapsed since the latest entry.
    IntervalElapsed { days_since: i64 },
}

/// The outcome of the audit decision engine for one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditDecision {
    /// A fresh fixity check is warranted.
    Due(DueReason),
    /// The latest entry is recent enough; skip the check.
    NotDue { days_since: i64 },
}

impl AuditDecision {
    /// Return true when a fresh check should run.
    pub fn is_due(&self) -> bool {
        matches!(self, AuditDecision::Due(_))
    }
}

/// Audit scheduling and retention settings handed to the auditor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditPolicy {
    /// Minimum whole days between two audits of the same datastream.
    pub max_days_between_audits: u32,
    /// How many passing entries per (object, datastream) survive pruning.
    pub retained_passing_audit_count: usize,
}

impl AuditPolicy {
    pub const DEFAULT_MAX_DAYS_BETWEEN_AUDITS: u32 = 7;
    pub const DEFAULT_RETAINED_PASSING_AUDIT_COUNT: usize = 2;
}

impl Default for AuditPolicy {
    fn default() -> Self {
        Self {
            max_days_between_audits: Self::DEFAULT_MAX_DAYS_BETWEEN_AUDITS,
            retained_passing_audit_count: Self::DEFAULT_RETAINED_PASSING_AUDIT_COUNT,
        }
    }
}
