//! The audit decision engine.
//!
//! Decides, per version, whether a fresh fixity check is warranted based on
//! the most recent audit log entry for the version's datastream.
//!
//! Day arithmetic: the latest entry's timestamp is first truncated to its UTC
//! calendar date, then the whole days from that midnight to `now` are counted
//! (truncating toward zero). An audit is skipped only when that count is
//! strictly below the configured interval.

use chrono::{DateTime, NaiveTime, Utc};
use tracing::{debug, info, warn};

use fixity_contracts::{
    audit::{AuditDecision, AuditLogEntry, DueReason},
    version::Version,
};

/// Whole days between the calendar date of `last_audit` and `now`.
pub fn days_since(last_audit: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let midnight = last_audit.date_naive().and_time(NaiveTime::MIN).and_utc();
    (now - midnight).num_days()
}

/// Pure decision over the latest entry, the current time, and the interval.
pub fn decide(
    latest: Option<&AuditLogEntry>,
    now: DateTime<Utc>,
    interval_days: u32,
) -> AuditDecision {
    let Some(entry) = latest else {
        return AuditDecision::Due(DueReason::NoHistory);
    };
    let Some(created_at) = entry.created_at else {
        return AuditDecision::Due(DueReason::MissingTimestamp);
    };

    let days_since = days_since(created_at, now);
    if days_since < i64::from(interval_days) {
        AuditDecision::NotDue { days_since }
    } else {
        AuditDecision::Due(DueReason::IntervalElapsed { days_since })
    }
}

/// Return true when `version` needs a fresh audit.
///
/// Missing or timestamp-less history is a data-integrity warning, logged and
/// answered with "audit needed" rather than an error.
pub fn needs_audit(
    version: &Version,
    latest: Option<&AuditLogEntry>,
    now: DateTime<Utc>,
    interval_days: u32,
) -> bool {
    let decision = decide(latest, now, interval_days);

    match decision {
        AuditDecision::Due(DueReason::NoHistory) | AuditDecision::Due(DueReason::MissingTimestamp) => {
            warn!(
                object_id = %version.object_id,
                datastream_id = %version.datastream_id,
                version_id = %version.version_id,
                reason = ?decision,
                "problem with audit log history; audit required"
            );
        }
        AuditDecision::Due(DueReason::IntervalElapsed { days_since }) => {
            info!(
                object_id = %version.object_id,
                version_id = %version.version_id,
                days_since,
                interval_days,
                "audit needed"
            );
        }
        AuditDecision::NotDue { days_since } => {
            debug!(
                object_id = %version.object_id,
                version_id = %version.version_id,
                days_since,
                interval_days,
                "no audit needed"
            );
        }
    }

    decision.is_due()
}

// ── Tests ────────────────────────────────────────────────────────────────────
