//! Audit log retention pruning.
//!
//! After a passing audit, older passing entries for the same
//! (object, datastream) beyond the retained window are deleted. Failing
//! entries are never selected, and the store refuses to delete them anyway.
//!
//! Concurrent pruners may race on the same entries. A delete that finds the
//! entry already gone counts as a no-op, so the retained count is only
//! approximate under contention while failing entries stay safe.

use tracing::debug;

use fixity_contracts::{error::FixityResult, version::Version};

use crate::traits::AuditLogStore;

/// Keep the `retained` most recent passing entries for `version`'s
/// datastream and delete the rest. Returns how many entries were removed.
///
/// At least one passing entry is always kept, so the most recent pass (the
/// one that triggered the prune) stays in the log even when `retained` is 0.
///
/// Idempotent: pruning an already-pruned history deletes nothing.
pub fn prune_history(
    log: &dyn AuditLogStore,
    version: &Version,
    retained: usize,
) -> FixityResult<usize> {
    let retained = retained.max(1);
    let entries = log.logs(&version.object_id, &version.datastream_id)?;

    let stale: Vec<u64> = entries
        .iter()
        .filter(|entry| entry.pass)
        .skip(retained)
        .map(|entry| entry.id)
        .collect();

    let mut deleted = 0;
    for entry_id in stale {
        if log.delete(entry_id)? {
            deleted += 1;
        }
    }

    if deleted > 0 {
        debug!(
            object_id = %version.object_id,
            datastream_id = %version.datastream_id,
            deleted,
            retained,
            "pruned passing audit history"
        );
    }

    Ok(deleted)
}

// ── Tests ────────────────────────────────────────────────────────────────────
