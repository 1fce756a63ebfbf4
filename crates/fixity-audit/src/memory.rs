//! In-memory implementation of `AuditLogStore`.
//!
//! `InMemoryAuditLog` is the reference audit log. It keeps all entries in a
//! `Vec` protected by a `Mutex`, so one insert is atomic with respect to
//! concurrent inserts and the auditor can be shared across threads.
//!
//! Entries are never edited in place. The only removal path is `delete`,
//! which refuses failing entries.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use fixity_contracts::{
    audit::{AuditLogEntry, NewAuditLogEntry},
    error::{FixityError, FixityResult},
    ids::{DatastreamId, ObjectId},
};
use fixity_core::traits::AuditLogStore;

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of `InMemoryAuditLog`.
///
/// Kept behind `Arc<Mutex<_>>` so that every clone of the log, on any thread,
/// sees the same entries and draws ids from the same counter.
pub(crate) struct InMemoryState {
    /// All live entries, in append order.
    pub(crate) entries: Vec<AuditLogEntry>,

    /// The id to assign to the next entry (starts at 1).
    pub(crate) next_id: u64,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory, append-only audit log.
///
/// Cloning yields another handle onto the same entries.
///
/// # Thread safety
///
/// `InMemoryAuditLog` is `Send + Sync`. Every operation takes the one lock
/// for its whole duration, so an `append` assigns its id and stores the entry
/// atomically, and a `logs` call never observes a half-written entry. A
/// poisoned lock is reported as `FixityError::AuditLogWriteFailed` rather
/// than panicking.
#[derive(Clone)]
pub struct InMemoryAuditLog {
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryAuditLog {
    /// Create an empty log whose first entry will get id 1.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryState { entries: Vec::new(), next_id: 1 })),
        }
    }

    fn lock(&self) -> FixityResult<MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| FixityError::AuditLogWriteFailed {
            reason: format!("audit log lock poisoned: {}", e),
        })
    }

    /// Number of live entries across all objects.
    pub fn len(&self) -> usize {
        self.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every live entry, in append order.
    pub fn entries(&self) -> FixityResult<Vec<AuditLogEntry>> {
        Ok(self.lock()?.entries.clone())
    }

    /// Load history recorded elsewhere.
    ///
    /// Each imported entry receives a fresh id from this log; its timestamp,
    /// which may be absent, is kept as is.
    pub fn import(&self, history: impl IntoIterator<Item = AuditLogEntry>) -> FixityResult<usize> {
        let mut state = self.lock()?;
        let mut imported = 0;
        for mut entry in history {
            entry.id = state.next_id;
            state.next_id += 1;
            state.entries.push(entry);
            imported += 1;
        }
        info!(imported, "imported audit history");
        Ok(imported)
    }
}

impl Default for InMemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

// ── AuditLogStore impl ────────────────────────────────────────────────────────

impl AuditLogStore for InMemoryAuditLog {
    /// Entries for one datastream, newest first; ties broken by higher id.
    ///
    /// Entries without a timestamp sort after every timestamped entry.
    fn logs(
        &self,
        object_id: &ObjectId,
        datastream_id: &DatastreamId,
    ) -> FixityResult<Vec<AuditLogEntry>> {
        let state = self.lock()?;
        let mut matching: Vec<AuditLogEntry> = state
            .entries
            .iter()
            .filter(|e| &e.object_id == object_id && &e.datastream_id == datastream_id)
            .cloned()
            .collect();
        drop(state);

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(matching)
    }

    fn append(&self, entry: NewAuditLogEntry) -> FixityResult<AuditLogEntry> {
        let mut state = self.lock()?;

        let stored = AuditLogEntry {
            id: state.next_id,
            object_id: entry.object_id,
            datastream_id: entry.datastream_id,
            version_id: entry.version_id,
            pass: entry.pass,
            created_at: Some(entry.created_at),
        };
        state.next_id += 1;
        state.entries.push(stored.clone());

        debug!(
            entry_id = stored.id,
            object_id = %stored.object_id,
            version_id = %stored.version_id,
            pass = stored.pass,
            "audit log entry appended"
        );

        Ok(stored)
    }

    fn delete(&self, entry_id: u64) -> FixityResult<bool> {
        let mut state = self.lock()?;

        let Some(idx) = state.entries.iter().position(|e| e.id == entry_id) else {
            return Ok(false);
        };
        if !state.entries[idx].pass {
            return Err(FixityError::ProtectedEntry { entry_id });
        }

        state.entries.remove(idx);
        Ok(true)
    }
}
