//! Test doubles shared by the unit tests in this crate.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use fixity_contracts::{
    audit::{AuditLogEntry, NewAuditLogEntry},
    error::{FixityError, FixityResult},
    ids::{DatastreamId, ObjectId, VersionId},
    version::Version,
};

use crate::traits::{AuditLogStore, Clock, ObjectStore};

pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 10, 0, 0).unwrap()
}

pub(crate) fn content_version(object_id: &str, n: u64) -> Version {
    Version {
        object_id: ObjectId::new(object_id),
        datastream_id: DatastreamId::content(),
        version_id: VersionId::numbered(&DatastreamId::content(), n),
        created_at: base_time(),
    }
}

// ── Audit log ────────────────────────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct MemoryLog {
    entries: Mutex<Vec<AuditLogEntry>>,
    next_id: AtomicU64,
}

impl MemoryLog {
    pub(crate) fn push(&self, version: &Version, pass: bool, at: DateTime<Utc>) -> AuditLogEntry {
        self.append(NewAuditLogEntry {
            object_id: version.object_id.clone(),
            datastream_id: version.datastream_id.clone(),
            version_id: version.version_id.clone(),
            pass,
            created_at: at,
        })
        .unwrap()
    }

    pub(crate) fn snapshot(&self) -> Vec<AuditLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl AuditLogStore for MemoryLog {
    fn logs(
        &self,
        object_id: &ObjectId,
        datastream_id: &DatastreamId,
    ) -> FixityResult<Vec<AuditLogEntry>> {
        let mut matching: Vec<AuditLogEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.object_id == object_id && &e.datastream_id == datastream_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matching)
    }

    fn append(&self, entry: NewAuditLogEntry) -> FixityResult<AuditLogEntry> {
        let stored = AuditLogEntry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            object_id: entry.object_id,
            datastream_id: entry.datastream_id,
            version_id: entry.version_id,
            pass: entry.pass,
            created_at: Some(entry.created_at),
        };
        self.entries.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    fn delete(&self, entry_id: u64) -> FixityResult<bool> {
        let mut entries = self.entries.lock().unwrap();
        match entries.iter().position(|e| e.id == entry_id) {
            None => Ok(false),
            Some(idx) if !entries[idx].pass => Err(FixityError::ProtectedEntry { entry_id }),
            Some(idx) => {
                entries.remove(idx);
                Ok(true)
            }
        }
    }
}

// ── Object store ─────────────────────────────────────────────────────────────

type VersionKey = (ObjectId, DatastreamId, VersionId);

fn key(version: &Version) -> VersionKey {
    (
        version.object_id.clone(),
        version.datastream_id.clone(),
        version.version_id.clone(),
    )
}

#[derive(Default)]
pub(crate) struct MockObjects {
    objects: Mutex<BTreeMap<ObjectId, BTreeMap<DatastreamId, Vec<Version>>>>,
    invalid: Mutex<HashSet<VersionKey>>,
    unreadable: Mutex<HashSet<VersionKey>>,
    unlistable: Mutex<HashSet<ObjectId>>,
    pub(crate) checksum_reads: AtomicUsize,
}

impl MockObjects {
    pub(crate) fn add_version(&self, object_id: &str, datastream_id: &str, n: u64) -> Version {
        let datastream_id = DatastreamId::new(datastream_id);
        let version = Version {
            object_id: ObjectId::new(object_id),
            version_id: VersionId::numbered(&datastream_id, n),
            datastream_id: datastream_id.clone(),
            created_at: base_time(),
        };
        self.objects
            .lock()
            .unwrap()
            .entry(version.object_id.clone())
            .or_default()
            .entry(datastream_id)
            .or_default()
            .push(version.clone());
        version
    }

    pub(crate) fn set_valid(&self, version: &Version, valid: bool) {
        let mut invalid = self.invalid.lock().unwrap();
        if valid {
            invalid.remove(&key(version));
        } else {
            invalid.insert(key(version));
        }
    }

    pub(crate) fn set_unreadable(&self, version: &Version) {
        self.unreadable.lock().unwrap().insert(key(version));
    }

    pub(crate) fn set_unlistable(&self, object_id: &str) {
        self.unlistable.lock().unwrap().insert(ObjectId::new(object_id));
    }
}

impl ObjectStore for MockObjects {
    fn list_objects(&self) -> FixityResult<Vec<ObjectId>> {
        Ok(self.objects.lock().unwrap().keys().cloned().collect())
    }

    fn datastreams(&self, object_id: &ObjectId) -> FixityResult<Vec<DatastreamId>> {
        if self.unlistable.lock().unwrap().contains(object_id) {
            return Err(FixityError::StoreUnavailable {
                reason: format!("cannot list datastreams of {object_id}"),
            });
        }
        self.objects
            .lock()
            .unwrap()
            .get(object_id)
            .map(|streams| streams.keys().cloned().collect())
            .ok_or_else(|| FixityError::ObjectNotFound { object_id: object_id.to_string() })
    }

    fn list_versions(
        &self,
        object_id: &ObjectId,
        datastream_id: &DatastreamId,
    ) -> FixityResult<Vec<Version>> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .get(object_id)
            .and_then(|streams| streams.get(datastream_id))
            .cloned()
            .unwrap_or_default())
    }

    fn read_checksum_valid(&self, version: &Version) -> FixityResult<bool> {
        self.checksum_reads.fetch_add(1, Ordering::SeqCst);
        if self.unreadable.lock().unwrap().contains(&key(version)) {
            return Err(FixityError::StoreUnavailable {
                reason: format!("cannot read {}", version.version_id),
            });
        }
        Ok(!self.invalid.lock().unwrap().contains(&key(version)))
    }
}

// ── Clock ────────────────────────────────────────────────────────────────────

pub(crate) struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub(crate) fn new(at: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(at) }
    }

    pub(crate) fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
