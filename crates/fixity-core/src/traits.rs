//! Seams between the audit/characterization core and its collaborators.
//!
//! - `ObjectStore`: versioned content; reports checksum validity
//! - `AuditLogStore`: append-only audit history
//! - `FileRepository`: loads and persists generic files
//! - `MetadataExtractor`: the external characterization tool
//! - `JobQueue`: the asynchronous job runner's intake
//! - `Clock`: the current time
//!
//! The core never computes checksums or parses file formats itself; it only
//! orchestrates these collaborators.

use chrono::{DateTime, Utc};

use fixity_contracts::{
    audit::{AuditLogEntry, NewAuditLogEntry},
    error::FixityResult,
    file::GenericFile,
    ids::{DatastreamId, ObjectId},
    job::CharacterizeJob,
    version::Version,
};

/// The versioned content store.
pub trait ObjectStore: Send + Sync {
    /// Every object the store holds.
    fn list_objects(&self) -> FixityResult<Vec<ObjectId>>;

    /// The datastreams attached to `object_id`.
    fn datastreams(&self, object_id: &ObjectId) -> FixityResult<Vec<DatastreamId>>;

    /// All versions of one datastream, oldest first.
    fn list_versions(
        &self,
        object_id: &ObjectId,
        datastream_id: &DatastreamId,
    ) -> FixityResult<Vec<Version>>;

    /// Whether the stored bytes of `version` still match the checksum
    /// recorded when it was written.
    ///
    /// The store computes this itself; an `Err` means the store could not be
    /// asked, not that the checksum is wrong.
    fn read_checksum_valid(&self, version: &Version) -> FixityResult<bool>;
}

/// Append-only storage for audit log entries.
///
/// A single `append` must be atomic with respect to concurrent appends. No
/// cross-entry transaction is assumed.
pub trait AuditLogStore: Send + Sync {
    /// Entries for one (object, datastream), ordered by
    /// `(created_at desc, id desc)`.
    fn logs(
        &self,
        object_id: &ObjectId,
        datastream_id: &DatastreamId,
    ) -> FixityResult<Vec<AuditLogEntry>>;

    /// The most recent entry for one (object, datastream).
    fn latest(
        &self,
        object_id: &ObjectId,
        datastream_id: &DatastreamId,
    ) -> FixityResult<Option<AuditLogEntry>> {
        Ok(self.logs(object_id, datastream_id)?.into_iter().next())
    }

    /// Persist a new entry and return it with its assigned `id`.
    fn append(&self, entry: NewAuditLogEntry) -> FixityResult<AuditLogEntry>;

    /// Delete a passing entry.
    ///
    /// Returns `Ok(false)` when the entry no longer exists. Must refuse to
    /// delete a failing entry with `FixityError::ProtectedEntry`.
    fn delete(&self, entry_id: u64) -> FixityResult<bool>;
}

/// Loads and persists generic files and their metadata datastreams.
pub trait FileRepository: Send + Sync {
    /// Load a working copy of an existing object.
    fn find(&self, object_id: &ObjectId) -> FixityResult<GenericFile>;

    /// The current bytes of the object's content datastream, if any.
    fn content(&self, object_id: &ObjectId) -> FixityResult<Option<Vec<u8>>>;

    /// Persist `file`. Staged content becomes a new content version and the
    /// file is marked as no longer new.
    fn save(&self, file: &mut GenericFile) -> FixityResult<()>;
}

/// The external characterization tool.
pub trait MetadataExtractor: Send + Sync {
    /// Extract technical metadata from `content`.
    ///
    /// Returns the tool's raw output: a flat JSON object of term name to
    /// scalar or list. Shape validation happens in the caller.
    fn extract_metadata(&self, file_name: &str, content: &[u8]) -> FixityResult<serde_json::Value>;
}

/// Intake of the asynchronous job runner. Enqueue is fire-and-forget.
pub trait JobQueue: Send + Sync {
    fn enqueue(&self, job: CharacterizeJob) -> FixityResult<()>;
}

/// Source of the current time, injected so that audit scheduling is
/// deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub at: DateTime<Utc>,
}

impl FixedClock {
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}
