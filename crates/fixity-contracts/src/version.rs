//! Datastream versions as seen by the audit subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{DatastreamId, ObjectId, VersionId};

/// One immutable version of one datastream.
///
/// The checksum-validity flag is not carried here: it is computed by the
/// content store each time it is asked (`ObjectStore::read_checksum_valid`),
/// so an audit always observes the store's current view of the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// The object this version belongs to.
    pub object_id: ObjectId,
    /// The datastream this version belongs to.
    pub datastream_id: DatastreamId,
    /// Monotonic identifier within the datastream.
    pub version_id: VersionId,
    /// When the store created this version.
    pub created_at: DateTime<Utc>,
}
