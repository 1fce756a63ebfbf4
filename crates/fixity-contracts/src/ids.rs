//! Identifier newtypes.
//!
//! Audit log entries reference objects by these identifiers only. They hold
//! no pointer to the object itself, so history survives object deletion.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Persistent identifier of a repository object (e.g. `"scholarsphere:7p88cg99t"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a datastream attached to an object.
///
/// The well-known names are provided as associated constants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DatastreamId(pub String);

impl DatastreamId {
    /// The deposited binary content.
    pub const CONTENT: &'static str = "content";
    /// Raw output of the characterization tool.
    pub const CHARACTERIZATION: &'static str = "characterization";
    /// Descriptive metadata.
    pub const DESC_METADATA: &'static str = "descMetadata";
    /// Derived thumbnail image.
    pub const THUMBNAIL: &'static str = "thumbnail";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn content() -> Self {
        Self::new(Self::CONTENT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatastreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one version within a datastream (e.g. `"content.2"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VersionId(pub String);

impl VersionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the conventional `<dsid>.<n>` identifier.
    pub fn numbered(datastream_id: &DatastreamId, n: u64) -> Self {
        Self(format!("{}.{}", datastream_id.0, n))
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of a queued characterization job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub uuid::Uuid);

impl JobId {
    /// Create a new, unique job ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
