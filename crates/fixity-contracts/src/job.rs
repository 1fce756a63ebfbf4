//! Asynchronous characterization work units.

use serde::{Deserialize, Serialize};

use crate::ids::{JobId, ObjectId};

/// A queued request to characterize one object's current content.
///
/// Jobs carry only the object identifier; the worker reloads the object, so
/// a job that runs after later saves characterizes the newest content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterizeJob {
    pub id: JobId,
    pub object_id: ObjectId,
    /// How many times a worker has already tried this job.
    #[serde(default)]
    pub attempts: u32,
}

impl CharacterizeJob {
    pub fn new(object_id: ObjectId) -> Self {
        Self { id: JobId::new(), object_id, attempts: 0 }
    }
}
