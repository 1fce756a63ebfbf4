//! In-memory versioned object repository.
//!
//! Every datastream write appends a new version (`content.0`, `content.1`,
//! ...) and records the SHA-256 of its bytes at write time. Checksum
//! validity is recomputed from the stored bytes on each check, so bytes that
//! change after the write (see `corrupt_version`) are reported invalid.
//!
//! `descMetadata` and `characterization` are stored as JSON datastreams and
//! versioned only when their serialized form changes.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use fixity_contracts::{
    error::{FixityError, FixityResult},
    file::GenericFile,
    ids::{DatastreamId, ObjectId, VersionId},
    metadata::DescMetadata,
    version::Version,
};
use fixity_core::traits::{Clock, FileRepository, ObjectStore};

/// Hex-encoded SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[derive(Debug, Clone)]
struct StoredVersion {
    version: Version,
    bytes: Vec<u8>,
    checksum: String,
}

#[derive(Debug, Clone, Default)]
struct StoredObject {
    label: String,
    filename: Option<String>,
    desc: DescMetadata,
    characterization: Option<serde_json::Value>,
    datastreams: BTreeMap<DatastreamId, Vec<StoredVersion>>,
}

impl StoredObject {
    fn latest_bytes(&self, datastream_id: &DatastreamId) -> Option<&[u8]> {
        self.datastreams
            .get(datastream_id)
            .and_then(|versions| versions.last())
            .map(|stored| stored.bytes.as_slice())
    }

    fn push_version(
        &mut self,
        object_id: &ObjectId,
        datastream_id: &DatastreamId,
        bytes: Vec<u8>,
        clock: &dyn Clock,
    ) -> Version {
        let versions = self.datastreams.entry(datastream_id.clone()).or_default();
        let version = Version {
            object_id: object_id.clone(),
            datastream_id: datastream_id.clone(),
            version_id: VersionId::numbered(datastream_id, versions.len() as u64),
            created_at: clock.now(),
        };
        let checksum = sha256_hex(&bytes);
        debug!(
            object_id = %object_id,
            version_id = %version.version_id,
            size = bytes.len(),
            %checksum,
            "datastream version written"
        );
        versions.push(StoredVersion { version: version.clone(), bytes, checksum });
        version
    }

    /// Append a JSON version unless it matches the current one.
    fn push_json_if_changed(
        &mut self,
        object_id: &ObjectId,
        datastream_id: &DatastreamId,
        value: &impl serde::Serialize,
        clock: &dyn Clock,
    ) -> FixityResult<bool> {
        let bytes = serde_json::to_vec(value).map_err(|e| FixityError::StoreUnavailable {
            reason: format!("failed to serialize {datastream_id} of '{object_id}': {e}"),
        })?;
        if self.latest_bytes(datastream_id) == Some(bytes.as_slice()) {
            return Ok(false);
        }
        self.push_version(object_id, datastream_id, bytes, clock);
        Ok(true)
    }
}

#[derive(Debug, Default)]
struct RepositoryState {
    objects: BTreeMap<ObjectId, StoredObject>,
}

/// Thread-safe repository of versioned objects.
///
/// Clones share the same underlying state.
#[derive(Clone)]
pub struct InMemoryRepository {
    state: Arc<Mutex<RepositoryState>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRepository {
    /// Create an empty repository. `clock` stamps new versions.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { state: Arc::new(Mutex::new(RepositoryState::default())), clock }
    }

    fn lock(&self) -> FixityResult<MutexGuard<'_, RepositoryState>> {
        self.state.lock().map_err(|e| FixityError::StoreUnavailable {
            reason: format!("repository lock poisoned: {}", e),
        })
    }

    /// Write a new version of an arbitrary datastream of an existing object.
    pub fn put_datastream(
        &self,
        object_id: &ObjectId,
        datastream_id: &DatastreamId,
        bytes: impl Into<Vec<u8>>,
    ) -> FixityResult<Version> {
        let mut state = self.lock()?;
        let object = state
            .objects
            .get_mut(object_id)
            .ok_or_else(|| FixityError::ObjectNotFound { object_id: object_id.to_string() })?;
        Ok(object.push_version(object_id, datastream_id, bytes.into(), self.clock.as_ref()))
    }

    /// Overwrite the stored bytes of one version without updating its
    /// recorded checksum, simulating silent storage corruption.
    pub fn corrupt_version(&self, version: &Version, bytes: impl Into<Vec<u8>>) -> FixityResult<()> {
        let mut state = self.lock()?;
        let stored = find_version_mut(&mut state, version)?;
        stored.bytes = bytes.into();
        info!(
            object_id = %version.object_id,
            version_id = %version.version_id,
            "version bytes overwritten"
        );
        Ok(())
    }

    /// The checksum recorded when `version` was written.
    pub fn recorded_checksum(&self, version: &Version) -> FixityResult<String> {
        let mut state = self.lock()?;
        Ok(find_version_mut(&mut state, version)?.checksum.clone())
    }
}

fn find_version_mut<'a>(
    state: &'a mut RepositoryState,
    version: &Version,
) -> FixityResult<&'a mut StoredVersion> {
    state
        .objects
        .get_mut(&version.object_id)
        .and_then(|object| object.datastreams.get_mut(&version.datastream_id))
        .and_then(|versions| {
            versions.iter_mut().find(|stored| stored.version.version_id == version.version_id)
        })
        .ok_or_else(|| FixityError::StoreUnavailable {
            reason: format!("version '{}' of '{}' not found", version.version_id, version.object_id),
        })
}

// ── ObjectStore ──────────────────────────────────────────────────────────────

impl ObjectStore for InMemoryRepository {
    fn list_objects(&self) -> FixityResult<Vec<ObjectId>> {
        Ok(self.lock()?.objects.keys().cloned().collect())
    }

    fn datastreams(&self, object_id: &ObjectId) -> FixityResult<Vec<DatastreamId>> {
        let state = self.lock()?;
        let object = state
            .objects
            .get(object_id)
            .ok_or_else(|| FixityError::ObjectNotFound { object_id: object_id.to_string() })?;
        Ok(object.datastreams.keys().cloned().collect())
    }

    fn list_versions(
        &self,
        object_id: &ObjectId,
        datastream_id: &DatastreamId,
    ) -> FixityResult<Vec<Version>> {
        let state = self.lock()?;
        let object = state
            .objects
            .get(object_id)
            .ok_or_else(|| FixityError::ObjectNotFound { object_id: object_id.to_string() })?;
        Ok(object
            .datastreams
            .get(datastream_id)
            .map(|versions| versions.iter().map(|stored| stored.version.clone()).collect())
            .unwrap_or_default())
    }

    fn read_checksum_valid(&self, version: &Version) -> FixityResult<bool> {
        let mut state = self.lock()?;
        let stored = find_version_mut(&mut state, version)?;
        Ok(sha256_hex(&stored.bytes) == stored.checksum)
    }
}

// ── FileRepository ───────────────────────────────────────────────────────────

impl FileRepository for InMemoryRepository {
    fn find(&self, object_id: &ObjectId) -> FixityResult<GenericFile> {
        let state = self.lock()?;
        let object = state
            .objects
            .get(object_id)
            .ok_or_else(|| FixityError::ObjectNotFound { object_id: object_id.to_string() })?;

        let mut file = GenericFile::new(object_id.clone(), object.label.clone());
        file.desc = object.desc.clone();
        file.filename = object.filename.clone();
        file.characterization = object.characterization.clone();
        file.mark_persisted();
        Ok(file)
    }

    fn content(&self, object_id: &ObjectId) -> FixityResult<Option<Vec<u8>>> {
        let state = self.lock()?;
        let object = state
            .objects
            .get(object_id)
            .ok_or_else(|| FixityError::ObjectNotFound { object_id: object_id.to_string() })?;
        Ok(object.latest_bytes(&DatastreamId::content()).map(<[u8]>::to_vec))
    }

    fn save(&self, file: &mut GenericFile) -> FixityResult<()> {
        let mut state = self.lock()?;
        let created = !state.objects.contains_key(&file.id);
        let object = state.objects.entry(file.id.clone()).or_default();

        object.label = file.label().to_string();
        object.filename = file.filename.clone();
        object.desc = file.desc.clone();

        let desc_id = DatastreamId::new(DatastreamId::DESC_METADATA);
        object.push_json_if_changed(&file.id, &desc_id, &file.desc, self.clock.as_ref())?;

        if let Some(characterization) = &file.characterization {
            let characterization_id = DatastreamId::new(DatastreamId::CHARACTERIZATION);
            object.push_json_if_changed(
                &file.id,
                &characterization_id,
                characterization,
                self.clock.as_ref(),
            )?;
            object.characterization = Some(characterization.clone());
        }

        let content_version = file.take_staged_content().map(|bytes| {
            object.push_version(&file.id, &DatastreamId::content(), bytes, self.clock.as_ref())
        });

        file.mark_persisted();
        info!(
            object_id = %file.id,
            created,
            new_content = content_version.is_some(),
            "object saved"
        );
        Ok(())
    }
}
