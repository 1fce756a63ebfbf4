//! The characterization job: extract, validate, store, merge, save.

use std::sync::Arc;

use tracing::{debug, info, warn};

use fixity_contracts::{
    error::{FixityError, FixityResult},
    file::GenericFile,
    ids::ObjectId,
    metadata::FieldMapping,
};
use fixity_core::traits::{FileRepository, MetadataExtractor};

use crate::{merge::append_metadata, schema::ExtractionSchema};

/// Runs the characterization tool over an object's content and folds the
/// result into the object's metadata.
pub struct Characterizer {
    repository: Arc<dyn FileRepository>,
    extractor: Arc<dyn MetadataExtractor>,
    mapping: FieldMapping,
    schema: ExtractionSchema,
}

impl Characterizer {
    pub fn new(
        repository: Arc<dyn FileRepository>,
        extractor: Arc<dyn MetadataExtractor>,
        mapping: FieldMapping,
    ) -> FixityResult<Self> {
        Ok(Self { repository, extractor, mapping, schema: ExtractionSchema::new()? })
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Characterize the current content of a persisted object.
    ///
    /// This is what a queued `CharacterizeJob` runs. The object is reloaded,
    /// so the newest content is characterized even if the job is late.
    pub fn characterize(&self, object_id: &ObjectId) -> FixityResult<GenericFile> {
        let mut file = self.repository.find(object_id)?;
        let content =
            self.repository.content(object_id)?.ok_or_else(|| FixityError::ExtractionFailed {
                object_id: object_id.to_string(),
                reason: "object has no content".to_string(),
            })?;

        self.characterize_file(&mut file, &content)?;
        Ok(file)
    }

    /// Characterize a file that has not been saved yet, using its staged
    /// content. The file is updated in memory only.
    pub fn characterize_staged(&self, file: &mut GenericFile) -> FixityResult<()> {
        let content = file.staged_content().map(<[u8]>::to_vec).ok_or_else(|| {
            FixityError::ExtractionFailed {
                object_id: file.id.to_string(),
                reason: "no staged content".to_string(),
            }
        })?;
        self.characterize_file(file, &content)
    }

    /// Characterize `content` on behalf of `file`.
    ///
    /// On success the raw output is stored in `file.characterization`, mapped
    /// terms are appended to the descriptive metadata, `filename` is set to
    /// the label, and the file is saved unless it is new. The changes are
    /// made on a copy and written back only after the save succeeds, so on
    /// any failure `file` is left as it was.
    pub fn characterize_file(&self, file: &mut GenericFile, content: &[u8]) -> FixityResult<()> {
        let raw = self.extractor.extract_metadata(file.label(), content).map_err(|e| {
            warn!(object_id = %file.id, error = %e, "characterization tool failed");
            e
        })?;
        let terms = self.schema.to_terms(&raw)?;

        let mut updated = file.clone();
        updated.characterization = Some(raw);
        let added = append_metadata(&mut updated.desc, &terms, &self.mapping);
        updated.filename = Some(updated.label().to_string());

        if updated.is_new_object() {
            debug!(object_id = %updated.id, "object not yet persisted; skipping save");
        } else {
            self.repository.save(&mut updated).map_err(|e| {
                warn!(object_id = %updated.id, error = %e, "characterized object not saved");
                e
            })?;
        }
        *file = updated;

        info!(
            object_id = %file.id,
            terms = terms.len(),
            values_added = added,
            "object characterized"
        );
        Ok(())
    }
}
