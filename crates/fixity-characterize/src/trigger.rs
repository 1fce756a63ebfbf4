//! Save hook that schedules characterization when content changes.
//!
//! The content-changed flag is only meaningful before a save; afterwards the
//! staged content has been written and the flag is clear. The trigger
//! therefore captures the flag in `before_save` and acts on it in
//! `after_save`, so exactly one job is enqueued per save that changed content.

use std::sync::Arc;

use tracing::{debug, info, warn};

use fixity_contracts::{
    error::FixityResult,
    file::GenericFile,
    ids::{JobId, ObjectId},
    job::CharacterizeJob,
};
use fixity_core::traits::JobQueue;

/// State captured from a file immediately before it is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCapture {
    pub object_id: ObjectId,
    pub content_changed: bool,
}

pub struct CharacterizationTrigger {
    queue: Arc<dyn JobQueue>,
}

impl CharacterizationTrigger {
    pub fn new(queue: Arc<dyn JobQueue>) -> Self {
        Self { queue }
    }

    pub fn before_save(&self, file: &GenericFile) -> SaveCapture {
        SaveCapture { object_id: file.id.clone(), content_changed: file.content_changed() }
    }

    /// Enqueue a characterization job if the captured save changed content.
    pub fn after_save(&self, capture: SaveCapture) -> FixityResult<Option<JobId>> {
        if !capture.content_changed {
            debug!(object_id = %capture.object_id, "content unchanged; no characterization");
            return Ok(None);
        }

        let job = CharacterizeJob::new(capture.object_id);
        let job_id = job.id;
        let object_id = job.object_id.clone();
        self.queue.enqueue(job)?;

        info!(%object_id, %job_id, "characterization job enqueued");
        Ok(Some(job_id))
    }

    /// Run `save` wrapped by the trigger.
    ///
    /// The job is enqueued whether or not `save` succeeds. When the save
    /// fails its error is returned, even if the enqueue also failed.
    pub fn save_with<F>(&self, file: &mut GenericFile, save: F) -> FixityResult<Option<JobId>>
    where
        F: FnOnce(&mut GenericFile) -> FixityResult<()>,
    {
        let capture = self.before_save(file);
        let saved = save(file);
        let enqueued = self.after_save(capture);

        match (saved, enqueued) {
            (Ok(()), enqueued) => enqueued,
            (Err(save_err), Ok(job_id)) => {
                warn!(object_id = %file.id, error = %save_err, ?job_id, "save failed");
                Err(save_err)
            }
            (Err(save_err), Err(enqueue_err)) => {
                warn!(
                    object_id = %file.id,
                    error = %save_err,
                    enqueue_error = %enqueue_err,
                    "save failed and characterization could not be enqueued"
                );
                Err(save_err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fixity_contracts::{
        error::FixityError, file::GenericFile, ids::ObjectId, metadata::DescField,
    };

    use super::CharacterizationTrigger;
    use crate::{queue::InMemoryJobQueue, testing::FailingQueue};

    fn file() -> GenericFile {
        GenericFile::new(ObjectId::new("obj:1"), "report.pdf")
    }

    // ── 1. enqueue decisions ──────────────────────────────────────────────────

    #[test]
    fn content_change_enqueues_one_job() {
        let queue = InMemoryJobQueue::new();
        let trigger = CharacterizationTrigger::new(Arc::new(queue.clone()));
        let mut file = file();
        file.set_content(b"%PDF-1.7".to_vec());

        let job_id = trigger
            .save_with(&mut file, |f| {
                f.take_staged_content();
                Ok(())
            })
            .unwrap();

        let pending = queue.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(Some(pending[0].id), job_id);
        assert_eq!(pending[0].object_id, ObjectId::new("obj:1"));
    }

    /// Content plus several metadata fields changed in one save is still
    /// one content change.
    #[test]
    fn content_and_metadata_change_enqueues_one_job() {
        let queue = InMemoryJobQueue::new();
        let trigger = CharacterizationTrigger::new(Arc::new(queue.clone()));
        let mut file = file();
        file.set_content(b"%PDF-1.7".to_vec());
        file.set_label("report-final.pdf");
        file.desc.append(DescField::Subject, "budgets");
        file.desc.append(DescField::Creator, "Finance Office");
        file.desc.append(DescField::Description, "Year-end figures");

        let job_id = trigger
            .save_with(&mut file, |f| {
                f.take_staged_content();
                Ok(())
            })
            .unwrap();

        let pending = queue.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(Some(pending[0].id), job_id);
    }

    #[test]
    fn metadata_only_save_enqueues_nothing() {
        let queue = InMemoryJobQueue::new();
        let trigger = CharacterizationTrigger::new(Arc::new(queue.clone()));
        let mut file = file();

        let job_id = trigger.save_with(&mut file, |_| Ok(())).unwrap();

        assert_eq!(job_id, None);
        assert!(queue.pending().unwrap().is_empty());
    }

    /// The flag is read before the save clears it.
    #[test]
    fn capture_survives_save_clearing_the_flag() {
        let queue = InMemoryJobQueue::new();
        let trigger = CharacterizationTrigger::new(Arc::new(queue.clone()));
        let mut file = file();
        file.set_content(b"bytes".to_vec());

        let capture = trigger.before_save(&file);
        file.take_staged_content();
        assert!(!file.content_changed());

        assert!(trigger.after_save(capture).unwrap().is_some());
        assert_eq!(queue.pending().unwrap().len(), 1);
    }

    // ── 2. failures ───────────────────────────────────────────────────────────

    #[test]
    fn failed_save_still_enqueues_and_returns_save_error() {
        let queue = InMemoryJobQueue::new();
        let trigger = CharacterizationTrigger::new(Arc::new(queue.clone()));
        let mut file = file();
        file.set_content(b"bytes".to_vec());

        let result = trigger.save_with(&mut file, |_| {
            Err(FixityError::StoreUnavailable { reason: "disk full".to_string() })
        });

        assert!(matches!(result, Err(FixityError::StoreUnavailable { .. })));
        assert_eq!(queue.pending().unwrap().len(), 1);
    }

    #[test]
    fn enqueue_failure_surfaces_after_successful_save() {
        let trigger = CharacterizationTrigger::new(Arc::new(FailingQueue));
        let mut file = file();
        file.set_content(b"bytes".to_vec());

        let result = trigger.save_with(&mut file, |_| Ok(()));
        assert!(matches!(result, Err(FixityError::JobQueueError { .. })));
    }

    #[test]
    fn save_error_wins_over_enqueue_error() {
        let trigger = CharacterizationTrigger::new(Arc::new(FailingQueue));
        let mut file = file();
        file.set_content(b"bytes".to_vec());

        let result = trigger.save_with(&mut file, |_| {
            Err(FixityError::StoreUnavailable { reason: "offline".to_string() })
        });
        assert!(matches!(result, Err(FixityError::StoreUnavailable { .. })));
    }
}
