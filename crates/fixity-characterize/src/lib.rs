//! # fixity-characterize
//!
//! Technical characterization of deposited content.
//!
//! Saving a file whose content changed enqueues a `CharacterizeJob`
//! (`trigger`). A `JobWorker` drains the queue and runs the `Characterizer`,
//! which calls the external tool, validates its output, stores it in the
//! `characterization` datastream and appends mapped terms to the descriptive
//! metadata.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let queue = InMemoryJobQueue::new();
//! let trigger = CharacterizationTrigger::new(Arc::new(queue.clone()));
//! trigger.save_with(&mut file, |f| repository.save(f))?;
//!
//! let characterizer = Characterizer::new(repository, extractor, config.field_mapping().clone())?;
//! let report = JobWorker::new(queue, Arc::new(characterizer), config.max_attempts()).run_pending()?;
//! ```

pub mod job;
pub mod merge;
pub mod queue;
pub mod schema;
pub mod trigger;

#[cfg(test)]
pub(crate) mod testing;

pub use job::Characterizer;
pub use merge::append_metadata;
pub use queue::{DeadLetter, InMemoryJobQueue, JobWorker, WorkerReport};
pub use schema::ExtractionSchema;
pub use trigger::{CharacterizationTrigger, SaveCapture};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use fixity_contracts::{
        file::GenericFile,
        ids::ObjectId,
        metadata::{DescField, FieldMapping},
    };
    use fixity_core::traits::FileRepository;

    use crate::{
        testing::{MockRepository, ScriptedExtractor},
        CharacterizationTrigger, Characterizer, InMemoryJobQueue, JobWorker,
    };

    /// Upload, save through the trigger, drain the queue: the stored object
    /// ends up characterized.
    #[test]
    fn test_upload_to_characterized_object() {
        let repository = Arc::new(MockRepository::new());
        let extractor = Arc::new(ScriptedExtractor::returning(json!({
            "file_title": "Quarterly Figures",
            "file_author": "Grace Hopper"
        })));
        let queue = InMemoryJobQueue::new();
        let trigger = CharacterizationTrigger::new(Arc::new(queue.clone()));
        let characterizer =
            Characterizer::new(repository.clone(), extractor, FieldMapping::default()).unwrap();
        let worker = JobWorker::new(queue.clone(), Arc::new(characterizer), 3);

        let mut file = GenericFile::new(ObjectId::new("obj:upload"), "figures.csv");
        file.set_content(b"q,amount\n1,10\n".to_vec());
        let job_id = trigger.save_with(&mut file, |f| repository.save(f)).unwrap();
        assert!(job_id.is_some());

        let report = worker.run_pending().unwrap();
        assert_eq!(report.completed, 1);

        let stored = repository.stored(&ObjectId::new("obj:upload"));
        assert_eq!(stored.filename.as_deref(), Some("figures.csv"));
        assert_eq!(stored.desc.get(DescField::Title), ["figures.csv", "Quarterly Figures"]);
        assert_eq!(stored.desc.get(DescField::Creator), ["Grace Hopper"]);
    }

    /// Characterization saves do not change content, so they never
    /// re-trigger characterization.
    #[test]
    fn test_characterization_save_does_not_retrigger() {
        let repository = Arc::new(MockRepository::new());
        repository.insert_persisted("obj:1", "a.txt", b"alpha");
        let queue = InMemoryJobQueue::new();
        let trigger = CharacterizationTrigger::new(Arc::new(queue.clone()));

        let mut file = repository.find(&ObjectId::new("obj:1")).unwrap();
        file.desc.append(DescField::Subject, "fixity");
        let job_id = trigger.save_with(&mut file, |f| repository.save(f)).unwrap();

        assert_eq!(job_id, None);
        assert!(queue.pending().unwrap().is_empty());
    }
}
