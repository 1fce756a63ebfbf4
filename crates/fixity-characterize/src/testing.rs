//! Test doubles shared by the unit tests in this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::{json, Value};

use fixity_contracts::{
    error::{FixityError, FixityResult},
    file::GenericFile,
    ids::ObjectId,
    job::CharacterizeJob,
};
use fixity_core::traits::{FileRepository, JobQueue, MetadataExtractor};

// ── Repository ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct MockRepository {
    files: Mutex<HashMap<ObjectId, (GenericFile, Option<Vec<u8>>)>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MockRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_persisted(&self, id: &str, label: &str, content: &[u8]) {
        let mut file = GenericFile::new(ObjectId::new(id), label);
        file.mark_persisted();
        self.files.lock().unwrap().insert(file.id.clone(), (file, Some(content.to_vec())));
    }

    pub(crate) fn stored(&self, id: &ObjectId) -> GenericFile {
        self.files.lock().unwrap()[id].0.clone()
    }

    pub(crate) fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub(crate) fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl FileRepository for MockRepository {
    fn find(&self, object_id: &ObjectId) -> FixityResult<GenericFile> {
        self.files
            .lock()
            .unwrap()
            .get(object_id)
            .map(|(file, _)| file.clone())
            .ok_or_else(|| FixityError::ObjectNotFound { object_id: object_id.to_string() })
    }

    fn content(&self, object_id: &ObjectId) -> FixityResult<Option<Vec<u8>>> {
        Ok(self.files.lock().unwrap().get(object_id).and_then(|(_, c)| c.clone()))
    }

    fn save(&self, file: &mut GenericFile) -> FixityResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(FixityError::StoreUnavailable { reason: "repository offline".to_string() });
        }
        let mut files = self.files.lock().unwrap();
        let previous = files.get(&file.id).and_then(|(_, c)| c.clone());
        let content = file.take_staged_content().or(previous);
        file.mark_persisted();
        files.insert(file.id.clone(), (file.clone(), content));
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ── Extractor ────────────────────────────────────────────────────────────────

/// Fails a fixed number of times, then returns canned output.
pub(crate) struct ScriptedExtractor {
    output: Value,
    failures_left: AtomicU32,
    calls: AtomicU32,
}

impl ScriptedExtractor {
    pub(crate) fn returning(output: Value) -> Self {
        Self { output, failures_left: AtomicU32::new(0), calls: AtomicU32::new(0) }
    }

    pub(crate) fn failing(times: u32) -> Self {
        Self {
            output: json!({ "mime_type": "application/octet-stream" }),
            failures_left: AtomicU32::new(times),
            calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetadataExtractor for ScriptedExtractor {
    fn extract_metadata(&self, file_name: &str, _content: &[u8]) -> FixityResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(FixityError::ExtractionFailed {
                object_id: file_name.to_string(),
                reason: "tool crashed".to_string(),
            });
        }
        Ok(self.output.clone())
    }
}

// ── Queue ────────────────────────────────────────────────────────────────────

pub(crate) struct FailingQueue;

impl JobQueue for FailingQueue {
    fn enqueue(&self, _job: CharacterizeJob) -> FixityResult<()> {
        Err(FixityError::JobQueueError { reason: "queue offline".to_string() })
    }
}
