//! One repository with every fixity component wired to it.
//!
//! The scenarios and the demo binary build a `FixityRuntime` from a
//! `RepositoryConfig`: an in-memory repository, an audit log, the auditor,
//! and the characterization trigger, queue and worker.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::info;

use fixity_audit::InMemoryAuditLog;
use fixity_characterize::{
    CharacterizationTrigger, Characterizer, InMemoryJobQueue, JobWorker, WorkerReport,
};
use fixity_config::RepositoryConfig;
use fixity_contracts::{
    error::FixityResult,
    file::GenericFile,
    ids::{DatastreamId, JobId, ObjectId},
    version::Version,
};
use fixity_core::{
    traits::{Clock, FileRepository, ObjectStore},
    Auditor,
};

use crate::{extractor::SignatureExtractor, mock_data::SampleDeposit, store::InMemoryRepository};

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(at) }
    }

    /// 09:00 UTC on 2 March 2026.
    pub fn scenario_start() -> Self {
        Self::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).single().unwrap_or_default())
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += by;
    }

    pub fn advance_days(&self, days: u32) {
        self.advance(Duration::days(i64::from(days)));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct FixityRuntime {
    pub repository: InMemoryRepository,
    pub audit_log: InMemoryAuditLog,
    pub auditor: Auditor,
    pub queue: InMemoryJobQueue,
    pub trigger: CharacterizationTrigger,
    pub worker: JobWorker,
    pub clock: Arc<ManualClock>,
}

impl FixityRuntime {
    pub fn new(config: &RepositoryConfig) -> FixityResult<Self> {
        let clock = Arc::new(ManualClock::scenario_start());
        let repository = InMemoryRepository::new(clock.clone());
        let audit_log = InMemoryAuditLog::new();

        let auditor = Auditor::new(
            Arc::new(repository.clone()),
            Arc::new(audit_log.clone()),
            clock.clone(),
            config.audit_policy(),
        );

        let queue = InMemoryJobQueue::new();
        let trigger = CharacterizationTrigger::new(Arc::new(queue.clone()));
        let characterizer = Characterizer::new(
            Arc::new(repository.clone()),
            Arc::new(SignatureExtractor),
            config.field_mapping().clone(),
        )?;
        let worker = JobWorker::new(queue.clone(), Arc::new(characterizer), config.max_attempts());

        Ok(Self { repository, audit_log, auditor, queue, trigger, worker, clock })
    }

    /// Save `file` through the characterization trigger.
    pub fn save(&self, file: &mut GenericFile) -> FixityResult<Option<JobId>> {
        self.trigger.save_with(file, |f| self.repository.save(f))
    }

    /// Create and save a new object from `sample`.
    pub fn deposit(&self, sample: &SampleDeposit) -> FixityResult<GenericFile> {
        let mut file = GenericFile::new(ObjectId::new(sample.object_id), sample.label);
        file.set_content(sample.content.to_vec());
        self.save(&mut file)?;
        info!(object_id = %file.id, label = sample.label, "sample deposited");
        Ok(file)
    }

    /// Run queued characterization jobs.
    pub fn drain_jobs(&self) -> FixityResult<WorkerReport> {
        self.worker.run_pending()
    }

    /// Versions of the content datastream, oldest first.
    pub fn content_versions(&self, object_id: &ObjectId) -> FixityResult<Vec<Version>> {
        self.repository.list_versions(object_id, &DatastreamId::content())
    }
}
