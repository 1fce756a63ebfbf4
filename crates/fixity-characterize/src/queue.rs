//! In-process job queue and the worker that drains it.
//!
//! `InMemoryJobQueue` is a FIFO behind an `Arc<Mutex<..>>`, shareable between
//! the save trigger (producer) and a `JobWorker` (consumer). Failed jobs are
//! retried up to `max_attempts`; after that they move to a dead-letter list
//! with the last error, so a poison object cannot block the queue.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use fixity_contracts::{
    error::{FixityError, FixityResult},
    job::CharacterizeJob,
};
use fixity_core::traits::JobQueue;

use crate::job::Characterizer;

/// A job that exhausted its attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    pub job: CharacterizeJob,
    pub error: String,
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<CharacterizeJob>,
    dead: Vec<DeadLetter>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryJobQueue {
    state: Arc<Mutex<QueueState>>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> FixityResult<MutexGuard<'_, QueueState>> {
        self.state.lock().map_err(|e| FixityError::JobQueueError {
            reason: format!("queue lock poisoned: {}", e),
        })
    }

    /// Snapshot of the jobs waiting to run, oldest first.
    pub fn pending(&self) -> FixityResult<Vec<CharacterizeJob>> {
        Ok(self.lock()?.pending.iter().cloned().collect())
    }

    pub fn dead_letters(&self) -> FixityResult<Vec<DeadLetter>> {
        Ok(self.lock()?.dead.clone())
    }

    pub fn pop(&self) -> FixityResult<Option<CharacterizeJob>> {
        Ok(self.lock()?.pending.pop_front())
    }

    fn requeue(&self, job: CharacterizeJob) -> FixityResult<()> {
        self.lock()?.pending.push_back(job);
        Ok(())
    }

    fn dead_letter(&self, job: CharacterizeJob, error: String) -> FixityResult<()> {
        self.lock()?.dead.push(DeadLetter { job, error });
        Ok(())
    }
}

impl JobQueue for InMemoryJobQueue {
    fn enqueue(&self, job: CharacterizeJob) -> FixityResult<()> {
        debug!(job_id = %job.id, object_id = %job.object_id, "job queued");
        self.lock()?.pending.push_back(job);
        Ok(())
    }
}

/// Outcome counts of one `run_pending` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub completed: usize,
    pub retried: usize,
    pub dead_lettered: usize,
}

pub struct JobWorker {
    queue: InMemoryJobQueue,
    characterizer: Arc<Characterizer>,
    max_attempts: u32,
}

impl JobWorker {
    pub fn new(queue: InMemoryJobQueue, characterizer: Arc<Characterizer>, max_attempts: u32) -> Self {
        Self { queue, characterizer, max_attempts: max_attempts.max(1) }
    }

    /// Run jobs until the queue is empty, including retries.
    ///
    /// Job failures are recorded in the report, not returned; only a broken
    /// queue is an error.
    pub fn run_pending(&self) -> FixityResult<WorkerReport> {
        let mut report = WorkerReport::default();

        while let Some(mut job) = self.queue.pop()? {
            job.attempts += 1;
            match self.characterizer.characterize(&job.object_id) {
                Ok(_) => {
                    debug!(job_id = %job.id, attempts = job.attempts, "job completed");
                    report.completed += 1;
                }
                Err(e) if job.attempts < self.max_attempts => {
                    warn!(
                        job_id = %job.id,
                        object_id = %job.object_id,
                        attempts = job.attempts,
                        error = %e,
                        "characterization failed; retrying"
                    );
                    report.retried += 1;
                    self.queue.requeue(job)?;
                }
                Err(e) => {
                    warn!(
                        job_id = %job.id,
                        object_id = %job.object_id,
                        attempts = job.attempts,
                        error = %e,
                        "characterization failed; giving up"
                    );
                    report.dead_lettered += 1;
                    self.queue.dead_letter(job, e.to_string())?;
                }
            }
        }

        info!(
            completed = report.completed,
            retried = report.retried,
            dead_lettered = report.dead_lettered,
            "job queue drained"
        );
        Ok(report)
    }
}
