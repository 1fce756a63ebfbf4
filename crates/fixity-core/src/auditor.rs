//! The audit executor: fixity checks over versioned content.
//!
//! One check runs in this order:
//!
//!   latest entry → decision (unless forced) → store validity → append → prune
//!
//! A failed checksum is recorded as a failing entry and returned as data.
//! Only infrastructure failures (store or log unreachable) surface as `Err`.
//! Pruning runs only after a passing entry has been appended, so the new
//! entry is always inside the retained window.

use std::sync::Arc;

use tracing::{debug, info, warn};

use fixity_contracts::{
    audit::{AuditLogEntry, AuditPolicy, NewAuditLogEntry},
    error::FixityResult,
    ids::{DatastreamId, ObjectId},
    version::Version,
};

use crate::{
    decision,
    retention,
    traits::{AuditLogStore, Clock, ObjectStore},
};

/// The outcome of auditing one version inside a batch.
///
/// `Ok(None)` means the audit was not yet due and was skipped.
#[derive(Debug)]
pub struct VersionAudit {
    pub version: Version,
    pub result: FixityResult<Option<AuditLogEntry>>,
}

/// Totals from an `audit_everything` sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Objects visited.
    pub objects: usize,
    /// Versions for which an entry was written.
    pub audited: usize,
    pub passed: usize,
    pub failed: usize,
    /// Versions whose audit was not yet due.
    pub skipped: usize,
    /// Versions or objects that could not be audited.
    pub errors: usize,
}

/// Runs fixity checks and records them in the audit log.
///
/// Safe to share between threads: every method takes `&self`, and the only
/// mutation is through the audit log store.
pub struct Auditor {
    objects: Arc<dyn ObjectStore>,
    log: Arc<dyn AuditLogStore>,
    clock: Arc<dyn Clock>,
    policy: AuditPolicy,
}

impl Auditor {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        log: Arc<dyn AuditLogStore>,
        clock: Arc<dyn Clock>,
        policy: AuditPolicy,
    ) -> Self {
        Self { objects, log, clock, policy }
    }

    pub fn policy(&self) -> AuditPolicy {
        self.policy
    }

    /// Whether `version` needs a fresh audit given `latest`, as of now.
    pub fn needs_audit(&self, version: &Version, latest: Option<&AuditLogEntry>) -> bool {
        decision::needs_audit(
            version,
            latest,
            self.clock.now(),
            self.policy.max_days_between_audits,
        )
    }

    /// Audit history for one datastream, most recent first.
    pub fn logs(
        &self,
        object_id: &ObjectId,
        datastream_id: &DatastreamId,
    ) -> FixityResult<Vec<AuditLogEntry>> {
        self.log.logs(object_id, datastream_id)
    }

    /// Audit one version.
    ///
    /// Returns `Ok(None)` when `force` is false and the audit is not yet
    /// due. Otherwise returns the newly written entry, whose `pass` mirrors
    /// the store's checksum-validity flag.
    pub fn audit(&self, version: &Version, force: bool) -> FixityResult<Option<AuditLogEntry>> {
        debug!(
            object_id = %version.object_id,
            datastream_id = %version.datastream_id,
            version_id = %version.version_id,
            force,
            "audit requested"
        );

        let latest = self.log.latest(&version.object_id, &version.datastream_id)?;
        let now = self.clock.now();

        if !force
            && !decision::needs_audit(
                version,
                latest.as_ref(),
                now,
                self.policy.max_days_between_audits,
            )
        {
            return Ok(None);
        }

        let pass = self.objects.read_checksum_valid(version)?;
        if pass {
            info!(
                object_id = %version.object_id,
                version_id = %version.version_id,
                "audit passed"
            );
        } else {
            warn!(
                object_id = %version.object_id,
                datastream_id = %version.datastream_id,
                version_id = %version.version_id,
                "audit failed: checksum mismatch"
            );
        }

        let entry = self.log.append(NewAuditLogEntry {
            object_id: version.object_id.clone(),
            datastream_id: version.datastream_id.clone(),
            version_id: version.version_id.clone(),
            pass,
            created_at: now,
        })?;

        if pass {
            // The entry is already durable; a pruning failure only delays cleanup.
            if let Err(e) = retention::prune_history(
                self.log.as_ref(),
                version,
                self.policy.retained_passing_audit_count,
            ) {
                warn!(
                    object_id = %version.object_id,
                    datastream_id = %version.datastream_id,
                    error = %e,
                    "audit history pruning failed"
                );
            }
        }

        Ok(Some(entry))
    }

    /// Audit one version regardless of how recently it was checked.
    pub fn force_audit(&self, version: &Version) -> FixityResult<Option<AuditLogEntry>> {
        self.audit(version, true)
    }

    /// Every version of every datastream of `object_id`.
    fn versions_of(&self, object_id: &ObjectId) -> FixityResult<Vec<Version>> {
        let mut versions = Vec::new();
        for datastream_id in self.objects.datastreams(object_id)? {
            versions.extend(self.objects.list_versions(object_id, &datastream_id)?);
        }
        Ok(versions)
    }

    /// Audit every version of one object.
    ///
    /// Each version is independent: a failure auditing one is captured in
    /// its `VersionAudit` and the remaining versions are still audited.
    /// Only a failure to enumerate the object's versions is returned as `Err`.
    pub fn audit_object(&self, object_id: &ObjectId, force: bool) -> FixityResult<Vec<VersionAudit>> {
        let versions = self.versions_of(object_id)?;

        Ok(versions
            .into_iter()
            .map(|version| {
                let result = self.audit(&version, force);
                if let Err(e) = &result {
                    warn!(
                        object_id = %version.object_id,
                        version_id = %version.version_id,
                        error = %e,
                        "version audit could not be performed"
                    );
                }
                VersionAudit { version, result }
            })
            .collect())
    }

    /// True iff every version of `object_id` passes a forced audit.
    ///
    /// Forcing means no version is skipped. An infrastructure error on any
    /// version is returned as `Err`.
    pub fn audit_passed(&self, object_id: &ObjectId) -> FixityResult<bool> {
        let mut passed = true;
        for audit in self.audit_object(object_id, true)? {
            if let Some(entry) = audit.result? {
                passed = passed && entry.pass;
            }
        }
        debug!(object_id = %object_id, passed, "aggregate audit status");
        Ok(passed)
    }

    /// Audit every version of every object in the store.
    ///
    /// Object- and version-level errors are logged and counted; the sweep
    /// always continues. Only a failure to list the objects is returned.
    pub fn audit_everything(&self, force: bool) -> FixityResult<SweepSummary> {
        let mut summary = SweepSummary::default();

        for object_id in self.objects.list_objects()? {
            summary.objects += 1;

            let audits = match self.audit_object(&object_id, force) {
                Ok(audits) => audits,
                Err(e) => {
                    warn!(object_id = %object_id, error = %e, "skipping object in audit sweep");
                    summary.errors += 1;
                    continue;
                }
            };

            for audit in audits {
                match audit.result {
                    Ok(Some(entry)) => {
                        summary.audited += 1;
                        if entry.pass {
                            summary.passed += 1;
                        } else {
                            summary.failed += 1;
                        }
                    }
                    Ok(None) => summary.skipped += 1,
                    Err(_) => summary.errors += 1,
                }
            }
        }

        info!(
            objects = summary.objects,
            audited = summary.audited,
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            errors = summary.errors,
            "audit sweep finished"
        );

        Ok(summary)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
