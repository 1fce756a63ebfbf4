//! Scenario 3: Bit rot
//!
//! Silent corruption of stored bytes, and what the audit trail keeps:
//!
//!   Step 1: Deposit and audit     → content.0 passes
//!   Step 2: Corrupt content.0     → scheduled audit not yet due, skipped
//!   Step 3: Forced audit          → content.0 fails; aggregate status false
//!   Step 4: Repair as content.1   → repeated passing audits are pruned,
//!                                   the failure stays in the log

use fixity_config::RepositoryConfig;
use fixity_contracts::{
    audit::AuditLogEntry,
    error::{FixityError, FixityResult},
    ids::{DatastreamId, ObjectId},
};
use fixity_core::traits::FileRepository;

use crate::{mock_data::CAMPUS_PHOTO, runtime::FixityRuntime};

#[derive(Debug, Clone)]
pub struct BitRotOutcome {
    /// Whether the scheduled audit right after corruption ran.
    pub scheduled_audit_ran: bool,
    /// The forced audit of the corrupted version.
    pub forced: AuditLogEntry,
    /// Aggregate status right after the failed audit.
    pub passed_after_corruption: bool,
    /// Content history after the repair, most recent first.
    pub final_log: Vec<AuditLogEntry>,
}

fn print_log(log: &[AuditLogEntry]) {
    for entry in log {
        println!(
            "    #{:<3} {:<10} {}",
            entry.id,
            entry.version_id,
            if entry.pass { "pass" } else { "FAIL" }
        );
    }
}

pub fn run_scenario(config: &RepositoryConfig) -> FixityResult<BitRotOutcome> {
    println!("=== Scenario 3: Bit Rot ===");
    println!();

    let runtime = FixityRuntime::new(config)?;
    let object_id = ObjectId::new(CAMPUS_PHOTO.object_id);
    let content = DatastreamId::content();

    // ── Step 1: deposit and audit ─────────────────────────────────────────────

    runtime.deposit(&CAMPUS_PHOTO)?;
    runtime.drain_jobs()?;
    let original = runtime
        .content_versions(&object_id)?
        .into_iter()
        .next()
        .ok_or_else(|| FixityError::ObjectNotFound { object_id: object_id.to_string() })?;
    let first = runtime.auditor.audit(&original, false)?;
    println!(
        "  Step 1: audited {} → {}",
        original.version_id,
        if first.as_ref().is_some_and(|e| e.pass) { "pass" } else { "not recorded" }
    );

    // ── Step 2: corruption ────────────────────────────────────────────────────

    let mut rotten = CAMPUS_PHOTO.content.to_vec();
    if let Some(byte) = rotten.get_mut(20) {
        *byte ^= 0x01;
    }
    runtime.repository.corrupt_version(&original, rotten)?;
    let scheduled = runtime.auditor.audit(&original, false)?;
    println!(
        "  Step 2: flipped one bit; scheduled audit {}",
        if scheduled.is_some() { "ran" } else { "skipped (not yet due)" }
    );

    // ── Step 3: forced audit ──────────────────────────────────────────────────

    let forced = runtime.auditor.force_audit(&original)?.ok_or_else(|| {
        FixityError::AuditLogWriteFailed { reason: "forced audit produced no entry".to_string() }
    })?;
    let passed_after_corruption = runtime.auditor.audit_passed(&object_id)?;
    println!(
        "  Step 3: forced audit of {} → {}; object status {}",
        forced.version_id,
        if forced.pass { "pass" } else { "FAIL" },
        if passed_after_corruption { "OK" } else { "DAMAGED" }
    );

    // ── Step 4: repair ────────────────────────────────────────────────────────

    let mut file = runtime.repository.find(&object_id)?;
    file.set_content(CAMPUS_PHOTO.content.to_vec());
    runtime.save(&mut file)?;
    runtime.drain_jobs()?;
    let repaired = runtime
        .content_versions(&object_id)?
        .pop()
        .ok_or_else(|| FixityError::ObjectNotFound { object_id: object_id.to_string() })?;
    for _ in 0..=config.audit_policy().retained_passing_audit_count {
        runtime.auditor.force_audit(&repaired)?;
    }
    let final_log = runtime.auditor.logs(&object_id, &content)?;
    println!("  Step 4: re-deposited as {}; content audit log:", repaired.version_id);
    print_log(&final_log);
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(BitRotOutcome {
        scheduled_audit_ran: scheduled.is_some(),
        forced,
        passed_after_corruption,
        final_log,
    })
}
