//! Scenario 1: Scheduled fixity sweep
//!
//! Deposits the sample files and runs `audit_everything` three times:
//!
//!   1. Fresh repository        → every datastream audited, all pass
//!   2. Same day                → nothing due, every version skipped
//!   3. After the audit interval → due again; retention keeps the log short

use fixity_config::RepositoryConfig;
use fixity_contracts::{
    error::FixityResult,
    ids::{DatastreamId, ObjectId},
};
use fixity_core::SweepSummary;

use crate::{mock_data::all_deposits, runtime::FixityRuntime};

/// Summaries of the three sweeps, plus the content log length of the first
/// sample after the last one.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    pub initial: SweepSummary,
    pub same_day: SweepSummary,
    pub after_interval: SweepSummary,
    pub retained_content_entries: usize,
}

fn print_summary(title: &str, summary: &SweepSummary) {
    println!(
        "  {:<26} objects={} audited={} passed={} failed={} skipped={} errors={}",
        title,
        summary.objects,
        summary.audited,
        summary.passed,
        summary.failed,
        summary.skipped,
        summary.errors
    );
}

pub fn run_scenario(config: &RepositoryConfig) -> FixityResult<SweepOutcome> {
    println!("=== Scenario 1: Scheduled Fixity Sweep ===");
    println!();

    let runtime = FixityRuntime::new(config)?;
    let policy = config.audit_policy();

    for sample in all_deposits() {
        runtime.deposit(&sample)?;
        println!("  Deposited {:<28} as {}", sample.label, sample.object_id);
    }
    let jobs = runtime.drain_jobs()?;
    println!("  Characterization jobs completed: {}", jobs.completed);
    println!();

    let initial = runtime.auditor.audit_everything(false)?;
    print_summary("Sweep 1 (fresh):", &initial);

    let same_day = runtime.auditor.audit_everything(false)?;
    print_summary("Sweep 2 (same day):", &same_day);

    // Extra passing audits so retention has something to prune.
    let first = all_deposits()[0];
    let first_id = ObjectId::new(first.object_id);
    for version in runtime.content_versions(&first_id)? {
        for _ in 0..policy.retained_passing_audit_count {
            runtime.auditor.force_audit(&version)?;
        }
    }

    runtime.clock.advance_days(policy.max_days_between_audits);
    let after_interval = runtime.auditor.audit_everything(false)?;
    print_summary(
        &format!("Sweep 3 (+{} days):", policy.max_days_between_audits),
        &after_interval,
    );

    let retained_content_entries =
        runtime.auditor.logs(&first_id, &DatastreamId::content())?.len();
    println!();
    println!(
        "  Content audit entries kept for {}: {} (retention limit {})",
        first.label, retained_content_entries, policy.retained_passing_audit_count
    );
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(SweepOutcome { initial, same_day, after_interval, retained_content_entries })
}

#[cfg(test)]
mod tests {
    use fixity_config::RepositoryConfig;

    use super::run_scenario;

    #[test]
    fn test_sweep_schedule() {
        let outcome = run_scenario(&RepositoryConfig::default()).unwrap();

        assert_eq!(outcome.initial.objects, 3);
        assert!(outcome.initial.audited > 0);
        assert_eq!(outcome.initial.failed, 0);
        assert_eq!(outcome.initial.errors, 0);

        assert_eq!(outcome.same_day.audited, 0, "nothing is due on the same day");
        assert!(outcome.same_day.skipped > 0);

        assert_eq!(outcome.after_interval.failed, 0);
        assert!(outcome.after_interval.audited > 0);
    }

    #[test]
    fn test_retention_bounds_passing_history() {
        let config = RepositoryConfig::from_toml_str(
            "[audit]\nmax_days_between_audits = 3\nretained_passing_audit_count = 1\n",
        )
        .unwrap();
        let outcome = run_scenario(&config).unwrap();

        assert_eq!(outcome.retained_content_entries, 1);
    }
}
