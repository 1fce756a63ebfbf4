//! Scenario 2: Characterize on upload
//!
//! Follows one deposit through the characterization pipeline:
//!
//!   Step 1: Upload            → content changed, one job enqueued
//!   Step 2: Worker            → tool output validated, stored and merged
//!   Step 3: Metadata edit     → content unchanged, no job
//!   Step 4: Revised content   → second job; new terms appended, old kept

use fixity_config::RepositoryConfig;
use fixity_contracts::{error::FixityResult, file::GenericFile, ids::ObjectId, metadata::DescField};
use fixity_core::traits::FileRepository;

use crate::{
    mock_data::{ANNUAL_REPORT, ANNUAL_REPORT_REVISED},
    runtime::FixityRuntime,
};

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Jobs enqueued by the upload, the metadata edit and the revision.
    pub jobs_enqueued: [bool; 3],
    /// The stored object after the revision was characterized.
    pub characterized: GenericFile,
}

fn print_desc(file: &GenericFile) {
    println!("    title:    {:?}", file.desc.get(DescField::Title));
    println!("    creator:  {:?}", file.desc.get(DescField::Creator));
    println!("    filename: {}", file.filename.as_deref().unwrap_or("-"));
    if let Some(raw) = &file.characterization {
        println!("    mime:     {}", raw["mime_type"].as_str().unwrap_or("?"));
    }
}

pub fn run_scenario(config: &RepositoryConfig) -> FixityResult<UploadOutcome> {
    println!("=== Scenario 2: Characterize on Upload ===");
    println!();

    let runtime = FixityRuntime::new(config)?;

    // ── Step 1: upload ────────────────────────────────────────────────────────

    let mut file = GenericFile::new(ObjectId::new(ANNUAL_REPORT.object_id), ANNUAL_REPORT.label);
    file.set_content(ANNUAL_REPORT.content.to_vec());
    let upload_job = runtime.save(&mut file)?;
    println!(
        "  Step 1: uploaded {} → job {:?}",
        ANNUAL_REPORT.label,
        upload_job.map(|id| id.to_string())
    );

    // ── Step 2: worker ────────────────────────────────────────────────────────

    let report = runtime.drain_jobs()?;
    println!(
        "  Step 2: worker completed={} retried={} dead_lettered={}",
        report.completed, report.retried, report.dead_lettered
    );
    print_desc(&runtime.repository.find(&file.id)?);

    // ── Step 3: metadata-only save ────────────────────────────────────────────

    let mut edited = runtime.repository.find(&file.id)?;
    edited.desc.append(DescField::Subject, "institutional reports");
    let edit_job = runtime.save(&mut edited)?;
    println!("  Step 3: metadata edit → job {:?}", edit_job.map(|id| id.to_string()));

    // ── Step 4: revised content ───────────────────────────────────────────────

    let mut revised = runtime.repository.find(&file.id)?;
    revised.set_content(ANNUAL_REPORT_REVISED.to_vec());
    let revision_job = runtime.save(&mut revised)?;
    runtime.drain_jobs()?;
    println!("  Step 4: revised content → job {:?}", revision_job.map(|id| id.to_string()));

    let characterized = runtime.repository.find(&file.id)?;
    print_desc(&characterized);
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(UploadOutcome {
        jobs_enqueued: [upload_job.is_some(), edit_job.is_some(), revision_job.is_some()],
        characterized,
    })
}

#[cfg(test)]
mod tests {
    use fixity_config::RepositoryConfig;
    use fixity_contracts::metadata::DescField;

    use super::run_scenario;

    #[test]
    fn test_only_content_changes_enqueue() {
        let outcome = run_scenario(&RepositoryConfig::default()).unwrap();
        assert_eq!(outcome.jobs_enqueued, [true, false, true]);
    }

    #[test]
    fn test_revision_appends_without_dropping() {
        let outcome = run_scenario(&RepositoryConfig::default()).unwrap();
        let file = outcome.characterized;

        assert_eq!(
            file.desc.get(DescField::Title),
            ["annual-report-2025.pdf", "Annual Report 2025", "Annual Report 2025, Revised"]
        );
        assert_eq!(file.desc.get(DescField::Creator), ["Office of Research"]);
        assert_eq!(file.desc.get(DescField::Subject), ["institutional reports"]);
        assert_eq!(file.filename.as_deref(), Some("annual-report-2025.pdf"));
    }

    /// A mapping that targets `format` records the format label instead.
    #[test]
    fn test_configured_mapping() {
        let config = RepositoryConfig::from_toml_str(
            "[characterization.fits_to_desc_mapping]\nformat_label = \"format\"\n",
        )
        .unwrap();
        let file = run_scenario(&config).unwrap().characterized;

        assert_eq!(file.desc.get(DescField::Format), ["Portable Document Format"]);
        assert!(file.desc.get(DescField::Creator).is_empty());
    }
}
