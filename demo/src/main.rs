//! Fixity demo CLI
//!
//! Runs the reference scenarios against an in-memory repository: scheduled
//! fixity sweeps with retention, characterization on upload, and detection
//! of silent corruption.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- --config config/repository.toml fixity-sweep
//!   cargo run -p demo -- characterize-upload
//!   cargo run -p demo -- bit-rot

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fixity_config::RepositoryConfig;
use fixity_contracts::error::FixityResult;
use fixity_repository::scenarios::{bit_rot, characterize_upload, fixity_sweep};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Content integrity auditing and characterization demo.
#[derive(Parser)]
#[command(
    name = "fixity-demo",
    about = "Fixity audit and characterization demo",
    long_about = "Runs reference scenarios showing scheduled checksum audits, audit log\n\
                  retention, characterization on upload, and bit-rot detection."
)]
struct Cli {
    /// Repository configuration file (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenarios in sequence.
    RunAll,
    /// Scenario 1: scheduled sweeps, skipping and retention.
    FixitySweep,
    /// Scenario 2: upload, characterization job and metadata merge.
    CharacterizeUpload,
    /// Scenario 3: silent corruption, forced audit and protected failures.
    BitRot,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=debug shows every audit decision.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config).and_then(|config| {
        print_banner(&config);
        match cli.command {
            Command::RunAll => run_all(&config),
            Command::FixitySweep => fixity_sweep::run_scenario(&config).map(drop),
            Command::CharacterizeUpload => characterize_upload::run_scenario(&config).map(drop),
            Command::BitRot => bit_rot::run_scenario(&config).map(drop),
        }
    });

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(path: Option<PathBuf>) -> FixityResult<RepositoryConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading repository configuration");
            RepositoryConfig::from_file(&path)
        }
        None => Ok(RepositoryConfig::default()),
    }
}

fn run_all(config: &RepositoryConfig) -> FixityResult<()> {
    fixity_sweep::run_scenario(config)?;
    characterize_upload::run_scenario(config)?;
    bit_rot::run_scenario(config)?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner(config: &RepositoryConfig) {
    let policy = config.audit_policy();
    println!();
    println!("Fixity: content integrity audits for repository objects");
    println!("=======================================================");
    println!();
    println!("  max_days_between_audits:      {}", policy.max_days_between_audits);
    println!("  retained_passing_audit_count: {}", policy.retained_passing_audit_count);
    println!("  characterization max_attempts: {}", config.max_attempts());
    for entry in config.field_mapping().entries() {
        println!("  mapping: {:<20} → {}", entry.term, entry.target);
    }
    println!();
}
