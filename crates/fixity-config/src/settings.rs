//! Configuration schema as written in TOML.
//!
//! These structs mirror the file layout one to one. Every key has a default,
//! so an empty document is a valid configuration. Validation and resolution
//! of descriptive field names happen in `RepositoryConfig`.
//!
//! Example:
//! ```toml
//! [audit]
//! max_days_between_audits = 7
//! retained_passing_audit_count = 2
//!
//! [characterization]
//! max_attempts = 3
//!
//! [characterization.fits_to_desc_mapping]
//! file_title = "title"
//! file_author = "creator"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fixity_contracts::audit::AuditPolicy;

/// The `[audit]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSettings {
    /// Whole days that must pass before a datastream is audited again.
    pub max_days_between_audits: u32,

    /// Passing entries kept per (object, datastream) after pruning.
    pub retained_passing_audit_count: usize,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            max_days_between_audits: AuditPolicy::DEFAULT_MAX_DAYS_BETWEEN_AUDITS,
            retained_passing_audit_count: AuditPolicy::DEFAULT_RETAINED_PASSING_AUDIT_COUNT,
        }
    }
}

/// The `[characterization]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterizationSettings {
    /// Characterization term → descriptive field name.
    pub fits_to_desc_mapping: BTreeMap<String, String>,

    /// Attempts a worker makes at one job before dead-lettering it.
    pub max_attempts: u32,
}

impl CharacterizationSettings {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
}

impl Default for CharacterizationSettings {
    fn default() -> Self {
        let fits_to_desc_mapping = [("file_title", "title"), ("file_author", "creator")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { fits_to_desc_mapping, max_attempts: Self::DEFAULT_MAX_ATTEMPTS }
    }
}

/// The top-level document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub audit: AuditSettings,
    pub characterization: CharacterizationSettings,
}
