//! Validated repository configuration.
//!
//! `RepositoryConfig` loads a `ConfigFile` from a TOML string or file,
//! checks every value, and resolves the characterization field mapping into
//! `DescField`s. A configuration that loads is therefore safe to hand to the
//! auditor and the characterizer without further lookups.

use std::path::Path;

use tracing::debug;

use fixity_contracts::{
    audit::AuditPolicy,
    error::{FixityError, FixityResult},
    metadata::FieldMapping,
};

use crate::settings::ConfigFile;

/// Loaded, validated configuration.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    file: ConfigFile,
    mapping: FieldMapping,
}

impl RepositoryConfig {
    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `FixityError::ConfigError` if the TOML is malformed, does not
    /// match the schema, or holds an invalid value.
    pub fn from_toml_str(s: &str) -> FixityResult<Self> {
        let file: ConfigFile = toml::from_str(s).map_err(|e| FixityError::ConfigError {
            reason: format!("failed to parse repository config TOML: {}", e),
        })?;
        Self::from_config_file(file)
    }

    /// Read the file at `path` and parse it as repository configuration.
    pub fn from_file(path: &Path) -> FixityResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| FixityError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate an already-deserialized document.
    pub fn from_config_file(file: ConfigFile) -> FixityResult<Self> {
        if file.audit.max_days_between_audits == 0 {
            return Err(FixityError::ConfigError {
                reason: "audit.max_days_between_audits must be > 0".to_string(),
            });
        }
        if file.audit.retained_passing_audit_count == 0 {
            return Err(FixityError::ConfigError {
                reason: "audit.retained_passing_audit_count must be >= 1".to_string(),
            });
        }
        if file.characterization.max_attempts == 0 {
            return Err(FixityError::ConfigError {
                reason: "characterization.max_attempts must be >= 1".to_string(),
            });
        }

        let mapping = FieldMapping::resolve(
            file.characterization
                .fits_to_desc_mapping
                .iter()
                .map(|(term, field)| (term.clone(), field.as_str())),
        )?;

        debug!(
            max_days_between_audits = file.audit.max_days_between_audits,
            retained_passing_audit_count = file.audit.retained_passing_audit_count,
            mapped_terms = mapping.entries().len(),
            "repository configuration loaded"
        );

        Ok(Self { file, mapping })
    }

    /// Scheduling and retention settings for the auditor.
    pub fn audit_policy(&self) -> AuditPolicy {
        AuditPolicy {
            max_days_between_audits: self.file.audit.max_days_between_audits,
            retained_passing_audit_count: self.file.audit.retained_passing_audit_count,
        }
    }

    /// The resolved characterization-to-descriptive field table.
    pub fn field_mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Attempts per characterization job before dead-lettering.
    pub fn max_attempts(&self) -> u32 {
        self.file.characterization.max_attempts
    }

    pub fn raw(&self) -> &ConfigFile {
        &self.file
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self { file: ConfigFile::default(), mapping: FieldMapping::default() }
    }
}
