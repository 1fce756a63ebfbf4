//! # fixity-config
//!
//! TOML-driven configuration for the fixity repository layer.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use fixity_config::RepositoryConfig;
//!
//! let config = RepositoryConfig::from_file(Path::new("config/repository.toml"))?;
//! let auditor = Auditor::new(objects, log, clock, config.audit_policy());
//! ```
//!
//! ## Field mapping
//!
//! `[characterization.fits_to_desc_mapping]` maps characterization terms to
//! descriptive fields. Targets are checked against the known descriptive
//! fields when the file is loaded; an unknown target fails the load.

pub mod config;
pub mod settings;

pub use config::RepositoryConfig;
pub use settings::{AuditSettings, CharacterizationSettings, ConfigFile};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use fixity_contracts::{error::FixityError, metadata::DescField};

    use crate::RepositoryConfig;

    const SHIPPED_CONFIG: &str = include_str!("../../../config/repository.toml");

    fn expect_config_error(toml: &str, needle: &str) {
        match RepositoryConfig::from_toml_str(toml) {
            Err(FixityError::ConfigError { reason }) => {
                assert!(reason.contains(needle), "expected '{needle}' in reason, got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── 1. defaults ───────────────────────────────────────────────────────────

    /// An empty document yields the documented defaults.
    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RepositoryConfig::from_toml_str("").unwrap();
        let policy = config.audit_policy();

        assert_eq!(policy.max_days_between_audits, 7);
        assert_eq!(policy.retained_passing_audit_count, 2);
        assert_eq!(config.max_attempts(), 3);

        let targets: Vec<DescField> =
            config.field_mapping().entries().iter().map(|e| e.target).collect();
        assert!(targets.contains(&DescField::Title));
        assert!(targets.contains(&DescField::Creator));
    }

    // ── 2. explicit values ────────────────────────────────────────────────────

    #[test]
    fn test_explicit_values() {
        let toml = r#"
            [audit]
            max_days_between_audits = 30
            retained_passing_audit_count = 5

            [characterization]
            max_attempts = 1

            [characterization.fits_to_desc_mapping]
            format_label = "format"
        "#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.audit_policy().max_days_between_audits, 30);
        assert_eq!(config.audit_policy().retained_passing_audit_count, 5);
        assert_eq!(config.max_attempts(), 1);

        let entries = config.field_mapping().entries();
        assert_eq!(entries.len(), 1, "an explicit mapping replaces the default one");
        assert_eq!(entries[0].term, "format_label");
        assert_eq!(entries[0].target, DescField::Format);
    }

    /// A partial `[audit]` table keeps defaults for the missing keys.
    #[test]
    fn test_partial_table() {
        let config = RepositoryConfig::from_toml_str("[audit]\nmax_days_between_audits = 1\n").unwrap();
        assert_eq!(config.audit_policy().max_days_between_audits, 1);
        assert_eq!(config.audit_policy().retained_passing_audit_count, 2);
    }

    // ── 3. validation ─────────────────────────────────────────────────────────

    #[test]
    fn test_zero_interval_rejected() {
        expect_config_error("[audit]\nmax_days_between_audits = 0\n", "max_days_between_audits");
    }

    #[test]
    fn test_zero_retention_rejected() {
        expect_config_error(
            "[audit]\nretained_passing_audit_count = 0\n",
            "retained_passing_audit_count",
        );
    }

    #[test]
    fn test_zero_attempts_rejected() {
        expect_config_error("[characterization]\nmax_attempts = 0\n", "max_attempts");
    }

    /// Unknown descriptive fields are caught at load time, not at merge time.
    #[test]
    fn test_unknown_mapping_target_rejected() {
        let toml = r#"
            [characterization.fits_to_desc_mapping]
            file_title = "headline"
        "#;
        expect_config_error(toml, "headline");
    }

    /// The shipped configuration file loads and matches the defaults.
    #[test]
    fn test_shipped_config_file() {
        let shipped = RepositoryConfig::from_toml_str(SHIPPED_CONFIG).unwrap();
        let defaults = RepositoryConfig::default();

        assert_eq!(shipped.audit_policy(), defaults.audit_policy());
        assert_eq!(shipped.max_attempts(), defaults.max_attempts());
        assert_eq!(shipped.raw(), defaults.raw());
    }

    // ── 4. parse errors ───────────────────────────────────────────────────────

    #[test]
    fn test_toml_parse_error() {
        expect_config_error("this is not valid toml ][[[", "failed to parse repository config TOML");
    }

    #[test]
    fn test_wrong_type_rejected() {
        expect_config_error("[audit]\nmax_days_between_audits = \"weekly\"\n", "failed to parse");
    }

    #[test]
    fn test_missing_file() {
        let result = RepositoryConfig::from_file(std::path::Path::new("/nonexistent/repository.toml"));
        assert!(matches!(result, Err(FixityError::ConfigError { .. })));
    }
}
