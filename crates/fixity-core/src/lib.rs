//! # fixity-core
//!
//! Content integrity auditing for the repository-object layer.
//!
//! This crate provides:
//! - The seams to the external collaborators (`traits`)
//! - The audit decision engine (`decision`)
//! - Retention pruning of audit history (`retention`)
//! - The `Auditor`, which runs fixity checks and records their outcomes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fixity_core::{Auditor, traits::SystemClock};
//!
//! let auditor = Auditor::new(objects, audit_log, Arc::new(SystemClock), policy);
//! let summary = auditor.audit_everything(false)?;
//! ```

pub mod auditor;
pub mod decision;
pub mod retention;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use auditor::{Auditor, SweepSummary, VersionAudit};
