//! # fixity-audit
//!
//! Append-only checksum audit log for the repository-object layer.
//!
//! ## Overview
//!
//! Every fixity check the auditor performs is recorded as an
//! `AuditLogEntry`. Entries are queried most-recent-first per
//! (object, datastream). Passing entries may later be removed by retention
//! pruning; failing entries are kept forever as forensic history and the
//! store refuses to delete them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fixity_audit::InMemoryAuditLog;
//! use fixity_core::{Auditor, traits::SystemClock};
//!
//! let log = Arc::new(InMemoryAuditLog::new());
//! let auditor = Auditor::new(objects, log.clone(), Arc::new(SystemClock), policy);
//! ```

pub mod memory;

pub use memory::InMemoryAuditLog;

// ── Tests ─────────────────────────────────────────────────────────────────────
