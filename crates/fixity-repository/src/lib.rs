//! # fixity-repository
//!
//! In-memory reference repository for the fixity subsystem.
//!
//! - `store`: versioned objects with SHA-256 checksums recorded at write time
//! - `extractor`: a magic-byte characterization tool
//! - `runtime`: everything wired together around one repository
//! - `scenarios`: runnable walk-throughs of sweeps, uploads and bit rot
//!
//! All sample data is fictional. Nothing leaves the process.

pub mod extractor;
pub mod mock_data;
pub mod runtime;
pub mod scenarios;
pub mod store;

pub use extractor::SignatureExtractor;
pub use runtime::{FixityRuntime, ManualClock};
pub use store::InMemoryRepository;
