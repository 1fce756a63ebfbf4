//! # fixity-contracts
//!
//! Shared types, identifiers, and errors for the fixity repository layer.
//!
//! All crates in the workspace import from here. Behaviour lives elsewhere;
//! this crate holds data definitions and the small helpers that keep them
//! consistent.

pub mod audit;
pub mod error;
pub mod file;
pub mod ids;
pub mod job;
pub mod metadata;
pub mod version;
