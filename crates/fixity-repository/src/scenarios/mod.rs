//! Reference scenarios.
//!
//! Each scenario builds its own `FixityRuntime` from the given configuration,
//! drives it with the sample deposits, prints what happens, and returns an
//! outcome the tests assert on.

pub mod bit_rot;
pub mod characterize_upload;
pub mod fixity_sweep;
