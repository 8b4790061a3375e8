//! Small shared utilities for the `knot` crates.

// -----------------------------------------------------------------------------
// Modules

pub mod hash;
