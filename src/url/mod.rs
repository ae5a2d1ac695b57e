//! URL handling module for Site-Sweep
//!
//! This module provides URL canonicalization and the origin scope test that
//! decides whether a link stays inside the crawl.

mod canonical;
mod origin;

// Re-export main types and functions
pub use canonical::canonicalize;
pub use origin::Origin;
