//! Shared test utilities for jobdesk integration tests.
//!
//! This module provides:
//! - `TestHarness` for stores backed by a database in a temp directory
//! - Recording and failing collaborators for notification and storage tests
//! - Builders for legacy records and import documents

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
