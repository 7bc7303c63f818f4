//! Import orchestration
//!
//! This module provides the core import logic, including:
//! - Reference id resolution
//! - Per-row write planning and execution
//! - Transaction coordination
//! - Summary and reporting

pub mod coordinator;
pub mod reference;
pub mod summary;
pub mod writer;
pub mod writes;

pub use coordinator::{ImportCoordinator, ImportProgress};
pub use reference::{ReferenceCache, ReferenceKey, ReferenceLookup};
pub use summary::ImportSummary;
pub use writer::{RowOutcome, RowWriter, TrackerOutcome};
pub use writes::RowWrites;
