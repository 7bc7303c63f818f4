//! Database abstraction layer
//!
//! The importer writes through [`ImportTransaction`] so the row logic and the
//! commit/rollback discipline do not depend on a particular driver.

pub mod traits;

pub use traits::ImportTransaction;
