//! Auto-tagging: link scenes to the performers, studios, and tags whose
//! names appear in the scene's file path.
//!
//! An [`AutoTagTask`] handles one entity against every scene in one
//! transaction. [`AutoTagPool`] runs many tasks concurrently against a
//! shared database file and reports one [`AutoTagOutcome`] per task.

pub mod pool;
pub mod progress;
pub mod task;

pub use pool::{AutoTagOutcome, AutoTagPool};
pub use progress::{AutoTagProgress, LogProgress, SilentProgress};
pub use task::{AutoTagError, AutoTagStats, AutoTagTarget, AutoTagTask};
