//! Auto-tag progress reporting.

use crate::task::{AutoTagStats, AutoTagTarget};

/// Receives progress updates from running auto-tag tasks.
///
/// Pool workers share one reporter, so implementations must be thread-safe.
pub trait AutoTagProgress: Send + Sync {
    /// Called once a task has resolved its target's name.
    fn on_start(&self, target: AutoTagTarget, name: &str, total: usize);

    /// Called after each scene path is checked.
    fn on_scene(&self, target: AutoTagTarget, current: usize, total: usize);

    /// Called when a task commits.
    fn on_complete(&self, target: AutoTagTarget, stats: &AutoTagStats);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl AutoTagProgress for SilentProgress {
    fn on_start(&self, _target: AutoTagTarget, _name: &str, _total: usize) {}
    fn on_scene(&self, _target: AutoTagTarget, _current: usize, _total: usize) {}
    fn on_complete(&self, _target: AutoTagTarget, _stats: &AutoTagStats) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl AutoTagProgress for LogProgress {
    fn on_start(&self, target: AutoTagTarget, name: &str, total: usize) {
        log::info!("Auto-tagging {target} '{name}' against {total} scenes");
    }

    fn on_scene(&self, target: AutoTagTarget, current: usize, total: usize) {
        if current.is_multiple_of(1000) || current == total {
            log::debug!("  {target}: [{current}/{total}]");
        }
    }

    fn on_complete(&self, target: AutoTagTarget, stats: &AutoTagStats) {
        log::info!(
            "Finished {target}: {} matched, {} newly linked",
            stats.matched,
            stats.linked
        );
    }
}
