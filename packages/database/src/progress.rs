//! Progress reporting for dataset imports and bulk exports.
//!
//! [`ProgressCallback`] keeps long loops independent of how progress is
//! shown. The CLI plugs in `indicatif` bars; tests pass [`null_progress`].

use std::sync::Arc;

/// Receives progress updates from a long-running operation.
///
/// Units are chosen by the caller: the CSV import reports bytes read, the
/// export loop reports reports written.
pub trait ProgressCallback: Send + Sync {
    /// Sets the total units of work.
    fn set_total(&self, total: u64);

    /// Sets the absolute position.
    fn set_position(&self, pos: u64);

    /// Advances by `delta` units.
    fn inc(&self, delta: u64);

    /// Completes with a final message.
    fn finish(&self, msg: String);
}

struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn set_position(&self, _pos: u64) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a callback that ignores every update.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
