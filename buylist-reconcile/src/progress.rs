//! Progress reporting for uploads and fuzzy matching.

/// Trait for receiving progress updates from long-running operations.
pub trait ReconcileProgress {
    /// Called after each item is processed (e.g., one unmatched card).
    fn on_item(&self, current: usize, total: usize, name: &str);

    /// Called when a phase starts (e.g., "Uploading 3 chunks...").
    fn on_phase(&self, message: &str);

    /// Called when the operation is complete.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl ReconcileProgress for SilentProgress {
    fn on_item(&self, _current: usize, _total: usize, _name: &str) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}
