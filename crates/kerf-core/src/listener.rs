//! Progress listener interface
//!
//! Defines the listener trait used by the driver to report job progress
//! and phase changes to the caller.

/// Listener trait for job progress events
///
/// Implement this trait to receive progress percentages and human-readable
/// phase labels while a job is being sent.
pub trait ProgressListener {
    /// Called when overall job progress changes (monotonic, 0-100)
    fn progress_changed(&mut self, _percent: u8) {}

    /// Called when the job enters a new phase
    fn task_changed(&mut self, _task: &str) {}
}

/// Listener that discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressListener;

impl ProgressListener for NullProgressListener {}

/// Listener that forwards events to `tracing` at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressListener;

impl ProgressListener for LogProgressListener {
    fn progress_changed(&mut self, percent: u8) {
        tracing::info!(percent, "job progress");
    }

    fn task_changed(&mut self, task: &str) {
        tracing::info!(task, "job phase");
    }
}
