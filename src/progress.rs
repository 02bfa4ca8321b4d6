// src/progress.rs
/// Lightweight progress reporting for a pipeline run.
/// Frontends implement this to surface status; library code never prints.
pub trait Progress {
    /// Called at the start with the number of shows to process.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one show has been loaded and normalized.
    fn item_done(&mut self, _show: &str, _episodes: usize, _recaps: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Forwards everything to the log at info level.
pub struct LogProgress;
impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        logf!("processing {total} show(s)");
    }
    fn log(&mut self, msg: &str) {
        logf!("{msg}");
    }
    fn item_done(&mut self, show: &str, episodes: usize, recaps: usize) {
        logf!("{show}: {episodes} episodes, {recaps} recaps");
    }
}
