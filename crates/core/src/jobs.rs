//! Job execution context: the append-only log sink a running job reports to.

use std::sync::{Arc, Mutex};

use tracing::info;

/// Ordered, append-only sink for the progress lines of one job invocation.
pub trait JobContext: Send + Sync {
    fn log(&self, line: &str);
}

/// Collects log lines in memory, preserving order.
///
/// Clones share the same buffer, so a caller can hand one clone to a job and
/// read the transcript back from another.
#[derive(Clone, Default)]
pub struct MemoryJobContext {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryJobContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line logged so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// True if any logged line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl JobContext for MemoryJobContext {
    fn log(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}

/// Forwards job log lines to `tracing`, tagged with the job name.
pub struct TracingJobContext {
    job: String,
}

impl TracingJobContext {
    pub fn new(job: &str) -> Self {
        Self {
            job: job.to_string(),
        }
    }
}

impl JobContext for TracingJobContext {
    fn log(&self, line: &str) {
        info!(job = %self.job, "{line}");
    }
}
