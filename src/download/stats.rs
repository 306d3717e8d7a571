//! Per-run download counters.

/// Counters accumulated across all episodes of one process run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    pub episodes_completed: u64,
    pub episodes_failed: u64,
    pub segments_missing: u64,
    pub segments_recovered: u64,
    pub bytes_written: u64,
}

impl RunStats {
    /// Whether any episode ended in a fatal error.
    pub fn has_failures(&self) -> bool {
        self.episodes_failed > 0
    }
}
