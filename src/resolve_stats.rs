#[derive(Debug, Default)]
pub struct ResolveStats {
    /// Human readable name used to identify these stats when they are reported.
    tag: &'static str,
    /// Number of batches handed to the fetcher.
    batches: u32,
    /// The total number of fetches issued (not necessarily unique keys).
    fetches: u32,
    /// The largest number of fetches that were in flight together.
    max_batch_size: u32,
    /// The smallest batch, usually the trailing one.
    min_batch_size: u32,
    /// Number of values delivered to the caller.
    resolved: u32,
    /// Whether the resolution ended on a failed batch.
    failed: bool,
}

impl ResolveStats {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, min_batch_size: u32::MAX, ..Default::default() }
    }

    pub fn record_batch(&mut self, size: usize) {
        let size = size as u32;
        self.batches += 1;
        self.fetches += size;
        if size > self.max_batch_size {
            self.max_batch_size = size;
        }
        if size < self.min_batch_size {
            self.min_batch_size = size;
        }
    }

    pub fn record_failure(&mut self) {
        self.failed = true;
    }

    pub fn record_resolved(&mut self, count: usize) {
        self.resolved = count as u32;
    }
}

impl Drop for ResolveStats {
    fn drop(&mut self) {
        tracing::debug!(resolve_stats = ?self);
    }
}
