use std::fmt::Debug;
use std::iter::Enumerate;
use std::num::NonZeroUsize;
use std::slice::Chunks;

use futures::future;
use tracing_futures::Instrument;

use crate::fetcher::Fetcher;
#[cfg(feature = "stats")]
use crate::resolve_stats::ResolveStats;

/// A `Resolution` holds the state of one [`BatchResolver`](crate::BatchResolver) invocation.
///
/// It is created per call and consumed by [`Resolution::run`], so nothing here is ever shared
/// between invocations. The state is the ordered list of values resolved so far and the batches
/// that have not been dispatched yet.
///
/// Running a resolution cycles through the following states for every batch:
///
/// 1. Scheduling: every key of the next batch is handed to the `Fetcher`, all at once.
/// 2. Joining: the batch's fetches are awaited together until each of them has settled.
///
/// After joining, a batch whose fetches all succeeded is appended to the resolved values in
/// the order its keys were listed, regardless of the order in which the fetches completed, and
/// the next batch is scheduled. When no batch remains the resolution is done. If any fetch in the
/// batch failed the resolution fails with the error of the first failing key in that batch, and
/// the remaining batches are dropped without ever being scheduled.
///
/// Since batches never overlap, at most `limit` fetches are in flight at any point.
pub(crate) struct Resolution<'a, K, V> {
    batches: Enumerate<Chunks<'a, K>>,
    resolved: Vec<V>,
    #[cfg(feature = "stats")]
    stats: ResolveStats,
}

impl<'a, K, V> Resolution<'a, K, V>
where
    K: Debug + Sync,
{
    pub fn new(keys: &'a [K], limit: NonZeroUsize) -> Self {
        Self {
            batches: keys.chunks(limit.get()).enumerate(),
            resolved: Vec::with_capacity(keys.len()),
            #[cfg(feature = "stats")]
            stats: ResolveStats::new(std::any::type_name::<(K, V)>()),
        }
    }

    pub async fn run<F>(mut self, fetcher: &F) -> Result<Vec<V>, F::Error>
    where
        F: Fetcher<K, V>,
    {
        while let Some((index, batch)) = self.batches.next() {
            tracing::debug!(batch = index, size = batch.len(), "scheduling batch");
            #[cfg(feature = "stats")]
            self.stats.record_batch(batch.len());

            let settled = future::join_all(batch.iter().map(|key| {
                fetcher.fetch(key).instrument(tracing::trace_span!("fetch", ?key))
            }))
            .await;

            match settled.into_iter().collect::<Result<Vec<_>, _>>() {
                Ok(values) => self.resolved.extend(values),
                Err(e) => {
                    tracing::debug!(
                        batch = index,
                        skipped_batches = self.batches.len(),
                        "batch failed, abandoning resolution"
                    );
                    #[cfg(feature = "stats")]
                    self.stats.record_failure();
                    return Err(e);
                }
            }
        }

        tracing::debug!(resolved = self.resolved.len(), "resolution done");
        #[cfg(feature = "stats")]
        self.stats.record_resolved(self.resolved.len());
        Ok(self.resolved)
    }
}
