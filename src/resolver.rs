use std::fmt::Debug;
use std::num::NonZeroUsize;

use thiserror::Error;
use tracing::{span, Level};
use tracing_futures::Instrument;

use crate::{fetcher::Fetcher, resolution::Resolution};

/// Errors produced by [`BatchResolver::resolve_all`].
#[derive(Debug, Error)]
pub enum ResolveError<E> {
    /// The concurrency limit was zero. Raised before any fetch is issued.
    #[error("concurrency limit must be a positive integer, got {0}")]
    InvalidLimit(usize),
    /// A key failed to resolve. The fetcher's error is passed through untouched.
    #[error(transparent)]
    Fetch(E),
}

impl<E> ResolveError<E> {
    /// Returns the fetcher's error, if that is what caused the failure.
    pub fn into_fetch_error(self) -> Option<E> {
        match self {
            ResolveError::Fetch(e) => Some(e),
            ResolveError::InvalidLimit(_) => None,
        }
    }
}

/// Resolves ordered lists of keys through a [`Fetcher`] without ever having more than `limit`
/// lookups in flight.
///
/// Keys are split into consecutive batches of `limit` keys. The batches are processed one after
/// the other, and the keys of a batch are fetched concurrently. The next batch starts only once
/// every fetch of the current one has settled.
///
/// On success the returned values line up with the requested keys: the value at position `i`
/// belongs to the key at position `i`. Duplicate keys are fetched once per occurrence.
///
/// The first failing batch ends the resolution. Later batches are never dispatched and values
/// already resolved are discarded. If more than one key of the failing batch errors, the error
/// of the key listed first is reported and the others are dropped.
#[derive(Clone, Debug)]
pub struct BatchResolver<F> {
    fetcher: F,
    limit: usize,
}

impl<F> BatchResolver<F> {
    /// Creates a resolver for the given fetcher and concurrency limit.
    ///
    /// A zero limit is accepted here but makes every call to [`BatchResolver::resolve_all`] fail
    /// with [`ResolveError::InvalidLimit`].
    pub fn new(fetcher: F, limit: usize) -> Self {
        Self { fetcher, limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolves every key and returns the values in the order of `keys`.
    pub async fn resolve_all<K, V>(&self, keys: &[K]) -> Result<Vec<V>, ResolveError<F::Error>>
    where
        F: Fetcher<K, V>,
        K: Debug + Sync,
    {
        resolve_all(&self.fetcher, keys, self.limit).await
    }
}

/// Resolves `keys` through `fetcher` with at most `limit` fetches in flight.
///
/// See [`BatchResolver`] for the ordering and failure guarantees.
pub async fn resolve_all<F, K, V>(
    fetcher: &F,
    keys: &[K],
    limit: usize,
) -> Result<Vec<V>, ResolveError<F::Error>>
where
    F: Fetcher<K, V>,
    K: Debug + Sync,
{
    let Some(limit) = NonZeroUsize::new(limit) else {
        return Err(ResolveError::InvalidLimit(limit));
    };
    if keys.is_empty() {
        return Ok(Vec::new());
    }

    let span = span!(
        Level::TRACE,
        "BatchResolver",
        kv = std::any::type_name::<(K, V)>(),
        keys = keys.len(),
        limit = limit.get(),
    );
    Resolution::new(keys, limit).run(fetcher).instrument(span).await.map_err(ResolveError::Fetch)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct Upper {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher<&'static str, String> for Upper {
        type Error = String;
        async fn fetch(&self, key: &&'static str) -> Result<String, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if key.is_empty() {
                return Err("empty key".to_owned());
            }
            Ok(key.to_uppercase())
        }
    }

    fn upper() -> Upper {
        Upper { calls: AtomicUsize::new(0) }
    }

    #[tokio::test]
    async fn zero_limit_is_rejected_before_fetching() {
        let fetcher = upper();
        let result = resolve_all::<_, _, String>(&fetcher, &["a"], 0).await;
        assert!(matches!(result, Err(ResolveError::InvalidLimit(0))));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn zero_limit_is_rejected_for_empty_input() {
        let fetcher = upper();
        let result = resolve_all::<_, &'static str, String>(&fetcher, &[], 0).await;
        assert!(matches!(result, Err(ResolveError::InvalidLimit(0))));
    }

    #[tokio::test]
    async fn empty_input_issues_no_fetch() {
        let fetcher = upper();
        let result = resolve_all::<_, &'static str, String>(&fetcher, &[], 3).await;
        assert_eq!(result.unwrap(), Vec::<String>::new());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_error_is_passed_through() {
        let resolver = BatchResolver::new(upper(), 2);
        let err = resolver.resolve_all::<_, String>(&["a", "", "c"]).await.unwrap_err();
        assert_eq!(err.to_string(), "empty key");
        assert_eq!(err.into_fetch_error().as_deref(), Some("empty key"));
    }

    #[test]
    fn invalid_limit_display() {
        let err: ResolveError<String> = ResolveError::InvalidLimit(0);
        assert_eq!(err.to_string(), "concurrency limit must be a positive integer, got 0");
        assert_eq!(err.into_fetch_error(), None);
    }
}
