use std::future::Future;

use async_trait::async_trait;

/// A `Fetcher` defines how a single key is resolved into a value from some remote resource.
///
/// The [`BatchResolver`](crate::BatchResolver) calls `fetch` once per requested key, so an
/// implementation is expected to perform exactly one lookup per invocation. Fetchers do not cache
/// and do not retry; any such policy belongs to the transport underneath.
///
/// Every error returned by `fetch` is treated the same way by the resolver: the key failed to
/// resolve and the whole resolution is abandoned.
#[async_trait]
pub trait Fetcher<K, V> {
    type Error;
    async fn fetch(&self, key: &K) -> Result<V, Self::Error>;
}

/// Adapts an async closure into a [`Fetcher`]. Built with [`fetch_fn`].
#[derive(Clone, Copy, Debug)]
pub struct FetchFn<F>(F);

/// Wraps `f` so that it can be handed to a resolver wherever a [`Fetcher`] is expected.
///
/// The closure receives an owned clone of each key.
pub fn fetch_fn<F>(f: F) -> FetchFn<F> {
    FetchFn(f)
}

#[async_trait]
impl<K, V, E, F, Fut> Fetcher<K, V> for FetchFn<F>
where
    K: Clone + Sync,
    F: Fn(K) -> Fut + Send + Sync,
    Fut: Future<Output = Result<V, E>> + Send + 'static,
{
    type Error = E;

    async fn fetch(&self, key: &K) -> Result<V, E> {
        (self.0)(key.clone()).await
    }
}
