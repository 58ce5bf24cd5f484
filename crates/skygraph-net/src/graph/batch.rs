//! Chunked fan-out with ordered merging.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use futures_util::future::try_join_all;

use crate::error::Result;

/// Split `items` into consecutive chunks of at most `size`, in input order.
pub(crate) fn chunks<T>(items: &[T], size: usize) -> impl Iterator<Item = &[T]> {
    items.chunks(size.max(1))
}

/// Run every future concurrently and return their outputs in input order.
///
/// Fails with the first error; the remaining futures are dropped.
pub(crate) async fn gather_ordered<I, F, T>(futures: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T>>,
{
    try_join_all(futures).await
}

/// Merge maps in order. Later maps win on key collisions.
pub(crate) fn merge_in_order<K, V, I>(parts: I) -> HashMap<K, V>
where
    K: Eq + Hash,
    I: IntoIterator<Item = HashMap<K, V>>,
{
    parts.into_iter().fold(HashMap::new(), |mut merged, part| {
        merged.extend(part);
        merged
    })
}
