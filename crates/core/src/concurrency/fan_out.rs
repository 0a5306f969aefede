use std::future::Future;

use futures::future::join_all;

/// Run `lookup` for every key concurrently and pair each outcome with its key.
///
/// The output has the same order as `keys`, whatever order the lookups finish
/// in. One failing key never affects the others. Bounding upstream pressure is
/// left to whatever `lookup` goes through (the shared limiter).
pub async fn fan_out<K, V, E, F, Fut>(keys: Vec<K>, lookup: F) -> Vec<(K, Result<V, E>)>
where
    K: Clone,
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    let outcomes = join_all(keys.iter().cloned().map(&lookup)).await;
    keys.into_iter().zip(outcomes).collect()
}
