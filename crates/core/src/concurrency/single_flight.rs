use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};
use tokio::sync::oneshot;

use super::ConcurrencyError;

type Waiter<V, E> = oneshot::Sender<Result<V, E>>;
type InFlightTable<K, V, E> = Arc<Mutex<HashMap<K, InFlightCall<V, E>>>>;

/// One upstream call in progress and everyone waiting on it.
struct InFlightCall<V, E> {
    waiters: Vec<Waiter<V, E>>,
}

fn lock_table<K, V, E>(
    table: &Mutex<HashMap<K, InFlightCall<V, E>>>,
) -> MutexGuard<'_, HashMap<K, InFlightCall<V, E>>> {
    table.lock().unwrap_or_else(|poisoned| {
        warn!("In-flight table mutex poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Collapses concurrent calls for the same key into one producer invocation.
///
/// The first caller for a key registers an in-flight record and spawns the
/// producer as a detached task. Later callers for the same key attach as
/// waiters. When the producer finishes, the record is removed and its outcome
/// (value or error) is sent to every attached waiter. Nothing is retained
/// afterwards, so a failed call can be retried by the next request.
///
/// Dropping a caller's future only detaches that caller; the shared call keeps
/// running for the others.
pub struct SingleFlight<K, V, E> {
    calls: InFlightTable<K, V, E>,
}

impl<K, V, E> Clone for SingleFlight<K, V, E> {
    fn clone(&self) -> Self {
        Self {
            calls: Arc::clone(&self.calls),
        }
    }
}

impl<K, V, E> Default for SingleFlight<K, V, E> {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, V, E> SingleFlight<K, V, E>
where
    K: Hash + Eq + Clone + Display + Send + 'static,
    V: Clone + Send + 'static,
    E: Clone + Send + From<ConcurrencyError> + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `producer` for `key`, or join the call already in flight for it.
    ///
    /// `producer` is only invoked by the caller that registers the call.
    pub async fn run<F, Fut>(&self, key: K, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();

        let is_leader = {
            let mut calls = lock_table(&self.calls);
            match calls.entry(key.clone()) {
                Entry::Occupied(mut call) => {
                    call.get_mut().waiters.push(tx);
                    false
                }
                Entry::Vacant(slot) => {
                    slot.insert(InFlightCall { waiters: vec![tx] });
                    true
                }
            }
        };

        if is_leader {
            debug!("Starting upstream call for {}", key);
            let guard = FlightGuard {
                key: Some(key),
                calls: Arc::clone(&self.calls),
            };
            let work = producer();
            tokio::spawn(async move {
                let outcome = work.await;
                guard.complete(outcome);
            });
        } else {
            debug!("Joined in-flight call for {}", key);
        }

        match rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(E::from(ConcurrencyError::ProducerAborted)),
        }
    }

    /// Number of keys with a call currently in flight.
    pub fn in_flight(&self) -> usize {
        lock_table(&self.calls).len()
    }
}

/// Owns the in-flight record for the lifetime of the producer task.
///
/// If the task is dropped before completing (panic, runtime shutdown), the
/// record is removed and its senders are dropped, which wakes every waiter
/// with a closed channel.
struct FlightGuard<K: Hash + Eq, V, E> {
    key: Option<K>,
    calls: InFlightTable<K, V, E>,
}

impl<K: Hash + Eq, V: Clone, E: Clone> FlightGuard<K, V, E> {
    fn complete(mut self, outcome: Result<V, E>) {
        let waiters = self
            .key
            .take()
            .and_then(|key| lock_table(&self.calls).remove(&key))
            .map(|call| call.waiters)
            .unwrap_or_default();

        for waiter in waiters {
            // A closed receiver means that caller gave up waiting
            let _ = waiter.send(outcome.clone());
        }
    }
}

impl<K: Hash + Eq, V, E> Drop for FlightGuard<K, V, E> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            lock_table(&self.calls).remove(&key);
        }
    }
}
