//! Request coalescing.
//!
//! [`SingleFlight`] runs at most one instance of an operation at a time.
//! The first caller starts the operation; callers arriving while it is
//! pending await the same shared future and receive a clone of its output.
//! The slot empties as soon as the operation settles, so the next call
//! starts a fresh operation.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};

type Flight<T> = Shared<BoxFuture<'static, T>>;

struct Pending<T> {
    generation: u64,
    flight: Flight<T>,
}

/// A slot holding at most one in-flight operation producing `T`.
pub struct SingleFlight<T: Clone> {
    slot: Arc<Mutex<Option<Pending<T>>>>,
    generations: AtomicU64,
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// An empty slot.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            generations: AtomicU64::new(0),
        }
    }

    /// Join the pending operation, or start one with `start` if none is
    /// pending.
    ///
    /// `start` is only invoked by the caller that finds the slot empty.
    pub async fn run<F, Fut>(&self, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let flight = {
            let mut slot = lock(&self.slot);
            match slot.as_ref() {
                Some(pending) => pending.flight.clone(),
                None => {
                    let generation = self.generations.fetch_add(1, Ordering::Relaxed);
                    let flight = Self::settle_into(Arc::clone(&self.slot), generation, start());
                    *slot = Some(Pending {
                        generation,
                        flight: flight.clone(),
                    });
                    flight
                }
            }
        };

        flight.await
    }

    /// Whether an operation is currently pending.
    pub fn in_flight(&self) -> bool {
        lock(&self.slot).is_some()
    }

    /// Wrap `operation` so that it clears `slot` when it settles, provided
    /// the slot still holds this generation.
    fn settle_into<Fut>(
        slot: Arc<Mutex<Option<Pending<T>>>>,
        generation: u64,
        operation: Fut,
    ) -> Flight<T>
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        async move {
            let outcome = operation.await;
            let mut slot = lock(&slot);
            if slot.as_ref().is_some_and(|p| p.generation == generation) {
                *slot = None;
            }
            outcome
        }
        .boxed()
        .shared()
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
