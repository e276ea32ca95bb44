use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

struct InFlight<T> {
    generation: u64,
    result: Shared<BoxFuture<'static, T>>,
}

/// At most one run at a time. Callers arriving while a run is in flight join
/// it and receive a clone of its output.
///
/// A `StorageSession` owns the one guard for its syncs, so every
/// `Synchronizer` over the same store shares it.
pub struct SingleFlight<T: Clone> {
    slot: Mutex<Option<InFlight<T>>>,
    generations: AtomicU64,
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
            generations: AtomicU64::new(0),
        }
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn is_running(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Join the in-flight run, or start `start()` as the new one.
    pub async fn run<F, Fut>(&self, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (generation, run) = {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(flight) => {
                    debug!(generation = flight.generation, "Joining in-flight run");
                    (flight.generation, flight.result.clone())
                }
                None => {
                    let generation = self.generations.fetch_add(1, Ordering::SeqCst);
                    let result = start().boxed().shared();
                    *slot = Some(InFlight {
                        generation,
                        result: result.clone(),
                    });
                    (generation, result)
                }
            }
        };

        let output = run.await;

        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|flight| flight.generation == generation) {
            *slot = None;
        }
        output
    }
}
