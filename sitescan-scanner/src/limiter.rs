use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting admission gate for outbound fetches.
///
/// `acquire` waits until fewer than `capacity` permits are outstanding. The
/// slot is released when the returned permit is dropped.
#[derive(Debug, Clone)]
pub struct FetchLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl FetchLimiter {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        // never closed
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("fetch limiter semaphore closed")
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
