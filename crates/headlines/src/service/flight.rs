//! Per-key in-flight guards for cold builds.
//!
//! Concurrent cold requests for the same key queue on one async mutex; the
//! first builds, the rest re-check the store after acquiring and find rows.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Held while a cold build for one key runs.
pub(crate) type FlightGuard = OwnedMutexGuard<()>;

#[derive(Debug)]
pub(crate) struct InFlight<K> {
    slots: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> Default for InFlight<K> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> InFlight<K> {
    fn slot(&self, key: K) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // Slots nobody holds or waits on only cost memory.
        slots.retain(|_, slot| Arc::strong_count(slot) > 1);
        slots.entry(key).or_default().clone()
    }

    /// Waits until no other build for `key` is running.
    pub(crate) async fn acquire(&self, key: K) -> FlightGuard {
        self.slot(key).lock_owned().await
    }

    /// Acquires every key in order.
    ///
    /// Callers must pass keys in one fixed global order so that overlapping
    /// acquisitions cannot deadlock.
    pub(crate) async fn acquire_all(&self, keys: Vec<K>) -> Vec<FlightGuard> {
        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.acquire(key).await);
        }
        guards
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let flights = Arc::new(InFlight::<u8>::default());
        let guard = flights.acquire(1).await;

        let waiter = {
            let flights = flights.clone();
            tokio::spawn(async move {
                let _guard = flights.acquire(1).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block() {
        let flights = InFlight::<u8>::default();
        let _first = flights.acquire(1).await;

        let second = tokio::time::timeout(Duration::from_secs(1), flights.acquire(2)).await;

        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_acquire_all_holds_every_key() {
        let flights = InFlight::<u8>::default();
        let guards = flights.acquire_all(vec![1, 2, 3]).await;
        assert_eq!(guards.len(), 3);

        let blocked = tokio::time::timeout(Duration::from_millis(20), flights.acquire(2)).await;
        assert!(blocked.is_err());

        drop(guards);
        assert!(flights.acquire_all(vec![1, 2, 3]).await.len() == 3);
    }

    #[tokio::test]
    async fn test_released_slots_are_pruned() {
        let flights = InFlight::<u8>::default();
        drop(flights.acquire(1).await);
        drop(flights.acquire(2).await);

        let _held = flights.acquire(3).await;

        assert_eq!(flights.len(), 1);
    }
}
