//! Advisory locks with time-bounded acquisition.
//!
//! Locks serialize per-entity critical sections during matching. Expiry is
//! the sole liveness mechanism: there is no heartbeat or renewal, so critical
//! sections must complete well under the ttl. Every lock is paired with a
//! storage-level constraint, so correctness never rests on the lock alone.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Name of the advisory lock serializing assignment of one driver.
pub fn driver_lock_key(driver_id: Uuid) -> String {
    format!("lock:driver:{}", driver_id)
}

/// Name of the advisory lock serializing matching of one ride.
pub fn ride_lock_key(ride_id: Uuid) -> String {
    format!("lock:ride:{}", ride_id)
}

/// Named advisory locks with mandatory ttl.
#[async_trait]
pub trait LockRegistry: Send + Sync {
    /// Atomic set-if-absent with expiry. Returns true iff the caller now
    /// holds the lock.
    async fn try_acquire(&self, name: &str, ttl: Duration) -> bool;

    /// Best-effort release. Releasing an expired or unheld lock is a no-op.
    async fn release(&self, name: &str);
}

/// In-memory lock registry keyed by lock name, holding expiry instants.
#[derive(Debug, Default)]
pub struct InMemoryLockRegistry {
    locks: Mutex<HashMap<String, Instant>>,
}

impl InMemoryLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockRegistry for InMemoryLockRegistry {
    async fn try_acquire(&self, name: &str, ttl: Duration) -> bool {
        let mut locks = self.locks.lock().await;
        let now = Instant::now();

        if let Some(expiry) = locks.get(name) {
            if *expiry > now {
                return false;
            }
        }

        locks.insert(name.to_string(), now + ttl);
        true
    }

    async fn release(&self, name: &str) {
        self.locks.lock().await.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_then_reacquire_fails() {
        let locks = InMemoryLockRegistry::new();
        assert!(locks.try_acquire("lock:driver:a", Duration::from_secs(10)).await);
        assert!(!locks.try_acquire("lock:driver:a", Duration::from_secs(10)).await);
    }

    #[tokio::test]
    async fn release_allows_reacquisition() {
        let locks = InMemoryLockRegistry::new();
        assert!(locks.try_acquire("lock:ride:r", Duration::from_secs(10)).await);
        locks.release("lock:ride:r").await;
        assert!(locks.try_acquire("lock:ride:r", Duration::from_secs(10)).await);
    }

    #[tokio::test]
    async fn expired_lock_can_be_reacquired() {
        let locks = InMemoryLockRegistry::new();
        assert!(locks.try_acquire("lock:driver:b", Duration::from_millis(5)).await);

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(locks.try_acquire("lock:driver:b", Duration::from_secs(10)).await);
    }

    #[tokio::test]
    async fn distinct_names_do_not_contend() {
        let locks = InMemoryLockRegistry::new();
        assert!(locks.try_acquire("lock:driver:a", Duration::from_secs(10)).await);
        assert!(locks.try_acquire("lock:driver:b", Duration::from_secs(10)).await);
    }

    #[tokio::test]
    async fn releasing_unheld_lock_is_a_noop() {
        let locks = InMemoryLockRegistry::new();
        locks.release("lock:ride:missing").await;
        assert!(locks.try_acquire("lock:ride:missing", Duration::from_secs(10)).await);
    }

    #[test]
    fn lock_keys_have_stable_format() {
        let id = Uuid::nil();
        assert_eq!(
            driver_lock_key(id),
            "lock:driver:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            ride_lock_key(id),
            "lock:ride:00000000-0000-0000-0000-000000000000"
        );
    }
}
