use dropcatch_domain::DropId;
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slots = Arc<Mutex<FxHashMap<DropId, Arc<AsyncMutex<()>>>>>;

/// Registry of one async mutex per drop.
///
/// The map itself sits behind a sync mutex that is only held to clone the `Arc`;
/// the await happens on the per-drop mutex afterwards. A slot lives only while a
/// guard or a waiter references it.
#[derive(Debug, Default)]
pub(crate) struct DropLocks {
    slots: Slots,
}

impl DropLocks {
    pub(crate) async fn acquire(&self, id: DropId) -> DropGuard {
        let slot = Arc::clone(self.slots.lock().entry(id).or_default());
        let guard = slot.lock_owned().await;
        DropGuard { id, guard: Some(guard), slots: Arc::clone(&self.slots) }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots.lock().len()
    }
}

/// Exclusive access to one drop for as long as the guard lives.
#[must_use = "the drop is unlocked as soon as the guard is dropped"]
#[derive(Debug)]
pub struct DropGuard {
    id: DropId,
    guard: Option<OwnedMutexGuard<()>>,
    slots: Slots,
}

impl DropGuard {
    #[must_use]
    pub const fn drop_id(&self) -> DropId {
        self.id
    }
}

impl Drop for DropGuard {
    fn drop(&mut self) {
        // Unlock first so the count below only sees the map and pending waiters.
        self.guard.take();
        let mut slots = self.slots.lock();
        if slots.get(&self.id).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            slots.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_released_slots_are_removed() {
        let locks = DropLocks::default();
        for id in 0..1_000 {
            let _guard = locks.acquire(DropId(id)).await;
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_slot_survives_while_waiter_queued() {
        let locks = Arc::new(DropLocks::default());
        let first = locks.acquire(DropId(7)).await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let guard = locks.acquire(DropId(7)).await;
                guard.drop_id()
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(locks.len(), 1);
        assert_eq!(waiter.await.unwrap(), DropId(7));
        assert_eq!(locks.len(), 0);
    }
}
