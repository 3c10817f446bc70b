use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<Arc<dyn Any + Send + Sync>>>;

/// Run-scoped memo of raw provider responses.
///
/// Several enumerators often need the same listing call; the first caller runs
/// it, concurrent callers await the same cell, and a failed call is not cached.
#[derive(Default)]
pub struct RunCache {
    slots: Mutex<HashMap<(String, TypeId), Slot>>,
}

impl RunCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_try_init<T, E, F, Fut>(&self, key: &str, init: F) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let slot = {
            let mut slots = self
                .slots
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            Arc::clone(slots.entry((key.to_string(), TypeId::of::<T>())).or_default())
        };

        let value = slot
            .get_or_try_init(|| async move {
                let value = init().await?;
                tracing::debug!(key, "cached provider response");
                Ok::<_, E>(Arc::new(value) as Arc<dyn Any + Send + Sync>)
            })
            .await?;

        // Slots are keyed by the value's TypeId, so the downcast cannot fail.
        Ok(Arc::clone(value)
            .downcast::<T>()
            .expect("run cache slot holds a value of its keyed type"))
    }

    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for RunCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunCache").field("entries", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let cache = RunCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Arc<Vec<u32>> = cache
                .get_or_try_init("list", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(vec![1, 2, 3])
                })
                .await
                .unwrap();
            assert_eq!(*value, vec![1, 2, 3]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = RunCache::new();

        let first: Result<Arc<u8>, String> = cache
            .get_or_try_init("k", || async { Err("boom".to_string()) })
            .await;
        assert_eq!(first.unwrap_err(), "boom");
        assert!(cache.is_empty());

        let second: Arc<u8> = cache
            .get_or_try_init("k", || async { Ok::<_, String>(7) })
            .await
            .unwrap();
        assert_eq!(*second, 7);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_call() {
        let cache = Arc::new(RunCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_try_init("shared", || async {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::task::yield_now().await;
                            Ok::<_, String>("value".to_string())
                        })
                        .await
                        .map(|v| v.len())
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap(), Ok(5));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
