//! Subscription registry.
//!
//! Maps each recipient to the single applicant code it watches. Callers that
//! do I/O for subscribers work on a [`SubscriptionRegistry::snapshot`] so the
//! lock is never held across a network call.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{RecipientId, Subscription};

/// Concurrency-safe recipient → watched code store.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: RwLock<HashMap<RecipientId, String>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch `code` for `recipient`, replacing any previous code.
    ///
    /// Returns the code that was replaced, if any.
    pub fn subscribe(&self, recipient: RecipientId, code: impl Into<String>) -> Option<String> {
        self.write().insert(recipient, code.into())
    }

    /// Stop notifying `recipient`. Returns the code it was watching.
    pub fn unsubscribe(&self, recipient: RecipientId) -> Option<String> {
        self.write().remove(&recipient)
    }

    pub fn is_subscribed(&self, recipient: RecipientId) -> bool {
        self.read().contains_key(&recipient)
    }

    pub fn watched_code(&self, recipient: RecipientId) -> Option<String> {
        self.read().get(&recipient).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of every subscription, taken under the read lock.
    pub fn snapshot(&self) -> Vec<Subscription> {
        self.read()
            .iter()
            .map(|(recipient, code)| Subscription {
                recipient: *recipient,
                code: code.clone(),
            })
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<RecipientId, String>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<RecipientId, String>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_resubscribe_overwrites() {
        let registry = SubscriptionRegistry::new();
        assert_eq!(registry.subscribe(42, "100"), None);
        assert_eq!(registry.subscribe(42, "200"), Some("100".to_string()));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.watched_code(42).as_deref(), Some("200"));
        assert_eq!(
            registry.snapshot(),
            vec![Subscription {
                recipient: 42,
                code: "200".to_string()
            }]
        );
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let registry = SubscriptionRegistry::new();
        registry.subscribe(7, "555");
        registry.subscribe(7, "555");
        assert_eq!(registry.len(), 1);
        assert!(registry.is_subscribed(7));
    }

    #[test]
    fn test_unsubscribe_missing_is_noop() {
        let registry = SubscriptionRegistry::new();
        assert_eq!(registry.unsubscribe(1), None);

        registry.subscribe(1, "555");
        assert_eq!(registry.unsubscribe(1), Some("555".to_string()));
        assert!(!registry.is_subscribed(1));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let registry = SubscriptionRegistry::new();
        registry.subscribe(1, "a");
        registry.subscribe(2, "b");

        let snapshot = registry.snapshot();
        registry.unsubscribe(1);
        registry.subscribe(3, "c");

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.iter().any(|s| s.recipient == 1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_subscribers() {
        let registry = Arc::new(SubscriptionRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..100 {
                        registry.subscribe(t * 1000 + i, format!("{i}"));
                        let _ = registry.snapshot();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 800);
    }
}
