//! Shared cart-count state.

use std::sync::Arc;

use tokio::sync::watch;

/// Observable cart count shared across the whole client.
///
/// Clones share the same value. Readers either poll [`count`](Self::count)
/// or [`subscribe`](Self::subscribe) to be woken on change. The count lives
/// for the process; nothing persists it.
#[derive(Debug, Clone)]
pub struct CartCounter {
    tx: Arc<watch::Sender<u32>>,
}

impl CartCounter {
    /// Create a counter starting at `initial`.
    #[must_use]
    pub fn new(initial: u32) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Current count.
    #[must_use]
    pub fn count(&self) -> u32 {
        *self.tx.borrow()
    }

    /// Add one and return the new count.
    pub fn increment(&self) -> u32 {
        self.tx.send_modify(|count| *count = count.saturating_add(1));
        self.count()
    }

    /// Overwrite the count, e.g. after reading the server-side cart.
    pub fn set(&self, count: u32) {
        self.tx.send_replace(count);
    }

    /// Receive change notifications.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.tx.subscribe()
    }
}

impl Default for CartCounter {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let counter = CartCounter::default();
        let badge = counter.clone();

        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(badge.count(), 2);

        badge.set(7);
        assert_eq!(counter.count(), 7);
    }

    #[test]
    fn test_saturates() {
        let counter = CartCounter::new(u32::MAX);
        assert_eq!(counter.increment(), u32::MAX);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let counter = CartCounter::default();
        let mut rx = counter.subscribe();

        counter.increment();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 1);
    }
}
