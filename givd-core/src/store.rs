use std::convert::Infallible;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use tokio::sync::mpsc;

use crate::stock::{NewStockItem, StockItem};

/// What happened to the remote table. Events carry no row payload; the
/// listener is expected to re-fetch, not to patch its cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
}

/// A standing change-feed channel handed out by [`StockStore::subscribe`].
///
/// Must be returned to the store via [`StockStore::unsubscribe`] when the
/// owning scope ends; the sender side stays registered otherwise.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl Subscription {
    /// Builds a handle around a receiver. For store implementations.
    pub fn new(id: u64, rx: mpsc::UnboundedReceiver<ChangeEvent>) -> Self {
        Self { id, rx }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the next pending event without waiting.
    pub fn try_next(&mut self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next event. Returns None once the feed is closed.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }
}

/// The remote `stocks` table, seen from the client.
///
/// Implementations own wire format, ordering and id assignment; callers get
/// rows back name-ascending and never mutate them in place. All methods take
/// `&self` so a store can be shared behind one handle.
pub trait StockStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches every row, ordered by name ascending.
    fn list(&self) -> impl Future<Output = Result<Vec<StockItem>, Self::Error>> + Send;

    /// Inserts one record and returns it with the store-assigned id.
    fn insert(
        &self,
        record: NewStockItem,
    ) -> impl Future<Output = Result<StockItem, Self::Error>> + Send;

    /// Opens a change-feed channel covering all event kinds.
    fn subscribe(&self) -> Subscription;

    /// Tears the channel down. Consumes the handle.
    fn unsubscribe(&self, subscription: Subscription);
}

/// An in-memory store backed by a row vector.
///
/// The reference implementation: tests substitute it for the hosted backend,
/// and the demo runs on it when no credentials are configured. Inserts push
/// a real change event to every live subscriber.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<StockItem>>,
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(u64, mpsc::UnboundedSender<ChangeEvent>)>>,
    next_subscription: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with the given rows.
    pub fn with_rows(rows: Vec<StockItem>) -> Self {
        Self {
            rows: RwLock::new(rows),
            ..Self::default()
        }
    }

    /// Number of live change-feed subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }

    fn emit(&self, kind: ChangeKind) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|(_, tx)| tx.send(ChangeEvent { kind }).is_ok());
    }
}

impl StockStore for MemoryStore {
    type Error = Infallible;

    async fn list(&self) -> Result<Vec<StockItem>, Self::Error> {
        let mut rows = self.rows.read().unwrap().clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn insert(&self, record: NewStockItem) -> Result<StockItem, Self::Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let item = record.into_item(format!("mem-{}", id));
        self.rows.write().unwrap().push(item.clone());
        self.emit(ChangeKind::Insert);
        Ok(item)
    }

    fn subscribe(&self) -> Subscription {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push((id, tx));
        Subscription::new(id, rx)
    }

    fn unsubscribe(&self, subscription: Subscription) {
        self.subscribers
            .lock()
            .unwrap()
            .retain(|(id, _)| *id != subscription.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::{Category, fallback_stocks};

    fn record(name: &str) -> NewStockItem {
        NewStockItem::new(name, Category::Food, 5.0, "kg", 2.0)
    }

    #[tokio::test]
    async fn memory_store_lists_rows_name_ascending() {
        let store = MemoryStore::new();
        store.insert(record("Pâtes")).await.unwrap();
        store.insert(record("Beurre")).await.unwrap();
        store.insert(record("Miel")).await.unwrap();

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Beurre", "Miel", "Pâtes"]);
    }

    #[tokio::test]
    async fn memory_store_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.insert(record("Beurre")).await.unwrap();
        let b = store.insert(record("Miel")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn memory_store_seeded_rows_survive_list() {
        let store = MemoryStore::with_rows(fallback_stocks());
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn insert_notifies_every_subscriber() {
        let store = MemoryStore::new();
        let mut first = store.subscribe();
        let mut second = store.subscribe();

        store.insert(record("Beurre")).await.unwrap();

        assert_eq!(
            first.try_next(),
            Some(ChangeEvent {
                kind: ChangeKind::Insert
            })
        );
        assert_eq!(
            second.try_next(),
            Some(ChangeEvent {
                kind: ChangeKind::Insert
            })
        );
        assert_eq!(first.try_next(), None);
    }

    #[tokio::test]
    async fn unsubscribe_removes_the_channel() {
        let store = MemoryStore::new();
        let sub = store.subscribe();
        assert_eq!(store.subscriber_count(), 1);

        store.unsubscribe(sub);
        assert_eq!(store.subscriber_count(), 0);
    }
}
