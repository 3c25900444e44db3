use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use givd_core::{ChangeEvent, ChangeKind, NewStockItem, StockItem, StockStore, Subscription};

use crate::client::SupabaseClient;
use crate::error::SupabaseError;

/// The table the product stores its rows in.
pub const STOCKS_TABLE: &str = "stocks";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// [`StockStore`] over a hosted Supabase table.
///
/// Rows go over `/rest/v1`; the change feed is driven by a background task
/// that fingerprints the table body on an interval and emits one coarse
/// Update event per observed change. The realtime websocket protocol lives
/// in the vendor SDK and is not spoken here; at this boundary a feed event
/// means "re-fetch", so interval detection delivers the same contract with
/// latency bounded by the interval.
///
/// Subscribing must happen inside a Tokio runtime: the poller starts with
/// the first subscriber and stops when the last one unsubscribes.
pub struct SupabaseStore {
    client: Arc<SupabaseClient>,
    table: String,
    poll_interval: Duration,
    feed: Arc<Mutex<FeedState>>,
    next_subscription: AtomicU64,
}

#[derive(Default)]
struct FeedState {
    subscribers: Vec<(u64, mpsc::UnboundedSender<ChangeEvent>)>,
    poller: Option<JoinHandle<()>>,
}

impl SupabaseStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self::with_table(client, STOCKS_TABLE)
    }

    pub fn with_table(client: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            table: table.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            feed: Arc::new(Mutex::new(FeedState::default())),
            next_subscription: AtomicU64::new(0),
        }
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn spawn_poller(&self) -> JoinHandle<()> {
        let client = Arc::clone(&self.client);
        let table = self.table.clone();
        let interval = self.poll_interval;
        let feed = Arc::clone(&self.feed);

        tokio::spawn(async move {
            let mut fingerprint: Option<blake3::Hash> = None;
            loop {
                tokio::time::sleep(interval).await;

                let rows = match client.select_all::<serde_json::Value>(&table, "name").await {
                    Ok(rows) => rows,
                    Err(error) => {
                        debug!(%error, "change poll failed");
                        continue;
                    }
                };
                let Ok(digest) = table_fingerprint(&rows) else {
                    continue;
                };

                // The first poll only establishes the baseline.
                let changed = fingerprint.is_some_and(|previous| previous != digest);
                fingerprint = Some(digest);
                if changed {
                    debug!("table fingerprint changed, notifying subscribers");
                    let mut feed = feed.lock().unwrap();
                    feed.subscribers.retain(|(_, tx)| {
                        tx.send(ChangeEvent {
                            kind: ChangeKind::Update,
                        })
                        .is_ok()
                    });
                }
            }
        })
    }
}

impl StockStore for SupabaseStore {
    type Error = SupabaseError;

    async fn list(&self) -> Result<Vec<StockItem>, Self::Error> {
        self.client.select_all(&self.table, "name").await
    }

    async fn insert(&self, record: NewStockItem) -> Result<StockItem, Self::Error> {
        self.client.insert_one(&self.table, &record).await
    }

    fn subscribe(&self) -> Subscription {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = mpsc::unbounded_channel();

        let mut feed = self.feed.lock().unwrap();
        feed.subscribers.push((id, tx));
        if feed.poller.is_none() {
            feed.poller = Some(self.spawn_poller());
        }

        Subscription::new(id, rx)
    }

    fn unsubscribe(&self, subscription: Subscription) {
        let mut feed = self.feed.lock().unwrap();
        feed.subscribers.retain(|(id, _)| *id != subscription.id());
        if feed.subscribers.is_empty() {
            if let Some(poller) = feed.poller.take() {
                poller.abort();
            }
        }
    }
}

impl Drop for SupabaseStore {
    fn drop(&mut self) {
        if let Some(poller) = self.feed.lock().unwrap().poller.take() {
            poller.abort();
        }
    }
}

fn table_fingerprint(rows: &[serde_json::Value]) -> Result<blake3::Hash, serde_json::Error> {
    Ok(blake3::hash(&serde_json::to_vec(rows)?))
}
