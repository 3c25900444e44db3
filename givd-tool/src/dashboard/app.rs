use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;

use givd_core::{
    Category, ConsumptionSample, StockDraft, StockItem, StockSyncController, weekly_consumption,
};

use crate::store::AnyStore;

type Controller = StockSyncController<AnyStore>;

const CHANGE_PUMP_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Stock,
    Stats,
}

/// The demo dashboard: a fake app window over the sync controller.
///
/// The controller sits behind an async mutex so store calls can run in
/// spawned tasks without freezing the draw loop; the loop reads a snapshot
/// of the observable state each tick (skipping ticks where a task holds the
/// lock) and oneshot receivers signal settlement, so the spinner and the
/// insert guard track the real in-flight operations.
pub struct DashboardApp {
    pub tab: Tab,
    pub should_quit: bool,
    pub controller: Arc<Mutex<Controller>>,

    // Snapshot of the controller's observable state for rendering.
    pub items: Vec<StockItem>,
    pub alert: Option<String>,
    pub live: bool,

    pub consumption: Vec<ConsumptionSample>,
    pub scroll: u16,
    inserted: u32,
    refresh_rx: Option<oneshot::Receiver<()>>,
    submit_rx: Option<oneshot::Receiver<bool>>,
    change_pump: Option<JoinHandle<()>>,
}

impl DashboardApp {
    pub fn new(mut controller: Controller) -> Self {
        controller.subscribe_to_changes();
        let items = controller.items().to_vec();
        let controller = Arc::new(Mutex::new(controller));

        // Drain the change feed while the dashboard is open; each event
        // refreshes the list.
        let change_pump = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(CHANGE_PUMP_INTERVAL).await;
                    controller.lock().await.pump_changes().await;
                }
            })
        };

        let mut app = Self {
            tab: Tab::Stock,
            should_quit: false,
            controller,
            items,
            alert: None,
            live: true,
            consumption: weekly_consumption(),
            scroll: 0,
            inserted: 0,
            refresh_rx: None,
            submit_rx: None,
            change_pump: Some(change_pump),
        };

        // Fetch on mount.
        app.start_refresh();
        app
    }

    /// True while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.refresh_rx.is_some()
    }

    /// True while an insert is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submit_rx.is_some()
    }

    pub fn alert_count(&self) -> usize {
        self.items.iter().filter(|i| i.status.is_alert()).count()
    }

    pub fn start_refresh(&mut self) {
        if self.refresh_rx.is_some() {
            return;
        }

        let (tx, rx) = oneshot::channel();
        let controller = Arc::clone(&self.controller);
        tokio::spawn(async move {
            controller.lock().await.refresh().await;
            let _ = tx.send(());
        });
        self.refresh_rx = Some(rx);
    }

    /// Inserts a numbered demo product. Inert while a submit is already in
    /// flight.
    pub fn start_test_insert(&mut self) {
        if self.submit_rx.is_some() {
            return;
        }

        self.inserted += 1;
        let draft = StockDraft {
            name: format!("Produit Test {}", self.inserted),
            category: Category::Food,
            quantity: "1".to_string(),
            unit: "kg".to_string(),
            threshold: "1".to_string(),
        };

        let (tx, rx) = oneshot::channel();
        let controller = Arc::clone(&self.controller);
        tokio::spawn(async move {
            let accepted = controller.lock().await.submit(&draft).await.is_ok();
            let _ = tx.send(accepted);
        });
        self.submit_rx = Some(rx);
    }

    pub fn dismiss_alert(&mut self) {
        if let Ok(mut controller) = self.controller.try_lock() {
            controller.clear_alert();
        }
        self.alert = None;
    }

    /// One tick of housekeeping: settle finished operations and snapshot
    /// the controller state.
    pub fn poll(&mut self) {
        if let Some(rx) = &mut self.refresh_rx {
            match rx.try_recv() {
                Ok(()) => self.refresh_rx = None,
                Err(oneshot::error::TryRecvError::Empty) => {
                    // Still waiting
                }
                Err(oneshot::error::TryRecvError::Closed) => self.refresh_rx = None,
            }
        }
        if let Some(rx) = &mut self.submit_rx {
            match rx.try_recv() {
                Ok(_accepted) => self.submit_rx = None,
                Err(oneshot::error::TryRecvError::Empty) => {
                    // Still waiting
                }
                Err(oneshot::error::TryRecvError::Closed) => self.submit_rx = None,
            }
        }

        if let Ok(controller) = self.controller.try_lock() {
            self.items = controller.items().to_vec();
            self.alert = controller.alert().map(String::from);
            self.live = controller.is_live();
        }
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            Tab::Stock => Tab::Stats,
            Tab::Stats => Tab::Stock,
        };
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    /// Stops the change pump and releases the feed subscription.
    pub async fn shutdown(&mut self) {
        if let Some(pump) = self.change_pump.take() {
            pump.abort();
        }
        self.controller.lock().await.unsubscribe_from_changes();
        self.live = false;
    }
}
