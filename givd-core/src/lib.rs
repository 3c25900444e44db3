//! Givd core is the stock synchronization engine behind the givd demo
//! dashboard.
//!
//! Core concepts:
//! - **StockItem**: A row of the remote `stocks` table, locally cached
//! - **StockStatus**: The OK/LOW/CRITICAL classification derived from
//!   quantity vs. threshold at write time
//! - **StockDraft**: User input as typed, with string-valued amounts
//! - **StockStore**: The boundary to the remote table (list, insert,
//!   change-feed subscription)
//! - **StockSyncController**: Keeps the local list in sync with the store
//!   and mediates inserts from the presentation layer
//!
//! # Example
//!
//! ```
//! use givd_core::{MemoryStore, StockSyncController};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut controller = StockSyncController::new(MemoryStore::new());
//!
//! // The controller starts from the demo fallback rows and replaces them
//! // only when the store returns something.
//! controller.refresh().await;
//! assert_eq!(controller.items().len(), 2);
//! # });
//! ```

mod controller;
mod draft;
mod stats;
mod stock;
mod store;

pub use controller::{INSERT_FAILED_ALERT, StockSyncController, SubmitStatus, SyncStatus};
pub use draft::StockDraft;
pub use stats::{ConsumptionSample, weekly_consumption};
pub use stock::{Category, NewStockItem, StockItem, StockStatus, fallback_stocks};
pub use store::{ChangeEvent, ChangeKind, MemoryStore, StockStore, Subscription};
