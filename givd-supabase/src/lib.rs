//! Supabase-backed [`StockStore`](givd_core::StockStore) for the givd demo.
//!
//! `SupabaseClient` is the thin HTTP layer (table rows + magic-link
//! sign-in); `SupabaseStore` plugs it into the core store boundary and adds
//! the fingerprint-polled change feed.

mod client;
mod error;
mod store;

pub use client::SupabaseClient;
pub use error::SupabaseError;
pub use store::{STOCKS_TABLE, SupabaseStore};
