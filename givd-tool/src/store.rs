use std::convert::Infallible;

use serde::Deserialize;
use thiserror::Error;

use givd_core::{
    MemoryStore, NewStockItem, StockItem, StockStore, Subscription, fallback_stocks,
};
use givd_supabase::{SupabaseClient, SupabaseError, SupabaseStore};

use crate::config::load_credentials;
use crate::error::GivdError;

#[derive(Debug, Error)]
pub enum AnyStoreError {
    #[error("memory store error: {0}")]
    Memory(#[from] Infallible),
    #[error("supabase error: {0}")]
    Supabase(#[from] SupabaseError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    Memory,
    Supabase,
}

impl std::str::FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "demo" => Ok(StoreType::Memory),
            "supabase" => Ok(StoreType::Supabase),
            _ => Err(format!("unknown store type: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::Memory => write!(f, "memory"),
            StoreType::Supabase => write!(f, "supabase"),
        }
    }
}

pub enum AnyStore {
    Memory(MemoryStore),
    Supabase(SupabaseStore),
}

impl AnyStore {
    /// Opens the selected backend. The memory backend is pre-seeded with the
    /// demo rows so the tool works without any configuration; the supabase
    /// backend needs credentials from the CLI, the environment or the config
    /// file.
    pub fn open(
        store_type: StoreType,
        cli_url: Option<String>,
        cli_key: Option<String>,
    ) -> Result<Self, GivdError> {
        match store_type {
            StoreType::Memory => Ok(Self::Memory(MemoryStore::with_rows(fallback_stocks()))),
            StoreType::Supabase => {
                let (url, key) = load_credentials(cli_url, cli_key)?;
                Ok(Self::Supabase(SupabaseStore::new(SupabaseClient::new(
                    url, key,
                ))))
            }
        }
    }
}

impl StockStore for AnyStore {
    type Error = AnyStoreError;

    async fn list(&self) -> Result<Vec<StockItem>, Self::Error> {
        match self {
            AnyStore::Memory(s) => s.list().await.map_err(Into::into),
            AnyStore::Supabase(s) => s.list().await.map_err(Into::into),
        }
    }

    async fn insert(&self, record: NewStockItem) -> Result<StockItem, Self::Error> {
        match self {
            AnyStore::Memory(s) => s.insert(record).await.map_err(Into::into),
            AnyStore::Supabase(s) => s.insert(record).await.map_err(Into::into),
        }
    }

    fn subscribe(&self) -> Subscription {
        match self {
            AnyStore::Memory(s) => s.subscribe(),
            AnyStore::Supabase(s) => s.subscribe(),
        }
    }

    fn unsubscribe(&self, subscription: Subscription) {
        match self {
            AnyStore::Memory(s) => s.unsubscribe(subscription),
            AnyStore::Supabase(s) => s.unsubscribe(subscription),
        }
    }
}
