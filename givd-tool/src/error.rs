use thiserror::Error;

use crate::store::AnyStoreError;

#[derive(Debug, Error)]
pub enum GivdError {
    #[error(
        "Supabase credentials not found. Set GIVD_SUPABASE_URL / GIVD_SUPABASE_KEY or configure ~/.config/givd/config.toml"
    )]
    CredentialsNotFound,

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] AnyStoreError),

    #[error("Supabase error: {0}")]
    Supabase(#[from] givd_supabase::SupabaseError),
}
