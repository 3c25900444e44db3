use std::path::PathBuf;

use serde::Deserialize;

use crate::error::GivdError;
use crate::store::StoreType;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub r#type: StoreType,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("givd").join("config.toml"))
}

pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    let Ok(content) = std::fs::read_to_string(path) else {
        return Config::default();
    };

    toml::from_str(&content).unwrap_or_default()
}

/// Resolves the Supabase project URL and anon key: CLI flags first, then
/// environment, then the config file.
pub fn load_credentials(
    cli_url: Option<String>,
    cli_key: Option<String>,
) -> Result<(String, String), GivdError> {
    let config = load_config();

    let url = cli_url
        .or_else(|| non_empty_env("GIVD_SUPABASE_URL"))
        .or(config.supabase_url)
        .filter(|v| !v.is_empty());
    let key = cli_key
        .or_else(|| non_empty_env("GIVD_SUPABASE_KEY"))
        .or(config.supabase_anon_key)
        .filter(|v| !v.is_empty());

    match (url, key) {
        (Some(url), Some(key)) => Ok((url, key)),
        _ => Err(GivdError::CredentialsNotFound),
    }
}

pub fn resolve_store_type(cli_type: Option<StoreType>) -> StoreType {
    cli_type.unwrap_or(load_config().store.r#type)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
