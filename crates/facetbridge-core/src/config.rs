//! Layered configuration loader.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_SEARCH__INDEX_NAME`). The translation
//! settings live under the `[search]` table.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Error, Result};

pub const DEFAULT_INDEX_NAME: &str = "liferay";
pub const DEFAULT_RANGE_FIELD: &str = "modified-date";
pub const DEFAULT_UNMAPPED_SORT_TYPE: &str = "long";

/// Settings consumed by the search service.
///
/// - `index_name`: index every query targets
/// - `range_field`: inner date field range facets aggregate on
/// - `unmapped_sort_type`: type assumed for sort fields a shard has no mapping for
/// - `default_max_terms`: terms cap for facets that declare none; `None` leaves
///   the engine default in place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    pub index_name: String,
    pub range_field: String,
    pub unmapped_sort_type: String,
    pub default_max_terms: Option<u32>,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            index_name: DEFAULT_INDEX_NAME.to_string(),
            range_field: DEFAULT_RANGE_FIELD.to_string(),
            unmapped_sort_type: DEFAULT_UNMAPPED_SORT_TYPE.to_string(),
            default_max_terms: None,
        }
    }
}

impl BridgeSettings {
    pub fn validate(&self) -> Result<()> {
        if self.index_name.trim().is_empty() {
            return Err(Error::InvalidConfig("search.index_name is empty".to_string()));
        }
        if self.range_field.trim().is_empty() {
            return Err(Error::InvalidConfig("search.range_field is empty".to_string()));
        }
        if self.unmapped_sort_type.trim().is_empty() {
            return Err(Error::InvalidConfig("search.unmapped_sort_type is empty".to_string()));
        }
        if self.default_max_terms == Some(0) {
            return Err(Error::InvalidConfig("search.default_max_terms must be positive".to_string()));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Loads the config files found in `dir` for the environment named by `RUST_ENV`.
    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Ok(Self::for_env(dir, &env_name))
    }

    pub fn for_env(dir: &Path, env_name: &str) -> Self {
        let mut figment = Figment::new().merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extracts and validates the `[search]` table, defaulting when it is absent.
    pub fn settings(&self) -> Result<BridgeSettings> {
        let settings = if self.figment.find_value("search").is_ok() {
            self.figment
                .extract_inner::<BridgeSettings>("search")
                .map_err(|e| Error::InvalidConfig(e.to_string()))?
        } else {
            BridgeSettings::default()
        };
        settings.validate()?;
        Ok(settings)
    }
}
