//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use showreel_catalog::Catalog;
use showreel_catalog::application::ingest::{bundled_portfolio, ingest_file};
use showreel_playback::application::player::PlayerConfig;
use tracing::info;

use crate::error::AppError;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to bind (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// Port to bind (`PORT`, default `3000`).
    pub port: u16,
    /// Catalog file (`SHOWREEL_CATALOG`); the bundled portfolio when unset.
    pub catalog_path: Option<PathBuf>,
    /// Per-subscriber event buffer (`SHOWREEL_EVENT_CAPACITY`, default 64).
    pub event_capacity: usize,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but malformed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = PlayerConfig::default();
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("PORT")
            .map(|raw| {
                raw.parse::<u16>()
                    .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))
            })
            .transpose()?
            .unwrap_or(3000);
        let catalog_path = lookup("SHOWREEL_CATALOG")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);
        let event_capacity = match lookup("SHOWREEL_EVENT_CAPACITY") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    return Err(AppError::Config(format!(
                        "SHOWREEL_EVENT_CAPACITY must be a positive integer, got {raw:?}"
                    )));
                }
            },
            None => defaults.event_capacity,
        };

        Ok(Self {
            host,
            port,
            catalog_path,
            event_capacity,
        })
    }

    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// Player settings derived from this configuration.
    #[must_use]
    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            event_capacity: self.event_capacity,
            ..PlayerConfig::default()
        }
    }

    /// Loads the configured catalog, or the bundled portfolio.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if the catalog cannot be read or is
    /// invalid.
    pub fn load_catalog(&self) -> Result<Catalog, AppError> {
        let catalog = match &self.catalog_path {
            Some(path) => ingest_file(path)?,
            None => {
                info!("loading bundled portfolio catalog");
                bundled_portfolio()?
            }
        };
        Ok(catalog)
    }
}
