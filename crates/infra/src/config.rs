//! Service configuration loaded from environment variables.

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("STORE_BACKEND=postgres requires DATABASE_URL")]
    MissingDatabaseUrl,
}

/// Where product documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub store: StoreBackend,
    /// Allowed CORS origin; any origin when unset.
    pub cors_origin: Option<String>,
    /// Seed the store from this file at startup.
    pub seed_file: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            store: StoreBackend::Memory,
            cors_origin: None,
            seed_file: None,
        }
    }
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = match var("STORE_BACKEND").as_deref().map(str::trim) {
            None => StoreBackend::Memory,
            Some(b) if b.eq_ignore_ascii_case("memory") => StoreBackend::Memory,
            Some(b) if b.eq_ignore_ascii_case("postgres") => StoreBackend::Postgres {
                database_url: var("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?,
            },
            Some(other) => {
                warn!(value = other, "unknown STORE_BACKEND, using memory");
                StoreBackend::Memory
            }
        };

        Ok(Self {
            bind_addr: parse_or("BIND_ADDR", var("BIND_ADDR"), defaults.bind_addr),
            port: parse_or("PORT", var("PORT"), defaults.port),
            store,
            cors_origin: var("CORS_ORIGIN"),
            seed_file: var("SEED_FILE").map(PathBuf::from),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw {
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
    }
}
