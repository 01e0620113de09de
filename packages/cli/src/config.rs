// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Port, bind address, data directory, CORS origin, and optional UI bundle

use axum::http::HeaderValue;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

use taskbook_config::constants::{
    PORT, TASKBOOK_CORS_ORIGIN, TASKBOOK_DATA_DIR, TASKBOOK_HOST, TASKBOOK_PORT, TASKBOOK_UI_DIR,
};
use taskbook_core::DEFAULT_DATA_DIR;

pub const DEFAULT_PORT: u16 = 3001;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub host: IpAddr,
    pub data_dir: PathBuf,
    /// `*` allows any origin
    pub cors_origin: String,
    /// Built client served at `/` when set
    pub ui_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get(TASKBOOK_PORT).or_else(|| get(PORT)) {
            Some(raw) => raw.trim().parse::<u16>()?,
            None => DEFAULT_PORT,
        };
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host = match get(TASKBOOK_HOST) {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(raw.clone()))?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let data_dir = get(TASKBOOK_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let cors_origin = get(TASKBOOK_CORS_ORIGIN).unwrap_or_else(|| "*".to_string());
        if cors_origin != "*" && HeaderValue::from_str(&cors_origin).is_err() {
            return Err(ConfigError::InvalidCorsOrigin(cors_origin));
        }

        let ui_dir = get(TASKBOOK_UI_DIR).map(PathBuf::from);

        Ok(Config {
            port,
            host,
            data_dir,
            cors_origin,
            ui_dir,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
