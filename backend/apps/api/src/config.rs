//! API Configuration
//!
//! Everything the server needs at startup, read once from the environment.

use std::net::SocketAddr;

use auth::AuthConfig;
use platform::config::{
    ConfigError, env_or, optional_env, parse_value, required_env, split_list,
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    /// CORS allow-list; defaults to the frontend origin
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl ApiConfig {
    /// Fails on the first missing or malformed variable
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required_env("DATABASE_URL")?;
        let auth = AuthConfig::from_env()?;

        let frontend_origins = frontend_origins(
            optional_env("FRONTEND_ORIGINS").as_deref(),
            &auth.public_base_url,
        );

        Ok(Self {
            database_url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            bind_addr: env_or("BIND_ADDR", default_bind_addr()?)?,
            frontend_origins,
            auth,
        })
    }
}

fn default_bind_addr() -> Result<SocketAddr, ConfigError> {
    parse_value("BIND_ADDR", DEFAULT_BIND_ADDR)
}

fn frontend_origins(raw: Option<&str>, public_base_url: &str) -> Vec<String> {
    match raw.map(split_list) {
        Some(origins) if !origins.is_empty() => origins,
        _ => vec![public_base_url.to_string()],
    }
}
