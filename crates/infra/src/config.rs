//! Service configuration loaded from the environment.

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBindAddr { var: &'static str, value: String },

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} is set but blank")]
    Blank { var: &'static str },

    #[error("{var} must be set when DATABASE_URL is set")]
    Missing { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub jwt_secret: String,
    /// Postgres connection string; `None` selects the in-memory back end.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub database_max_connections: u32,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Blank { var: "DATABASE_URL" });
            }
            other => other,
        };

        // The dev secret is only accepted by the in-memory back end.
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ if database_url.is_some() => {
                return Err(ConfigError::Missing { var: "JWT_SECRET" });
            }
            _ => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let bind_value = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr {
                var: "BIND_ADDR",
                value: bind_value.clone(),
            })?;

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(value) => match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: "DATABASE_MAX_CONNECTIONS",
                        value,
                    });
                }
            },
        };

        Ok(Self {
            jwt_secret,
            database_url,
            bind_addr,
            database_max_connections,
        })
    }
}
