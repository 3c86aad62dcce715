use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Server settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub db_readers: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SOCIAL_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("SOCIAL_PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .context("SOCIAL_PORT must be a port number")?;
        let db_path: PathBuf = lookup("SOCIAL_DB_PATH")
            .unwrap_or_else(|| "social.db".into())
            .into();
        let db_readers: usize = lookup("SOCIAL_DB_READERS")
            .unwrap_or_else(|| "4".into())
            .parse()
            .context("SOCIAL_DB_READERS must be a non-negative integer")?;

        Ok(Self {
            host,
            port,
            db_path,
            db_readers,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
