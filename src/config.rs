use std::env;
use std::net::SocketAddr;

use anyhow::Context;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Hostname or IP literal (v4 or v6) to listen on.
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Reads `HOST` and `PORT`, loading `.env` first if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT value `{raw}`"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup("HOST")
                .map(|h| h.trim().trim_start_matches('[').trim_end_matches(']').to_string())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    /// Resolves `host` to the socket addresses the listener may bind.
    pub async fn bind_addrs(&self) -> anyhow::Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("cannot resolve HOST `{}`", self.host))?
            .collect();
        anyhow::ensure!(!addrs.is_empty(), "HOST `{}` resolved to no address", self.host);
        Ok(addrs)
    }
}
