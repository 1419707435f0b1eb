use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;
use tracing::Level;
use url::Url;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} should be set")]
    Missing(&'static str),

    #[error("LOG_LEVEL '{0}' is not a valid level")]
    LogLevel(String),

    #[error("NGROK_URL can't be parsed: {0}")]
    WebhookUrl(#[from] url::ParseError),

    #[error("NGROK_ADDR can't be parsed: {0}")]
    WebhookAddr(#[from] AddrParseError),

    #[error("NGROK_URL and NGROK_ADDR must be set together")]
    PartialWebhook,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: Url,
    pub addr: SocketAddr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub teloxide_token: String,
    /// `None` keeps progress in memory only.
    pub database_url: Option<String>,
    pub log_level: Level,
    /// `None` means long polling.
    pub webhook: Option<WebhookConfig>,
}

impl Config {
    /// Reads the process environment after loading `.env`, if there is one.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let teloxide_token = var("TELOXIDE_TOKEN").ok_or(ConfigError::Missing("TELOXIDE_TOKEN"))?;

        let log_level = match var("LOG_LEVEL") {
            Some(level) => level
                .trim()
                .parse::<Level>()
                .map_err(|_| ConfigError::LogLevel(level))?,
            None => Level::ERROR,
        };

        let webhook = match (var("NGROK_URL"), var("NGROK_ADDR")) {
            (Some(url), Some(addr)) => Some(WebhookConfig {
                url: url.trim().parse()?,
                addr: addr.trim().parse()?,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialWebhook),
        };

        Ok(Self {
            teloxide_token,
            database_url: var("DATABASE_URL"),
            log_level,
            webhook,
        })
    }
}
