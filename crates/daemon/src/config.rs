//! Daemon configuration, read once from the environment at start.

use anyhow::{bail, Context, Result};
use cmdrelay_api_rpc::server::DEFAULT_RPC_PORT;
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "~/.cmdrelay/relay.db";
const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, PartialEq)]
pub struct RelayConfig {
    pub db_path: String,
    pub telegram_token: Option<String>,
    pub telegram_api_url: String,
    pub poll_timeout_secs: u64,
    pub rpc_enabled: bool,
    pub rpc_port: u16,
    pub log_format: LogFormat,
    pub log_dir: Option<PathBuf>,
}

// Keep the token out of startup logs
impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("db_path", &self.db_path)
            .field("telegram_token", &self.telegram_token.as_ref().map(|_| "<redacted>"))
            .field("telegram_api_url", &self.telegram_api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("rpc_enabled", &self.rpc_enabled)
            .field("rpc_port", &self.rpc_port)
            .field("log_format", &self.log_format)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    ///
    /// Unset and blank variables take their defaults; malformed values fail.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = get("CMDRELAY_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let db_path = shellexpand::tilde(&db_path).into_owned();

        let poll_timeout_secs = match get("CMDRELAY_POLL_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("CMDRELAY_POLL_TIMEOUT_SECS is not a number: {raw}"))?,
            None => DEFAULT_POLL_TIMEOUT_SECS,
        };

        let rpc_enabled = match get("CMDRELAY_RPC_ENABLED") {
            Some(raw) => parse_bool("CMDRELAY_RPC_ENABLED", &raw)?,
            None => false,
        };

        let rpc_port = match get("CMDRELAY_RPC_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("CMDRELAY_RPC_PORT is not a valid port: {raw}"))?,
            None => DEFAULT_RPC_PORT,
        };

        let log_format = match get("CMDRELAY_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => bail!("CMDRELAY_LOG_FORMAT must be 'pretty' or 'json', got '{other}'"),
        };

        let log_dir = get("CMDRELAY_LOG_DIR")
            .map(|dir| PathBuf::from(shellexpand::tilde(dir.trim()).into_owned()));

        Ok(Self {
            db_path,
            telegram_token: get("CMDRELAY_TELEGRAM_TOKEN"),
            telegram_api_url: get("CMDRELAY_TELEGRAM_API_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            poll_timeout_secs,
            rpc_enabled,
            rpc_port,
            log_format,
            log_dir,
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{key} must be a boolean, got '{raw}'"),
    }
}
