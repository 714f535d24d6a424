//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::content::RawHtmlPolicy;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL. When None, documents live in memory.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Shared secret for the editor API. When None, editor routes are not mounted.
    pub editor_token: Option<String>,

    /// How `html` blocks are emitted (default: sanitize).
    pub raw_html_policy: RawHtmlPolicy,

    /// Site name shown in page titles (default: "Folio").
    pub site_name: String,

    /// Directory of layout template overrides. When None, built-ins only.
    pub template_dir: Option<PathBuf>,

    /// Idle time before an open editing session is dropped (default: 1800s).
    pub editor_session_idle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            database_max_connections: 10,
            editor_token: None,
            raw_html_policy: RawHtmlPolicy::default(),
            site_name: "Folio".to_string(),
            template_dir: None,
            editor_session_idle: Duration::from_secs(1800),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url = non_empty_var("DATABASE_URL");

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let editor_token = non_empty_var("EDITOR_TOKEN");

        let raw_html_policy = env::var("RAW_HTML_POLICY")
            .unwrap_or_else(|_| "sanitize".to_string())
            .parse::<RawHtmlPolicy>()
            .map_err(anyhow::Error::msg)
            .context("RAW_HTML_POLICY must be 'sanitize' or 'trusted'")?;

        let site_name = env::var("SITE_NAME").unwrap_or_else(|_| "Folio".to_string());

        let template_dir = non_empty_var("TEMPLATE_DIR").map(PathBuf::from);

        let editor_session_idle = env::var("EDITOR_SESSION_IDLE_SECS")
            .unwrap_or_else(|_| "1800".to_string())
            .parse()
            .map(Duration::from_secs)
            .context("EDITOR_SESSION_IDLE_SECS must be a valid u64")?;

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            editor_token,
            raw_html_policy,
            site_name,
            template_dir,
            editor_session_idle,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
