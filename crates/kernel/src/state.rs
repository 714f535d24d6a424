//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use moka::sync::Cache;
use parking_lot::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::content::{BlockRenderer, EditingSession};
use crate::gateway::PageGateway;
use crate::theme::{ChromeSettings, LayoutEngine, PageComposer};

/// An open editing session. Mutated serially under its mutex.
pub type SharedSession = Arc<Mutex<EditingSession>>;

/// Upper bound on concurrently open editing sessions.
const MAX_EDITOR_SESSIONS: u64 = 1_000;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Document store.
    gateway: Arc<dyn PageGateway>,

    /// Layout engine plus block renderer.
    composer: PageComposer,

    /// Open editing sessions keyed by session id, expired on idle.
    sessions: Cache<Uuid, SharedSession>,

    /// Editor API secret; editor routes are mounted only when set.
    editor_token: Option<String>,
}

impl AppState {
    /// Build state around an already-connected gateway.
    pub fn new(config: &Config, gateway: Arc<dyn PageGateway>) -> Result<Self> {
        let chrome = ChromeSettings {
            site_name: config.site_name.clone(),
            ..ChromeSettings::default()
        };

        let layouts = match &config.template_dir {
            Some(dir) => LayoutEngine::with_template_dir(dir, chrome)
                .with_context(|| format!("failed to load templates from {}", dir.display()))?,
            None => LayoutEngine::new(chrome).context("failed to build layout engine")?,
        };
        let composer = PageComposer::new(layouts, BlockRenderer::new(config.raw_html_policy));

        let sessions = Cache::builder()
            .max_capacity(MAX_EDITOR_SESSIONS)
            .time_to_idle(config.editor_session_idle)
            .build();

        info!(
            store = gateway.backend(),
            raw_html = ?config.raw_html_policy,
            editor = config.editor_token.is_some(),
            "application state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                gateway,
                composer,
                sessions,
                editor_token: config.editor_token.clone(),
            }),
        })
    }

    /// Get the document store.
    pub fn gateway(&self) -> &Arc<dyn PageGateway> {
        &self.inner.gateway
    }

    /// Get the page composer.
    pub fn composer(&self) -> &PageComposer {
        &self.inner.composer
    }

    /// Get the open editing sessions.
    pub fn sessions(&self) -> &Cache<Uuid, SharedSession> {
        &self.inner.sessions
    }

    /// Editor API secret, if the editor is enabled.
    pub fn editor_token(&self) -> Option<&str> {
        self.inner.editor_token.as_deref()
    }

    /// Check if the document store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.inner.gateway.check_health().await
    }

    /// Name of the document store backend.
    pub fn store_kind(&self) -> &'static str {
        self.inner.gateway.backend()
    }
}
