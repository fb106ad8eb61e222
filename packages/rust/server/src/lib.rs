//! HTTP surface for installer script delivery.
//!
//! Every handler is stateless apart from the read-only [`AppState`], so
//! requests are served fully in parallel with no locking.

mod changelog;
mod install;

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use simplens_scripts::AssetStore;
use simplens_shared::{AppConfig, Result, ScriptKind, SimplensError};
use simplens_widget::CommandRegistry;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use changelog::parse_front_matter;

/// Read-only state shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub assets: AssetStore,
    pub registry: Arc<CommandRegistry>,
    /// `max-age` for script responses.
    pub cache_max_age_secs: u64,
    pub changelog_path: PathBuf,
}

impl AppState {
    /// Assemble the state once at startup from resolved config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let base_url = config.server.base_url()?;
        Ok(Self {
            assets: AssetStore::new(&config.assets.scripts_dir),
            registry: Arc::new(CommandRegistry::new(&base_url)),
            cache_max_age_secs: config.server.cache_max_age_secs,
            changelog_path: config.content.changelog_path.clone(),
        })
    }
}

/// Build the router.
///
/// Script routes are generated from [`ScriptKind::ALL`], so a route exists
/// exactly for the platforms that have an asset. Each is mounted at
/// `/install/{key}` and at the `/api/install/{key}` path published in the
/// install commands.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/install", get(install::commands))
        .route("/api/install", get(install::commands))
        .route("/api/changelog", get(changelog::changelog));

    for kind in ScriptKind::ALL {
        let key = kind.platform().key();
        let handler = get(move |state: State<Arc<AppState>>, headers: HeaderMap| {
            install::script(state, headers, kind)
        });
        app = app
            .route(&format!("/install/{key}"), handler.clone())
            .route(&format!("/api/install/{key}"), handler);
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| SimplensError::Server(format!("failed to bind {addr}: {e}")))?;

    serve_with_shutdown(listener, state, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener
        .local_addr()
        .map_err(|e| SimplensError::Server(e.to_string()))?;
    info!(addr = %local, "serving installer scripts");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| SimplensError::Server(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub(crate) fn fixture_state() -> Arc<AppState> {
        state_with_assets("../../../fixtures/scripts")
    }

    pub(crate) fn state_with_assets(dir: impl Into<PathBuf>) -> Arc<AppState> {
        let mut config = AppConfig::default();
        config.assets.scripts_dir = dir.into();
        config.content.changelog_path = "../../../fixtures/changelog/changelog.mdx".into();
        Arc::new(AppState::from_config(&config).expect("default config is valid"))
    }
}
