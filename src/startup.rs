//! Startup helpers for the parlance binaries.

use std::process::ExitCode;
use std::sync::Arc;

use crate::chat::config::ChatConfig;
use crate::chat::errors::ChatResult;
use crate::server::{self, AppState};

/// Initialize the tracing subscriber with an INFO default.
///
/// `RUST_LOG` refines the filter as usual.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();
}

/// Load `.env` if present, then read configuration from the environment.
///
/// # Errors
/// Returns an error if the configuration fails validation.
pub fn load_config() -> ChatResult<ChatConfig> {
    dotenvy::dotenv().ok();
    ChatConfig::from_env()
}

/// Initialize application state without starting the server.
///
/// # Errors
/// Returns an error if configuration loading or state creation fails.
pub fn initialize() -> ChatResult<Arc<AppState>> {
    let config = load_config()?;
    if let Some(base_url) = &config.llm.base_url {
        tracing::info!("Ollama endpoint: {base_url}");
    }
    AppState::new(config)
}

/// Run the server (used by the `parlance-server` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();

    tracing::info!("Starting parlance v{}", env!("CARGO_PKG_VERSION"));

    let state = match initialize() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to create state: {e}");
            return ExitCode::from(1);
        }
    };

    let port = state.config.server.port;

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(server::run_server(state, port)) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}
