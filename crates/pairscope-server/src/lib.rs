//! HTTP service exposing pairscope analytics.
//!
//! - [`ServerConfig`] - Bind address, port and CORS origins
//! - [`AppState`] - Shared tick store handle
//! - [`router`] - The axum [`Router`](axum::Router) with every route mounted
//! - [`serve`] - Binds and serves until shutdown

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pairscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod routes;
mod state;

pub use config::{DEFAULT_BIND, DEFAULT_CORS_ORIGIN, DEFAULT_PORT, ServerConfig};
pub use error::ApiError;
pub use routes::{AnalyzeQuery, router};
pub use state::AppState;

use std::future::Future;
use tracing::info;

/// Binds to the configured address and serves until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener fails.
pub async fn serve<F>(config: &ServerConfig, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr()?;
    let app = router(state, config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "pairscope API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("pairscope API stopped");
    Ok(())
}
