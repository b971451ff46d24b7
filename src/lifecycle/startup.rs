//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and metrics from configuration
//! - Build the server (composition root) before binding
//! - Bind the listener last and serve until a signal arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds only once every collaborator is built

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals::shutdown_signal, Shutdown};
use crate::observability::{logging, metrics};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Start the service and block until it has shut down.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "account-lookup starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let mut server_task = tokio::spawn(server.run(listener, server_shutdown));

    let joined = tokio::select! {
        _ = shutdown_signal() => {
            shutdown.trigger();
            server_task.await
        }
        joined = &mut server_task => joined,
    };

    match joined {
        Ok(result) => result.map_err(StartupError::Serve)?,
        Err(e) => tracing::error!(error = %e, "Server task panicked"),
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
