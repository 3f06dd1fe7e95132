//! HTTP server startup with bounded graceful shutdown.

use std::future::{Future, IntoFuture};
use std::io;
use std::pin::pin;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::server::lifecycle::serve_with_shutdown;
use crate::server::{Result, ServerError, shutdown_signal};
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Starts an HTTP server and runs it until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if:
/// - Server configuration is invalid
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve_http(app: Router, server_config: &ServerConfig) -> Result<()> {
    if let Err(validation_error) = server_config.validate() {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            error = %validation_error,
            "Invalid server configuration"
        );

        return Err(ServerError::invalid_config(&validation_error));
    }

    let server_addr = server_config.server_addr();
    let listener = match TcpListener::bind(server_addr).await {
        Ok(listener) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_STARTUP,
                addr = %server_addr,
                "Successfully bound to address"
            );
            listener
        }
        Err(listener_err) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_STARTUP,
                addr = %server_addr,
                error = %listener_err,
                "Failed to bind to address"
            );
            return Err(ServerError::bind_error(server_addr, listener_err));
        }
    };

    let shutdown_timeout = server_config.shutdown_timeout();
    serve_with_shutdown(server_config, || {
        serve_listener(listener, app, shutdown_timeout, shutdown_signal())
    })
    .await
}

/// Serves `app` on `listener` until `signal` resolves.
///
/// Once the signal fires the listener stops accepting connections. In-flight
/// requests get `shutdown_timeout` to finish; whatever is still running after
/// that is abandoned and the function returns.
pub(crate) async fn serve_listener<F>(
    listener: TcpListener,
    app: Router,
    shutdown_timeout: Duration,
    signal: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let shutdown = CancellationToken::new();
    let graceful = shutdown.clone();

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        signal.await;
        graceful.cancel();
    });
    let mut server = pin!(server.into_future());

    tokio::select! {
        result = &mut server => return result,
        () = shutdown.cancelled() => {}
    }

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        timeout_secs = shutdown_timeout.as_secs(),
        "Graceful shutdown initiated, draining in-flight requests"
    );

    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                timeout_secs = shutdown_timeout.as_secs(),
                "Shutdown timeout elapsed, abandoning in-flight requests"
            );
            Ok(())
        }
    }
}
