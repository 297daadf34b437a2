//! Graceful Shutdown Handler
//!
//! Handles OS signals and closes the bean container, running destroy callbacks.

use crate::di::Container;
use std::future::Future;
use std::sync::Arc;
use tokio::signal;

/// Closes a container once a shutdown signal arrives
///
/// # Example
///
/// ```rust,ignore
/// use fnbeans::lifecycle::ShutdownHandler;
///
/// let shutdown_handler = ShutdownHandler::new(Arc::clone(&container));
///
/// tokio::spawn(async move {
///     shutdown_handler.wait_for_shutdown().await;
///     std::process::exit(0);
/// });
/// ```
pub struct ShutdownHandler {
    container: Arc<Container>,
}

impl ShutdownHandler {
    pub fn new(container: Arc<Container>) -> Self {
        Self { container }
    }

    /// Wait for Ctrl+C or SIGTERM, then close the container
    pub async fn wait_for_shutdown(&self) {
        self.shutdown_on(shutdown_signal()).await;
    }

    /// Wait for `trigger` to complete, then close the container
    pub async fn shutdown_on<F: Future<Output = ()>>(&self, trigger: F) {
        trigger.await;
        tracing::info!("Starting graceful shutdown...");
        self.container.close();
        tracing::info!("Graceful shutdown complete");
    }
}

/// Create a future that completes when a shutdown signal is received
///
/// # Example
///
/// ```rust,ignore
/// use fnbeans::lifecycle::shutdown_signal;
///
/// tokio::select! {
///     _ = shutdown_signal() => {
///         println!("Shutdown signal received");
///     }
///     _ = worker.run() => {}
/// }
/// ```
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
