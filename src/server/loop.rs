// Server loop module
// Accepts connections until shutdown, then drains in-flight connections

use hyper_util::server::graceful::GracefulShutdown;
use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop until `shutdown` resolves.
///
/// On shutdown the listener is dropped first, so the port is released
/// before waiting on open connections. Connections still busy after
/// `performance.shutdown_timeout` seconds are abandoned.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &graceful);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_shutdown_started(state.active_connections.load(Ordering::SeqCst));

    let timeout = Duration::from_secs(state.config.performance.shutdown_timeout);
    tokio::select! {
        _ = graceful.shutdown() => {}
        _ = tokio::time::sleep(timeout) => {
            logger::log_warning(&format!(
                "Shutdown timed out after {}s with {} connection(s) still open",
                timeout.as_secs(),
                state.active_connections.load(Ordering::SeqCst)
            ));
        }
    }
}
