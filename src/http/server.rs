//! Server setup and per-connection orchestration.
//!
//! # Responsibilities
//! - Hold the configuration and the middleware chain
//! - Bind the listener and run the accept loop until shutdown
//! - Drive each connection through its lifecycle:
//!   receive → parse → completeness check → dispatch → build header → write
//!
//! # Design Decisions
//! - `listen` consumes the Server, so middleware registration is only
//!   possible before the chain starts serving
//! - Each connection runs on its own task with exclusive ownership of its
//!   record; parse-through-write happens without awaiting inside dispatch,
//!   so middleware invocations of different requests never interleave
//! - Write failures are diagnostics only; the connection closes regardless

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::http::header;
use crate::http::middleware::{MiddlewareChain, Next};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::net::connection::{Connection, ConnectionId, ConnectionState};
use crate::net::listener::{ConnectionPermit, Listener, ListenerError};
use tokio::net::TcpStream;

/// Minimal middleware-chaining HTTP server.
///
/// Handlers registered with [`Server::use_handler`] run in registration
/// order for every completed request; each decides whether to invoke the
/// rest of the chain. One request and one response per connection.
pub struct Server {
    config: ServerConfig,
    chain: MiddlewareChain,
}

impl Server {
    /// Create a server with the given configuration and an empty chain.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            chain: MiddlewareChain::new(),
        }
    }

    /// Register a middleware handler. Registration order is execution order
    /// and is fixed once [`Server::listen`] is called.
    pub fn use_handler<F>(&mut self, handler: F)
    where
        F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync + 'static,
    {
        self.chain.add(handler);
    }

    /// Bind and serve until a shutdown signal arrives.
    ///
    /// A bind failure is reported synchronously; the accept loop never
    /// starts. On success this only returns after Ctrl-C.
    pub async fn listen(self) -> Result<(), ListenerError> {
        let listener = Listener::bind(&self.config.listener).await?;
        let chain = Arc::new(self.chain);

        tracing::info!(handlers = chain.len(), "Server started");

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, id, permit)) => {
                            let chain = Arc::clone(&chain);
                            tokio::spawn(async move {
                                handle_connection(stream, id, chain, permit).await;
                            });
                        }
                        Err(e) => {
                            // Accept errors are transient; keep serving.
                            tracing::warn!(error = %e, "Accept failed");
                        }
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Serve one connection: exactly one request, one response, then close.
async fn handle_connection(
    stream: TcpStream,
    id: ConnectionId,
    chain: Arc<MiddlewareChain>,
    _permit: ConnectionPermit,
) {
    let mut conn = Connection::new(id, stream);
    conn.set_state(ConnectionState::Receiving);

    loop {
        match conn.read_some().await {
            Ok(0) => {
                // Peer closed before the request completed: discard silently,
                // no response is attempted.
                tracing::debug!(connection_id = %id, "Peer closed mid-request");
                conn.set_state(ConnectionState::Closed);
                return;
            }
            Ok(_) => {
                if conn.request.is_complete() {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!(connection_id = %id, error = %e, "Read failed");
                conn.set_state(ConnectionState::Closed);
                return;
            }
        }
    }

    conn.set_state(ConnectionState::Dispatching);
    tracing::debug!(
        connection_id = %id,
        method = %conn.request.method,
        url = %conn.request.url,
        "Dispatching request"
    );

    chain.dispatch(&mut conn.request, &mut conn.response);

    // Echo request identity onto the response; handlers may have left the
    // status undecided.
    conn.response.method = conn.request.method.clone();
    conn.response.proto = if conn.request.proto.is_empty() {
        "HTTP/1.1".to_string()
    } else {
        conn.request.proto.clone()
    };
    if conn.response.status == 0 {
        conn.response.status = 200;
    }

    conn.set_state(ConnectionState::Writing);

    match header::build_header(&conn.response) {
        Ok(head) => {
            let payload = format!("{}{}", head, conn.response.body);
            if let Err(e) = conn.write_response(payload.as_bytes()).await {
                // Diagnostic only; the connection is torn down regardless.
                tracing::warn!(connection_id = %id, error = %e, "Write failed");
            }
        }
        Err(e) => {
            tracing::error!(connection_id = %id, error = %e, "Header build failed");
        }
    }

    conn.set_state(ConnectionState::Closed);
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        // Without a signal handler, park forever rather than busy-loop.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
