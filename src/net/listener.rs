//! TCP listener implementation with backpressure.
//!
//! # Responsibilities
//! - Bind to the configured address and port
//! - Accept incoming TCP connections and assign connection IDs
//! - Enforce max_connections limit via semaphore
//! - Graceful handling of accept errors

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::config::ListenerConfig;
use crate::net::connection::ConnectionId;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Failed to bind to address (port unavailable or address invalid).
    Bind(std::io::Error),
    /// Failed to accept connection.
    Accept(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Bind(e) => write!(f, "Failed to bind: {}", e),
            ListenerError::Accept(e) => write!(f, "Failed to accept: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {}

/// Resolve the configured address string; `"any"` is the unspecified address.
fn resolve_address(address: &str) -> Result<IpAddr, ListenerError> {
    if address == "any" {
        return Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
    address.parse().map_err(|e| {
        ListenerError::Bind(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    })
}

/// A bounded TCP listener that limits concurrent connections.
///
/// Uses a semaphore to enforce `max_connections`. When the limit is reached,
/// new connections wait until a slot becomes available.
pub struct Listener {
    /// The underlying TCP listener.
    inner: TcpListener,
    /// Semaphore to limit concurrent connections.
    connection_limit: Arc<Semaphore>,
}

impl Listener {
    /// Bind to the configured address with connection limits.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let addr = SocketAddr::new(resolve_address(&config.address)?, config.port);

        let listener = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;

        let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(
            address = %local_addr,
            max_connections = config.max_connections,
            "Listener bound"
        );

        Ok(Self {
            inner: listener,
            connection_limit: Arc::new(Semaphore::new(config.max_connections)),
        })
    }

    /// Accept a new connection, respecting the connection limit.
    ///
    /// Returns the stream, a fresh connection ID, and a permit that must be
    /// held for the connection's lifetime.
    pub async fn accept(
        &self,
    ) -> Result<(TcpStream, ConnectionId, ConnectionPermit), ListenerError> {
        // Acquire permit first (backpressure)
        let permit = self
            .connection_limit
            .clone()
            .acquire_owned()
            .await
            .expect("Semaphore closed unexpectedly");

        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;
        let id = ConnectionId::new();

        tracing::debug!(
            connection_id = %id,
            peer_addr = %addr,
            available_permits = self.connection_limit.available_permits(),
            "Connection accepted"
        );

        Ok((stream, id, ConnectionPermit { _permit: permit }))
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }
}

/// A permit representing a connection slot.
///
/// When dropped, the connection slot is released back to the pool.
#[derive(Debug)]
pub struct ConnectionPermit {
    _permit: tokio::sync::OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_maps_to_unspecified() {
        assert_eq!(
            resolve_address("any").unwrap(),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }

    #[test]
    fn bogus_address_is_bind_error() {
        assert!(matches!(
            resolve_address("not-an-ip"),
            Err(ListenerError::Bind(_))
        ));
    }

    #[tokio::test]
    async fn bind_failure_reported_synchronously() {
        let first = Listener::bind(&ListenerConfig {
            address: "127.0.0.1".to_string(),
            port: 0,
            max_connections: 4,
        })
        .await
        .unwrap();
        let taken = first.local_addr().unwrap().port();

        let err = Listener::bind(&ListenerConfig {
            address: "127.0.0.1".to_string(),
            port: taken,
            max_connections: 4,
        })
        .await;
        assert!(matches!(err, Err(ListenerError::Bind(_))));
    }
}
