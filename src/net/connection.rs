//! Connection record and lifecycle state machine.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Own the socket, Request, and Response for one accepted connection
//! - Track lifecycle state (Accepted → Receiving → Dispatching → Writing → Closed)
//! - Append incoming bytes and drive the parser

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::http::parser;
use crate::http::request::Request;
use crate::http::response::Response;

/// Global atomic counter for connection IDs.
/// Relaxed ordering is sufficient since we only need uniqueness, not synchronization.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection, monotonic for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Lifecycle state of a connection.
///
/// A connection serves exactly one request; there is no transition back to
/// `Receiving` once dispatch has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket accepted, record allocated.
    Accepted,
    /// Accumulating request bytes until the request is complete.
    Receiving,
    /// Running the middleware chain over the completed request.
    Dispatching,
    /// Serializing and writing the response.
    Writing,
    /// Socket closed, record about to be discarded.
    Closed,
}

impl ConnectionState {
    /// Whether a transition from `self` to `next` is legal.
    pub fn can_transition_to(&self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Accepted, Receiving)
                | (Receiving, Receiving)
                | (Receiving, Dispatching)
                | (Dispatching, Writing)
                | (Writing, Closed)
                // Peer may vanish at any point before the response is written.
                | (Accepted, Closed)
                | (Receiving, Closed)
                | (Dispatching, Closed)
        )
    }
}

/// Per-accepted-socket unit of state: one request/response cycle, then closed.
///
/// The owning task has exclusive access; nothing is shared across connections.
pub struct Connection {
    id: ConnectionId,
    stream: TcpStream,
    pub request: Request,
    pub response: Response,
    state: ConnectionState,
}

impl Connection {
    /// Allocate a record for a freshly accepted socket.
    pub fn new(id: ConnectionId, stream: TcpStream) -> Self {
        tracing::debug!(connection_id = %id, "Connection accepted");
        Self {
            id,
            stream,
            request: Request::new(),
            response: Response::new(),
            state: ConnectionState::Accepted,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Move to a new lifecycle state.
    pub fn set_state(&mut self, next: ConnectionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal connection state transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!(connection_id = %self.id, from = ?self.state, to = ?next, "State transition");
        self.state = next;
    }

    /// Read a chunk of bytes from the socket, append it to the request
    /// buffer, and re-run the parser.
    ///
    /// Returns the number of bytes read; zero means the peer closed.
    pub async fn read_some(&mut self) -> std::io::Result<usize> {
        let mut buf = [0u8; 4096];
        let n = self.stream.read(&mut buf).await?;
        if n > 0 {
            self.request.append(&buf[..n]);
            parser::parse(&mut self.request);
        }
        Ok(n)
    }

    /// Write the serialized response and shut the stream down.
    ///
    /// The response is final once written; the connection closes either way.
    pub async fn write_response(&mut self, payload: &[u8]) -> std::io::Result<()> {
        self.stream.write_all(payload).await?;
        self.stream.shutdown().await
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        tracing::trace!(connection_id = %self.id, "Connection discarded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_id_unique() {
        let id1 = ConnectionId::new();
        let id2 = ConnectionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn connection_id_monotonic() {
        let ids: Vec<u64> = (0..4).map(|_| ConnectionId::new().as_u64()).collect();
        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn lifecycle_transitions() {
        use ConnectionState::*;
        assert!(Accepted.can_transition_to(Receiving));
        assert!(Receiving.can_transition_to(Receiving));
        assert!(Receiving.can_transition_to(Dispatching));
        assert!(Dispatching.can_transition_to(Writing));
        assert!(Writing.can_transition_to(Closed));
    }

    #[test]
    fn no_second_request_on_a_connection() {
        use ConnectionState::*;
        assert!(!Dispatching.can_transition_to(Receiving));
        assert!(!Writing.can_transition_to(Receiving));
        assert!(!Closed.can_transition_to(Receiving));
    }

    #[test]
    fn peer_may_close_early() {
        use ConnectionState::*;
        assert!(Receiving.can_transition_to(Closed));
        assert!(!Closed.can_transition_to(Accepted));
    }
}
