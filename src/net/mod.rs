//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits, connection IDs)
//!     → connection.rs (record allocation, lifecycle state machine)
//!     → Hand off to HTTP layer
//!
//! Connection States:
//!     Accepted → Receiving → Dispatching → Writing → Closed
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - Each connection is owned by exactly one task; no cross-connection state
//! - One request and one response per connection, then the socket closes

pub mod connection;
pub mod listener;

pub use connection::{Connection, ConnectionId, ConnectionState};
pub use listener::{Listener, ListenerError};
