//! cascade — a minimal middleware-chaining HTTP server.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                   CASCADE                     │
//!                       │                                               │
//!   Client bytes        │  ┌──────────┐   ┌─────────┐   ┌───────────┐  │
//!   ────────────────────┼─▶│   net    │──▶│  http   │──▶│middleware │  │
//!                       │  │ listener │   │ parser  │   │   chain   │  │
//!                       │  └──────────┘   └─────────┘   └─────┬─────┘  │
//!                       │                                     │        │
//!   Client response     │  ┌──────────┐   ┌─────────┐         │        │
//!   ◀───────────────────┼──│  socket  │◀──│ header  │◀────────┘        │
//!                       │  │  write   │   │ builder │                  │
//!                       │  └──────────┘   └─────────┘                  │
//!                       │                                               │
//!                       │  Cross-cutting: config, tracing               │
//!                       └──────────────────────────────────────────────┘
//! ```
//!
//! Each accepted connection serves exactly one buffered request and one
//! buffered response, then closes. Handlers register in order with
//! [`Server::use_handler`]; each decides whether to invoke the rest of the
//! chain via its [`Next`] continuation.

pub mod config;
pub mod http;
pub mod net;

pub use config::{load_config, ConfigError, ServerConfig};
pub use http::{MiddlewareChain, Next, Request, Response, Server, StatusCodeError};
pub use net::{ConnectionId, ListenerError};
