//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Accepted connection (net layer)
//!     → request.rs (accumulate bytes)
//!     → parser.rs (wire → Request fields, completeness via Request)
//!     → middleware.rs (dispatch chain over Request/Response)
//!     → header.rs (serialize status line + headers)
//!     → server.rs (write payload, close connection)
//! ```
//!
//! # Design Decisions
//! - One fully buffered request, one fully buffered response per connection
//! - content-length is the only body-framing header honored
//! - Header maps preserve insertion order so output is deterministic

pub mod header;
pub mod middleware;
pub mod parser;
pub mod request;
pub mod response;
pub mod server;

pub use header::{build_header, StatusCodeError};
pub use middleware::{Handler, MiddlewareChain, Next};
pub use request::Request;
pub use response::Response;
pub use server::Server;
