//! Chat API: the display surface for conversation sessions.
//!
//! Serves the chat page and a small JSON API. Blocking backend and
//! prediction calls run on tokio's blocking pool, one unit of work per
//! session at a time.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::chat_api_router;
pub use types::ApiContext;
