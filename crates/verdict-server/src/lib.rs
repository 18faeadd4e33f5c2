//! # verdict-server
//!
//! HTTP surface for Verdict: three JSON endpoints, a health check, and the
//! server-rendered pages that walk a user from question to verdict.
//!
//! ```rust,ignore
//! let config = ServerConfig::default();
//! verdict_server::serve(config).await?;
//! ```

#![deny(unsafe_code)]

pub mod api;
pub mod error;
pub mod health;
pub mod pages;
pub mod router;
pub mod server;
pub mod state;

use std::net::SocketAddr;

use verdict_runtime::RuntimeConfig;

pub use error::{ApiError, ServerError};
pub use router::build_router;
pub use server::{serve, shutdown_signal};
pub use state::AppState;

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Server configuration: where to listen and how to build the runtime.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub runtime: RuntimeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            runtime: RuntimeConfig::default(),
        }
    }
}
