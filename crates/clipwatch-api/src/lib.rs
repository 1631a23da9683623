//! HTTP API for Clipwatch.
//!
//! A thin transport over the [`Coordinator`](clipwatch_runtime::Coordinator):
//! - configuration read/save
//! - capture connection
//! - stream start/stop (and loopback chat injection for dry runs)
//! - status polling, log clearing and the replay listing
//!
//! # Example
//!
//! ```ignore
//! use clipwatch_api::{serve, ApiConfig, AppState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(/* ... */);
//!     serve(ApiConfig::default(), state).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use router::{create_router, serve};
pub use state::AppState;
