//! HTTP client library for the chessevo analysis service
//!
//! Provides a typed async client for the auth and analysis-lifecycle
//! endpoints of the chessevo backend. Can be used by the dashboard CLI,
//! a web UI, or any other client application.
//!
//! # Example
//!
//! ```no_run
//! use analysis_client::{AnalysisClient, ClientConfig, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env();
//!     let session = SessionStore::in_memory();
//!     let client = AnalysisClient::new(&config, session)?;
//!     let user = client.login("magnus", "secret").await?;
//!     println!("Logged in as {}", user.username);
//!     let analyses = client.list_my_analyses().await?;
//!     println!("{} analyses", analyses.len());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod gateway;
mod session;
mod traits;
mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::AnalysisClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use gateway::{ApiGateway, SessionExpiredHook};
pub use session::{SessionStore, StoredSession};
pub use traits::AnalysisService;
pub use types::{
    Analysis, AnalysisStatus, AnalysisStatusInfo, CreateAnalysisRequest, GameMode, OpponentRating,
    OpponentReport, Ranking, UserProfile,
};
