//! Fixture Fetcher
//!
//! Pulls head-to-head league fixtures from the Fantasy Premier League API and
//! decides whether the returned match data is fully resolved. Retrieval runs
//! through three fallback strategies until one produces a trustworthy view of
//! every elapsed gameweek.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod retriever;
pub mod session;
pub mod validator;

pub use client::{FplClient, LeagueApi};
pub use config::FetcherConfig;
pub use error::FetcherError;
pub use models::*;
pub use retriever::{FixtureBatches, FixtureRetriever, RetrievalOutcome, RetrievedFixtures, Strategy};
pub use session::LeagueSession;
pub use validator::{is_resolved, is_resolved_set};

/// Result type alias for fetcher operations
pub type Result<T> = std::result::Result<T, FetcherError>;
