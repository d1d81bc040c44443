//! Error types for fixture retrieval

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetcherError {
    #[error("Empty fixture set for gameweek {period}")]
    EmptyFixtureSet { period: u32 },

    #[error("Unresolved fixtures for gameweek {period}: {detail}")]
    UnresolvedFixtures { period: u32, detail: String },

    #[error(
        "Ambiguous score in gameweek {period} fixture {fixture_id}: {points_1} vs {points_2}"
    )]
    AmbiguousScore { period: u32, fixture_id: u64, points_1: i64, points_2: i64 },

    #[error("Wrong gameweek! {found} != {expected}")]
    WrongPeriodInvariant { expected: u32, found: u32 },

    #[error("Fixture retrieval failed after all strategies: {}", reasons.join("; "))]
    FixtureRetrievalFailed { reasons: Vec<String> },

    #[error("No current gameweek in upstream metadata")]
    NoCurrentGameweek,

    #[error("FPL API error: {endpoint} returned {status}")]
    Api { status: u16, endpoint: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl FetcherError {
    /// Errors that stop the strategy fallback immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EmptyFixtureSet { .. }
                | Self::AmbiguousScore { .. }
                | Self::WrongPeriodInvariant { .. }
                | Self::FixtureRetrievalFailed { .. }
                | Self::NoCurrentGameweek
                | Self::InvalidConfig { .. }
        )
    }

    /// Errors that mean the league data itself cannot be trusted.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyFixtureSet { .. }
                | Self::UnresolvedFixtures { .. }
                | Self::AmbiguousScore { .. }
                | Self::WrongPeriodInvariant { .. }
                | Self::FixtureRetrievalFailed { .. }
                | Self::NoCurrentGameweek
        )
    }
}
