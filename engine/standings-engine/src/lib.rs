//! Standings Engine
//!
//! Folds validated head-to-head fixtures into per-participant season records,
//! ranks participants by league points and builds the text payloads sent to
//! notification channels.

pub mod aggregator;
pub mod error;
pub mod participant;
pub mod ranking;
pub mod report;

pub use aggregator::{aggregate, aggregate_retrieval, ParticipantTable};
pub use error::StandingsError;
pub use participant::{Outcome, Participant, ParticipantId, PeriodStats};
pub use ranking::{compare, rank, RankedEntry};
pub use report::{build_message, MessageFormat};

/// Result type alias for standings operations
pub type Result<T> = std::result::Result<T, StandingsError>;

/// Fixture builders shared with downstream crates' tests
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use fixture_fetcher::{FixtureSide, H2hFixture};

    pub fn side(entry: Option<u64>, points: i64, wdl: (u8, u8, u8)) -> FixtureSide {
        let (name, player_name) = match entry {
            Some(id) => (format!("Team {id}"), format!("Manager {id}")),
            None => ("AVERAGE".to_string(), String::new()),
        };
        FixtureSide {
            entry,
            name,
            player_name,
            points,
            win: wdl.0,
            draw: wdl.1,
            loss: wdl.2,
            league_points: wdl.0 * 3 + wdl.1,
        }
    }

    /// Resolved fixture where the higher score wins
    pub fn played(event: u32, entry_1: Option<u64>, p1: i64, entry_2: Option<u64>, p2: i64) -> H2hFixture {
        let (r1, r2) = if p1 > p2 {
            ((1, 0, 0), (0, 0, 1))
        } else if p2 > p1 {
            ((0, 0, 1), (1, 0, 0))
        } else {
            ((0, 1, 0), (0, 1, 0))
        };
        H2hFixture {
            id: event as u64 * 100 + entry_1.unwrap_or(0),
            event,
            entry_1: side(entry_1, p1, r1),
            entry_2: side(entry_2, p2, r2),
        }
    }

    /// Fixture whose scores are not in yet
    pub fn pending(event: u32, entry_1: Option<u64>, entry_2: Option<u64>) -> H2hFixture {
        H2hFixture {
            id: event as u64 * 100 + entry_1.unwrap_or(0),
            event,
            entry_1: side(entry_1, 0, (0, 0, 0)),
            entry_2: side(entry_2, 0, (0, 0, 0)),
        }
    }
}
