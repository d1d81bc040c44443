//! Error types for the standings engine

use crate::participant::ParticipantId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StandingsError {
    #[error("Invalid outcome for {participant} in gameweek {period}")]
    InvalidOutcome { participant: ParticipantId, period: u32 },
}
