use crate::{Result, StandingsError};
use fixture_fetcher::FixtureSide;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable participant key; `Average` stands in for the league-average opponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParticipantId {
    Entry(u64),
    Average,
}

impl ParticipantId {
    pub const AVERAGE_LABEL: &'static str = "AVERAGE";

    pub fn from_entry(entry: Option<u64>) -> Self {
        entry.map_or(ParticipantId::Average, ParticipantId::Entry)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantId::Entry(id) => write!(f, "{id}"),
            ParticipantId::Average => f.write_str(Self::AVERAGE_LABEL),
        }
    }
}

/// One gameweek's result for one participant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub win: u8,
    pub draw: u8,
    pub loss: u8,
    pub points: i64,
}

impl From<&FixtureSide> for PeriodStats {
    fn from(side: &FixtureSide) -> Self {
        Self { win: side.win, draw: side.draw, loss: side.loss, points: side.points }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// Season record of a league participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub team_name: String,
    periods: BTreeMap<u32, PeriodStats>,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>, team_name: impl Into<String>) -> Self {
        Self { id, name: name.into(), team_name: team_name.into(), periods: BTreeMap::new() }
    }

    /// Record a gameweek result, replacing any earlier value for that gameweek
    pub fn record(&mut self, period: u32, stats: PeriodStats) {
        self.periods.insert(period, stats);
    }

    pub fn period(&self, period: u32) -> Option<&PeriodStats> {
        self.periods.get(&period)
    }

    /// Raw score for a gameweek, 0 if the participant had no fixture
    pub fn period_points(&self, period: u32) -> i64 {
        self.periods.get(&period).map_or(0, |s| s.points)
    }

    pub fn total_wins(&self) -> u32 {
        self.periods.values().map(|s| u32::from(s.win)).sum()
    }

    pub fn total_draws(&self) -> u32 {
        self.periods.values().map(|s| u32::from(s.draw)).sum()
    }

    pub fn total_losses(&self) -> u32 {
        self.periods.values().map(|s| u32::from(s.loss)).sum()
    }

    /// 3 per win, 1 per draw
    pub fn total_league_points(&self) -> u32 {
        3 * self.total_wins() + self.total_draws()
    }

    pub fn total_period_points(&self) -> i64 {
        self.periods.values().map(|s| s.points).sum()
    }

    /// Classify the gameweek result. A gameweek with no flag set (or no
    /// fixture at all) means the fixture data is broken.
    pub fn outcome(&self, period: u32) -> Result<Outcome> {
        let invalid = StandingsError::InvalidOutcome { participant: self.id, period };
        let stats = self.periods.get(&period).ok_or_else(|| invalid.clone())?;

        if stats.win == 1 {
            Ok(Outcome::Win)
        } else if stats.loss == 1 {
            Ok(Outcome::Loss)
        } else if stats.draw == 1 {
            Ok(Outcome::Draw)
        } else {
            Err(invalid)
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.team_name)
    }
}
