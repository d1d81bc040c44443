//! Fixture aggregation
//!
//! Builds one [`Participant`] per league entry from gameweek fixtures. The
//! table remembers the order in which participants were first seen so ranking
//! ties resolve the same way on every run.

use crate::participant::{Participant, ParticipantId, PeriodStats};
use fixture_fetcher::{FixtureSide, H2hFixture, RetrievedFixtures};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ParticipantTable {
    participants: Vec<Participant>,
    index: HashMap<ParticipantId, usize>,
}

impl ParticipantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one gameweek's fixtures. Callers ingest each gameweek once;
    /// repeating a gameweek overwrites that gameweek's stats.
    pub fn ingest_period(&mut self, period: u32, fixtures: &[H2hFixture]) {
        for fixture in fixtures {
            self.ingest_side(period, &fixture.entry_1);
            self.ingest_side(period, &fixture.entry_2);
        }
    }

    fn ingest_side(&mut self, period: u32, side: &FixtureSide) {
        let id = ParticipantId::from_entry(side.entry);

        let slot = match self.index.get(&id) {
            Some(slot) => *slot,
            None => {
                // First sighting fixes the names; later renames are ignored
                let name = if id == ParticipantId::Average && side.player_name.is_empty() {
                    ParticipantId::AVERAGE_LABEL.to_string()
                } else {
                    side.player_name.clone()
                };
                debug!("New participant {}: {} [{}]", id, name, side.name);
                self.participants.push(Participant::new(id, name, side.name.clone()));
                self.index.insert(id, self.participants.len() - 1);
                self.participants.len() - 1
            }
        };

        self.participants[slot].record(period, PeriodStats::from(side));
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.index.get(&id).map(|slot| &self.participants[*slot])
    }

    /// Participants in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// Fold a gameweek → fixtures map into participant records
pub fn aggregate(fixtures: &BTreeMap<u32, Vec<H2hFixture>>) -> ParticipantTable {
    let mut table = ParticipantTable::new();
    for (period, batch) in fixtures {
        table.ingest_period(*period, batch);
    }
    table
}

/// Aggregate whatever shape the successful retrieval strategy produced
pub fn aggregate_retrieval(retrieved: &RetrievedFixtures) -> ParticipantTable {
    let map = retrieved.batches.clone().into_period_map(retrieved.upto);
    aggregate(&map)
}
