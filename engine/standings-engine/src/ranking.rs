//! League table ordering

use crate::aggregator::ParticipantTable;
use crate::participant::{Participant, ParticipantId};
use serde::Serialize;
use std::cmp::Ordering;

/// Snapshot of one league table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub participant_id: ParticipantId,
    pub team_name: String,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub league_points: u32,
    pub rank: u32,
    pub current_period_points: i64,
}

impl RankedEntry {
    fn from_participant(participant: &Participant, rank: u32, current: u32) -> Self {
        Self {
            participant_id: participant.id,
            team_name: participant.team_name.clone(),
            name: participant.name.clone(),
            wins: participant.total_wins(),
            losses: participant.total_losses(),
            draws: participant.total_draws(),
            league_points: participant.total_league_points(),
            rank,
            current_period_points: participant.period_points(current),
        }
    }
}

/// Table order: more league points first, then the higher score in the
/// current gameweek. `Equal` means a full tie.
pub fn compare(a: &Participant, b: &Participant, current: u32) -> Ordering {
    b.total_league_points()
        .cmp(&a.total_league_points())
        .then_with(|| b.period_points(current).cmp(&a.period_points(current)))
}

/// Rank every participant. Full ties keep first-seen order.
pub fn rank(table: &ParticipantTable, current: u32) -> Vec<RankedEntry> {
    let mut ordered: Vec<&Participant> = table.iter().collect();
    ordered.sort_by(|a, b| compare(a, b, current));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, p)| RankedEntry::from_participant(p, i as u32 + 1, current))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::PeriodStats;
    use crate::test_support::played;

    fn participant(id: u64, results: &[(u32, (u8, u8, u8), i64)]) -> Participant {
        let mut p = Participant::new(ParticipantId::Entry(id), format!("P{id}"), format!("Team {id}"));
        for (period, (win, draw, loss), points) in results {
            p.record(*period, PeriodStats { win: *win, draw: *draw, loss: *loss, points: *points });
        }
        p
    }

    #[test]
    fn test_two_participant_scenario() {
        let p1 = participant(1, &[(1, (1, 0, 0), 60), (2, (1, 0, 0), 55), (3, (0, 0, 0), 0)]);
        let p2 = participant(2, &[(1, (0, 0, 1), 40), (2, (0, 0, 0), 0), (3, (0, 1, 0), 45)]);

        assert_eq!(p1.total_league_points(), 6);
        assert_eq!(p2.total_league_points(), 1);
        assert_eq!(compare(&p1, &p2, 3), Ordering::Less);

        let mut table = ParticipantTable::new();
        // P2 seen first so insertion order alone would put it on top
        table.ingest_period(1, &[played(1, Some(2), 40, Some(1), 60)]);
        table.ingest_period(2, &[played(2, Some(1), 55, None, 50)]);
        table.ingest_period(3, &[played(3, Some(2), 45, None, 45)]);

        let ranked: Vec<_> = rank(&table, 3)
            .into_iter()
            .filter(|e| e.participant_id != ParticipantId::Average)
            .map(|e| (e.name, e.league_points))
            .collect();
        assert_eq!(ranked, vec![("Manager 1".to_string(), 6), ("Manager 2".to_string(), 1)]);
    }

    #[test]
    fn test_tie_broken_by_current_gameweek_points() {
        let mut table = ParticipantTable::new();
        table.ingest_period(1, &[played(1, Some(1), 60, Some(2), 50), played(1, Some(3), 70, Some(4), 20)]);
        table.ingest_period(2, &[played(2, Some(2), 65, Some(3), 64), played(2, Some(4), 80, Some(1), 30)]);

        // Everyone has 3 league points, gameweek 2 scores decide
        let ranked = rank(&table, 2);
        let order: Vec<_> = ranked.iter().map(|e| e.participant_id).collect();
        assert_eq!(
            order,
            vec![
                ParticipantId::Entry(4),
                ParticipantId::Entry(2),
                ParticipantId::Entry(3),
                ParticipantId::Entry(1)
            ]
        );
        assert_eq!(ranked.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(ranked[0].current_period_points, 80);
    }

    #[test]
    fn test_full_ties_keep_insertion_order() {
        let mut table = ParticipantTable::new();
        table.ingest_period(1, &[played(1, Some(9), 50, Some(5), 50), played(1, Some(7), 50, Some(3), 50)]);

        let order: Vec<_> = rank(&table, 1).iter().map(|e| e.participant_id).collect();
        assert_eq!(
            order,
            vec![
                ParticipantId::Entry(9),
                ParticipantId::Entry(5),
                ParticipantId::Entry(7),
                ParticipantId::Entry(3)
            ]
        );
    }

    #[test]
    fn test_comparator_is_transitive() {
        let participants = vec![
            participant(1, &[(1, (1, 0, 0), 50), (2, (0, 1, 0), 40)]),
            participant(2, &[(1, (1, 0, 0), 50), (2, (0, 1, 0), 45)]),
            participant(3, &[(1, (0, 0, 1), 30), (2, (1, 0, 0), 70)]),
            participant(4, &[(1, (0, 1, 0), 44), (2, (0, 1, 0), 44)]),
            participant(5, &[(1, (0, 0, 1), 12), (2, (0, 0, 1), 20)]),
        ];

        for a in &participants {
            for b in &participants {
                assert_eq!(compare(a, b, 2), compare(b, a, 2).reverse());
                for c in &participants {
                    if compare(a, b, 2) == Ordering::Less && compare(b, c, 2) == Ordering::Less {
                        assert_eq!(compare(a, c, 2), Ordering::Less);
                    }
                }
            }
        }
    }

    #[test]
    fn test_empty_table() {
        assert!(rank(&ParticipantTable::new(), 1).is_empty());
    }
}
