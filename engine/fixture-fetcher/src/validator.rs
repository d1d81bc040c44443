//! Fixture validation
//!
//! A fixture is resolved once upstream has set at least one of the
//! win/draw/loss flags on *both* sides. An all-zero triple on either side
//! means the match has not been officially settled yet.

use crate::models::H2hFixture;
use crate::{FetcherError, Result};
use tracing::info;

/// Whether a single fixture carries a settled result on both sides
pub fn is_resolved(fixture: &H2hFixture) -> bool {
    if fixture.entry_1.is_unresolved() || fixture.entry_2.is_unresolved() {
        info!("Match week {} still in progress. {}", fixture.event, fixture.pairing());
        return false;
    }
    true
}

/// Whether every fixture of a gameweek batch is resolved.
///
/// An empty batch is an error rather than `false`: upstream returning nothing
/// for an elapsed gameweek is not something a retry can fix.
pub fn is_resolved_set(period: u32, fixtures: &[H2hFixture]) -> Result<bool> {
    if fixtures.is_empty() {
        return Err(FetcherError::EmptyFixtureSet { period });
    }
    Ok(fixtures.iter().all(is_resolved))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::FixtureSide;

    pub(crate) fn side(entry: Option<u64>, name: &str, points: i64, wdl: (u8, u8, u8)) -> FixtureSide {
        let league_points = match wdl {
            (1, _, _) => 3,
            (_, 1, _) => 1,
            _ => 0,
        };
        FixtureSide {
            entry,
            name: name.to_string(),
            player_name: format!("{name} Manager"),
            points,
            win: wdl.0,
            draw: wdl.1,
            loss: wdl.2,
            league_points,
        }
    }

    pub(crate) fn fixture(
        id: u64,
        event: u32,
        side_1: (Option<u64>, i64, (u8, u8, u8)),
        side_2: (Option<u64>, i64, (u8, u8, u8)),
    ) -> H2hFixture {
        let name_1 = side_1.0.map(|e| format!("Team {e}")).unwrap_or_else(|| "AVERAGE".into());
        let name_2 = side_2.0.map(|e| format!("Team {e}")).unwrap_or_else(|| "AVERAGE".into());
        H2hFixture {
            id,
            event,
            entry_1: side(side_1.0, &name_1, side_1.1, side_1.2),
            entry_2: side(side_2.0, &name_2, side_2.1, side_2.2),
        }
    }

    #[test]
    fn test_resolved_fixture() {
        let f = fixture(1, 1, (Some(1), 55, (1, 0, 0)), (Some(2), 40, (0, 0, 1)));
        assert!(is_resolved(&f));

        let draw = fixture(2, 1, (Some(1), 50, (0, 1, 0)), (Some(2), 50, (0, 1, 0)));
        assert!(is_resolved(&draw));
    }

    #[test]
    fn test_one_unresolved_side_fails() {
        // Side 2 looks settled but side 1 does not
        let f = fixture(1, 1, (Some(1), 55, (0, 0, 0)), (Some(2), 40, (1, 0, 0)));
        assert!(!is_resolved(&f));
        assert!(!is_resolved_set(1, &[f]).unwrap());
    }

    #[test]
    fn test_empty_set_is_error() {
        assert!(matches!(
            is_resolved_set(5, &[]),
            Err(FetcherError::EmptyFixtureSet { period: 5 })
        ));
    }

    #[test]
    fn test_set_requires_every_fixture() {
        let good = fixture(1, 2, (Some(1), 55, (1, 0, 0)), (Some(2), 40, (0, 0, 1)));
        let bad = fixture(2, 2, (Some(3), 0, (0, 0, 0)), (None, 0, (0, 0, 0)));
        assert!(is_resolved_set(2, &[good.clone()]).unwrap());
        assert!(!is_resolved_set(2, &[good, bad]).unwrap());
    }

    #[test]
    fn test_resolved_sides_have_single_outcome() {
        let fixtures = [
            fixture(1, 1, (Some(1), 55, (1, 0, 0)), (Some(2), 40, (0, 0, 1))),
            fixture(2, 1, (Some(3), 48, (0, 1, 0)), (Some(4), 48, (0, 1, 0))),
            fixture(3, 1, (Some(5), 30, (0, 0, 1)), (None, 44, (1, 0, 0))),
        ];
        for f in fixtures.iter().filter(|f| is_resolved(f)) {
            for s in [&f.entry_1, &f.entry_2] {
                assert_eq!(s.win + s.draw + s.loss, 1);
            }
        }
    }
}
