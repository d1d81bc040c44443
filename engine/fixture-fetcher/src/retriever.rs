//! Fixture retrieval strategies
//!
//! Upstream H2H results are filled in lazily and the per-gameweek endpoint is
//! known to serve stale pages, so retrieval is attempted with three complete
//! alternative algorithms, in order, stopping at the first that yields a fully
//! resolved view of gameweeks `1..=upto`:
//!
//! 1. [`Strategy::PerPeriod`]: one request per gameweek, refetched once with an
//!    explicit page parameter when the batch is unresolved.
//! 2. [`Strategy::Bulk`]: the full league history in one paginated sweep.
//! 3. [`Strategy::Derived`]: the per-gameweek fetch again, deriving results from
//!    the raw scores. Only allowed once the current gameweek is `data_checked`.

use crate::client::LeagueApi;
use crate::models::H2hFixture;
use crate::validator::{is_resolved, is_resolved_set};
use crate::{FetcherError, Result};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn, Instrument, Span};

/// Retrieval strategy, in fallback order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    PerPeriod,
    Bulk,
    Derived,
}

impl Strategy {
    pub const ORDER: [Strategy; 3] = [Strategy::PerPeriod, Strategy::Bulk, Strategy::Derived];

    /// 1-based method number, as reported in logs
    pub fn number(self) -> u8 {
        match self {
            Strategy::PerPeriod => 1,
            Strategy::Bulk => 2,
            Strategy::Derived => 3,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::PerPeriod => "per-period",
            Strategy::Bulk => "bulk",
            Strategy::Derived => "derived",
        };
        write!(f, "{name}")
    }
}

/// Shape of the fixtures a strategy produced
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureBatches {
    /// One batch per gameweek, in gameweek order
    PerPeriod(Vec<Vec<H2hFixture>>),
    /// A single list spanning every gameweek
    Flat(Vec<H2hFixture>),
}

impl FixtureBatches {
    /// Group fixtures by their `event`, dropping anything past `upto`
    pub fn into_period_map(self, upto: u32) -> BTreeMap<u32, Vec<H2hFixture>> {
        let fixtures: Vec<H2hFixture> = match self {
            FixtureBatches::PerPeriod(batches) => batches.into_iter().flatten().collect(),
            FixtureBatches::Flat(fixtures) => fixtures,
        };

        let mut map: BTreeMap<u32, Vec<H2hFixture>> = BTreeMap::new();
        for fixture in fixtures.into_iter().filter(|f| f.event <= upto) {
            map.entry(fixture.event).or_default().push(fixture);
        }
        map
    }

    pub fn fixture_count(&self) -> usize {
        match self {
            FixtureBatches::PerPeriod(batches) => batches.iter().map(Vec::len).sum(),
            FixtureBatches::Flat(fixtures) => fixtures.len(),
        }
    }
}

/// Fixtures from the strategy that succeeded
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedFixtures {
    pub strategy: Strategy,
    pub upto: u32,
    pub batches: FixtureBatches,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    Resolved(RetrievedFixtures),
    /// The current gameweek is not checked upstream and the fetch strategies
    /// could not resolve it; try again later.
    NotYetResolvable { period: u32, reasons: Vec<String> },
}

/// Drives the strategy list against a [`LeagueApi`]
pub struct FixtureRetriever<'a, A: LeagueApi + ?Sized> {
    api: &'a A,
    upto: u32,
    data_checked: bool,
    span: Span,
}

impl<'a, A: LeagueApi + ?Sized> FixtureRetriever<'a, A> {
    pub fn new(api: &'a A, upto: u32, data_checked: bool, span: Span) -> Self {
        Self { api, upto, data_checked, span }
    }

    /// Run the strategies in order until one succeeds
    pub async fn retrieve_all(&self) -> Result<RetrievalOutcome> {
        self.run_strategies().instrument(self.span.clone()).await
    }

    async fn run_strategies(&self) -> Result<RetrievalOutcome> {
        let mut reasons = Vec::new();

        for strategy in Strategy::ORDER {
            if strategy == Strategy::Derived && !self.data_checked {
                info!(
                    "Gameweek {} data is not checked yet, not deriving results locally",
                    self.upto
                );
                return Ok(RetrievalOutcome::NotYetResolvable { period: self.upto, reasons });
            }

            match self.run(strategy).await {
                Ok(batches) => {
                    info!(
                        "Retrieved {} fixtures up to gameweek {} with method {} ({})",
                        batches.fixture_count(),
                        self.upto,
                        strategy.number(),
                        strategy
                    );
                    return Ok(RetrievalOutcome::Resolved(RetrievedFixtures {
                        strategy,
                        upto: self.upto,
                        batches,
                    }));
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Failed to retrieve gameweek data with method {}: {}", strategy.number(), e);
                    reasons.push(format!("{strategy}: {e}"));
                }
            }
        }

        Err(FetcherError::FixtureRetrievalFailed { reasons })
    }

    async fn run(&self, strategy: Strategy) -> Result<FixtureBatches> {
        match strategy {
            Strategy::PerPeriod => self.per_period(false).await,
            Strategy::Bulk => self.bulk().await,
            Strategy::Derived => self.per_period(true).await,
        }
    }

    async fn per_period(&self, derive: bool) -> Result<FixtureBatches> {
        let mut batches = Vec::with_capacity(self.upto as usize);

        for period in 1..=self.upto {
            let mut fixtures = self.api.fixtures_for_period(period).await?;

            if !is_resolved_set(period, &fixtures)? {
                info!("Failed to retrieve fixture data for gameweek {}, retry...", period);

                if derive {
                    derive_results(period, &mut fixtures)?;
                } else {
                    fixtures = self.api.fixtures_for_period_page(period, 1).await?;
                    if !is_resolved_set(period, &fixtures)? {
                        return Err(FetcherError::UnresolvedFixtures {
                            period,
                            detail: "still unresolved after page refetch".to_string(),
                        });
                    }
                }
            }

            batches.push(fixtures);
        }

        Ok(FixtureBatches::PerPeriod(batches))
    }

    async fn bulk(&self) -> Result<FixtureBatches> {
        let history = self.api.all_fixtures().await?;
        let mut retained = Vec::new();

        for fixture in history {
            // Assumes upstream orders the history by gameweek ascending
            if fixture.event > self.upto {
                break;
            }
            if !is_resolved(&fixture) {
                return Err(FetcherError::UnresolvedFixtures {
                    period: fixture.event,
                    detail: format!("fixture {} ({})", fixture.id, fixture.pairing()),
                });
            }
            retained.push(fixture);
        }

        if let Some(missing) = (1..=self.upto).find(|p| !retained.iter().any(|f| f.event == *p)) {
            return Err(FetcherError::UnresolvedFixtures {
                period: missing,
                detail: "gameweek missing from league history".to_string(),
            });
        }

        Ok(FixtureBatches::Flat(retained))
    }
}

/// Fill in win/draw/loss and league points from the raw scores.
///
/// A score of exactly zero on either side is treated as missing data, so the
/// outcome cannot be derived and the whole batch is rejected.
pub fn derive_results(period: u32, fixtures: &mut [H2hFixture]) -> Result<()> {
    for fixture in fixtures.iter_mut() {
        let (p1, p2) = (fixture.entry_1.points, fixture.entry_2.points);
        if p1 == 0 || p2 == 0 {
            return Err(FetcherError::AmbiguousScore {
                period,
                fixture_id: fixture.id,
                points_1: p1,
                points_2: p2,
            });
        }

        if p1 > p2 {
            fixture.entry_1.mark_win();
            fixture.entry_2.mark_loss();
        } else if p2 > p1 {
            fixture.entry_1.mark_loss();
            fixture.entry_2.mark_win();
        } else {
            fixture.entry_1.mark_draw();
            fixture.entry_2.mark_draw();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gameweek;
    use crate::validator::tests::fixture;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedLeague {
        per_period: HashMap<u32, Vec<H2hFixture>>,
        paged: HashMap<u32, Vec<H2hFixture>>,
        history: Option<Vec<H2hFixture>>,
        failing_period: Option<u32>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedLeague {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn unavailable(endpoint: &str) -> FetcherError {
            FetcherError::Api { status: 503, endpoint: endpoint.to_string() }
        }
    }

    #[async_trait]
    impl LeagueApi for ScriptedLeague {
        async fn gameweeks(&self) -> Result<Vec<Gameweek>> {
            Ok(Vec::new())
        }

        async fn fixtures_for_period(&self, period: u32) -> Result<Vec<H2hFixture>> {
            self.record(format!("event={period}"));
            if self.failing_period == Some(period) {
                return Err(Self::unavailable("event"));
            }
            Ok(self.per_period.get(&period).cloned().unwrap_or_default())
        }

        async fn fixtures_for_period_page(&self, period: u32, page: u32) -> Result<Vec<H2hFixture>> {
            self.record(format!("event={period}&page={page}"));
            Ok(self
                .paged
                .get(&period)
                .or_else(|| self.per_period.get(&period))
                .cloned()
                .unwrap_or_default())
        }

        async fn all_fixtures(&self) -> Result<Vec<H2hFixture>> {
            self.record("all".to_string());
            self.history.clone().ok_or_else(|| Self::unavailable("all"))
        }
    }

    fn resolved(id: u64, event: u32) -> H2hFixture {
        fixture(id, event, (Some(1), 55, (1, 0, 0)), (Some(2), 40, (0, 0, 1)))
    }

    fn unresolved(id: u64, event: u32) -> H2hFixture {
        fixture(id, event, (Some(1), 55, (0, 0, 0)), (Some(2), 40, (0, 0, 0)))
    }

    async fn retrieve(league: &ScriptedLeague, upto: u32, data_checked: bool) -> Result<RetrievalOutcome> {
        FixtureRetriever::new(league, upto, data_checked, Span::none()).retrieve_all().await
    }

    fn resolved_outcome(outcome: RetrievalOutcome) -> RetrievedFixtures {
        match outcome {
            RetrievalOutcome::Resolved(fixtures) => fixtures,
            other => panic!("expected resolved outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_per_period_success() {
        let league = ScriptedLeague {
            per_period: HashMap::from([(1, vec![resolved(1, 1)]), (2, vec![resolved(2, 2)])]),
            ..Default::default()
        };

        let fixtures = resolved_outcome(retrieve(&league, 2, false).await.unwrap());
        assert_eq!(fixtures.strategy, Strategy::PerPeriod);
        assert_eq!(
            fixtures.batches,
            FixtureBatches::PerPeriod(vec![vec![resolved(1, 1)], vec![resolved(2, 2)]])
        );
        assert_eq!(league.calls(), vec!["event=1", "event=2"]);
    }

    #[tokio::test]
    async fn test_per_period_page_refetch() {
        let league = ScriptedLeague {
            per_period: HashMap::from([(1, vec![resolved(1, 1)]), (2, vec![unresolved(2, 2)])]),
            paged: HashMap::from([(2, vec![resolved(2, 2)])]),
            ..Default::default()
        };

        let fixtures = resolved_outcome(retrieve(&league, 2, false).await.unwrap());
        assert_eq!(fixtures.strategy, Strategy::PerPeriod);
        assert_eq!(league.calls(), vec!["event=1", "event=2", "event=2&page=1"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_bulk() {
        let league = ScriptedLeague {
            per_period: HashMap::from([(1, vec![unresolved(1, 1)])]),
            history: Some(vec![resolved(1, 1), resolved(2, 2), unresolved(3, 3)]),
            ..Default::default()
        };

        let fixtures = resolved_outcome(retrieve(&league, 2, false).await.unwrap());
        assert_eq!(fixtures.strategy, Strategy::Bulk);
        assert_eq!(fixtures.batches, FixtureBatches::Flat(vec![resolved(1, 1), resolved(2, 2)]));
        assert_eq!(league.calls(), vec!["event=1", "event=1&page=1", "all"]);
    }

    #[tokio::test]
    async fn test_bulk_rejects_missing_gameweek() {
        let league = ScriptedLeague {
            per_period: HashMap::from([(1, vec![unresolved(1, 1)])]),
            history: Some(vec![resolved(1, 1), resolved(3, 3)]),
            ..Default::default()
        };

        let outcome = retrieve(&league, 2, false).await.unwrap();
        match outcome {
            RetrievalOutcome::NotYetResolvable { period, reasons } => {
                assert_eq!(period, 2);
                assert_eq!(reasons.len(), 2);
                assert!(reasons[1].contains("missing from league history"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unchecked_gameweek_is_not_resolvable() {
        let league = ScriptedLeague {
            per_period: HashMap::from([(1, vec![unresolved(1, 1)])]),
            history: Some(vec![unresolved(1, 1)]),
            ..Default::default()
        };

        let outcome = retrieve(&league, 1, false).await.unwrap();
        assert!(matches!(outcome, RetrievalOutcome::NotYetResolvable { period: 1, .. }));
    }

    #[tokio::test]
    async fn test_derives_results_when_checked() {
        let league = ScriptedLeague {
            per_period: HashMap::from([(1, vec![unresolved(1, 1)])]),
            history: Some(vec![unresolved(1, 1)]),
            ..Default::default()
        };

        let fixtures = resolved_outcome(retrieve(&league, 1, true).await.unwrap());
        assert_eq!(fixtures.strategy, Strategy::Derived);

        let map = fixtures.batches.into_period_map(1);
        let derived = &map[&1][0];
        assert_eq!((derived.entry_1.win, derived.entry_1.league_points), (1, 3));
        assert_eq!(derived.entry_2.loss, 1);
        assert_eq!(
            league.calls(),
            vec!["event=1", "event=1&page=1", "all", "event=1"]
        );
    }

    #[tokio::test]
    async fn test_ambiguous_score_is_fatal() {
        let zero = fixture(1, 1, (Some(1), 0, (0, 0, 0)), (Some(2), 40, (0, 0, 0)));
        let league = ScriptedLeague {
            per_period: HashMap::from([(1, vec![zero.clone()])]),
            history: Some(vec![zero]),
            ..Default::default()
        };

        let err = retrieve(&league, 1, true).await.unwrap_err();
        assert!(matches!(err, FetcherError::AmbiguousScore { points_1: 0, points_2: 40, .. }));
    }

    #[tokio::test]
    async fn test_empty_gameweek_aborts_without_fallback() {
        let league = ScriptedLeague {
            per_period: HashMap::from([(1, vec![resolved(1, 1)])]),
            history: Some(vec![resolved(1, 1), resolved(2, 2)]),
            ..Default::default()
        };

        let err = retrieve(&league, 2, true).await.unwrap_err();
        assert!(matches!(err, FetcherError::EmptyFixtureSet { period: 2 }));
        assert!(!league.calls().contains(&"all".to_string()));
    }

    #[tokio::test]
    async fn test_all_strategies_fail() {
        let league = ScriptedLeague {
            per_period: HashMap::from([(1, vec![resolved(1, 1)])]),
            failing_period: Some(2),
            ..Default::default()
        };

        let err = retrieve(&league, 2, true).await.unwrap_err();
        match err {
            FetcherError::FixtureRetrievalFailed { reasons } => {
                assert_eq!(reasons.len(), 3);
                assert!(reasons[0].starts_with("per-period"));
                assert!(reasons[1].starts_with("bulk"));
                assert!(reasons[2].starts_with("derived"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_derive_results() {
        let mut fixtures = vec![
            fixture(1, 4, (Some(1), 55, (0, 0, 0)), (Some(2), 40, (0, 0, 0))),
            fixture(2, 4, (Some(3), 38, (0, 0, 0)), (Some(4), 61, (0, 0, 0))),
            fixture(3, 4, (Some(5), 47, (0, 0, 0)), (None, 47, (0, 0, 0))),
        ];
        derive_results(4, &mut fixtures).unwrap();

        let wdl = |s: &crate::models::FixtureSide| (s.win, s.draw, s.loss, s.league_points);
        assert_eq!(wdl(&fixtures[0].entry_1), (1, 0, 0, 3));
        assert_eq!(wdl(&fixtures[0].entry_2), (0, 0, 1, 0));
        assert_eq!(wdl(&fixtures[1].entry_1), (0, 0, 1, 0));
        assert_eq!(wdl(&fixtures[1].entry_2), (1, 0, 0, 3));
        assert_eq!(wdl(&fixtures[2].entry_1), (0, 1, 0, 1));
        assert_eq!(wdl(&fixtures[2].entry_2), (0, 1, 0, 1));
    }

    #[test]
    fn test_derive_rejects_zero_score() {
        let mut fixtures = vec![fixture(9, 4, (Some(1), 0, (0, 0, 0)), (Some(2), 40, (0, 0, 0)))];
        let err = derive_results(4, &mut fixtures).unwrap_err();
        assert!(matches!(
            err,
            FetcherError::AmbiguousScore { period: 4, fixture_id: 9, points_1: 0, points_2: 40 }
        ));
    }

    #[test]
    fn test_period_map_drops_future_events() {
        let batches = FixtureBatches::Flat(vec![resolved(1, 1), resolved(2, 2), resolved(3, 3)]);
        let map = batches.into_period_map(2);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }
}
