use crate::client::LeagueApi;
use crate::models::{Gameweek, H2hFixture};
use crate::retriever::{FixtureRetriever, RetrievalOutcome};
use crate::{FetcherError, Result};
use tracing::{info, Instrument, Span};

/// League state for one run: the season's gameweeks and the current one
pub struct LeagueSession<A: LeagueApi> {
    api: A,
    gameweeks: Vec<Gameweek>,
    current: u32,
    next: Option<u32>,
    span: Span,
}

impl<A: LeagueApi> LeagueSession<A> {
    /// Fetch gameweek metadata and locate the current gameweek
    pub async fn open(api: A, span: Span) -> Result<Self> {
        let gameweeks = api.gameweeks().instrument(span.clone()).await?;

        let (current, next) = span.in_scope(|| {
            let mut current = None;
            let mut next = None;
            for gw in &gameweeks {
                if gw.is_current {
                    info!("Current gameweek: {}", gw.id);
                    current = Some(gw.id);
                }
                if gw.is_next {
                    info!("Next gameweek: {}", gw.id);
                    next = Some(gw.id);
                }
            }
            (current, next)
        });

        let current = current.ok_or(FetcherError::NoCurrentGameweek)?;
        Ok(Self { api, gameweeks, current, next, span })
    }

    pub fn current_gameweek(&self) -> u32 {
        self.current
    }

    pub fn next_gameweek(&self) -> Option<u32> {
        self.next
    }

    pub fn gameweek(&self, id: u32) -> Option<&Gameweek> {
        self.gameweeks.iter().find(|gw| gw.id == id)
    }

    /// Whether upstream has officially checked the current gameweek's data.
    ///
    /// The gameweek list is indexed by `id - 1`; a mismatch means the
    /// metadata cannot be trusted.
    pub fn is_gameweek_data_checked(&self) -> Result<bool> {
        let index = self.current.checked_sub(1).map(|i| i as usize);
        let gw = index.and_then(|i| self.gameweeks.get(i)).ok_or(
            FetcherError::WrongPeriodInvariant { expected: self.current, found: 0 },
        )?;

        if gw.id != self.current {
            return Err(FetcherError::WrongPeriodInvariant { expected: self.current, found: gw.id });
        }
        Ok(gw.is_current && gw.data_checked)
    }

    /// Retrieve validated fixtures for every gameweek up to the current one
    pub async fn retrieve_fixtures(&self) -> Result<RetrievalOutcome> {
        let data_checked = self.is_gameweek_data_checked()?;
        FixtureRetriever::new(&self.api, self.current, data_checked, self.span.clone())
            .retrieve_all()
            .await
    }

    /// Pairings for the next gameweek, empty once the season is over
    pub async fn upcoming_fixtures(&self) -> Result<Vec<H2hFixture>> {
        match self.next {
            Some(next) => self.api.fixtures_for_period(next).instrument(self.span.clone()).await,
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retriever::Strategy;
    use crate::validator::tests::fixture;
    use async_trait::async_trait;

    struct StaticLeague {
        gameweeks: Vec<Gameweek>,
    }

    #[async_trait]
    impl LeagueApi for StaticLeague {
        async fn gameweeks(&self) -> Result<Vec<Gameweek>> {
            Ok(self.gameweeks.clone())
        }

        async fn fixtures_for_period(&self, period: u32) -> Result<Vec<H2hFixture>> {
            Ok(vec![fixture(period as u64, period, (Some(1), 60, (1, 0, 0)), (Some(2), 50, (0, 0, 1)))])
        }

        async fn fixtures_for_period_page(&self, period: u32, _page: u32) -> Result<Vec<H2hFixture>> {
            self.fixtures_for_period(period).await
        }

        async fn all_fixtures(&self) -> Result<Vec<H2hFixture>> {
            Ok(Vec::new())
        }
    }

    fn gameweek(id: u32, is_current: bool, is_next: bool, data_checked: bool) -> Gameweek {
        Gameweek {
            id,
            name: format!("Gameweek {id}"),
            deadline_time: None,
            finished: data_checked,
            data_checked,
            is_current,
            is_next,
        }
    }

    fn season() -> Vec<Gameweek> {
        vec![
            gameweek(1, false, false, true),
            gameweek(2, true, false, true),
            gameweek(3, false, true, false),
        ]
    }

    #[tokio::test]
    async fn test_open_finds_current_and_next() {
        let session = LeagueSession::open(StaticLeague { gameweeks: season() }, Span::none())
            .await
            .unwrap();
        assert_eq!(session.current_gameweek(), 2);
        assert_eq!(session.next_gameweek(), Some(3));
        assert_eq!(session.gameweek(3).map(|gw| gw.name.as_str()), Some("Gameweek 3"));
        assert!(session.gameweek(9).is_none());
        assert!(session.is_gameweek_data_checked().unwrap());
    }

    #[tokio::test]
    async fn test_open_without_current_gameweek() {
        let gameweeks = vec![gameweek(1, false, true, false)];
        let result = LeagueSession::open(StaticLeague { gameweeks }, Span::none()).await;
        assert!(matches!(result, Err(FetcherError::NoCurrentGameweek)));
    }

    #[tokio::test]
    async fn test_wrong_period_invariant() {
        // Gameweek 2 is missing from the list, so index 1 holds gameweek 3
        let gameweeks = vec![gameweek(1, false, false, true), gameweek(3, true, false, true)];
        let session = LeagueSession::open(StaticLeague { gameweeks }, Span::none()).await.unwrap();

        let err = session.is_gameweek_data_checked().unwrap_err();
        assert!(matches!(err, FetcherError::WrongPeriodInvariant { expected: 3, found: 0 }));

        let gameweeks = vec![gameweek(2, true, false, true), gameweek(1, false, false, true)];
        let session = LeagueSession::open(StaticLeague { gameweeks }, Span::none()).await.unwrap();
        let err = session.retrieve_fixtures().await.unwrap_err();
        assert!(matches!(err, FetcherError::WrongPeriodInvariant { expected: 2, found: 1 }));
    }

    #[tokio::test]
    async fn test_retrieve_and_upcoming() {
        let session = LeagueSession::open(StaticLeague { gameweeks: season() }, Span::none())
            .await
            .unwrap();

        match session.retrieve_fixtures().await.unwrap() {
            RetrievalOutcome::Resolved(fixtures) => {
                assert_eq!(fixtures.strategy, Strategy::PerPeriod);
                assert_eq!(fixtures.upto, 2);
                assert_eq!(fixtures.batches.fixture_count(), 2);
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        let upcoming = session.upcoming_fixtures().await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].event, 3);
    }
}
