use fixture_fetcher::{FetcherConfig, FplClient, LeagueSession};
use tracing::{error, info, info_span};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = FetcherConfig::from_env()?;
    let league_id = config.league_id;
    let client = FplClient::new(config)?;

    let session = LeagueSession::open(client, info_span!("session", league = league_id)).await?;
    let Some(next) = session.next_gameweek() else {
        info!("Season finished, no upcoming gameweek");
        return Ok(());
    };

    if let Some(deadline) = session.gameweek(next).and_then(|gw| gw.deadline_time) {
        info!("Gameweek {} deadline: {}", next, deadline);
    }

    match session.upcoming_fixtures().await {
        Ok(fixtures) => {
            info!("Gameweek {} fixtures for league {}:", next, league_id);
            for fixture in &fixtures {
                info!(
                    "  {} ({}) vs {} ({})",
                    fixture.entry_1.name,
                    fixture.entry_1.player_name,
                    fixture.entry_2.name,
                    fixture.entry_2.player_name
                );
            }
        }
        Err(e) => {
            error!("Failed to fetch gameweek {} fixtures: {}", next, e);
            return Err(e.into());
        }
    }

    Ok(())
}
