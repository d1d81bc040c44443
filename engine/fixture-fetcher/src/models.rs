use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// FPL gameweek metadata (one entry of `bootstrap-static` events)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Gameweek {
    pub id: u32,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub deadline_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub finished: bool,

    #[serde(default)]
    pub data_checked: bool,

    #[serde(default)]
    pub is_current: bool,

    #[serde(default)]
    pub is_next: bool,
}

/// `bootstrap-static` response, trimmed to what the session needs
#[derive(Debug, Deserialize)]
pub struct BootstrapStatic {
    pub events: Vec<Gameweek>,
}

/// One page of `leagues-h2h-matches`
#[derive(Debug, Deserialize)]
pub struct H2hMatchesPage {
    #[serde(default)]
    pub has_next: bool,

    #[serde(default)]
    pub page: u32,

    pub results: Vec<RawFixture>,
}

/// Flat fixture record exactly as the FPL API returns it
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct RawFixture {
    pub id: u64,
    pub event: u32,

    pub entry_1_entry: Option<u64>,
    pub entry_1_name: Option<String>,
    pub entry_1_player_name: Option<String>,
    pub entry_1_points: i64,
    pub entry_1_win: u8,
    pub entry_1_draw: u8,
    pub entry_1_loss: u8,
    pub entry_1_total: u8,

    pub entry_2_entry: Option<u64>,
    pub entry_2_name: Option<String>,
    pub entry_2_player_name: Option<String>,
    pub entry_2_points: i64,
    pub entry_2_win: u8,
    pub entry_2_draw: u8,
    pub entry_2_loss: u8,
    pub entry_2_total: u8,
}

/// One side of a head-to-head fixture
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FixtureSide {
    /// `None` when the opponent is the league average
    pub entry: Option<u64>,
    pub name: String,
    pub player_name: String,
    pub points: i64,
    pub win: u8,
    pub draw: u8,
    pub loss: u8,
    /// League points awarded for this match (0, 1 or 3)
    pub league_points: u8,
}

impl FixtureSide {
    /// True when upstream has not filled in any result flag yet
    pub fn is_unresolved(&self) -> bool {
        self.win == 0 && self.draw == 0 && self.loss == 0
    }

    fn set_result(&mut self, win: u8, draw: u8, loss: u8, league_points: u8) {
        self.win = win;
        self.draw = draw;
        self.loss = loss;
        self.league_points = league_points;
    }

    pub(crate) fn mark_win(&mut self) {
        self.set_result(1, 0, 0, 3);
    }

    pub(crate) fn mark_draw(&mut self) {
        self.set_result(0, 1, 0, 1);
    }

    pub(crate) fn mark_loss(&mut self) {
        self.set_result(0, 0, 1, 0);
    }
}

/// Head-to-head fixture for one gameweek
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct H2hFixture {
    pub id: u64,
    pub event: u32,
    pub entry_1: FixtureSide,
    pub entry_2: FixtureSide,
}

impl H2hFixture {
    /// Short "A vs B" label used in log lines
    pub fn pairing(&self) -> String {
        format!("{} vs {}", self.entry_1.name, self.entry_2.name)
    }
}

impl From<RawFixture> for H2hFixture {
    fn from(raw: RawFixture) -> Self {
        Self {
            id: raw.id,
            event: raw.event,
            entry_1: FixtureSide {
                entry: raw.entry_1_entry,
                name: raw.entry_1_name.unwrap_or_default(),
                player_name: raw.entry_1_player_name.unwrap_or_default(),
                points: raw.entry_1_points,
                win: raw.entry_1_win,
                draw: raw.entry_1_draw,
                loss: raw.entry_1_loss,
                league_points: raw.entry_1_total,
            },
            entry_2: FixtureSide {
                entry: raw.entry_2_entry,
                name: raw.entry_2_name.unwrap_or_default(),
                player_name: raw.entry_2_player_name.unwrap_or_default(),
                points: raw.entry_2_points,
                win: raw.entry_2_win,
                draw: raw.entry_2_draw,
                loss: raw.entry_2_loss,
                league_points: raw.entry_2_total,
            },
        }
    }
}
