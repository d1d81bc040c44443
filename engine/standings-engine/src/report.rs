//! Notification payloads built from the ranked table

use crate::aggregator::ParticipantTable;
use crate::participant::Outcome;
use crate::ranking::RankedEntry;
use crate::{Result, StandingsError};
use serde::{Deserialize, Serialize};

/// Payload layout expected by the notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    /// Single line, read out by the pub/sub consumer
    #[default]
    Compact,
    /// Multi-line text sized for SMS gateways
    Sms,
}

/// Build the notification text for `period`.
///
/// Every ranked participant must have a classifiable result for the period;
/// otherwise the fixture data is broken and nothing should be sent.
pub fn build_message(
    format: MessageFormat,
    table: &ParticipantTable,
    ranked: &[RankedEntry],
    period: u32,
) -> Result<String> {
    let mut winners = Vec::new();
    let mut draws = Vec::new();

    for entry in ranked {
        let participant = table.get(entry.participant_id).ok_or(
            StandingsError::InvalidOutcome { participant: entry.participant_id, period },
        )?;
        match participant.outcome(period)? {
            Outcome::Win => winners.push(entry.name.as_str()),
            Outcome::Draw => draws.push(entry.name.as_str()),
            Outcome::Loss => {}
        }
    }

    let message = match format {
        MessageFormat::Compact => compact(&winners, &draws, ranked),
        MessageFormat::Sms => sms(&winners, &draws, ranked),
    };
    Ok(message)
}

fn compact(winners: &[&str], draws: &[&str], ranked: &[RankedEntry]) -> String {
    let mut outcomes = String::new();
    if !winners.is_empty() {
        outcomes.push_str("Winners:");
        outcomes.extend(winners.iter().map(|name| format!("{name}.")));
    }
    if !draws.is_empty() {
        outcomes.push_str("Draw:");
        outcomes.extend(draws.iter().map(|name| format!("{name}.")));
    }

    let ranks: String = ranked
        .iter()
        .map(|entry| format!("{} place {}.", ordinal(entry.rank), entry.name))
        .collect();

    format!("{outcomes}:{ranks}.")
}

fn sms(winners: &[&str], draws: &[&str], ranked: &[RankedEntry]) -> String {
    let mut outcomes = String::new();
    if !winners.is_empty() {
        outcomes.push_str("Winners this week:\n");
        outcomes.extend(winners.iter().map(|name| format!("{name}\n")));
    }
    if !draws.is_empty() {
        outcomes.push_str("Draw this week:\n");
        outcomes.extend(draws.iter().map(|name| format!("{name}\n")));
    }

    let ranks: String = ranked
        .iter()
        .map(|entry| {
            format!(
                "{}. {} {}-{}-{} (W-D-L)\n",
                entry.rank, entry.name, entry.wins, entry.draws, entry.losses
            )
        })
        .collect();

    format!("{outcomes}\n{ranks}\n")
}

/// "First" through "Sixteenth", then "17th", "21st", ...
pub fn ordinal(rank: u32) -> String {
    const WORDS: [&str; 16] = [
        "First", "Second", "Third", "Fourth", "Fifth", "Sixth", "Seventh", "Eighth", "Ninth",
        "Tenth", "Eleventh", "Twelfth", "Thirteenth", "Fourteenth", "Fifteenth", "Sixteenth",
    ];

    if (1..=16).contains(&rank) {
        return WORDS[rank as usize - 1].to_string();
    }

    let suffix = match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{rank}{suffix}")
}
