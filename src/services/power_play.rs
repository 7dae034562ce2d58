use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::score_log::ScoreLogEntry;
use crate::models::summary::{join_entries, SideTally};

const POWER_PLAY_OVERS: std::ops::RangeInclusive<u32> = 1..=6;

/// Leader over the first six overs of each side's innings, formatted
/// `"Team : runs"`. An exact tie reports both sides. `None` until the log holds
/// at least one power-play over for either team.
///
/// When the log carries the same over twice for a team, the later row wins.
pub fn highest_power_play_score(
    log: &[ScoreLogEntry],
    team_a: &str,
    team_b: &str,
) -> Option<String> {
    let mut per_team: BTreeMap<&str, BTreeMap<u32, u32>> = BTreeMap::new();
    for entry in log.iter().filter(|e| POWER_PLAY_OVERS.contains(&e.over)) {
        let team = entry.batting_team.as_str();
        if team != team_a && team != team_b {
            continue;
        }
        per_team.entry(team).or_default().insert(entry.over, entry.runs);
    }

    if per_team.is_empty() {
        return None;
    }

    let total = |team: &str| -> u32 {
        per_team
            .get(team)
            .map(|overs| overs.values().sum())
            .unwrap_or_default()
    };
    let a = SideTally { team: team_a, count: total(team_a) };
    let b = SideTally { team: team_b, count: total(team_b) };

    Some(match a.count.cmp(&b.count) {
        Ordering::Greater => a.to_string(),
        Ordering::Less => b.to_string(),
        Ordering::Equal => join_entries(&[a, b]),
    })
}
