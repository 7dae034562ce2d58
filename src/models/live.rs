// models/live.rs
use serde::{Deserialize, Serialize};

use crate::models::score_log::ScoreLogEntry;

/// What the live-snapshot builder produced for one in-progress category.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotOutcome {
    Snapshot(Box<LiveSnapshot>),
    /// The match has started but no ball has been bowled yet.
    Skip,
}

/// Latest known state of an in-progress match. Published to the cache and
/// replaced wholesale every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub goal_id: String,
    pub match_id: String,
    pub in_progress: bool,
    pub home_team: String,
    pub visitor_team: String,
    pub match_type: String,
    pub match_date: String,
    pub batting_team: String,
    pub last_over: Option<u32>,
    pub last_over_score: Option<u32>,
    pub wickets_count: u32,
    pub current_innings: InningsState,
    pub previous_innings: Option<InningsState>,
    pub latest_ball: Option<BallUpdate>,
    pub post: Option<String>,
    pub first_six_overs_leader: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InningsState {
    pub inning_number: u32,
    pub team: String,
    pub score: String,
    pub wickets: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub batsmen: Vec<CreaseBatsman>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bowler: Option<ActiveBowler>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreaseBatsman {
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBowler {
    pub name: String,
    pub overs: String,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallUpdate {
    pub over: String,
    pub over_ended: bool,
    pub runs: u32,
    pub post: String,
}

impl LiveSnapshot {
    /// Over-log row for the last completed over; `None` until an over has ended.
    pub fn over_entry(&self) -> Option<ScoreLogEntry> {
        let over = self.last_over?;
        Some(ScoreLogEntry {
            id: None,
            goal_id: self.goal_id.clone(),
            match_id: self.match_id.clone(),
            home_team: self.home_team.clone(),
            visitor_team: self.visitor_team.clone(),
            match_status: "In progress".to_string(),
            match_date: self.match_date.clone(),
            match_type: self.match_type.clone(),
            batting_team: self.batting_team.clone(),
            over,
            runs: self.last_over_score.unwrap_or_default(),
            over_wickets: self.wickets_count,
            created_at: None,
        })
    }

    pub fn is_fixture(&self, home_team: &str, visitor_team: &str) -> bool {
        self.home_team == home_team && self.visitor_team == visitor_team
    }
}
