// models/summary.rs
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::feed::STATUS_FINISHED;

/// Derived statistics for one finished fixture, as stored in `match_summaries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub goal_id: String,
    pub match_id: String,
    pub match_type: String,
    /// ISO `YYYY-MM-DD`.
    pub match_date: String,
    pub match_status: String,

    pub home_team: String,
    pub visitor_team: String,
    pub home_team_score: u32,
    pub visitor_team_score: u32,
    pub home_team_wickets: u32,
    pub visitor_team_wickets: u32,
    /// `None` when both sides finished level.
    pub won: Option<String>,
    pub total_match_runs: u32,

    pub home_team_sixes: u32,
    pub visitor_team_sixes: u32,
    pub total_sixes: u32,
    pub home_team_fours: u32,
    pub visitor_team_fours: u32,
    pub total_fours: u32,

    pub first_innings_score: u32,
    pub second_innings_score: u32,

    pub toss: String,
    pub player_of_the_match: String,
    pub fifty_scorers: Vec<BatsmanMilestone>,
    pub century_scorers: Vec<BatsmanMilestone>,
    pub player_to_hit_most_sixes: Option<String>,
    pub most_run_outs: String,
    pub highest_opening_partnership: u32,
    pub highest_first_six_overs_score: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatsmanMilestone {
    pub batsman: String,
    pub runs: u32,
}

impl std::fmt::Display for BatsmanMilestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {}", self.batsman, self.runs)
    }
}

/// Identifies a summary in the store independently of its generated id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SummaryKey {
    pub goal_id: String,
    pub home_team: String,
    pub visitor_team: String,
    pub match_date: String,
    pub match_status: String,
}

impl MatchSummary {
    pub fn natural_key(&self) -> SummaryKey {
        SummaryKey {
            goal_id: self.goal_id.clone(),
            home_team: self.home_team.clone(),
            visitor_team: self.visitor_team.clone(),
            match_date: self.match_date.clone(),
            match_status: self.match_status.clone(),
        }
    }

    pub fn has_player_of_the_match(&self) -> bool {
        !self.player_of_the_match.trim().is_empty()
    }
}

impl SummaryKey {
    pub fn finished(goal_id: &str, home_team: &str, visitor_team: &str, match_date: &str) -> Self {
        SummaryKey {
            goal_id: goal_id.to_string(),
            home_team: home_team.to_string(),
            visitor_team: visitor_team.to_string(),
            match_date: match_date.to_string(),
            match_status: STATUS_FINISHED.to_string(),
        }
    }
}

/// Tally of something per side, rendered `Team : n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideTally<'a> {
    pub team: &'a str,
    pub count: u32,
}

impl std::fmt::Display for SideTally<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {}", self.team, self.count)
    }
}

/// Joins entries with ` | `, the separator the downstream consumers expect.
pub fn join_entries<T: std::fmt::Display>(entries: &[T]) -> String {
    entries
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}
