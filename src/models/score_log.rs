// models/score_log.rs
use bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// One completed over for one batting side, as stored in `over_scores`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLogEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub goal_id: String,
    pub match_id: String,
    pub home_team: String,
    pub visitor_team: String,
    pub match_status: String,
    pub match_date: String,
    pub match_type: String,
    pub batting_team: String,
    pub over: u32,
    pub runs: u32,
    pub over_wickets: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverKey {
    pub goal_id: String,
    pub home_team: String,
    pub visitor_team: String,
    pub match_date: String,
    pub batting_team: String,
    pub over: u32,
}

impl ScoreLogEntry {
    pub fn natural_key(&self) -> OverKey {
        OverKey {
            goal_id: self.goal_id.clone(),
            home_team: self.home_team.clone(),
            visitor_team: self.visitor_team.clone(),
            match_date: self.match_date.clone(),
            batting_team: self.batting_team.clone(),
            over: self.over,
        }
    }
}
