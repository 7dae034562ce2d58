// Shared fixtures and in-memory collaborators for unit tests.
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bson::{oid::ObjectId, DateTime as BsonDateTime};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::feed::FeedCategory;
use crate::models::score_log::{OverKey, ScoreLogEntry};
use crate::models::summary::{MatchSummary, SummaryKey};
use crate::services::cache::LiveCache;
use crate::services::feed_client::FeedSource;
use crate::services::store::ScoreStore;

/// A finished T20: A 180/7 lose to B 181/4, A won the toss.
pub fn finished_fixture() -> Value {
    json!({
        "id": "1001",
        "name": "Test League",
        "match": {
            "id": "55501",
            "status": "Finished",
            "type": "T20",
            "date": "03.04.2021",
            "localteam": { "name": "A", "totalscore": "180/7", "winner": "false" },
            "visitorteam": { "name": "B", "totalscore": "181/4", "winner": "true" },
            "matchinfo": {
                "info": [
                    { "name": "Toss", "value": "A, elected to bat" },
                    { "name": "Man of the match", "value": "B1" }
                ]
            },
            "inning": [
                {
                    "inningnum": "1",
                    "team": "localteam",
                    "name": "A 1 INN",
                    "total": { "tot": "180 (20 ov, RR: 9.00)", "wickets": "7" },
                    "batsmanstats": {
                        "player": [
                            { "batsman": "A1", "r": "105", "b": "60", "s4": "10", "s6": "5", "status": "c B2 b B7" },
                            { "batsman": "A2", "r": "12", "b": "9", "s4": "1", "s6": "0", "status": "run out (B3)" },
                            { "batsman": "A3", "r": "55", "b": "40", "s4": "4", "s6": "2", "status": "not out" },
                            { "batsman": "A4", "r": "0", "b": "1", "s4": "0", "s6": "0", "status": "run out (B1)" }
                        ]
                    },
                    "bowlers": { "player": { "bowler": "B7", "o": "4", "r": "30", "w": "1" } }
                },
                {
                    "inningnum": "2",
                    "team": "visitorteam",
                    "name": "B 2 INN",
                    "total": { "tot": "181 (19.4 ov, RR: 9.20)", "wickets": "4" },
                    "batsmanstats": {
                        "player": [
                            { "batsman": "B1", "r": "60", "b": "38", "s4": "5", "s6": "5", "status": "not out" },
                            { "batsman": "B2", "r": "30", "b": "22", "s4": "3", "s6": "1", "status": "run out (A2)" },
                            { "batsman": "B3", "r": "51", "b": "30", "s4": "2", "s6": "3", "status": "b A9" },
                            { "batsman": "B4", "r": "40", "b": "28", "s4": "0", "s6": "0", "status": "run out (A1)" }
                        ]
                    },
                    "bowlers": { "player": [ { "bowler": "A9", "o": "4", "r": "35", "w": "1" } ] }
                }
            ]
        }
    })
}

/// B chasing A's 150 in the second innings, six overs completed.
pub fn in_progress_fixture() -> Value {
    json!({
        "id": "2002",
        "name": "Test League",
        "match": {
            "id": "66602",
            "status": "In Progress",
            "type": "T20",
            "date": "04.04.2021",
            "localteam": { "name": "A", "totalscore": "150/8" },
            "visitorteam": { "name": "B", "totalscore": "45/2" },
            "comment": { "post": "B need 106 runs in 84 balls" },
            "lineups": {
                "localteam": { "player": [ { "name": "A1" }, { "name": "A2" }, { "name": "A9" } ] },
                "visitorteam": { "player": [ { "name": "B1" }, { "name": "B2" }, { "name": "B3" } ] }
            },
            "inning": [
                {
                    "inningnum": "1",
                    "team": "localteam",
                    "name": "A 1 INN",
                    "total": { "tot": "150", "wickets": "8" },
                    "batsmanstats": { "player": [ { "batsman": "A1", "r": "70", "status": "c B1 b B9" } ] },
                    "bowlers": { "player": { "bowler": "B9", "o": "4", "r": "20", "w": "3" } }
                },
                {
                    "inningnum": "2",
                    "team": "visitorteam",
                    "name": "B 2 INN",
                    "total": { "tot": "45", "wickets": "2" },
                    "batsmanstats": {
                        "player": [
                            { "batsman": "B1", "r": "20", "b": "14", "s4": "2", "s6": "1", "status": "c A1 b A9" },
                            { "batsman": "B2", "r": "15", "b": "12", "s4": "1", "s6": "0", "status": "not out" },
                            { "batsman": "B3", "r": "4", "b": "5", "s4": "0", "s6": "0", "status": "not out" }
                        ]
                    },
                    "bowlers": {
                        "player": [
                            { "bowler": "A9", "o": "2", "r": "14", "w": "1", "ball": "False" },
                            { "bowler": "A7", "o": "1.1", "r": "6", "w": "0", "ball": "True" }
                        ]
                    }
                }
            ],
            "commentaries": {
                "commentary": [
                    { "over": "6.1", "over_ended": "False", "runs": "1", "post": "A7 to B2, 1 run" },
                    { "over": "5.6", "over_ended": "True", "runs": "9", "post": "A9 to B3, no run" },
                    { "over": "5.5", "over_ended": "False", "runs": "0", "post": "A9 to B1, out" },
                    { "over": "4.6", "over_ended": "True", "runs": "7", "post": "A7 to B2, four" }
                ]
            },
            "wickets": {
                "wicket": [
                    { "overs": "2.3", "player": "B4" },
                    { "overs": "5.5", "player": "B1" }
                ]
            }
        }
    })
}

pub fn category(value: Value) -> FeedCategory {
    serde_json::from_value(value).expect("fixture category should decode")
}

pub fn feed_of(categories: Vec<Value>) -> Value {
    json!({ "scores": { "sport": "cricket", "category": categories } })
}

pub fn log_entry(batting_team: &str, over: u32, runs: u32) -> ScoreLogEntry {
    ScoreLogEntry {
        id: None,
        goal_id: "2002".to_string(),
        match_id: "66602".to_string(),
        home_team: "A".to_string(),
        visitor_team: "B".to_string(),
        match_status: "In progress".to_string(),
        match_date: "2021-04-04".to_string(),
        match_type: "T20".to_string(),
        batting_team: batting_team.to_string(),
        over,
        runs,
        over_wickets: 0,
        created_at: None,
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        feed_url: "http://localhost:9000/feed.json".to_string(),
        database_url: "mongodb://localhost:27017".to_string(),
        database_name: "cricket_test".to_string(),
        redis_url: "redis://127.0.0.1:6379".to_string(),
        poll_interval: Duration::from_millis(10),
        live_cache_key: "goalServeLive".to_string(),
        live_cache_ttl_secs: 3600,
        over_log_retention_days: 30,
        port: 4040,
        host: "127.0.0.1".to_string(),
    }
}

// ---------------------------------------------------------------------------
// In-memory collaborators
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    pub summaries: Mutex<Vec<MatchSummary>>,
    pub overs: Mutex<Vec<ScoreLogEntry>>,
    pub field_updates: Mutex<Vec<(ObjectId, String, String)>>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        MemoryStore {
            fail_writes: true,
            ..Default::default()
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            Err(AppError::service("store unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ScoreStore for MemoryStore {
    async fn find_summary(&self, key: &SummaryKey) -> Result<Option<MatchSummary>> {
        let summaries = self.summaries.lock().unwrap();
        Ok(summaries.iter().find(|s| &s.natural_key() == key).cloned())
    }

    async fn insert_summary(&self, summary: &MatchSummary) -> Result<()> {
        self.check_writable()?;
        let mut stored = summary.clone();
        stored.id = Some(ObjectId::new());
        self.summaries.lock().unwrap().push(stored);
        Ok(())
    }

    async fn update_field(&self, id: &ObjectId, field: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        let mut summaries = self.summaries.lock().unwrap();
        let summary = summaries
            .iter_mut()
            .find(|s| s.id.as_ref() == Some(id))
            .ok_or(AppError::DocumentNotFound)?;
        if field == "player_of_the_match" {
            summary.player_of_the_match = value.to_string();
        }
        self.field_updates
            .lock()
            .unwrap()
            .push((*id, field.to_string(), value.to_string()));
        Ok(())
    }

    async fn find_over(&self, key: &OverKey) -> Result<Option<ScoreLogEntry>> {
        let overs = self.overs.lock().unwrap();
        Ok(overs.iter().find(|o| &o.natural_key() == key).cloned())
    }

    async fn insert_over(&self, entry: &ScoreLogEntry) -> Result<()> {
        self.check_writable()?;
        let mut stored = entry.clone();
        stored.id = Some(ObjectId::new());
        stored.created_at.get_or_insert_with(BsonDateTime::now);
        self.overs.lock().unwrap().push(stored);
        Ok(())
    }

    async fn query_over_log(
        &self,
        home_team: &str,
        visitor_team: &str,
        match_date: &str,
    ) -> Result<Vec<ScoreLogEntry>> {
        let overs = self.overs.lock().unwrap();
        Ok(overs
            .iter()
            .filter(|o| {
                o.home_team == home_team
                    && o.visitor_team == visitor_team
                    && o.match_date == match_date
            })
            .cloned()
            .collect())
    }

    async fn prune_over_log(&self, before: DateTime<Utc>) -> Result<u64> {
        self.check_writable()?;
        let cutoff = BsonDateTime::from_chrono(before);
        let mut overs = self.overs.lock().unwrap();
        let kept_before = overs.len();
        overs.retain(|o| o.created_at.map(|c| c >= cutoff).unwrap_or(true));
        Ok((kept_before - overs.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryCache {
    pub entries: Mutex<HashMap<String, (String, u64)>>,
}

#[async_trait]
impl LiveCache for MemoryCache {
    async fn set_with_ttl(&self, key: &str, value: &str, seconds: u64) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), seconds));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone()))
    }
}

/// Serves the same decoded document on every fetch.
pub struct StaticFeed(pub Value);

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch(&self) -> Result<Value> {
        Ok(self.0.clone())
    }
}
