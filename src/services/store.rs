use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::{Collection, Database};

use crate::errors::{AppError, Result};
use crate::models::score_log::{OverKey, ScoreLogEntry};
use crate::models::summary::{MatchSummary, SummaryKey};

pub const SUMMARIES_COLLECTION: &str = "match_summaries";
pub const OVER_SCORES_COLLECTION: &str = "over_scores";

/// Persistence for finished-match summaries and the per-over score log.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn find_summary(&self, key: &SummaryKey) -> Result<Option<MatchSummary>>;

    async fn insert_summary(&self, summary: &MatchSummary) -> Result<()>;

    /// Set a single string field on a stored summary.
    async fn update_field(&self, id: &ObjectId, field: &str, value: &str) -> Result<()>;

    async fn find_over(&self, key: &OverKey) -> Result<Option<ScoreLogEntry>>;

    async fn insert_over(&self, entry: &ScoreLogEntry) -> Result<()>;

    /// Every logged over for a fixture, both batting sides.
    async fn query_over_log(
        &self,
        home_team: &str,
        visitor_team: &str,
        match_date: &str,
    ) -> Result<Vec<ScoreLogEntry>>;

    /// Drop over rows written before `before`. Returns how many went.
    async fn prune_over_log(&self, before: DateTime<Utc>) -> Result<u64>;
}

pub struct MongoStore {
    summaries: Collection<MatchSummary>,
    overs: Collection<ScoreLogEntry>,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        MongoStore {
            summaries: db.collection(SUMMARIES_COLLECTION),
            overs: db.collection(OVER_SCORES_COLLECTION),
        }
    }
}

fn summary_filter(key: &SummaryKey) -> Document {
    doc! {
        "goal_id": &key.goal_id,
        "home_team": &key.home_team,
        "visitor_team": &key.visitor_team,
        "match_date": &key.match_date,
        "match_status": &key.match_status,
    }
}

fn over_filter(key: &OverKey) -> Document {
    doc! {
        "goal_id": &key.goal_id,
        "home_team": &key.home_team,
        "visitor_team": &key.visitor_team,
        "match_date": &key.match_date,
        "batting_team": &key.batting_team,
        "over": i64::from(key.over),
    }
}

#[async_trait]
impl ScoreStore for MongoStore {
    async fn find_summary(&self, key: &SummaryKey) -> Result<Option<MatchSummary>> {
        Ok(self.summaries.find_one(summary_filter(key)).await?)
    }

    async fn insert_summary(&self, summary: &MatchSummary) -> Result<()> {
        let result = self.summaries.insert_one(summary).await?;
        tracing::debug!(id = ?result.inserted_id, goal_id = %summary.goal_id, "summary stored");
        Ok(())
    }

    async fn update_field(&self, id: &ObjectId, field: &str, value: &str) -> Result<()> {
        let mut set = Document::new();
        set.insert(field, value);

        let result = self
            .summaries
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::DocumentNotFound);
        }
        Ok(())
    }

    async fn find_over(&self, key: &OverKey) -> Result<Option<ScoreLogEntry>> {
        Ok(self.overs.find_one(over_filter(key)).await?)
    }

    async fn insert_over(&self, entry: &ScoreLogEntry) -> Result<()> {
        let mut row = entry.clone();
        row.created_at.get_or_insert_with(BsonDateTime::now);
        self.overs.insert_one(&row).await?;
        Ok(())
    }

    async fn query_over_log(
        &self,
        home_team: &str,
        visitor_team: &str,
        match_date: &str,
    ) -> Result<Vec<ScoreLogEntry>> {
        let filter = doc! {
            "home_team": home_team,
            "visitor_team": visitor_team,
            "match_date": match_date,
        };
        let cursor = self.overs.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn prune_over_log(&self, before: DateTime<Utc>) -> Result<u64> {
        let filter = doc! { "created_at": { "$lt": BsonDateTime::from_chrono(before) } };
        let result = self.overs.delete_many(filter).await?;
        Ok(result.deleted_count)
    }
}
