use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    errors::{AppError, Result},
    models::{live::LiveSnapshot, summary::{MatchSummary, SummaryKey}},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    pub hometeam: Option<String>,
    pub visitorteam: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FinishedQuery {
    pub goal_id: String,
    pub hometeam: String,
    pub visitorteam: String,
    /// `YYYY-MM-DD`
    pub date: String,
}

// GET /api/scores/live
pub async fn get_live_scores(
    State(state): State<AppState>,
    Query(query): Query<LiveQuery>,
) -> Result<Json<Value>> {
    let snapshots: Vec<LiveSnapshot> = match state.cache.get(&state.config.live_cache_key).await? {
        Some(raw) => serde_json::from_str(&raw)?,
        None => Vec::new(),
    };

    match (query.hometeam, query.visitorteam) {
        (Some(home), Some(visitor)) => {
            let snapshot = snapshots
                .into_iter()
                .find(|s| s.is_fixture(&home, &visitor))
                .ok_or(AppError::DocumentNotFound)?;
            Ok(Json(json!({ "success": true, "data": snapshot })))
        }
        (None, None) => Ok(Json(json!({
            "success": true,
            "count": snapshots.len(),
            "data": snapshots,
        }))),
        _ => Err(AppError::invalid_data(
            "hometeam and visitorteam must be given together",
        )),
    }
}

// GET /api/scores/finished
pub async fn get_finished_summary(
    State(state): State<AppState>,
    Query(query): Query<FinishedQuery>,
) -> Result<Json<MatchSummary>> {
    let key = SummaryKey::finished(&query.goal_id, &query.hometeam, &query.visitorteam, &query.date);
    let summary = state
        .store
        .find_summary(&key)
        .await?
        .ok_or(AppError::DocumentNotFound)?;
    Ok(Json(summary))
}

// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::services::cache::LiveCache;
    use crate::services::finished::summarize;
    use crate::services::live::build_snapshot;
    use crate::models::live::SnapshotOutcome;
    use crate::services::store::ScoreStore;
    use crate::test_support::{
        category, finished_fixture, in_progress_fixture, test_config, MemoryCache, MemoryStore,
    };

    async fn state_with_live_snapshot() -> AppState {
        let cache = Arc::new(MemoryCache::default());
        let SnapshotOutcome::Snapshot(snapshot) =
            build_snapshot(&category(in_progress_fixture()), None).unwrap()
        else {
            panic!("expected a snapshot");
        };
        let payload = serde_json::to_string(&vec![*snapshot]).unwrap();
        cache.set_with_ttl("goalServeLive", &payload, 60).await.unwrap();

        AppState::new(
            Arc::new(MemoryStore::default()),
            cache,
            Arc::new(test_config()),
        )
    }

    fn live_query(home: Option<&str>, visitor: Option<&str>) -> Query<LiveQuery> {
        Query(LiveQuery {
            hometeam: home.map(str::to_string),
            visitorteam: visitor.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn lists_all_live_snapshots() {
        let state = state_with_live_snapshot().await;
        let Json(body) = get_live_scores(State(state), live_query(None, None)).await.unwrap();
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["goalId"], "2002");
    }

    #[tokio::test]
    async fn finds_single_fixture_by_teams() {
        let state = state_with_live_snapshot().await;
        let Json(body) = get_live_scores(State(state), live_query(Some("A"), Some("B")))
            .await
            .unwrap();
        assert_eq!(body["data"]["battingTeam"], "B");
        assert_eq!(body["data"]["lastOver"], 6);
    }

    #[tokio::test]
    async fn unknown_fixture_is_not_found() {
        let state = state_with_live_snapshot().await;
        let err = get_live_scores(State(state), live_query(Some("B"), Some("A")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DocumentNotFound));
    }

    #[tokio::test]
    async fn half_a_fixture_is_rejected() {
        let state = state_with_live_snapshot().await;
        let err = get_live_scores(State(state), live_query(Some("A"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn empty_cache_lists_nothing() {
        let state = AppState::new(
            Arc::new(MemoryStore::default()),
            Arc::new(MemoryCache::default()),
            Arc::new(test_config()),
        );
        let Json(body) = get_live_scores(State(state), live_query(None, None)).await.unwrap();
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn finished_summary_is_looked_up_by_natural_key() {
        let store = Arc::new(MemoryStore::default());
        store
            .insert_summary(&summarize(&category(finished_fixture())).unwrap())
            .await
            .unwrap();
        let state = AppState::new(store, Arc::new(MemoryCache::default()), Arc::new(test_config()));

        let query = |date: &str| {
            Query(FinishedQuery {
                goal_id: "1001".to_string(),
                hometeam: "A".to_string(),
                visitorteam: "B".to_string(),
                date: date.to_string(),
            })
        };

        let Json(summary) = get_finished_summary(State(state.clone()), query("2021-04-03"))
            .await
            .unwrap();
        assert_eq!(summary.total_match_runs, 361);

        let err = get_finished_summary(State(state), query("2021-04-04"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DocumentNotFound));
    }
}
