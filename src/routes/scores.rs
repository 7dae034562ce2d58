use axum::{routing::get, Router};

use crate::{handlers::scores, state::AppState};

pub fn score_routes() -> Router<AppState> {
    Router::new()
        .route("/live", get(scores::get_live_scores))
        .route("/finished", get(scores::get_finished_summary))
}
