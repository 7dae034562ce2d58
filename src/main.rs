use axum::{http::Method, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod config;
mod database;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
#[cfg(test)]
mod test_support;

use config::AppConfig;
use database::connection::get_db_client;
use services::cache::RedisCache;
use services::feed_client::GoalServeClient;
use services::poller::Poller;
use services::store::MongoStore;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = Arc::new(AppConfig::from_env()?);

    let db = get_db_client(&config).await?;
    let store = Arc::new(MongoStore::new(&db));
    let cache = Arc::new(RedisCache::connect(&config.redis_url).await?);
    let feed = Arc::new(GoalServeClient::new(config.feed_url.clone())?);

    let poller = Poller::new(feed, store.clone(), cache.clone(), config.clone());
    tokio::spawn(poller.run());

    let app_state = AppState::new(store, cache, config.clone());
    let app = build_router(app_state);
    start_server(app, &config).await
}

fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    Router::new()
        .route("/health", get(handlers::scores::health_check))
        .nest("/api/scores", routes::scores::score_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn start_server(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
