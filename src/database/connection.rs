use mongodb::{bson::doc, Client, Database};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::store::{OVER_SCORES_COLLECTION, SUMMARIES_COLLECTION};

pub async fn get_db_client(config: &AppConfig) -> Result<Database> {
    let client = Client::with_uri_str(&config.database_url).await?;
    let db = client.database(&config.database_name);

    db.run_command(doc! { "ping": 1 }).await?;
    tracing::info!("Connected to database: {}", config.database_name);

    // Collections are created on first insert; only note what is missing.
    match db.list_collection_names().await {
        Ok(collections) => {
            for expected in [SUMMARIES_COLLECTION, OVER_SCORES_COLLECTION] {
                if !collections.iter().any(|c| c == expected) {
                    tracing::warn!("'{}' collection not found, it will be created on first write", expected);
                }
            }
        }
        Err(e) => tracing::warn!("Could not list collections in '{}': {}", config.database_name, e),
    }

    Ok(db)
}
