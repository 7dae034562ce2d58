use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::errors::{AppError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Where the poller gets the raw livescore document from.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Value>;
}

pub struct GoalServeClient {
    client: Client,
    url: String,
}

impl GoalServeClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(GoalServeClient {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl FeedSource for GoalServeClient {
    async fn fetch(&self) -> Result<Value> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "livescore feed returned {}",
                status
            )));
        }

        Ok(response.json::<Value>().await?)
    }
}
