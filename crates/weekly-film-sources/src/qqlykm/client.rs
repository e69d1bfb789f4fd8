use crate::error::FeedError;
use crate::qqlykm::api;
use crate::traits::FilmFeed;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use weekly_film_config::ApiConfig;
use weekly_film_models::FilmRecord;

const USER_AGENT: &str = concat!("weeklyfilm/", env!("CARGO_PKG_VERSION"));

/// Client for the qqlykm.cn "即将上映" (coming soon) endpoint.
#[derive(Clone)]
pub struct QqlykmClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl QqlykmClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &ApiConfig, api_key: String) -> Result<Self, FeedError> {
        Self::new(config.base_url.clone(), api_key, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl FilmFeed for QqlykmClient {
    fn feed_name(&self) -> &str {
        "qqlykm"
    }

    async fn fetch_films(&self) -> Result<Vec<FilmRecord>, FeedError> {
        // The key is part of the URL, so only the base is logged
        debug!(base_url = %self.base_url, "Requesting upcoming films");
        let url = api::feed_url(&self.base_url, &self.api_key);
        let films = api::get_upcoming_films(&self.client, &url).await?;
        info!(feed = self.feed_name(), films = films.len(), "Fetched upcoming films");
        Ok(films)
    }
}
