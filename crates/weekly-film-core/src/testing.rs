use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use weekly_film_models::FilmRecord;
use weekly_film_sources::{FeedError, FilmFeed};

pub fn films(prefix: &str, count: usize) -> Vec<FilmRecord> {
    (0..count)
        .map(|i| {
            FilmRecord::from_value(json!({
                "title": format!("{} {}", prefix, i),
                "releaseDateStr": format!("10月{}日", i % 28 + 1),
            }))
        })
        .collect()
}

/// Feed that replays scripted responses in order.
#[derive(Default)]
pub struct ScriptedFeed {
    responses: Mutex<VecDeque<Result<Vec<FilmRecord>, FeedError>>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl ScriptedFeed {
    pub fn new(responses: Vec<Result<Vec<FilmRecord>, FeedError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            gate: None,
        }
    }

    /// Each fetch signals `entered`, then waits for `release`.
    pub fn gated(mut self, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        self.gate = Some((entered, release));
        self
    }
}

#[async_trait]
impl FilmFeed for ScriptedFeed {
    fn feed_name(&self) -> &str {
        "scripted"
    }

    async fn fetch_films(&self) -> Result<Vec<FilmRecord>, FeedError> {
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FeedError::Transport("no scripted response".to_string())))
    }
}
