use crate::cache::{format_update_time, FilmCache, FilmStore};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, instrument, warn};
use weekly_film_models::FilmRecord;
use weekly_film_sources::{FeedError, FilmFeed};

type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Published state after a successful refresh cycle.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RefreshOutcome {
    pub film_list: Vec<FilmRecord>,
    pub update_time: String,
    /// Entries the feed returned before truncation.
    #[serde(skip)]
    pub fetched: usize,
}

impl RefreshOutcome {
    fn from_snapshot(snapshot: &FilmCache, fetched: usize) -> Self {
        Self {
            film_list: snapshot.films().to_vec(),
            update_time: snapshot.update_time().unwrap_or_default(),
            fetched,
        }
    }
}

/// The single failure signal a refresh cycle reports. The underlying
/// [`FeedError`] is kept for logs only.
#[derive(Debug, Error)]
#[error("update failed: {source}")]
pub struct UpdateFailed {
    #[source]
    source: FeedError,
}

impl UpdateFailed {
    pub fn feed_error(&self) -> &FeedError {
        &self.source
    }

    pub fn kind(&self) -> &'static str {
        self.source.kind()
    }
}

/// Health of the refresh cycle, for the availability indication.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RefreshStatus {
    pub last_update_success: bool,
    pub last_attempt: Option<DateTime<Local>>,
    pub last_success: Option<DateTime<Local>>,
    pub last_error: Option<String>,
    pub last_error_kind: Option<&'static str>,
    pub consecutive_failures: u32,
}

/// Fetches the feed and replaces the shared cache.
///
/// Cycles are serialized: [`Refresher::refresh`] waits for a running cycle,
/// [`Refresher::try_refresh`] skips instead.
#[derive(Clone)]
pub struct Refresher {
    feed: Arc<dyn FilmFeed>,
    store: FilmStore,
    status: Arc<RwLock<RefreshStatus>>,
    in_flight: Arc<Mutex<()>>,
    clock: Clock,
}

impl Refresher {
    pub fn new(feed: Arc<dyn FilmFeed>, store: FilmStore) -> Self {
        Self {
            feed,
            store,
            status: Arc::new(RwLock::new(RefreshStatus::default())),
            in_flight: Arc::new(Mutex::new(())),
            clock: Arc::new(Local::now),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn store(&self) -> &FilmStore {
        &self.store
    }

    pub async fn status(&self) -> RefreshStatus {
        self.status.read().await.clone()
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, UpdateFailed> {
        let _guard = self.in_flight.lock().await;
        self.run_cycle().await
    }

    /// Like [`Refresher::refresh`], but returns `None` without fetching when
    /// another cycle is still running.
    pub async fn try_refresh(&self) -> Option<Result<RefreshOutcome, UpdateFailed>> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!(
                operation = "refresh_skipped",
                feed = self.feed.feed_name(),
                "Previous refresh still running, skipping this cycle"
            );
            return None;
        };
        Some(self.run_cycle().await)
    }

    #[instrument(skip(self), fields(feed = self.feed.feed_name()))]
    async fn run_cycle(&self) -> Result<RefreshOutcome, UpdateFailed> {
        let start = Instant::now();
        info!(operation = "refresh_start", "Refreshing upcoming films");

        let result = self.feed.fetch_films().await;
        let now = (self.clock)();

        match result {
            Ok(films) => {
                let fetched = films.len();
                let snapshot = self.store.replace(films, now).await;
                self.record_success(now).await;
                info!(
                    operation = "refresh_complete",
                    fetched,
                    cached = snapshot.len(),
                    update_time = %format_update_time(&now),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Film cache replaced"
                );
                Ok(RefreshOutcome::from_snapshot(&snapshot, fetched))
            }
            Err(e) => {
                match &e {
                    FeedError::Parse { body, .. } => error!(
                        operation = "refresh_error",
                        kind = e.kind(),
                        error = %e,
                        response_text = %body,
                        "Error fetching film data, response was not valid JSON"
                    ),
                    FeedError::Http { status, body } => error!(
                        operation = "refresh_error",
                        kind = e.kind(),
                        status = *status,
                        response_text = %body,
                        "Error fetching film data: {}",
                        e
                    ),
                    _ => error!(
                        operation = "refresh_error",
                        kind = e.kind(),
                        error = %e,
                        "Error fetching film data"
                    ),
                }
                self.record_failure(now, &e).await;
                Err(UpdateFailed { source: e })
            }
        }
    }

    async fn record_success(&self, now: DateTime<Local>) {
        let mut status = self.status.write().await;
        status.last_update_success = true;
        status.last_attempt = Some(now);
        status.last_success = Some(now);
        status.last_error = None;
        status.last_error_kind = None;
        status.consecutive_failures = 0;
    }

    async fn record_failure(&self, now: DateTime<Local>, e: &FeedError) {
        let mut status = self.status.write().await;
        status.last_update_success = false;
        status.last_attempt = Some(now);
        status.last_error = Some(e.to_string());
        status.last_error_kind = Some(e.kind());
        status.consecutive_failures += 1;
    }
}
