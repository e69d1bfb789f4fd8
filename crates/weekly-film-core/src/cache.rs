use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use weekly_film_models::FilmRecord;

/// Upper bound on cached films per refresh.
pub const MAX_CACHED_FILMS: usize = 25;

/// Format used for the externally visible `update_time` (minute precision).
pub const UPDATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn format_update_time(time: &DateTime<Local>) -> String {
    time.format(UPDATE_TIME_FORMAT).to_string()
}

/// One immutable generation of cached films together with its rotation
/// cursor.
///
/// A refresh never mutates a `FilmCache`; it publishes a new one whose
/// cursor starts at 0. The cursor is the only interior-mutable part.
#[derive(Debug, Default)]
pub struct FilmCache {
    films: Vec<FilmRecord>,
    last_updated: Option<DateTime<Local>>,
    cursor: AtomicUsize,
}

impl FilmCache {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Keeps at most [`MAX_CACHED_FILMS`] films, in feed order.
    pub fn new(mut films: Vec<FilmRecord>, last_updated: DateTime<Local>) -> Self {
        films.truncate(MAX_CACHED_FILMS);
        Self {
            films,
            last_updated: Some(last_updated),
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn films(&self) -> &[FilmRecord] {
        &self.films
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn update_time(&self) -> Option<String> {
        self.last_updated.as_ref().map(format_update_time)
    }

    /// Index of the next film to display, or `None` when there is nothing cached.
    pub fn cursor(&self) -> Option<usize> {
        if self.films.is_empty() {
            None
        } else {
            Some(self.cursor.load(Ordering::SeqCst))
        }
    }

    /// Film at the cursor; the cursor moves on by one (wrapping) whether or
    /// not the caller uses the result. An empty cache leaves it untouched.
    pub fn take_next(&self) -> Option<&FilmRecord> {
        let len = self.films.len();
        if len == 0 {
            return None;
        }
        let index = match self
            .cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |i| Some((i + 1) % len))
        {
            Ok(previous) | Err(previous) => previous,
        };
        self.films.get(index)
    }
}

/// Shared handle to the current [`FilmCache`] generation.
///
/// Replacement swaps the `Arc` under the write lock, so readers always see
/// either the old generation or the new one with its cursor at 0.
#[derive(Clone, Default)]
pub struct FilmStore {
    current: Arc<RwLock<Arc<FilmCache>>>,
}

impl FilmStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Arc<FilmCache> {
        self.current.read().await.clone()
    }

    /// Publish a new generation and return it.
    pub async fn replace(&self, films: Vec<FilmRecord>, updated_at: DateTime<Local>) -> Arc<FilmCache> {
        let next = Arc::new(FilmCache::new(films, updated_at));
        *self.current.write().await = next.clone();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn films(count: usize) -> Vec<FilmRecord> {
        (0..count)
            .map(|i| FilmRecord::from_value(json!({ "title": format!("film {}", i) })))
            .collect()
    }

    fn title(film: Option<&FilmRecord>) -> String {
        film.and_then(|f| f.text("title")).unwrap_or_default()
    }

    #[test]
    fn test_new_truncates_to_limit() {
        let cache = FilmCache::new(films(40), Local::now());
        assert_eq!(cache.len(), MAX_CACHED_FILMS);
        assert_eq!(title(cache.films().last()), "film 24");
    }

    #[test]
    fn test_take_next_is_round_robin() {
        let cache = FilmCache::new(films(3), Local::now());
        let seen: Vec<String> = (0..7).map(|_| title(cache.take_next())).collect();
        assert_eq!(
            seen,
            ["film 0", "film 1", "film 2", "film 0", "film 1", "film 2", "film 0"]
        );
        assert_eq!(cache.cursor(), Some(1));
    }

    #[test]
    fn test_each_film_once_per_cycle() {
        for count in 1..=MAX_CACHED_FILMS {
            let cache = FilmCache::new(films(count), Local::now());
            let mut seen: Vec<String> = (0..count).map(|_| title(cache.take_next())).collect();
            let expected: Vec<String> = (0..count).map(|i| format!("film {}", i)).collect();
            assert_eq!(seen, expected);
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), count);
            assert_eq!(cache.cursor(), Some(0));
        }
    }

    #[test]
    fn test_empty_cache_has_no_cursor() {
        let cache = FilmCache::empty();
        assert!(cache.take_next().is_none());
        assert!(cache.take_next().is_none());
        assert_eq!(cache.cursor(), None);
        assert_eq!(cache.update_time(), None);
    }

    #[test]
    fn test_update_time_minute_precision() {
        let time = Local.with_ymd_and_hms(2025, 10, 14, 8, 5, 59).unwrap();
        let cache = FilmCache::new(films(1), time);
        assert_eq!(cache.update_time().as_deref(), Some("2025-10-14 08:05"));
    }

    #[tokio::test]
    async fn test_replace_resets_cursor() {
        let store = FilmStore::new();
        store.replace(films(5), Local::now()).await;
        let old = store.snapshot().await;
        old.take_next();
        old.take_next();
        assert_eq!(old.cursor(), Some(2));

        store.replace(films(4), Local::now()).await;
        let current = store.snapshot().await;
        assert_eq!(current.cursor(), Some(0));
        assert_eq!(current.len(), 4);
        // The retired generation is unaffected
        assert_eq!(old.len(), 5);
    }
}
