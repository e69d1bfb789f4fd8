use crate::error::FeedError;
use async_trait::async_trait;
use weekly_film_models::FilmRecord;

/// A remote list of upcoming films.
#[async_trait]
pub trait FilmFeed: Send + Sync {
    fn feed_name(&self) -> &str;

    /// Fetch the current list, in the order the feed returns it.
    /// No truncation happens here; the cache decides how much to keep.
    async fn fetch_films(&self) -> Result<Vec<FilmRecord>, FeedError>;
}
