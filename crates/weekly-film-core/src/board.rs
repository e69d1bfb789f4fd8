use crate::cache::FilmStore;
use crate::refresh::{RefreshOutcome, Refresher, UpdateFailed};
use crate::rotation::Rotator;
use crate::sensors::{film_data_sensor, scrolling_sensor, SensorState};
use std::sync::Arc;
use weekly_film_sources::FilmFeed;

/// Refresher and rotator wired to one shared store, plus the sensor views
/// the harness publishes.
#[derive(Clone)]
pub struct FilmBoard {
    refresher: Refresher,
    rotator: Rotator,
}

impl FilmBoard {
    pub fn new(feed: Arc<dyn FilmFeed>) -> Self {
        let store = FilmStore::new();
        Self {
            rotator: Rotator::new(store.clone()),
            refresher: Refresher::new(feed, store),
        }
    }

    pub fn refresher(&self) -> &Refresher {
        &self.refresher
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, UpdateFailed> {
        self.refresher.refresh().await
    }

    pub async fn film_data_sensor(&self) -> SensorState {
        let snapshot = self.refresher.store().snapshot().await;
        let status = self.refresher.status().await;
        film_data_sensor(&snapshot, &status)
    }

    /// One rotation tick, rendered as the scrolling sensor.
    pub async fn rotate(&self) -> SensorState {
        let film = self.rotator.advance().await;
        let available = self.refresher.status().await.last_update_success;
        scrolling_sensor(film.as_ref(), available)
    }
}
