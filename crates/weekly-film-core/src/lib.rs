pub mod board;
pub mod cache;
pub mod refresh;
pub mod release_date;
pub mod rotation;
pub mod sensors;

#[cfg(test)]
mod testing;

pub use board::FilmBoard;
pub use cache::{FilmCache, FilmStore, MAX_CACHED_FILMS};
pub use refresh::{RefreshOutcome, RefreshStatus, Refresher, UpdateFailed};
pub use release_date::parse_release_date;
pub use rotation::{display_film, Rotator};
pub use sensors::{film_data_sensor, scrolling_sensor, SensorState};
