//! Dashboard-facing views of the core state.
//!
//! Two sensors are published: the full film list (state = last update time)
//! and the rotating film (state = its release date).

use crate::cache::FilmCache;
use crate::refresh::RefreshStatus;
use serde::Serialize;
use serde_json::{Map, Value};
use weekly_film_models::DisplayFilm;

pub const FILM_DATA_ENTITY: &str = "film_data";
pub const FILM_DATA_NAME: &str = "电影数据";
pub const SCROLLING_ENTITY: &str = "film_scrolling";
pub const SCROLLING_NAME: &str = "滚动显示";

pub const UNKNOWN_STATE: &str = "未知";
pub const NO_DATA_STATE: &str = "无数据";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SensorState {
    pub entity: &'static str,
    pub name: &'static str,
    pub state: String,
    /// False while the most recent refresh cycle failed.
    pub available: bool,
    pub attributes: Map<String, Value>,
}

pub fn film_data_sensor(snapshot: &FilmCache, status: &RefreshStatus) -> SensorState {
    let mut attributes = Map::new();
    let update_time = snapshot.update_time();

    if let Some(update_time) = &update_time {
        let film_list = snapshot
            .films()
            .iter()
            .map(|film| Value::Object(film.fields().clone()))
            .collect();
        attributes.insert("film_count".to_string(), Value::from(snapshot.len()));
        attributes.insert("film_list".to_string(), Value::Array(film_list));
        attributes.insert("update_time".to_string(), Value::from(update_time.as_str()));
    }
    if !status.last_update_success {
        if let Some(error) = &status.last_error {
            attributes.insert("last_error".to_string(), Value::from(error.as_str()));
        }
    }

    SensorState {
        entity: FILM_DATA_ENTITY,
        name: FILM_DATA_NAME,
        state: update_time.unwrap_or_else(|| UNKNOWN_STATE.to_string()),
        available: status.last_update_success,
        attributes,
    }
}

pub fn scrolling_sensor(film: Option<&DisplayFilm>, available: bool) -> SensorState {
    let (state, attributes) = match film {
        Some(film) => {
            let attributes = match serde_json::to_value(film) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            };
            (film.full_date.clone(), attributes)
        }
        None => (NO_DATA_STATE.to_string(), Map::new()),
    };

    SensorState {
        entity: SCROLLING_ENTITY,
        name: SCROLLING_NAME,
        state,
        available,
        attributes,
    }
}
