use serde::{Deserialize, Serialize};

/// Release date as shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseDate {
    /// e.g. `2025年10月18日`
    pub full: String,
    /// e.g. `10月18日`
    pub short: String,
}

impl ReleaseDate {
    pub fn new(full: impl Into<String>, short: impl Into<String>) -> Self {
        Self {
            full: full.into(),
            short: short.into(),
        }
    }
}

/// The film currently on display, with every field resolved to a
/// presentable value.
///
/// Serialized field names follow the dashboard attribute names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayFilm {
    /// `"{title} ({short date})"`
    #[serde(rename = "namedate")]
    pub label: String,
    #[serde(rename = "name")]
    pub title: String,
    #[serde(rename = "type")]
    pub category: String,
    pub director: String,
    pub actors: String,
    #[serde(rename = "picurl")]
    pub poster_url: String,
    #[serde(rename = "release_date")]
    pub full_date: String,
    pub short_date: String,
    /// `<img src="..."/>` ready to render.
    #[serde(rename = "poster")]
    pub poster_html: String,
}
