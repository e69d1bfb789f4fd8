use crate::cache::FilmStore;
use crate::release_date::parse_release_date;
use tracing::debug;
use weekly_film_models::{DisplayFilm, FilmRecord};

pub const UNKNOWN_TITLE: &str = "未知电影";
pub const UNCATEGORIZED: &str = "未分类";
pub const UNKNOWN_DIRECTOR: &str = "未知导演";
pub const NO_CAST_INFO: &str = "暂无演员信息";

const TITLE_KEYS: &[&str] = &["title", "name"];
const POSTER_KEYS: &[&str] = &["picUrl", "picurl"];
const RELEASE_DATE_KEYS: &[&str] = &["releaseDateStr", "releaseDate"];

/// Resolve a cached record into its display form. Missing or empty fields
/// fall back to fixed placeholders; this never fails.
pub fn display_film(film: &FilmRecord) -> DisplayFilm {
    let title = film
        .first_text(TITLE_KEYS)
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    let poster_url = film.first_text(POSTER_KEYS).unwrap_or_default();
    let category = film.text("type").unwrap_or_else(|| UNCATEGORIZED.to_string());
    let director = film
        .text("director")
        .unwrap_or_else(|| UNKNOWN_DIRECTOR.to_string());
    let actors = film.text("actors").unwrap_or_else(|| NO_CAST_INFO.to_string());
    let raw_date = film.first_text(RELEASE_DATE_KEYS).unwrap_or_default();

    let release_date = parse_release_date(&raw_date);

    DisplayFilm {
        label: format!("{} ({})", title, release_date.short),
        poster_html: poster_tag(&poster_url),
        title,
        category,
        director,
        actors,
        poster_url,
        full_date: release_date.full,
        short_date: release_date.short,
    }
}

/// `<img src="..."/>` for the poster, with attribute-breaking characters escaped.
pub fn poster_tag(url: &str) -> String {
    let escaped = url
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(r#"<img src="{}"/>"#, escaped)
}

/// Round-robin view over the shared film cache.
#[derive(Clone)]
pub struct Rotator {
    store: FilmStore,
}

impl Rotator {
    pub fn new(store: FilmStore) -> Self {
        Self { store }
    }

    /// Display form of the film at the cursor, advancing the cursor.
    /// `None` when nothing is cached.
    pub async fn advance(&self) -> Option<DisplayFilm> {
        let snapshot = self.store.snapshot().await;
        let position = snapshot.cursor();
        let film = snapshot.take_next()?;
        let shown = display_film(film);
        debug!(
            operation = "rotation_tick",
            position = position.unwrap_or_default(),
            total = snapshot.len(),
            title = %shown.title,
            "Rotated to next film"
        );
        Some(shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use serde_json::{json, Value};

    fn record(value: Value) -> FilmRecord {
        FilmRecord::from_value(value)
    }

    #[test]
    fn test_full_record() {
        let film = display_film(&record(json!({
            "title": "志愿军：浴血和平",
            "type": "剧情/历史/战争",
            "director": "陈凯歌",
            "actors": "朱一龙 / 辛柏青",
            "picUrl": "https://img.example/p1.jpg",
            "releaseDateStr": "10月18日  本周六"
        })));

        assert_eq!(film.title, "志愿军：浴血和平");
        assert_eq!(film.category, "剧情/历史/战争");
        assert_eq!(film.director, "陈凯歌");
        assert_eq!(film.actors, "朱一龙 / 辛柏青");
        assert_eq!(film.full_date, "2025年10月18日");
        assert_eq!(film.short_date, "10月18日");
        assert_eq!(film.label, "志愿军：浴血和平 (10月18日)");
        assert_eq!(film.poster_html, r#"<img src="https://img.example/p1.jpg"/>"#);
    }

    #[test]
    fn test_alias_fields() {
        let film = display_film(&record(json!({
            "name": "好东西",
            "picurl": "https://img.example/p2.jpg",
            "releaseDate": "11月22日"
        })));
        assert_eq!(film.title, "好东西");
        assert_eq!(film.poster_url, "https://img.example/p2.jpg");
        assert_eq!(film.full_date, "2025年11月22日");
    }

    #[test]
    fn test_primary_key_wins_over_alias() {
        let film = display_film(&record(json!({
            "title": "A",
            "name": "B",
            "picUrl": "https://a",
            "picurl": "https://b",
            "releaseDateStr": "2024年12月25日",
            "releaseDate": "1月1日"
        })));
        assert_eq!(film.title, "A");
        assert_eq!(film.poster_url, "https://a");
        assert_eq!(film.full_date, "2024年12月25日");
    }

    #[test]
    fn test_empty_primary_falls_to_alias() {
        let film = display_film(&record(json!({ "title": "", "name": "B", "picUrl": "", "picurl": "https://b" })));
        assert_eq!(film.title, "B");
        assert_eq!(film.poster_url, "https://b");
    }

    #[test]
    fn test_defaults() {
        let film = display_film(&FilmRecord::default());
        assert_eq!(film.title, UNKNOWN_TITLE);
        assert_eq!(film.category, UNCATEGORIZED);
        assert_eq!(film.director, UNKNOWN_DIRECTOR);
        assert_eq!(film.actors, NO_CAST_INFO);
        assert_eq!(film.poster_url, "");
        assert_eq!(film.full_date, "2025年01月01日");
        assert_eq!(film.label, "未知电影 (01月01日)");
        assert_eq!(film.poster_html, r#"<img src=""/>"#);
    }

    #[test]
    fn test_poster_tag_escapes_quotes() {
        assert_eq!(
            poster_tag(r#"https://x/a.jpg" onerror="x"#),
            r#"<img src="https://x/a.jpg&quot; onerror=&quot;x"/>"#
        );
    }

    #[test]
    fn test_poster_tag_escapes_ampersand_once() {
        assert_eq!(
            poster_tag("https://x/p.jpg?w=1&h=2&lt;"),
            r#"<img src="https://x/p.jpg?w=1&amp;h=2&amp;lt;"/>"#
        );
    }

    #[tokio::test]
    async fn test_advance_empty_store() {
        let store = FilmStore::new();
        let rotator = Rotator::new(store.clone());
        assert!(rotator.advance().await.is_none());
        assert!(rotator.advance().await.is_none());
        assert_eq!(store.snapshot().await.cursor(), None);
    }

    #[tokio::test]
    async fn test_advance_cycles_in_order() {
        let store = FilmStore::new();
        let films = vec![
            record(json!({ "title": "A" })),
            record(json!({ "name": "B" })),
            record(json!({ "title": "C" })),
        ];
        store.replace(films, Local::now()).await;
        let rotator = Rotator::new(store.clone());

        let mut titles = Vec::new();
        for _ in 0..6 {
            titles.push(rotator.advance().await.map(|f| f.title).unwrap_or_default());
        }
        assert_eq!(titles, ["A", "B", "C", "A", "B", "C"]);
    }
}
