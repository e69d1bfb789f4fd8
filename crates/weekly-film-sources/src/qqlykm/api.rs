use crate::error::FeedError;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use weekly_film_models::FilmRecord;

/// Response envelope of the upcoming-films endpoint.
///
/// Only the fields below are read; anything else the API adds is ignored.
#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    msg: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl FeedEnvelope {
    fn api_message(&self) -> Option<String> {
        [&self.msg, &self.message]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Null | Value::String(_) => None,
                other => Some(other.to_string()),
            })
    }
}

/// Request URL with the API key as the `key` query parameter.
pub fn feed_url(base_url: &str, api_key: &str) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}key={}", base_url, separator, urlencoding::encode(api_key))
}

/// Validate and unpack a response body.
///
/// The body is parsed as JSON regardless of the declared content type. The
/// `success` flag is checked before `data`; a successful envelope without
/// `data` yields an empty list.
pub fn parse_feed_body(body: &str) -> Result<Vec<FilmRecord>, FeedError> {
    let envelope: FeedEnvelope = serde_json::from_str(body).map_err(|e| FeedError::Parse {
        message: e.to_string(),
        body: body.to_string(),
    })?;

    if envelope.success != Some(true) {
        return Err(FeedError::ApiLogic {
            message: envelope.api_message(),
        });
    }

    match envelope.data {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(entries)) => Ok(entries.into_iter().map(FilmRecord::from_value).collect()),
        Some(_) => Err(FeedError::Parse {
            message: "`data` is not a list".to_string(),
            body: body.to_string(),
        }),
    }
}

/// GET `url` and unpack the films it returns.
pub async fn get_upcoming_films(client: &Client, url: &str) -> Result<Vec<FilmRecord>, FeedError> {
    // The URL carries the API key; reqwest errors must not repeat it
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FeedError::Transport(e.without_url().to_string()))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(FeedError::Http {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        });
    }

    // Read as text: the endpoint's content type is not reliable enough for `.json()`
    let body = response.text().await.map_err(|e| {
        FeedError::Transport(format!("failed to read response body: {}", e.without_url()))
    })?;

    debug!(bytes = body.len(), "API response: {}", body);

    parse_feed_body(&body)
}
