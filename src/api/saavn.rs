use crate::api::models::*;
use crate::cache_service::{get_json as cache_get_json, put_json as cache_put_json};
use crate::diagnostics::log_perf;
use crate::settings::{AppSettings, DEFAULT_API_BASE_URL};
use chrono::Utc;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Read-only client for the hosted catalog API.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogClient {
    pub base_url: String,
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(settings.api_base_url.clone())
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/api/{}", self.base_url, path.trim_start_matches('/'));

        for (position, (key, value)) in params.iter().enumerate() {
            let separator = if position == 0 { '?' } else { '&' };
            url.push(separator);
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        url
    }

    /// Fetches `url` and unwraps its `data` field, consulting the session cache first.
    async fn get_data<T>(&self, url: String) -> Result<T, String>
    where
        T: DeserializeOwned + Serialize,
    {
        let cache_key = format!("api:{url}");
        if let Some(cached) = cache_get_json::<T>(&cache_key) {
            return Ok(cached);
        }

        let started_at = Utc::now();
        let response = HTTP_CLIENT
            .get(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        let body = response.text().await.map_err(|e| e.to_string())?;
        let data = parse_envelope::<T>(&body)?;
        log_perf("catalog request", started_at, &url);

        let _ = cache_put_json(cache_key, &data, None);
        Ok(data)
    }
}

/// Logs a failed catalog call and substitutes an empty value.
pub fn or_empty<T: Default>(context: &str, result: Result<T, String>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("{context} failed: {e}");
            T::default()
        }
    }
}

include!("saavn/response_models.rs");
include!("saavn/search.rs");
include!("saavn/browse.rs");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_encodes_query_values() {
        let client = CatalogClient::new("https://catalog.test/");
        assert_eq!(
            client.build_url("search/songs", &[("query", "arijit singh & co"), ("page", "2")]),
            "https://catalog.test/api/search/songs?query=arijit%20singh%20%26%20co&page=2"
        );
        assert_eq!(
            client.build_url("/modules", &[]),
            "https://catalog.test/api/modules"
        );
    }

    #[test]
    fn envelope_unwraps_data() {
        let page: SearchPage<Song> = parse_envelope(
            r#"{"status":"SUCCESS","data":{"total":1,"start":1,"results":[{"id":"a","name":"A"}]}}"#,
        )
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0].id, "a");
    }

    #[test]
    fn envelope_without_data_reports_message() {
        let err = parse_envelope::<Album>(r#"{"status":"FAILED","message":"album not found","data":null}"#)
            .unwrap_err();
        assert_eq!(err, "album not found");

        let err = parse_envelope::<Album>("<html>").unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn song_payload_accepts_single_or_list() {
        let single: SongPayload = serde_json::from_str(r#"{"id":"one"}"#).unwrap();
        assert_eq!(single.into_first().map(|s| s.id), Some("one".to_string()));

        let list: SongPayload = serde_json::from_str(r#"[{"id":"first"},{"id":"second"}]"#).unwrap();
        assert_eq!(list.into_first().map(|s| s.id), Some("first".to_string()));

        let empty: SongPayload = serde_json::from_str("[]").unwrap();
        assert!(empty.into_first().is_none());
    }

    #[test]
    fn or_empty_substitutes_default_on_error() {
        let page: SearchPage<Song> = or_empty("search", Err("HTTP 500".to_string()));
        assert!(page.results.is_empty());
        let value = or_empty("count", Ok::<u32, String>(7));
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn blank_queries_short_circuit_without_a_request() {
        let client = CatalogClient::new("http://127.0.0.1:9");
        let songs = client.search_songs("   ", 1).await.unwrap();
        assert!(songs.results.is_empty());
        let all = client.search_all("").await.unwrap();
        assert!(all.songs.results.is_empty());
    }
}
