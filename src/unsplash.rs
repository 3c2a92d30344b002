//! Unsplash API client.
//!
//! Only the random-photo endpoint is used. Requests are blocking and are
//! always issued from worker threads, never from the UI thread.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;

use crate::settings::{ACCESS_KEY_ENV, AppSettings};

/// Image URLs attached to a photo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoUrls {
    /// Display-resolution image (about 1080px wide).
    pub regular: String,
    /// Full-resolution image.
    pub full: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Photographer {
    pub name: String,
}

/// One entry of the random-photo response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub alt_description: Option<String>,
    #[serde(default)]
    pub user: Option<Photographer>,
    pub urls: PhotoUrls,
}

impl PhotoRecord {
    /// "Photo by ..." credit line, when the photographer is known.
    pub fn credit(&self) -> Option<String> {
        self.user.as_ref().map(|user| format!("Photo by {}", user.name))
    }
}

/// Remote source of photo records and image bytes.
pub trait PhotoSource: Send + Sync {
    /// Request `count` photo records.
    fn fetch_batch(&self, count: u32) -> Result<Vec<PhotoRecord>>;
    /// Download the raw bytes behind `url`.
    fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP client for the Unsplash API.
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    http: Client,
    api_url: String,
    access_key: String,
    api_timeout: Duration,
    download_timeout: Duration,
}

impl UnsplashClient {
    pub fn new(settings: &AppSettings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("splashpaper/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
            access_key: settings.access_key.clone(),
            api_timeout: Duration::from_secs(settings.request_timeout_secs),
            download_timeout: Duration::from_secs(settings.download_timeout_secs),
        })
    }

    fn batch_request(&self, count: u32) -> RequestBuilder {
        self.http
            .get(&self.api_url)
            .query(&self.batch_query(count))
            .timeout(self.api_timeout)
    }

    /// Image downloads run on `download_timeout` instead of the API budget.
    fn image_request(&self, url: &str) -> RequestBuilder {
        self.http.get(url).timeout(self.download_timeout)
    }

    fn batch_query(&self, count: u32) -> [(&'static str, String); 2] {
        [
            ("count", count.to_string()),
            ("client_id", self.access_key.clone()),
        ]
    }
}

impl PhotoSource for UnsplashClient {
    fn fetch_batch(&self, count: u32) -> Result<Vec<PhotoRecord>> {
        if self.access_key.is_empty() {
            let path = crate::settings::settings_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "settings.json".to_string());
            bail!("no Unsplash access key: set {ACCESS_KEY_ENV} or edit {path}");
        }

        let response = self
            .batch_request(count)
            .send()
            .context("photo list request failed")?;
        let status = response.status();
        if status != StatusCode::OK {
            bail!("photo list request returned {status}");
        }
        let body = response.text().context("failed to read photo list")?;
        parse_batch(&body)
    }

    fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .image_request(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes())
            .with_context(|| format!("failed to download {url}"))?;
        Ok(bytes.to_vec())
    }
}

/// Parse the JSON array returned by the random-photo endpoint.
pub fn parse_batch(body: &str) -> Result<Vec<PhotoRecord>> {
    serde_json::from_str(body).context("unexpected photo list format")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": "abc123",
            "alt_description": "a foggy forest",
            "width": 6000,
            "user": { "name": "Jane Doe", "username": "jane" },
            "urls": {
                "raw": "https://images.example/raw",
                "full": "https://images.example/full",
                "regular": "https://images.example/regular",
                "small": "https://images.example/small"
            }
        },
        {
            "urls": {
                "full": "https://images.example/full2",
                "regular": "https://images.example/regular2"
            }
        }
    ]"#;

    #[test]
    fn parses_records_and_ignores_extra_fields() {
        let photos = parse_batch(SAMPLE).unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].id.as_deref(), Some("abc123"));
        assert_eq!(photos[0].urls.regular, "https://images.example/regular");
        assert_eq!(photos[0].urls.full, "https://images.example/full");
        assert_eq!(photos[0].credit().as_deref(), Some("Photo by Jane Doe"));
        assert_eq!(photos[1].user, None);
        assert_eq!(photos[1].credit(), None);
    }

    #[test]
    fn missing_urls_is_an_error() {
        assert!(parse_batch(r#"[{ "id": "x" }]"#).is_err());
        assert!(parse_batch(r#"{ "errors": ["OAuth error"] }"#).is_err());
    }

    #[test]
    fn batch_query_carries_count_and_key() {
        let settings = AppSettings {
            access_key: "secret".into(),
            ..AppSettings::default()
        };
        let client = UnsplashClient::new(&settings).unwrap();
        let query = client.batch_query(10);
        assert_eq!(query[0], ("count", "10".to_string()));
        assert_eq!(query[1], ("client_id", "secret".to_string()));
    }

    #[test]
    fn downloads_get_a_longer_budget_than_api_calls() {
        let settings = AppSettings {
            access_key: "secret".into(),
            request_timeout_secs: 5,
            download_timeout_secs: 120,
            ..AppSettings::default()
        };
        let client = UnsplashClient::new(&settings).unwrap();

        let batch = client.batch_request(10).build().unwrap();
        assert_eq!(batch.timeout(), Some(&Duration::from_secs(5)));

        let image = client
            .image_request("https://images.example/full")
            .build()
            .unwrap();
        assert_eq!(image.timeout(), Some(&Duration::from_secs(120)));
    }

    #[test]
    fn missing_key_fails_without_network() {
        let client = UnsplashClient::new(&AppSettings::default()).unwrap();
        let err = client.fetch_batch(10).unwrap_err();
        assert!(err.to_string().contains(ACCESS_KEY_ENV));
    }
}
