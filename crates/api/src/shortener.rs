//! Outbound link shortening.
//!
//! Download redirects pass their target through a [`LinkShortener`]. The
//! HTTP implementation never fails: any error yields the original URL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::config::env_or;

/// Default outbound timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default)]
pub struct ShortenerConfig {
    /// Endpoint; `None` disables shortening.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl ShortenerConfig {
    /// | Env Var                  | Default          |
    /// |--------------------------|------------------|
    /// | `SHORTENER_API_URL`      | unset (disabled) |
    /// | `SHORTENER_API_KEY`      | unset            |
    /// | `SHORTENER_TIMEOUT_SECS` | `10`             |
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_url: non_empty("SHORTENER_API_URL"),
            api_key: non_empty("SHORTENER_API_KEY"),
            timeout_secs: env_or("SHORTENER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[async_trait]
pub trait LinkShortener: Send + Sync {
    /// Short form of `url`, or `url` itself when shortening is unavailable.
    async fn shorten(&self, url: &str, title: Option<&str>) -> String;
}

/// Pass-through used when no shortener is configured.
pub struct DisabledShortener;

#[async_trait]
impl LinkShortener for DisabledShortener {
    async fn shorten(&self, url: &str, _title: Option<&str>) -> String {
        url.to_string()
    }
}

#[derive(Serialize)]
struct ShortenRequest<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct ShortenResponse {
    short_url: Option<String>,
}

/// Calls a remote shortener: `POST {url, title?, api_key?}` and expects
/// `{"short_url": "..."}` with status 200.
pub struct HttpShortener {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl HttpShortener {
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl LinkShortener for HttpShortener {
    async fn shorten(&self, url: &str, title: Option<&str>) -> String {
        let body = ShortenRequest {
            url,
            title: title.filter(|t| !t.is_empty()),
            api_key: self.api_key.as_deref(),
        };

        let response = match self.client.post(&self.api_url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, url, "Link shortener request failed");
                return url.to_string();
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            tracing::warn!(status = %response.status(), url, "Link shortener returned an error status");
            return url.to_string();
        }

        match response.json::<ShortenResponse>().await {
            Ok(ShortenResponse {
                short_url: Some(short),
            }) if !short.trim().is_empty() => {
                // The result becomes a `Location` header.
                if HeaderValue::from_str(&short).is_err() {
                    tracing::warn!(
                        url,
                        short_url = %short.escape_debug(),
                        "Link shortener returned an unusable short_url"
                    );
                    return url.to_string();
                }
                short
            }
            Ok(_) => {
                tracing::warn!(url, "Link shortener response has no short_url");
                url.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, url, "Link shortener returned an unreadable body");
                url.to_string()
            }
        }
    }
}

/// Build the shortener selected by configuration.
pub fn from_config(config: &ShortenerConfig) -> Arc<dyn LinkShortener> {
    let Some(api_url) = &config.api_url else {
        return Arc::new(DisabledShortener);
    };
    match HttpShortener::new(
        api_url.clone(),
        config.api_key.clone(),
        Duration::from_secs(config.timeout_secs),
    ) {
        Ok(shortener) => Arc::new(shortener),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build link shortener client; shortening disabled");
            Arc::new(DisabledShortener)
        }
    }
}
