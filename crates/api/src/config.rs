use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;
use crate::shortener::ShortenerConfig;

/// Runtime settings for the blog server, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the admin API from a browser.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Absolute base URL (no trailing slash) used in sitemaps and robots.txt.
    pub site_url: String,
    /// Directory holding uploads: `media/` originals and `thumbnails/`.
    pub media_root: PathBuf,
    /// Public prefix for `media_root`, always `/`-delimited (`/files/`).
    pub media_url: String,
    /// Body limit for the admin API (uploads, WordPress exports).
    pub max_upload_bytes: usize,
    pub jwt: JwtConfig,
    pub shortener: ShortenerConfig,
}

impl ServerConfig {
    /// Read every setting from the environment (after `.env`).
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SITE_URL`             | `http://localhost:3000`    |
    /// | `MEDIA_ROOT`           | `./media`                  |
    /// | `MEDIA_URL`            | `/files/`                  |
    /// | `MAX_UPLOAD_BYTES`     | `52428800`                 |
    ///
    /// See [`JwtConfig::from_env`] and [`ShortenerConfig::from_env`] for the
    /// remaining variables.
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let site_url: String = env_or("SITE_URL", "http://localhost:3000".to_string());
        let media_url: String = env_or("MEDIA_URL", "/files/".to_string());

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            site_url: site_url.trim_end_matches('/').to_string(),
            media_root: env_or("MEDIA_ROOT", PathBuf::from("./media")),
            media_url: normalize_media_url(&media_url),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 50 * 1024 * 1024),
            jwt: JwtConfig::from_env(),
            shortener: ShortenerConfig::from_env(),
        }
    }
}

/// Parse `key` from the environment, or fall back to `default` when unset.
/// A value that does not parse aborts startup.
pub(crate) fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

/// Force a leading and a trailing slash: `files` -> `/files/`.
pub fn normalize_media_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_url_is_normalized() {
        assert_eq!(normalize_media_url("files"), "/files/");
        assert_eq!(normalize_media_url("/uploads/media/"), "/uploads/media/");
        assert_eq!(normalize_media_url(""), "/");
    }
}
