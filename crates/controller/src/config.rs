//! Controller connection configuration

use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

/// Default per-request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the Cloud Controller, loaded from environment variables
#[derive(Clone)]
pub struct ControllerConfig {
    /// Controller base URL, without trailing slash
    pub api_url: String,
    /// OAuth access token, without the "bearer" prefix
    pub access_token: String,
    pub skip_ssl_validation: bool,
    pub request_timeout: Duration,
}

impl ControllerConfig {
    pub fn new(api_url: &str, access_token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_api_url(api_url)?,
            access_token: strip_bearer(access_token)?,
            skip_ssl_validation: false,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = env::var("CF_API").map_err(|_| ConfigError::Missing("CF_API"))?;
        let access_token = env::var("CF_TOKEN").map_err(|_| ConfigError::Missing("CF_TOKEN"))?;

        let mut config = Self::new(&api_url, &access_token)?;

        config.skip_ssl_validation = env::var("CF_SKIP_SSL_VALIDATION")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);
        config.request_timeout = Duration::from_secs(
            env::var("CF_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );

        Ok(config)
    }
}

impl fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("api_url", &self.api_url)
            .field("access_token", &"<redacted>")
            .field("skip_ssl_validation", &self.skip_ssl_validation)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn strip_bearer(raw: &str) -> Result<String, ConfigError> {
    let token = raw.trim();
    let token = match (token.get(..6), token.get(6..)) {
        (Some(prefix), Some(rest))
            if prefix.eq_ignore_ascii_case("bearer")
                && (rest.is_empty() || rest.starts_with(char::is_whitespace)) =>
        {
            rest.trim()
        }
        _ => token,
    };
    if token.is_empty() {
        return Err(ConfigError::Missing("CF_TOKEN"));
    }
    Ok(token.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid CF_API value: {0}")]
    InvalidUrl(String),
}
