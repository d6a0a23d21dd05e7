//! Release configuration

use std::env;
use std::path::Path;

use cfrelease_shared::Deployment;
use serde::Deserialize;

/// Route settings for a release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseConfig {
    /// Domain the route is created under (e.g. "apps.example.com")
    pub domain: String,
    /// Route host; the application name is used when absent or empty
    #[serde(default)]
    pub hostname: Option<String>,
}

impl ReleaseConfig {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            hostname: None,
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let domain = env::var("RELEASE_DOMAIN")
            .ok()
            .filter(|d| !d.trim().is_empty())
            .ok_or(ConfigError::Missing("RELEASE_DOMAIN"))?;

        Ok(Self {
            domain: domain.trim().to_string(),
            hostname: env::var("RELEASE_HOSTNAME").ok(),
        })
    }
}

/// Read the deployment descriptor written by the deploy stage
pub fn load_deployment(path: &Path) -> Result<Deployment, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Descriptor {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::Descriptor {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Deployment descriptor from environment variables
pub fn deployment_from_env() -> Result<Deployment, ConfigError> {
    Ok(Deployment {
        app_guid: env::var("CF_APP_GUID").map_err(|_| ConfigError::Missing("CF_APP_GUID"))?,
        name: env::var("CF_APP_NAME").map_err(|_| ConfigError::Missing("CF_APP_NAME"))?,
        organisation_guid: env::var("CF_ORG_GUID")
            .map_err(|_| ConfigError::Missing("CF_ORG_GUID"))?,
        space_guid: env::var("CF_SPACE_GUID").map_err(|_| ConfigError::Missing("CF_SPACE_GUID"))?,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid deployment descriptor {path}: {message}")]
    Descriptor { path: String, message: String },
}
