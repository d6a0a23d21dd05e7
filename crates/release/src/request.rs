//! Per-release inputs

use std::sync::Arc;

use cfrelease_shared::{Deployment, Source};
use tokio_util::sync::CancellationToken;

use crate::config::ReleaseConfig;
use crate::error::LookupError;
use crate::progress::{NoopProgress, ProgressSink};

/// Everything the caller hands to a single release
#[derive(Clone)]
pub struct ReleaseContext {
    pub source: Source,
    pub deployment: Deployment,
    pub progress: Arc<dyn ProgressSink>,
    /// Checked between remote calls
    pub cancel: CancellationToken,
}

impl ReleaseContext {
    pub fn new(source: Source, deployment: Deployment) -> Self {
        Self {
            source,
            deployment,
            progress: Arc::new(NoopProgress),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Immutable inputs of one release, with the effective hostname resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    pub domain: String,
    pub hostname: String,
    pub app_guid: String,
    pub app_name: String,
    pub organisation_guid: String,
    pub space_guid: String,
}

impl ReleaseRequest {
    /// Fails when neither the configured hostname nor the source app name
    /// yields a host; an empty host would select the domain's apex route.
    pub fn new(
        config: &ReleaseConfig,
        source: &Source,
        deployment: &Deployment,
    ) -> Result<Self, LookupError> {
        let hostname = match config.hostname.as_deref().map(str::trim) {
            Some(hostname) if !hostname.is_empty() => hostname,
            _ => source.app.trim(),
        };
        if hostname.is_empty() {
            return Err(LookupError::EmptyHostname {
                domain: config.domain.clone(),
            });
        }

        Ok(Self {
            domain: config.domain.clone(),
            hostname: hostname.to_string(),
            app_guid: deployment.app_guid.clone(),
            app_name: deployment.name.clone(),
            organisation_guid: deployment.organisation_guid.clone(),
            space_guid: deployment.space_guid.clone(),
        })
    }

    /// `hostname.domain`, as shown to the user
    pub fn route_name(&self) -> String {
        format!("{}.{}", self.hostname, self.domain)
    }
}
