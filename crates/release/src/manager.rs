//! Release orchestration
//!
//! Runs the three reported steps in order: connect to the controller, confirm
//! the deployed app exists, then bind the route and switch traffic to it.
//! Every failure is terminal and aborts the step that was in flight.

use cfrelease_shared::{CloudController, Connect};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ReleaseConfig;
use crate::error::{LookupError, ReleaseError, ReleaseResult};
use crate::progress::{ProgressSink, ReleaseStep, StepEvent};
use crate::request::{ReleaseContext, ReleaseRequest};
use crate::resolver::resolve_route;
use crate::stage::{checkpoint, ReleaseStage};
use crate::switcher::switch_route;

/// Output of a successful release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub url: String,
}

impl Release {
    /// Live endpoint of the released application
    pub fn url(&self) -> &str {
        &self.url
    }
}

pub struct ReleaseManager {
    config: ReleaseConfig,
}

impl ReleaseManager {
    pub fn new(config: ReleaseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// Release the deployment described by `ctx`
    pub async fn release<T>(&self, connector: &T, ctx: &ReleaseContext) -> ReleaseResult<Release>
    where
        T: Connect + ?Sized,
    {
        let request = ReleaseRequest::new(&self.config, &ctx.source, &ctx.deployment)?;
        let progress = ctx.progress.as_ref();

        checkpoint(&ctx.cancel, ReleaseStage::Idle)?;
        progress.notify(
            ReleaseStep::Connect,
            StepEvent::Begin("Connecting to Cloud Foundry".to_string()),
        );
        let controller = finish_step(
            progress,
            ReleaseStep::Connect,
            connector.connect().await.map_err(ReleaseError::Connection),
        )?;
        progress.notify(
            ReleaseStep::Connect,
            StepEvent::Update(format!(
                "Connecting to Cloud Foundry at {}",
                controller.controller_url()
            )),
        );
        progress.notify(ReleaseStep::Connect, StepEvent::Success);
        debug!(
            stage = %ReleaseStage::ClientConnected,
            api_url = controller.controller_url(),
            "Client connected"
        );

        progress.notify(
            ReleaseStep::LookupApp,
            StepEvent::Begin(format!("Getting app info for {}", request.app_name)),
        );
        let result = self.lookup_app(&controller, &request, ctx).await;
        finish_step(progress, ReleaseStep::LookupApp, result)?;
        progress.notify(ReleaseStep::LookupApp, StepEvent::Success);

        progress.notify(
            ReleaseStep::BindRoute,
            StepEvent::Begin(format!(
                "Binding route {} to deployment",
                request.route_name()
            )),
        );
        let result = self.bind_route(&controller, &request, ctx).await;
        let release = finish_step(progress, ReleaseStep::BindRoute, result)?;
        progress.notify(ReleaseStep::BindRoute, StepEvent::Success);

        Ok(release)
    }

    async fn lookup_app<C: CloudController>(
        &self,
        controller: &C,
        request: &ReleaseRequest,
        ctx: &ReleaseContext,
    ) -> ReleaseResult<()> {
        checkpoint(&ctx.cancel, ReleaseStage::ClientConnected)?;
        let apps = controller
            .list_applications(&request.organisation_guid, &request.space_guid, &request.app_name)
            .await
            .map_err(|source| {
                // The token can expire between connecting and the first lookup
                if source.is_unauthorized() {
                    ReleaseError::Connection(source)
                } else {
                    LookupError::AppQuery {
                        name: request.app_name.clone(),
                        source,
                    }
                    .into()
                }
            })?;

        if apps.is_empty() {
            return Err(LookupError::AppNotFound {
                name: request.app_name.clone(),
                space_guid: request.space_guid.clone(),
            }
            .into());
        }

        debug!(stage = %ReleaseStage::AppResolved, app = %request.app_name, "App resolved");
        Ok(())
    }

    async fn bind_route<C: CloudController>(
        &self,
        controller: &C,
        request: &ReleaseRequest,
        ctx: &ReleaseContext,
    ) -> ReleaseResult<Release> {
        let resolved = resolve_route(controller, request, &ctx.cancel).await?;
        debug!(
            stage = %ReleaseStage::RouteResolved,
            domain = %resolved.domain.name,
            route_guid = %resolved.route.guid,
            created = resolved.created,
            "Route resolved"
        );

        let outcome =
            switch_route(controller, &resolved.route, &request.app_guid, &ctx.cancel).await?;
        info!(
            stage = %ReleaseStage::RouteExclusive,
            url = %outcome.url,
            app_guid = %request.app_guid,
            route_created = resolved.created,
            unmapped = outcome.unmapped.len(),
            "Release complete"
        );

        Ok(Release { url: outcome.url })
    }
}

/// Mark the in-flight step aborted if `result` failed
fn finish_step<T>(
    progress: &dyn ProgressSink,
    step: ReleaseStep,
    result: ReleaseResult<T>,
) -> ReleaseResult<T> {
    if result.is_err() {
        progress.notify(step, StepEvent::Abort);
    }
    result
}
