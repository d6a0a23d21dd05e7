//! Traffic switch onto the target application
//!
//! The route's destinations are captured before mapping. The target app is
//! mapped first, then every other captured destination is unmapped in order.
//! The target's own destination is never unmapped.

use cfrelease_shared::{CloudController, Route, RouteDestination};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{ReleaseError, ReleaseResult};
use crate::stage::{checkpoint, ReleaseStage};

#[derive(Debug, Clone)]
pub struct SwitchOutcome {
    /// Externally reachable URL of the route
    pub url: String,
    /// Previous destinations removed from the route
    pub unmapped: Vec<RouteDestination>,
}

/// Make `route` point exclusively at `app_guid`
pub async fn switch_route<C>(
    controller: &C,
    route: &Route,
    app_guid: &str,
    cancel: &CancellationToken,
) -> ReleaseResult<SwitchOutcome>
where
    C: CloudController + ?Sized,
{
    let previous: Vec<RouteDestination> = route
        .destinations
        .iter()
        .filter(|d| d.app_guid != app_guid)
        .cloned()
        .collect();

    checkpoint(cancel, ReleaseStage::RouteResolved)?;
    controller
        .map_route(&route.guid, app_guid)
        .await
        .map_err(|source| ReleaseError::MapRoute {
            route_guid: route.guid.clone(),
            app_guid: app_guid.to_string(),
            source,
        })?;
    debug!(
        stage = %ReleaseStage::RouteMapped,
        route_guid = %route.guid,
        app_guid,
        "Route mapped"
    );

    let mut unmapped: Vec<RouteDestination> = Vec::with_capacity(previous.len());
    for (index, destination) in previous.iter().enumerate() {
        checkpoint(cancel, ReleaseStage::RouteMapped)?;

        if let Err(source) = controller.unmap_route(&route.guid, &destination.guid).await {
            return Err(ReleaseError::UnmapRoute {
                route_guid: route.guid.clone(),
                destination_guid: destination.guid.clone(),
                app_guid: destination.app_guid.clone(),
                unmapped: unmapped.iter().map(|d| d.guid.clone()).collect(),
                remaining: previous.len() - index - 1,
                source,
            });
        }

        info!(
            route_guid = %route.guid,
            destination_guid = %destination.guid,
            app_guid = %destination.app_guid,
            "Unmapped previous destination"
        );
        unmapped.push(destination.clone());
    }

    Ok(SwitchOutcome {
        url: route.external_url(),
        unmapped,
    })
}
