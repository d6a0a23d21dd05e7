//! Route resolution
//!
//! Finds the domain by exact name, then reuses the route for
//! `(domain, hostname)` or creates it bound to the target application.

use cfrelease_shared::{CloudController, Domain, NewRoute, Route};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{LookupError, ReleaseError, ReleaseResult};
use crate::request::ReleaseRequest;
use crate::stage::{checkpoint, ReleaseStage};

/// Route a release will bind to
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub domain: Domain,
    pub route: Route,
    /// True when this release created the route
    pub created: bool,
}

/// Look up the domain and find or create the route for the request's host
pub async fn resolve_route<C>(
    controller: &C,
    request: &ReleaseRequest,
    cancel: &CancellationToken,
) -> ReleaseResult<ResolvedRoute>
where
    C: CloudController + ?Sized,
{
    checkpoint(cancel, ReleaseStage::AppResolved)?;
    let domain = find_domain(controller, &request.domain).await?;
    debug!(
        stage = %ReleaseStage::DomainResolved,
        domain_guid = %domain.guid,
        "Domain resolved"
    );

    checkpoint(cancel, ReleaseStage::DomainResolved)?;
    let hosts = [request.hostname.clone()];
    let routes = controller
        .list_routes(&domain.guid, &hosts)
        .await
        .map_err(|source| ReleaseError::RouteQuery {
            domain: request.domain.clone(),
            host: request.hostname.clone(),
            source,
        })?;

    if routes.len() > 1 {
        warn!(
            domain = %request.domain,
            host = %request.hostname,
            matches = routes.len(),
            chosen = %routes[0].guid,
            "Multiple routes match domain and host, using the first"
        );
    }

    if let Some(route) = routes.into_iter().next() {
        debug!(route_guid = %route.guid, "Reusing existing route");
        return Ok(ResolvedRoute {
            domain,
            route,
            created: false,
        });
    }

    checkpoint(cancel, ReleaseStage::DomainResolved)?;
    let new_route = NewRoute {
        domain_guid: domain.guid.clone(),
        space_guid: request.space_guid.clone(),
        host: request.hostname.clone(),
        destinations: vec![request.app_guid.clone()],
    };
    let route = controller
        .create_route(&new_route)
        .await
        .map_err(|source| ReleaseError::RouteCreate {
            domain: request.domain.clone(),
            host: request.hostname.clone(),
            source,
        })?;

    info!(
        route_guid = %route.guid,
        route = %request.route_name(),
        "Created route"
    );

    Ok(ResolvedRoute {
        domain,
        route,
        created: true,
    })
}

/// Exact-name domain lookup; zero matches is fatal
async fn find_domain<C>(controller: &C, name: &str) -> ReleaseResult<Domain>
where
    C: CloudController + ?Sized,
{
    let domains = controller
        .list_domains(name)
        .await
        .map_err(|source| LookupError::DomainQuery {
            domain: name.to_string(),
            source,
        })?;

    domains
        .into_iter()
        .find(|d| d.name == name)
        .ok_or_else(|| {
            LookupError::DomainNotFound {
                domain: name.to_string(),
            }
            .into()
        })
}
