//! Control-plane capability consumed by a release

use async_trait::async_trait;

use crate::error::ControllerResult;
use crate::types::{Application, Domain, NewRoute, Route};

/// Operations a release needs from the platform controller.
///
/// Every call is a single request/response. Implementations must not retry:
/// the caller decides whether the whole release is attempted again.
#[async_trait]
pub trait CloudController: Send + Sync {
    /// Base URL of the controller, for reporting
    fn controller_url(&self) -> &str;

    /// Apps matching organization, space and name
    async fn list_applications(
        &self,
        organisation_guid: &str,
        space_guid: &str,
        name: &str,
    ) -> ControllerResult<Vec<Application>>;

    /// Domains filtered by name
    async fn list_domains(&self, name: &str) -> ControllerResult<Vec<Domain>>;

    /// Routes on `domain_guid` whose host is one of `hosts`
    async fn list_routes(&self, domain_guid: &str, hosts: &[String])
        -> ControllerResult<Vec<Route>>;

    async fn create_route(&self, route: &NewRoute) -> ControllerResult<Route>;

    /// Add `app_guid` as a destination of the route
    async fn map_route(&self, route_guid: &str, app_guid: &str) -> ControllerResult<()>;

    /// Remove a single destination from the route
    async fn unmap_route(&self, route_guid: &str, destination_guid: &str)
        -> ControllerResult<()>;
}

/// Produces a connected, authenticated controller handle
#[async_trait]
pub trait Connect: Send + Sync {
    type Client: CloudController;

    async fn connect(&self) -> ControllerResult<Self::Client>;
}
