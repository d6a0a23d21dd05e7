//! Release error types

use cfrelease_shared::ControllerError;
use thiserror::Error;

use crate::stage::ReleaseStage;

/// Lookups that indicate misconfiguration rather than a transient fault
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no hostname for a route on {domain}: neither a hostname nor a source app name is set")]
    EmptyHostname { domain: String },

    #[error("failed to get app info for {name}: {source}")]
    AppQuery {
        name: String,
        source: ControllerError,
    },

    #[error("release failed, app {name} not found in space {space_guid}")]
    AppNotFound { name: String, space_guid: String },

    #[error("failed to get domain {domain}: {source}")]
    DomainQuery {
        domain: String,
        source: ControllerError,
    },

    #[error("domain {domain} not found")]
    DomainNotFound { domain: String },
}

/// Terminal outcome of a failed release
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("unable to create Cloud Foundry client: {0}")]
    Connection(#[source] ControllerError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("failed checking if route {host}.{domain} exists already: {source}")]
    RouteQuery {
        domain: String,
        host: String,
        source: ControllerError,
    },

    #[error("failed creating route {host}.{domain}: {source}")]
    RouteCreate {
        domain: String,
        host: String,
        source: ControllerError,
    },

    #[error("failed to map route {route_guid} to app {app_guid}: {source}")]
    MapRoute {
        route_guid: String,
        app_guid: String,
        source: ControllerError,
    },

    #[error(
        "failed to unmap route {route_guid} from destination {destination_guid} (app {app_guid}); \
         {} destination(s) already unmapped, {remaining} not attempted: {source}",
        .unmapped.len()
    )]
    UnmapRoute {
        route_guid: String,
        destination_guid: String,
        app_guid: String,
        /// Destination GUIDs removed before the failure
        unmapped: Vec<String>,
        /// Destinations after the failing one that were never attempted
        remaining: usize,
        source: ControllerError,
    },

    #[error("release cancelled after reaching {reached}")]
    Cancelled { reached: ReleaseStage },
}

impl ReleaseError {
    /// Last stage the release completed before failing
    pub fn reached_stage(&self) -> ReleaseStage {
        match self {
            ReleaseError::Connection(_)
            | ReleaseError::Lookup(LookupError::EmptyHostname { .. }) => ReleaseStage::Idle,
            ReleaseError::Lookup(LookupError::AppQuery { .. })
            | ReleaseError::Lookup(LookupError::AppNotFound { .. }) => {
                ReleaseStage::ClientConnected
            }
            ReleaseError::Lookup(LookupError::DomainQuery { .. })
            | ReleaseError::Lookup(LookupError::DomainNotFound { .. }) => {
                ReleaseStage::AppResolved
            }
            ReleaseError::RouteQuery { .. } | ReleaseError::RouteCreate { .. } => {
                ReleaseStage::DomainResolved
            }
            ReleaseError::MapRoute { .. } => ReleaseStage::RouteResolved,
            ReleaseError::UnmapRoute { .. } => ReleaseStage::RouteMapped,
            ReleaseError::Cancelled { reached } => *reached,
        }
    }

    /// True when the route was mapped to the new app but may still have
    /// other destinations attached
    pub fn is_partial(&self) -> bool {
        self.reached_stage() == ReleaseStage::RouteMapped
    }
}

pub type ReleaseResult<T> = Result<T, ReleaseError>;
