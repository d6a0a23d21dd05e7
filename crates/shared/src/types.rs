//! Platform entities as seen by a release

use serde::{Deserialize, Serialize};

// =============================================================================
// Deployment inputs
// =============================================================================

/// Deployment descriptor produced by the deploy stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// GUID of the deployed application
    pub app_guid: String,
    /// Name the application was pushed under
    pub name: String,
    /// Owning organization GUID
    pub organisation_guid: String,
    /// Owning space GUID
    pub space_guid: String,
}

/// Source the deployment was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Logical application name
    pub app: String,
}

impl Source {
    pub fn new(app: impl Into<String>) -> Self {
        Self { app: app.into() }
    }
}

// =============================================================================
// Remote entities
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub guid: String,
    pub name: String,
    /// Lifecycle state reported by the controller (STARTED, STOPPED)
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub guid: String,
    pub name: String,
}

/// A single app binding on a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDestination {
    pub guid: String,
    pub app_guid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub guid: String,
    /// e.g. "http", "https", "tcp"
    pub protocol: String,
    pub host: String,
    pub path: String,
    /// Composed `host.domain/path` without a scheme
    pub url: String,
    pub domain_guid: String,
    pub space_guid: String,
    pub destinations: Vec<RouteDestination>,
}

impl Route {
    /// Externally reachable URL of this route
    pub fn external_url(&self) -> String {
        format!("{}://{}", self.protocol, self.url)
    }

    /// GUIDs of every app currently bound to the route
    pub fn app_guids(&self) -> impl Iterator<Item = &str> {
        self.destinations.iter().map(|d| d.app_guid.as_str())
    }

    pub fn is_bound_to(&self, app_guid: &str) -> bool {
        self.app_guids().any(|guid| guid == app_guid)
    }
}

/// Route to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoute {
    pub domain_guid: String,
    pub space_guid: String,
    pub host: String,
    /// App GUIDs bound at creation time
    pub destinations: Vec<String>,
}
