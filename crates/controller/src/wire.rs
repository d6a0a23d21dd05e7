//! Cloud Controller v3 JSON shapes

use cfrelease_shared::{Application, Domain, Route, RouteDestination};
use serde::{Deserialize, Serialize};

// ============================================================================
// Responses
// ============================================================================

/// Paginated list envelope
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    pub resources: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Pagination {
    pub next: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Link {
    pub href: String,
}

impl<T> Page<T> {
    pub fn next_href(&self) -> Option<&str> {
        self.pagination
            .as_ref()
            .and_then(|p| p.next.as_ref())
            .map(|link| link.href.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppResource {
    guid: String,
    name: String,
    #[serde(default)]
    state: String,
}

impl From<AppResource> for Application {
    fn from(app: AppResource) -> Self {
        Self {
            guid: app.guid,
            name: app.name,
            state: app.state,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DomainResource {
    guid: String,
    name: String,
}

impl From<DomainResource> for Domain {
    fn from(domain: DomainResource) -> Self {
        Self {
            guid: domain.guid,
            name: domain.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DestinationResource {
    guid: String,
    app: GuidRef,
}

impl From<DestinationResource> for RouteDestination {
    fn from(destination: DestinationResource) -> Self {
        Self {
            guid: destination.guid,
            app_guid: destination.app.guid,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DestinationList {
    pub destinations: Vec<DestinationResource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RouteResource {
    guid: String,
    #[serde(default = "default_protocol")]
    protocol: String,
    #[serde(default)]
    host: String,
    #[serde(default)]
    path: String,
    url: String,
    #[serde(default)]
    destinations: Vec<DestinationResource>,
    relationships: RouteRelationships,
}

fn default_protocol() -> String {
    "http".to_string()
}

#[derive(Debug, Deserialize, Serialize)]
struct RouteRelationships {
    domain: ToOne,
    space: ToOne,
}

#[derive(Debug, Deserialize, Serialize)]
struct ToOne {
    data: Option<GuidRef>,
}

impl ToOne {
    fn to(guid: &str) -> Self {
        Self {
            data: Some(GuidRef {
                guid: guid.to_string(),
            }),
        }
    }

    fn into_guid(self) -> String {
        self.data.map(|d| d.guid).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct GuidRef {
    guid: String,
}

impl From<RouteResource> for Route {
    fn from(route: RouteResource) -> Self {
        Self {
            guid: route.guid,
            protocol: route.protocol,
            host: route.host,
            path: route.path,
            url: route.url,
            domain_guid: route.relationships.domain.into_guid(),
            space_guid: route.relationships.space.into_guid(),
            destinations: route.destinations.into_iter().map(Into::into).collect(),
        }
    }
}

/// v3 error envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEntry {
    pub code: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct CreateRouteRequest {
    host: String,
    relationships: RouteRelationships,
}

impl CreateRouteRequest {
    pub fn new(host: &str, domain_guid: &str, space_guid: &str) -> Self {
        Self {
            host: host.to_string(),
            relationships: RouteRelationships {
                domain: ToOne::to(domain_guid),
                space: ToOne::to(space_guid),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InsertDestinationsRequest {
    destinations: Vec<NewDestination>,
}

#[derive(Debug, Serialize)]
struct NewDestination {
    app: GuidRef,
}

impl InsertDestinationsRequest {
    pub fn for_apps<'a>(app_guids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            destinations: app_guids
                .into_iter()
                .map(|guid| NewDestination {
                    app: GuidRef {
                        guid: guid.to_string(),
                    },
                })
                .collect(),
        }
    }
}
