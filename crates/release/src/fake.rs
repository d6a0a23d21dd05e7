//! In-memory controller that records every call

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use cfrelease_shared::{
    Application, CloudController, Connect, ControllerError, ControllerResult, Domain, NewRoute,
    Route, RouteDestination,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListApplications(String),
    ListDomains(String),
    ListRoutes { domain_guid: String, hosts: Vec<String> },
    CreateRoute { host: String, destinations: Vec<String> },
    MapRoute { route_guid: String, app_guid: String },
    UnmapRoute { route_guid: String, destination_guid: String },
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::CreateRoute { .. } | Call::MapRoute { .. } | Call::UnmapRoute { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fail {
    ListApplications,
    ListDomains,
    ListRoutes,
    CreateRoute,
    MapRoute,
    /// Unmapping this destination GUID fails
    Unmap(String),
    /// Every call is rejected with 401, as for an expired token
    Unauthorized,
}

#[derive(Default)]
struct State {
    apps: Vec<Application>,
    domains: Vec<Domain>,
    routes: Vec<Route>,
    calls: Vec<Call>,
    failures: Vec<Fail>,
    next_id: usize,
}

impl State {
    fn fail_if(&self, fail: Fail) -> ControllerResult<()> {
        if self.failures.contains(&Fail::Unauthorized) {
            return Err(ControllerError::Api {
                status: 401,
                code: Some(1000),
                title: "CF-InvalidAuthToken".to_string(),
                detail: "Invalid Auth Token".to_string(),
            });
        }
        if self.failures.contains(&fail) {
            return Err(ControllerError::Api {
                status: 500,
                code: None,
                title: "CF-ServerError".to_string(),
                detail: format!("injected failure: {:?}", fail),
            });
        }
        Ok(())
    }

    fn next_guid(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn domain_name(&self, guid: &str) -> String {
        self.domains
            .iter()
            .find(|d| d.guid == guid)
            .map(|d| d.name.clone())
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct FakeController {
    url: String,
    state: Arc<Mutex<State>>,
}

impl FakeController {
    pub fn new() -> Self {
        Self {
            url: "https://api.sys.example.com".to_string(),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_app(self, guid: &str, name: &str) -> Self {
        self.state().apps.push(Application {
            guid: guid.to_string(),
            name: name.to_string(),
            state: "STARTED".to_string(),
        });
        self
    }

    pub fn with_domain(self, guid: &str, name: &str) -> Self {
        self.state().domains.push(Domain {
            guid: guid.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Add an existing route; `destinations` are `(destination_guid, app_guid)` pairs
    pub fn with_route(
        self,
        guid: &str,
        domain_guid: &str,
        host: &str,
        destinations: &[(&str, &str)],
    ) -> Self {
        let mut state = self.state();
        let url = format!("{}.{}", host, state.domain_name(domain_guid));
        state.routes.push(Route {
            guid: guid.to_string(),
            protocol: "https".to_string(),
            host: host.to_string(),
            path: String::new(),
            url,
            domain_guid: domain_guid.to_string(),
            space_guid: "space-guid".to_string(),
            destinations: destinations
                .iter()
                .map(|(dest, app)| RouteDestination {
                    guid: dest.to_string(),
                    app_guid: app.to_string(),
                })
                .collect(),
        });
        drop(state);
        self
    }

    pub fn failing(self, fail: Fail) -> Self {
        self.state().failures.push(fail);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.state().routes.clone()
    }

    pub fn route(&self, guid: &str) -> Option<Route> {
        self.state().routes.iter().find(|r| r.guid == guid).cloned()
    }
}

#[async_trait]
impl CloudController for FakeController {
    fn controller_url(&self) -> &str {
        &self.url
    }

    async fn list_applications(
        &self,
        _organisation_guid: &str,
        _space_guid: &str,
        name: &str,
    ) -> ControllerResult<Vec<Application>> {
        let mut state = self.state();
        state.calls.push(Call::ListApplications(name.to_string()));
        state.fail_if(Fail::ListApplications)?;
        Ok(state.apps.iter().filter(|a| a.name == name).cloned().collect())
    }

    async fn list_domains(&self, name: &str) -> ControllerResult<Vec<Domain>> {
        let mut state = self.state();
        state.calls.push(Call::ListDomains(name.to_string()));
        state.fail_if(Fail::ListDomains)?;
        // Mimic a server-side filter that is looser than an exact match
        Ok(state
            .domains
            .iter()
            .filter(|d| d.name.eq_ignore_ascii_case(name))
            .cloned()
            .collect())
    }

    async fn list_routes(
        &self,
        domain_guid: &str,
        hosts: &[String],
    ) -> ControllerResult<Vec<Route>> {
        let mut state = self.state();
        state.calls.push(Call::ListRoutes {
            domain_guid: domain_guid.to_string(),
            hosts: hosts.to_vec(),
        });
        state.fail_if(Fail::ListRoutes)?;
        Ok(state
            .routes
            .iter()
            .filter(|r| r.domain_guid == domain_guid && hosts.contains(&r.host))
            .cloned()
            .collect())
    }

    async fn create_route(&self, route: &NewRoute) -> ControllerResult<Route> {
        let mut state = self.state();
        state.calls.push(Call::CreateRoute {
            host: route.host.clone(),
            destinations: route.destinations.clone(),
        });
        state.fail_if(Fail::CreateRoute)?;

        let guid = state.next_guid("route");
        let destinations = route
            .destinations
            .iter()
            .map(|app_guid| RouteDestination {
                guid: state.next_guid("dest"),
                app_guid: app_guid.clone(),
            })
            .collect::<Vec<_>>();
        let created = Route {
            guid,
            protocol: "https".to_string(),
            host: route.host.clone(),
            path: String::new(),
            url: format!("{}.{}", route.host, state.domain_name(&route.domain_guid)),
            domain_guid: route.domain_guid.clone(),
            space_guid: route.space_guid.clone(),
            destinations,
        };
        state.routes.push(created.clone());
        Ok(created)
    }

    async fn map_route(&self, route_guid: &str, app_guid: &str) -> ControllerResult<()> {
        let mut state = self.state();
        state.calls.push(Call::MapRoute {
            route_guid: route_guid.to_string(),
            app_guid: app_guid.to_string(),
        });
        state.fail_if(Fail::MapRoute)?;

        let dest_guid = state.next_guid("dest");
        let route = state
            .routes
            .iter_mut()
            .find(|r| r.guid == route_guid)
            .ok_or_else(|| not_found("route", route_guid))?;
        if !route.is_bound_to(app_guid) {
            route.destinations.push(RouteDestination {
                guid: dest_guid,
                app_guid: app_guid.to_string(),
            });
        }
        Ok(())
    }

    async fn unmap_route(&self, route_guid: &str, destination_guid: &str) -> ControllerResult<()> {
        let mut state = self.state();
        state.calls.push(Call::UnmapRoute {
            route_guid: route_guid.to_string(),
            destination_guid: destination_guid.to_string(),
        });
        state.fail_if(Fail::Unmap(destination_guid.to_string()))?;

        let route = state
            .routes
            .iter_mut()
            .find(|r| r.guid == route_guid)
            .ok_or_else(|| not_found("route", route_guid))?;
        route.destinations.retain(|d| d.guid != destination_guid);
        Ok(())
    }
}

fn not_found(kind: &str, guid: &str) -> ControllerError {
    ControllerError::Api {
        status: 404,
        code: Some(10010),
        title: "CF-ResourceNotFound".to_string(),
        detail: format!("{} {} not found", kind, guid),
    }
}

/// Hands out a shared [`FakeController`]
pub struct FakeConnector {
    pub controller: FakeController,
    pub refuse: bool,
}

impl FakeConnector {
    pub fn new(controller: FakeController) -> Self {
        Self {
            controller,
            refuse: false,
        }
    }
}

#[async_trait]
impl Connect for FakeConnector {
    type Client = FakeController;

    async fn connect(&self) -> ControllerResult<FakeController> {
        if self.refuse {
            return Err(ControllerError::Transport {
                target: self.controller.url.clone(),
                message: "connection refused".to_string(),
            });
        }
        Ok(self.controller.clone())
    }
}
