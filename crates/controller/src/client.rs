//! REST client for the Cloud Controller v3 API

use async_trait::async_trait;
use cfrelease_shared::{
    Application, CloudController, Connect, ControllerError, ControllerResult, Domain, NewRoute,
    Route,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};
use url::Url;

use crate::config::ControllerConfig;
use crate::wire::{
    AppResource, CreateRouteRequest, DestinationList, DomainResource, ErrorEnvelope,
    InsertDestinationsRequest, Page, RouteResource,
};

/// Upper bound on followed pages for a single list call
const MAX_PAGES: usize = 50;

/// Authenticated Cloud Controller client
#[derive(Clone)]
pub struct ControllerClient {
    client: Client,
    api_url: String,
    access_token: String,
}

impl ControllerClient {
    /// Build a client and verify the controller accepts the configured token
    ///
    /// The API root is public, so the check lists a single organization
    /// instead; a rejected token fails here rather than on the first lookup.
    pub async fn connect(config: &ControllerConfig) -> ControllerResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.skip_ssl_validation)
            .build()
            .map_err(|e| ControllerError::Transport {
                target: config.api_url.clone(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        let controller = Self {
            client,
            api_url: config.api_url.clone(),
            access_token: config.access_token.clone(),
        };

        let check = controller.endpoint("/v3/organizations", &[("per_page", "1")])?;
        if let Err(e) = controller
            .execute(controller.request(Method::GET, &check), &check)
            .await
        {
            if e.is_unauthorized() {
                error!(api_url = %controller.api_url, "Access token rejected");
            }
            return Err(e);
        }
        debug!(api_url = %controller.api_url, "Connected to Cloud Controller");

        Ok(controller)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("bearer {}", self.access_token))
            .header("Accept", "application/json")
    }

    /// Absolute URL for `path` with the given query filters
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> ControllerResult<String> {
        let mut url = Url::parse(&format!("{}{}", self.api_url, path))
            .map_err(|e| ControllerError::InvalidUrl(e.to_string()))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url.into())
    }

    /// Send a request, mapping transport failures and non-2xx statuses
    async fn execute(&self, request: RequestBuilder, target: &str) -> ControllerResult<Response> {
        let response = request.send().await.map_err(|e| ControllerError::Transport {
            target: target.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("Cloud Controller returned error status {} for {}: {}", status, target, body);
        Err(api_error(status.as_u16(), status.canonical_reason(), &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response, target: &str) -> ControllerResult<T> {
        response.json().await.map_err(|e| ControllerError::Decode {
            target: target.to_string(),
            message: e.to_string(),
        })
    }

    async fn send_json<B, T>(&self, method: Method, url: &str, body: &B) -> ControllerResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(%method, url, "Cloud Controller request");
        let response = self
            .execute(self.request(method, url).json(body), url)
            .await?;
        Self::decode(response, url).await
    }

    /// GET every page of a list endpoint
    async fn list_all<T: DeserializeOwned>(&self, first: String) -> ControllerResult<Vec<T>> {
        let mut resources = Vec::new();
        let mut next = Some(first);
        let mut pages = 0;

        while let Some(url) = next.take() {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(ControllerError::Decode {
                    target: url,
                    message: format!("more than {} pages returned", MAX_PAGES),
                });
            }

            debug!(url = %url, "Cloud Controller request");
            let response = self.execute(self.request(Method::GET, &url), &url).await?;
            let page: Page<T> = Self::decode(response, &url).await?;
            next = page.next_href().map(str::to_string);
            resources.extend(page.resources);
        }

        Ok(resources)
    }

    async fn insert_destinations(
        &self,
        route_guid: &str,
        app_guids: &[String],
    ) -> ControllerResult<DestinationList> {
        let url = self.endpoint(&format!("/v3/routes/{}/destinations", route_guid), &[])?;
        let body = InsertDestinationsRequest::for_apps(app_guids.iter().map(String::as_str));
        self.send_json(Method::POST, &url, &body).await
    }
}

/// Decode a v3 error envelope, falling back to the raw body
fn api_error(status: u16, reason: Option<&str>, body: &str) -> ControllerError {
    let fallback_title = reason.unwrap_or("Unknown").to_string();

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.errors.is_empty() => {
            let code = envelope.errors[0].code;
            let title = envelope
                .errors
                .iter()
                .map(|e| e.title.as_str())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            let detail = envelope
                .errors
                .iter()
                .map(|e| e.detail.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            ControllerError::Api {
                status,
                code,
                title: if title.is_empty() { fallback_title } else { title },
                detail,
            }
        }
        _ => ControllerError::Api {
            status,
            code: None,
            title: fallback_title,
            detail: body.trim().to_string(),
        },
    }
}

#[async_trait]
impl CloudController for ControllerClient {
    fn controller_url(&self) -> &str {
        &self.api_url
    }

    async fn list_applications(
        &self,
        organisation_guid: &str,
        space_guid: &str,
        name: &str,
    ) -> ControllerResult<Vec<Application>> {
        let url = self.endpoint(
            "/v3/apps",
            &[
                ("organization_guids", organisation_guid),
                ("space_guids", space_guid),
                ("names", name),
            ],
        )?;
        let apps: Vec<AppResource> = self.list_all(url).await?;
        Ok(apps.into_iter().map(Into::into).collect())
    }

    async fn list_domains(&self, name: &str) -> ControllerResult<Vec<Domain>> {
        let url = self.endpoint("/v3/domains", &[("names", name)])?;
        let domains: Vec<DomainResource> = self.list_all(url).await?;
        Ok(domains.into_iter().map(Into::into).collect())
    }

    async fn list_routes(
        &self,
        domain_guid: &str,
        hosts: &[String],
    ) -> ControllerResult<Vec<Route>> {
        let hosts = hosts.join(",");
        let url = self.endpoint(
            "/v3/routes",
            &[("domain_guids", domain_guid), ("hosts", hosts.as_str())],
        )?;
        let routes: Vec<RouteResource> = self.list_all(url).await?;
        Ok(routes.into_iter().map(Into::into).collect())
    }

    async fn create_route(&self, route: &NewRoute) -> ControllerResult<Route> {
        let url = self.endpoint("/v3/routes", &[])?;
        let body = CreateRouteRequest::new(&route.host, &route.domain_guid, &route.space_guid);
        let created: RouteResource = self.send_json(Method::POST, &url, &body).await?;
        let mut created: Route = created.into();

        if !route.destinations.is_empty() {
            let inserted = self
                .insert_destinations(&created.guid, &route.destinations)
                .await?;
            created.destinations = inserted.destinations.into_iter().map(Into::into).collect();
        }

        Ok(created)
    }

    async fn map_route(&self, route_guid: &str, app_guid: &str) -> ControllerResult<()> {
        self.insert_destinations(route_guid, &[app_guid.to_string()])
            .await?;
        Ok(())
    }

    async fn unmap_route(&self, route_guid: &str, destination_guid: &str) -> ControllerResult<()> {
        let url = self.endpoint(
            &format!("/v3/routes/{}/destinations/{}", route_guid, destination_guid),
            &[],
        )?;
        debug!(url = %url, "Cloud Controller request");
        self.execute(self.request(Method::DELETE, &url), &url).await?;
        Ok(())
    }
}

#[async_trait]
impl Connect for ControllerConfig {
    type Client = ControllerClient;

    async fn connect(&self) -> ControllerResult<ControllerClient> {
        ControllerClient::connect(self).await
    }
}
