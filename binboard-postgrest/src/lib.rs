//! REST port for PostgREST backends such as Supabase `rest/v1`.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Request, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use binboard_core::{
    config::BackendConfig,
    ports::{PortError, RestPort, Row},
    query::{Query, Resource},
};

/// Header asking PostgREST to echo inserted rows.
const PREFER_REPRESENTATION: &str = "return=representation";

/// HTTP client for the table-as-resource surface.
pub struct PostgrestClient {
    client: Client,
    config: BackendConfig,
}

impl PostgrestClient {
    /// Create a new client bound to the given HTTP client and credentials.
    #[must_use]
    pub fn new(client: Client, config: BackendConfig) -> Self {
        Self { client, config }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(CONTENT_TYPE, "application/json")
    }

    /// Build the authenticated read request for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Config`] before building anything when the
    /// credentials are missing, and [`PortError::Network`] when the key is
    /// not a valid header value.
    pub fn get_request(&self, query: &Query) -> Result<Request, PortError> {
        self.config.ensure_configured()?;
        let url = format!("{}/{}", self.config.rest_root(), query.path_and_query());
        Ok(self.authorized(self.client.get(url)).build()?)
    }

    /// Build the authenticated insert request for `resource`.
    ///
    /// # Errors
    ///
    /// Same contract as [`PostgrestClient::get_request`].
    pub fn post_request(&self, resource: Resource, payload: &Value) -> Result<Request, PortError> {
        self.config.ensure_configured()?;
        let url = format!("{}/{resource}", self.config.rest_root());
        Ok(self
            .authorized(self.client.post(url))
            .header("Prefer", PREFER_REPRESENTATION)
            .json(payload)
            .build()?)
    }

    async fn execute(&self, request: Request) -> Result<Vec<Row>, PortError> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, path = url.path(), "sending request");
        let response = self.client.execute(request).await?;
        read_rows(response).await
    }
}

#[async_trait]
impl RestPort for PostgrestClient {
    async fn get(&self, query: &Query) -> Result<Vec<Row>, PortError> {
        let request = self.get_request(query)?;
        self.execute(request).await
    }

    async fn post(&self, resource: Resource, payload: Row) -> Result<Vec<Row>, PortError> {
        let request = self.post_request(resource, &payload)?;
        self.execute(request).await
    }
}

async fn read_rows(response: Response) -> Result<Vec<Row>, PortError> {
    let status = response.status();
    if !status.is_success() {
        return Err(rejected(status, response.text().await));
    }
    Ok(response.json::<Vec<Row>>().await?)
}

// Non-2xx bodies are kept verbatim so the user sees what the backend said.
fn rejected(status: StatusCode, body: Result<String, reqwest::Error>) -> PortError {
    let body = body.unwrap_or_else(|err| {
        warn!(status = status.as_u16(), error = %err, "could not read error response body");
        format!("response body could not be read ({err})")
    });
    warn!(status = status.as_u16(), %body, "backend rejected request");
    PortError::Api {
        status: status.as_u16(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use binboard_core::config::ConfigError;
    use serde_json::json;

    use super::*;

    fn client(config: BackendConfig) -> PostgrestClient {
        PostgrestClient::new(Client::new(), config)
    }

    fn configured() -> PostgrestClient {
        client(BackendConfig::new("https://abc.supabase.co/", "anon-key"))
    }

    fn header<'req>(request: &'req Request, name: &str) -> Option<&'req str> {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    #[test]
    fn get_request_targets_rest_root_with_both_auth_headers() {
        let query = Query::select_all(Resource::Complaints)
            .eq("bin_id", 3)
            .latest_first("created_at")
            .limit(5);
        let request = configured().get_request(&query).expect("request builds");

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://abc.supabase.co/rest/v1/complaints?select=*&bin_id=eq.3&order=created_at.desc&limit=5"
        );
        assert_eq!(header(&request, "apikey"), Some("anon-key"));
        assert_eq!(header(&request, "authorization"), Some("Bearer anon-key"));
        assert_eq!(header(&request, "prefer"), None);
    }

    #[test]
    fn post_request_asks_for_representation() {
        let payload = json!({"bin_id": 1, "status": "OPEN"});
        let request = configured()
            .post_request(Resource::MaintTickets, &payload)
            .expect("request builds");

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://abc.supabase.co/rest/v1/maint_tickets"
        );
        assert_eq!(header(&request, "prefer"), Some("return=representation"));
        assert_eq!(header(&request, "content-type"), Some("application/json"));
        let body = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .expect("json body");
        let sent: Value = serde_json::from_slice(body).expect("body is json");
        assert_eq!(sent, payload);
    }

    #[test]
    fn placeholder_config_is_refused_before_building() {
        let unconfigured = client(BackendConfig::new(
            "https://YOUR-PROJECT-REF.supabase.co",
            "anon-key",
        ));
        let result = unconfigured.get_request(&Query::select_all(Resource::Bins));
        assert!(
            matches!(result, Err(PortError::Config(ConfigError::BaseUrl))),
            "{result:?}"
        );
    }

    #[test]
    fn rejected_response_keeps_backend_text() {
        let err = rejected(StatusCode::UNAUTHORIZED, Ok("Invalid API key".to_owned()));
        assert_eq!(err.to_string(), "Error 401: Invalid API key");
    }

    #[test]
    fn unreadable_error_body_is_reported_not_blank() {
        let read_failure = Client::new()
            .get("not a url")
            .build()
            .expect_err("relative url is rejected");
        let err = rejected(StatusCode::INTERNAL_SERVER_ERROR, Err(read_failure));
        assert!(
            matches!(&err, PortError::Api { status: 500, body } if body.starts_with("response body could not be read")),
            "{err}"
        );
    }

    #[tokio::test]
    async fn unconfigured_get_fails_without_network() {
        let unconfigured = client(BackendConfig::default());
        let err = unconfigured
            .get(&Query::select_all(Resource::Zones))
            .await
            .expect_err("no credentials");
        assert!(err.to_string().contains("SUPABASE_URL"), "{err}");
    }
}
