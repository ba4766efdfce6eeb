//! Authenticated session against the Convore API.
//!
//! # Design
//! `ConvoreClient` owns the base URL, one credential pair and a `Transport`.
//! Requests are split into a pure `build_*` step producing an `HttpRequest`
//! and a `check_status` step consuming the `HttpResponse`; the transport sits
//! between them. `get`/`post` chain the three for callers that just want the
//! body.
//!
//! The client is immutable after construction. Separate identities are
//! separate clients.

use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::path::ResourcePath;
use crate::resources::{Groups, Messages, Topics, Users};
use crate::transport::UreqTransport;

#[derive(Debug, Clone)]
pub struct ConvoreClient<T = UreqTransport> {
    config: ClientConfig,
    credentials: Credentials,
    transport: T,
}

impl ConvoreClient<UreqTransport> {
    /// Opens a session for `username` against the API root from the
    /// environment (see `ClientConfig::from_env`). No request is made.
    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::login_with_config(ClientConfig::from_env(), username, password)
    }

    pub fn login_with_config(
        config: ClientConfig,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::with_transport(config, Credentials::new(username, password), UreqTransport::new())
    }
}

impl<T: Transport> ConvoreClient<T> {
    pub fn with_transport(config: ClientConfig, credentials: Credentials, transport: T) -> Self {
        debug!(base_url = %config.base_url, username = credentials.username(), "session created");
        Self {
            config,
            credentials,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn groups(&self) -> Groups<'_, T> {
        Groups::new(self)
    }

    pub fn topics(&self) -> Topics<'_, T> {
        Topics::new(self)
    }

    pub fn messages(&self) -> Messages<'_, T> {
        Messages::new(self)
    }

    pub fn users(&self) -> Users<'_, T> {
        Users::new(self)
    }

    /// GET request for `path`; `params` travel as the query string.
    pub fn build_get(&self, path: &ResourcePath, params: &[(&str, &str)]) -> HttpRequest {
        self.build(HttpMethod::Get, path, params)
    }

    /// POST request for `path`; `params` travel form-encoded in the body.
    pub fn build_post(&self, path: &ResourcePath, params: &[(&str, &str)]) -> HttpRequest {
        self.build(HttpMethod::Post, path, params)
    }

    fn build(&self, method: HttpMethod, path: &ResourcePath, params: &[(&str, &str)]) -> HttpRequest {
        HttpRequest {
            method,
            url: path.url(&self.config.base_url),
            headers: vec![
                ("authorization".to_string(), self.credentials.authorization_header()),
                ("accept".to_string(), "application/json".to_string()),
            ],
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Runs one round-trip through the transport. No retries.
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            status = response.status,
            "received response"
        );
        Ok(response)
    }

    /// GETs `path` and returns the raw body. `error` becomes the message of
    /// an `HttpError` on any non-2xx status other than 401.
    pub fn get(
        &self,
        path: &ResourcePath,
        params: &[(&str, &str)],
        error: Option<&str>,
    ) -> Result<String, ApiError> {
        let response = self.send(&self.build_get(path, params))?;
        check_status(response, error)
    }

    /// Same as `get` with `params` sent as the request body.
    pub fn post(
        &self,
        path: &ResourcePath,
        params: &[(&str, &str)],
        error: Option<&str>,
    ) -> Result<String, ApiError> {
        let response = self.send(&self.build_post(path, params))?;
        check_status(response, error)
    }
}

/// Map the response status to the body or to the matching `ApiError`.
///
/// 401 is always `AuthenticationFailed`; `error` only annotates other
/// failures.
pub fn check_status(response: HttpResponse, error: Option<&str>) -> Result<String, ApiError> {
    if response.is_success() {
        return Ok(response.body);
    }
    if response.status == 401 {
        warn!("credentials rejected by the API");
        return Err(ApiError::AuthenticationFailed);
    }
    Err(ApiError::HttpError {
        status: response.status,
        message: error.map(str::to_string),
        body: response.body,
    })
}
