// Gateway API client
//
// Wraps the transport with base-URL handling and the default request
// options every gateway call shares. Endpoint groups (organizations,
// learning, enrollments, offline) are implemented as inherent methods in
// separate files to keep this module focused on request mechanics.

mod enrollments;
mod learning;
mod offline;
mod organizations;

pub use offline::{
    BUNDLE_TERMINAL_STATUS, ENROLLMENT_TERMINAL_STATUS, bundle_poll_options,
    enrollment_poll_options, status_matches,
};

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::{LINKED_DATA, RequestOption, Transport, TransportConfig};

/// Client for the platform gateway.
///
/// Holds the gateway base URL plus the identity-provider URL and OAuth
/// client id used for password logins. One client can serve any number
/// of [`Credentials`] -- credentials ride on each call, not the client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    transport: Transport,
    base_url: Url,
    identity_url: Url,
    client_id: String,
}

impl ApiClient {
    /// Create a client from URLs and transport settings.
    pub fn new(
        base_url: Url,
        identity_url: Url,
        client_id: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            transport: Transport::new(transport)?,
            base_url: with_trailing_slash(base_url),
            identity_url: with_trailing_slash(identity_url),
            client_id: client_id.into(),
        })
    }

    /// Wrap an existing `reqwest::Client` (tests, shared pools).
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        identity_url: Url,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            transport: Transport::from_client(http),
            base_url: with_trailing_slash(base_url),
            identity_url: with_trailing_slash(identity_url),
            client_id: client_id.into(),
        }
    }

    /// The gateway base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The identity-provider base URL.
    pub fn identity_url(&self) -> &Url {
        &self.identity_url
    }

    /// The OAuth client id for password logins.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Join a relative path (e.g. `"v1/contexts"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a gateway request with the shared default options prepended.
    ///
    /// Defaults are the JSON body (when given) and the linked-data
    /// content type; `extra` options come after, so a merge-patch content
    /// type or additional query parameters override/extend them.
    /// Credentials go last -- `None` sends an anonymous request.
    pub(crate) async fn send_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        credentials: Option<&Credentials>,
        extra: Vec<RequestOption>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        let options = Self::default_options(body, credentials, extra);
        self.transport.send(method, url, options).await
    }

    /// As [`send_request`](Self::send_request), discarding the response body.
    pub(crate) async fn send_request_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        credentials: Option<&Credentials>,
        extra: Vec<RequestOption>,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        let options = Self::default_options(body, credentials, extra);
        self.transport.send_empty(method, url, options).await
    }

    /// Serialize a typed request body for [`send_request`](Self::send_request).
    pub(crate) fn json_body<T: Serialize>(body: &T) -> Result<Option<serde_json::Value>, Error> {
        Ok(Some(serde_json::to_value(body)?))
    }

    fn default_options(
        body: Option<serde_json::Value>,
        credentials: Option<&Credentials>,
        extra: Vec<RequestOption>,
    ) -> Vec<RequestOption> {
        let mut options = Vec::with_capacity(extra.len() + 3);
        if let Some(body) = body {
            options.push(RequestOption::Body(body));
        }
        options.push(RequestOption::content_type(LINKED_DATA));
        options.extend(extra);
        if let Some(credentials) = credentials {
            options.push(RequestOption::Credentials(credentials.clone()));
        }
        options
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
