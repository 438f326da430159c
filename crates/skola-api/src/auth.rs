// Session establishment against the identity provider and the gateway.
//
// Login is two sequential calls: an OAuth password grant scoped to the
// organization's identity realm, then a context-creation call on the
// gateway that yields the org-scoped context token. Switching
// organization re-issues only the second call with the original access
// token.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::transport::RequestOption;

/// Tokens identifying an authenticated user within one organization.
///
/// The context token is replaced wholesale by
/// [`ApiClient::switch_org`]; the access token survives the switch.
/// One value per logical actor -- sharing a `Credentials` across
/// concurrent actors races organization switches against in-flight
/// authenticated calls.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: SecretString,
    pub context_token: String,
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(serde::Deserialize)]
struct ContextResponse {
    token: String,
}

impl ApiClient {
    /// Password login to a specific organization.
    ///
    /// Runs the password grant against the organization's realm, then
    /// creates a user context for the same organization. When
    /// `accept_terms` is set, the context call also asserts acceptance
    /// of the privacy policy and the terms and conditions. Either
    /// sub-call failing surfaces immediately -- no partial credentials
    /// are ever returned.
    pub async fn login(
        &self,
        org_id: &str,
        username: &str,
        password: &SecretString,
        accept_terms: bool,
    ) -> Result<Credentials, Error> {
        let url = self
            .identity_url()
            .join(&format!("realms/{org_id}/protocol/openid-connect/token"))?;

        debug!("password grant for {username} at {url}");

        let form = vec![
            ("client_id".to_owned(), self.client_id().to_owned()),
            ("username".to_owned(), username.to_owned()),
            ("password".to_owned(), password.expose_secret().to_owned()),
            ("grant_type".to_owned(), "password".to_owned()),
        ];

        let token: TokenResponse = self
            .transport()
            .send(Method::POST, url, vec![RequestOption::Form(form)])
            .await?;

        let context_token = self
            .user_context(org_id, &token.access_token, accept_terms)
            .await?;

        Ok(Credentials {
            access_token: token.access_token.into(),
            context_token,
        })
    }

    /// Switch an existing session to a different organization.
    ///
    /// Re-issues only the context-creation call against the new
    /// organization, reusing the access token; the context token is
    /// replaced in place.
    pub async fn switch_org(
        &self,
        org_id: &str,
        credentials: &mut Credentials,
    ) -> Result<(), Error> {
        credentials.context_token = self
            .user_context(org_id, credentials.access_token.expose_secret(), false)
            .await?;
        Ok(())
    }

    async fn user_context(
        &self,
        org_id: &str,
        access_token: &str,
        accept_terms: bool,
    ) -> Result<String, Error> {
        let url = self.url("/v1/contexts")?;

        debug!("creating user context for org {org_id}");

        let mut body = json!({ "org_id": org_id });
        if accept_terms {
            body["accept_privacy_policy"] = json!(true);
            body["accept_terms_and_conditions"] = json!(true);
        }

        let resp: ContextResponse = self
            .transport()
            .send(
                Method::POST,
                url,
                vec![
                    RequestOption::Body(body),
                    RequestOption::Header(
                        "authorization".to_owned(),
                        format!("Bearer {access_token}"),
                    ),
                ],
            )
            .await?;

        Ok(resp.token)
    }
}
