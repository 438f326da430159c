// Organization, attribute, and user-account endpoints.

use reqwest::Method;

use crate::auth::Credentials;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    AssignUserAttributeRequest, CreateOrgAttributeRequest, CreateOrganizationRequest,
    CreateUserRequest, OrgAttribute, Organization, User,
};
use crate::transport::RequestOption;

impl ApiClient {
    /// Create a new organization on the platform.
    pub async fn create_organization(
        &self,
        req: &CreateOrganizationRequest,
        credentials: &Credentials,
    ) -> Result<Organization, Error> {
        #[derive(serde::Deserialize)]
        struct Response {
            organization: Organization,
        }

        let resp: Response = self
            .send_request(
                Method::POST,
                "/v1/organizations",
                Self::json_body(req)?,
                Some(credentials),
                Vec::new(),
            )
            .await?;

        Ok(resp.organization)
    }

    /// Create a new user account in the current organization context.
    pub async fn create_user(
        &self,
        req: &CreateUserRequest,
        credentials: &Credentials,
    ) -> Result<User, Error> {
        self.send_request(
            Method::POST,
            "/v1/users",
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Add a new attribute to an organization.
    pub async fn create_org_attribute(
        &self,
        req: &CreateOrgAttributeRequest,
        credentials: &Credentials,
    ) -> Result<(), Error> {
        self.send_request_empty(
            Method::POST,
            "/v1/attributes",
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// List the active, editable attributes of the current organization.
    pub async fn org_attributes(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<OrgAttribute>, Error> {
        #[derive(serde::Deserialize)]
        struct Response {
            attributes: Vec<OrgAttribute>,
        }

        let resp: Response = self
            .send_request(
                Method::GET,
                "/v1/attributes",
                None,
                Some(credentials),
                vec![
                    RequestOption::query("page", "1"),
                    RequestOption::query("itemsPerPage", "10"),
                    RequestOption::query("matchStatus", "ACTIVE"),
                    RequestOption::query("matchEditable", "true"),
                ],
            )
            .await?;

        Ok(resp.attributes)
    }

    /// Assign an attribute value to a user.
    pub async fn assign_user_attribute(
        &self,
        req: &AssignUserAttributeRequest,
        credentials: &Credentials,
    ) -> Result<(), Error> {
        self.send_request_empty(
            Method::POST,
            "/v1/user_attributes",
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }
}
