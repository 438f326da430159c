// Invitation listing.

use reqwest::Method;

use crate::auth::Credentials;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Invitation, InvitationsFilter};
use crate::transport::RequestOption;

impl ApiClient {
    /// List a user's invitations matching the filter.
    pub async fn invitations(
        &self,
        filter: &InvitationsFilter,
        credentials: &Credentials,
    ) -> Result<Vec<Invitation>, Error> {
        #[derive(serde::Deserialize)]
        struct Response {
            #[serde(rename = "hydra:member")]
            invitations: Vec<Invitation>,
        }

        let resp: Response = self
            .send_request(
                Method::GET,
                "/v1/invitations",
                None,
                Some(credentials),
                vec![
                    RequestOption::query("courseId[]", filter.course_id.clone()),
                    RequestOption::query("invitedUserId[]", filter.invited_user_id.clone()),
                ],
            )
            .await?;

        Ok(resp.invitations)
    }
}
