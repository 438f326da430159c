// Organization, attribute, and user account models.

use serde::{Deserialize, Serialize};

/// An organization on the platform. Each organization is backed by its
/// own identity-provider realm; `idp_client_id` is the OAuth client used
/// for password logins into that realm.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub idp_type: String,
    #[serde(default)]
    pub idp_group_id: String,
    #[serde(default)]
    pub idp_client_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    pub slug: String,
    pub name: String,
    pub status: String,
}

/// One selectable value of a single/multi-select attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeOption {
    pub label: String,
    pub sequence_order: i32,
}

/// An organization-level attribute that can be assigned to users and
/// filtered on by learning groups.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgAttribute {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "types")]
    pub attribute_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub attribute_options: Vec<AttributeOption>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrgAttributeRequest {
    pub attribute_options: Vec<AttributeOption>,
    pub name: String,
    /// IRI of the owning organization, e.g. `/api/organizations/{id}`.
    pub organization: String,
    #[serde(rename = "type")]
    pub attribute_type: String,
}

/// A user account. User fields are snake_case on the wire, unlike the
/// rest of the API.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignUserAttributeRequest {
    pub user_id: String,
    pub attribute_id: String,
    pub value: String,
}
