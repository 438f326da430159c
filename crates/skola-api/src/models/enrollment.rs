// Enrollment models: invitations and the per-item / per-card progress
// records that devices mutate offline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server-side record inviting one user to enroll in a course. The
/// anchor identity for the whole offline workflow: clone, sync, approve
/// and submit all key off the invitation id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: String,
    #[serde(default)]
    pub invited_user_id: String,
    #[serde(default)]
    pub downloaded_offline: bool,
}

/// Filter for listing invitations.
#[derive(Debug, Clone, Default)]
pub struct InvitationsFilter {
    pub course_id: String,
    pub invited_user_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationEnrollRequest {
    pub invitation_id: String,
}

/// An enrollment job as observed by polling. `status` advances strictly
/// server-side; `ENROLLMENT_COMPLETED` is the only terminal value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationEnrollResponse {
    pub id: String,
    #[serde(default)]
    pub invitation_id: String,
    pub status: String,
}

/// Generate a fresh device id.
///
/// Device ids are client-generated; the server only ever echoes them
/// back, so any collision-free string works and a v4 UUID is what real
/// devices send.
pub fn new_device_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A device's progress against one card. `approved` is set exactly once,
/// by the approve step, and gates inclusion in submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardEnrollment {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub card_enrollment_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub learning_item_enrollment_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub card_id: String,
    #[serde(default, skip_serializing_if = "crate::models::is_zero")]
    pub score: i32,
    #[serde(default, skip_serializing_if = "crate::models::is_zero")]
    pub elapsed_sec: i32,
    #[serde(default, skip_serializing_if = "crate::models::is_false")]
    pub server_enrollment: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_id: String,
    #[serde(default, skip_serializing_if = "crate::models::is_false")]
    pub approved: bool,
    /// Selected answer values, in selection order. Cleared (omitted) to
    /// represent an "unanswer" on re-sync.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answer: Vec<String>,
    #[serde(default, skip_serializing_if = "crate::models::is_zero")]
    pub confidence: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "crate::models::is_zero")]
    pub progress: i32,
    #[serde(default, skip_serializing_if = "crate::models::is_zero")]
    pub total_points: i32,
}

/// A device's progress against one learning item, with its cards in
/// source order. Identified across devices by learning item plus the
/// originating invitation -- not by a single global key, which is where
/// duplicates come from when two devices enroll independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningItemEnrollment {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub learning_item_enrollment_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub course_enrollment_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub learning_item_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "crate::models::is_zero")]
    pub progress: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_enrollments: Vec<CardEnrollment>,
}
