// Offline-workflow request/response models: course bundling, enrollment
// cloning, sync, duplicate detection, approval and submission.

use serde::{Deserialize, Serialize};

use super::LearningItemEnrollment;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBundleRequest {
    pub org_id: String,
    pub course_id: String,
    #[serde(rename = "learningplanId")]
    pub learning_plan_id: String,
    pub device_id: String,
    /// `SHARED` or `PERSONAL`.
    pub offline_mode: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBundleResponse {
    pub job_id: String,
}

/// Bundle job state. `bundle_status` is terminal at
/// `BUNDLE_UPLOAD_COMPLETED`; `course_url` is only meaningful then.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBundleUrlResponse {
    #[serde(default)]
    pub course_url: String,
    pub bundle_status: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneEnrollmentRequest {
    pub invitation_id: String,
}

/// The full enrollment tree for one invitation, ready to hand to a
/// device for offline mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneEnrollmentResponse {
    pub course_enrollment_id: String,
    #[serde(default)]
    pub course_id: String,
    pub invitation_id: String,
    #[serde(default)]
    pub learning_item_enrollments: Vec<LearningItemEnrollment>,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncEnrollmentsRequest {
    // Gateway quirk: this field is serialized with a leading capital.
    #[serde(rename = "LearningItemEnrollments")]
    pub learning_item_enrollments: Vec<LearningItemEnrollment>,
}

/// Per-record outcome of a sync batch. Outcomes are independent --
/// partial failure does not abort the batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub learning_item_enrollment_id: String,
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateEnrollmentsRequest {
    pub learning_item_enrollment_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveEnrollmentRequest {
    // Gateway quirk: leading capital, unlike every sibling field.
    #[serde(rename = "LearningItemEnrollmentId")]
    pub learning_item_enrollment_id: String,
    pub device_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEnrollmentsRequest {
    pub invitation_ids: Vec<String>,
}

/// Per-invitation outcome of a submit. `message` is human-readable and
/// asserted on by callers ("Successfully updated ...").
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentStatus {
    pub invitation_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}
