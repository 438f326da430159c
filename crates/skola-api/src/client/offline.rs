// Offline-workflow endpoints: bundle jobs, enrollment jobs, and the
// clone / sync / duplicate / approve / submit sequence.

use std::time::Duration;

use reqwest::Method;

use crate::auth::Credentials;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    ApproveEnrollmentRequest, CloneEnrollmentRequest, CloneEnrollmentResponse,
    CourseBundleRequest, CourseBundleResponse, CourseBundleUrlResponse,
    DuplicateEnrollmentsRequest, EnrollmentStatus, InvitationEnrollRequest,
    InvitationEnrollResponse, LearningItemEnrollment, SubmitEnrollmentsRequest,
    SyncEnrollmentsRequest, SyncResult,
};
use crate::poll::{PollOptions, poll_job};
use crate::transport::{MERGE_PATCH, RequestOption};

/// Terminal status of a course-bundle job.
pub const BUNDLE_TERMINAL_STATUS: &str = "BUNDLE_UPLOAD_COMPLETED";
/// Terminal status of an enrollment job.
pub const ENROLLMENT_TERMINAL_STATUS: &str = "ENROLLMENT_COMPLETED";

const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default polling bounds for bundle jobs: 10 attempts, 5 s apart.
pub fn bundle_poll_options() -> PollOptions {
    PollOptions::new(10, POLL_INTERVAL)
}

/// Default polling bounds for enrollment jobs: 5 attempts, 5 s apart.
pub fn enrollment_poll_options() -> PollOptions {
    PollOptions::new(5, POLL_INTERVAL)
}

/// Case-insensitive terminal-status check; the gateway is not consistent
/// about status casing.
pub fn status_matches(status: &str, terminal: &str) -> bool {
    status.eq_ignore_ascii_case(terminal)
}

impl ApiClient {
    // ── Bundle jobs ──────────────────────────────────────────────────

    /// Start a course-bundle job for offline consumption.
    pub async fn course_bundle(
        &self,
        req: &CourseBundleRequest,
        credentials: &Credentials,
    ) -> Result<CourseBundleResponse, Error> {
        self.send_request(
            Method::POST,
            "/v1/course-bundle",
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Fetch the status of a bundle job; carries the download URL once
    /// the job is terminal.
    pub async fn course_bundle_url(
        &self,
        job_id: &str,
        credentials: &Credentials,
    ) -> Result<CourseBundleUrlResponse, Error> {
        self.send_request(
            Method::GET,
            &format!("/v1/course-bundle-url/{job_id}"),
            None,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Poll a bundle job until it completes or the budget runs out.
    pub async fn wait_for_bundle(
        &self,
        job_id: &str,
        credentials: &Credentials,
        options: &PollOptions,
    ) -> Result<CourseBundleUrlResponse, Error> {
        poll_job(
            || self.course_bundle_url(job_id, credentials),
            |job| status_matches(&job.bundle_status, BUNDLE_TERMINAL_STATUS),
            options,
        )
        .await
    }

    // ── Enrollment jobs ──────────────────────────────────────────────

    /// Enroll the logged-in user against an invitation; starts a
    /// server-side enrollment job.
    pub async fn invitation_enroll(
        &self,
        req: &InvitationEnrollRequest,
        credentials: &Credentials,
    ) -> Result<InvitationEnrollResponse, Error> {
        self.send_request(
            Method::POST,
            "/v1/invitation-enroll",
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Fetch the status of an enrollment job.
    pub async fn enrollment_job(
        &self,
        job_id: &str,
        credentials: &Credentials,
    ) -> Result<InvitationEnrollResponse, Error> {
        self.send_request(
            Method::GET,
            &format!("/v1/invitation-enroll/{job_id}"),
            None,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Poll an enrollment job until it completes or the budget runs out.
    pub async fn wait_for_enrollment(
        &self,
        job_id: &str,
        credentials: &Credentials,
        options: &PollOptions,
    ) -> Result<InvitationEnrollResponse, Error> {
        poll_job(
            || self.enrollment_job(job_id, credentials),
            |job| status_matches(&job.status, ENROLLMENT_TERMINAL_STATUS),
            options,
        )
        .await
    }

    // ── Offline enrollment reconciliation ────────────────────────────

    /// Clone an invitation's enrollment tree for offline use.
    pub async fn clone_enrollment(
        &self,
        req: &CloneEnrollmentRequest,
        credentials: &Credentials,
    ) -> Result<CloneEnrollmentResponse, Error> {
        self.send_request(
            Method::POST,
            "/v1/enrollments/clone",
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Sync device-local enrollment mutations back to the offline store.
    ///
    /// One result per submitted record; outcomes are independent, and
    /// re-sending the same batch (including cleared answers) is accepted
    /// -- idempotent re-sync is the designed recovery path for
    /// multi-device conflicts.
    pub async fn sync_enrollments(
        &self,
        req: &SyncEnrollmentsRequest,
        credentials: &Credentials,
    ) -> Result<Vec<SyncResult>, Error> {
        #[derive(serde::Deserialize)]
        struct Response {
            results: Vec<SyncResult>,
        }

        let resp: Response = self
            .send_request(
                Method::POST,
                "/v1/enrollments/sync",
                Self::json_body(req)?,
                Some(credentials),
                Vec::new(),
            )
            .await?;

        Ok(resp.results)
    }

    /// Read-only query for duplicate enrollments produced by multiple
    /// devices acting on the same invitation.
    pub async fn duplicate_enrollments(
        &self,
        req: &DuplicateEnrollmentsRequest,
        credentials: &Credentials,
    ) -> Result<Vec<LearningItemEnrollment>, Error> {
        #[derive(serde::Deserialize)]
        struct Response {
            #[serde(rename = "learningItemEnrollments")]
            learning_item_enrollments: Vec<LearningItemEnrollment>,
        }

        let resp: Response = self
            .send_request(
                Method::POST,
                "/v1/enrollments/duplicate",
                Self::json_body(req)?,
                Some(credentials),
                Vec::new(),
            )
            .await?;

        Ok(resp.learning_item_enrollments)
    }

    /// Approve one learning-item enrollment, scoped to a device, as the
    /// authoritative record among its duplicates.
    pub async fn approve_enrollment(
        &self,
        req: &ApproveEnrollmentRequest,
        credentials: &Credentials,
    ) -> Result<bool, Error> {
        #[derive(serde::Deserialize)]
        struct Response {
            success: bool,
        }

        let resp: Response = self
            .send_request(
                Method::PATCH,
                "/v1/enrollment/approve",
                Self::json_body(req)?,
                Some(credentials),
                vec![RequestOption::content_type(MERGE_PATCH)],
            )
            .await?;

        Ok(resp.success)
    }

    /// Submit approved offline enrollments for final server-side merge.
    pub async fn submit_enrollments(
        &self,
        req: &SubmitEnrollmentsRequest,
        credentials: &Credentials,
    ) -> Result<Vec<EnrollmentStatus>, Error> {
        #[derive(serde::Deserialize)]
        struct Response {
            #[serde(rename = "enrollmentStatuses")]
            enrollment_statuses: Vec<EnrollmentStatus>,
        }

        let resp: Response = self
            .send_request(
                Method::PATCH,
                "/v1/submit-enrollments",
                Self::json_body(req)?,
                Some(credentials),
                Vec::new(),
            )
            .await?;

        Ok(resp.enrollment_statuses)
    }
}
