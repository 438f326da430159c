// ── Offline enrollment reconciliation ──
//
// Drives one invitation through the offline lifecycle: enroll on the
// server, clone the enrollment tree to a device, mutate it locally,
// sync it back, detect duplicates from other devices, approve one
// device's records, and submit. Each step is only legal from specific
// states; invoking a step out of order fails before any request is
// issued. Two reconcilers over the same invitation (two devices)
// interact only through the server -- there is no shared client-side
// state.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use skola_api::client::{ENROLLMENT_TERMINAL_STATUS, enrollment_poll_options, status_matches};
use skola_api::models::{
    ApproveEnrollmentRequest, CardEnrollment, CloneEnrollmentRequest, DuplicateEnrollmentsRequest,
    EnrollmentStatus, InvitationEnrollRequest, LearningItemEnrollment, SubmitEnrollmentsRequest,
    SyncEnrollmentsRequest, SyncResult,
};
use skola_api::{ApiClient, Credentials};

use crate::error::WorkflowError;

/// Where one invitation stands in the offline lifecycle.
///
/// States advance monotonically except that `sync` may re-run from
/// `Synced` or `DuplicatesChecked` -- re-syncing (including with
/// cleared answers) is the designed recovery path after a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileState {
    Invited,
    EnrollmentPending,
    Enrolled,
    Cloned,
    Synced,
    DuplicatesChecked,
    Approved,
    Submitted,
}

/// Reconciles one invitation's offline enrollment for one device actor.
///
/// Construct per invitation, with the credentials of the logical actor
/// driving it. The reconciler owns a working copy of the enrollment
/// tree between `clone_for_device` and `sync`; local mutation happens
/// through [`stamp`](Self::stamp) and [`mutate_cards`](Self::mutate_cards).
pub struct Reconciler<'a> {
    client: &'a ApiClient,
    credentials: &'a Credentials,
    invitation_id: String,
    state: ReconcileState,
    job_id: Option<String>,
    course_enrollment_id: String,
    tree: Vec<LearningItemEnrollment>,
    last_sync: Vec<SyncResult>,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        client: &'a ApiClient,
        credentials: &'a Credentials,
        invitation_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            invitation_id: invitation_id.into(),
            state: ReconcileState::Invited,
            job_id: None,
            course_enrollment_id: String::new(),
            tree: Vec::new(),
            last_sync: Vec::new(),
        }
    }

    pub fn state(&self) -> ReconcileState {
        self.state
    }

    pub fn invitation_id(&self) -> &str {
        &self.invitation_id
    }

    /// The working copy of the enrollment tree (empty before cloning).
    pub fn tree(&self) -> &[LearningItemEnrollment] {
        &self.tree
    }

    /// Per-record outcomes of the most recent sync.
    pub fn last_sync(&self) -> &[SyncResult] {
        &self.last_sync
    }

    fn require(
        &self,
        step: &'static str,
        allowed: &[ReconcileState],
    ) -> Result<(), WorkflowError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(WorkflowError::OutOfOrder {
                step,
                state: self.state,
            })
        }
    }

    // ── Server-side enrollment ───────────────────────────────────────

    /// Start the server-side enrollment job for this invitation.
    pub async fn enroll(&mut self) -> Result<(), WorkflowError> {
        self.require("enroll", &[ReconcileState::Invited])?;

        let resp = self
            .client
            .invitation_enroll(
                &InvitationEnrollRequest {
                    invitation_id: self.invitation_id.clone(),
                },
                self.credentials,
            )
            .await?;

        debug!(job_id = %resp.id, "enrollment job started");
        self.job_id = Some(resp.id);
        self.state = ReconcileState::EnrollmentPending;
        Ok(())
    }

    /// Poll the enrollment job with the platform defaults (5 attempts,
    /// 5 s apart). A job that never turns terminal fails with the last
    /// status observed.
    pub async fn wait_enrolled(&mut self) -> Result<(), WorkflowError> {
        self.require("wait_enrolled", &[ReconcileState::EnrollmentPending])?;

        let job_id = self
            .job_id
            .clone()
            .ok_or_else(|| WorkflowError::Internal("enrollment job id missing".to_owned()))?;

        let job = self
            .client
            .wait_for_enrollment(&job_id, self.credentials, &enrollment_poll_options())
            .await?;

        if !status_matches(&job.status, ENROLLMENT_TERMINAL_STATUS) {
            return Err(WorkflowError::JobIncomplete { status: job.status });
        }

        info!(invitation_id = %self.invitation_id, "enrollment completed");
        self.state = ReconcileState::Enrolled;
        Ok(())
    }

    // ── Device-local copy ────────────────────────────────────────────

    /// Clone the enrollment tree for offline mutation on a device.
    pub async fn clone_for_device(&mut self) -> Result<(), WorkflowError> {
        self.require("clone_for_device", &[ReconcileState::Enrolled])?;

        if self.invitation_id.is_empty() {
            return Err(WorkflowError::BadRequest {
                message: "invitation id must not be empty".to_owned(),
            });
        }

        let resp = self
            .client
            .clone_enrollment(
                &CloneEnrollmentRequest {
                    invitation_id: self.invitation_id.clone(),
                },
                self.credentials,
            )
            .await?;

        debug!(
            course_enrollment_id = %resp.course_enrollment_id,
            items = resp.learning_item_enrollments.len(),
            "enrollment tree cloned"
        );
        self.course_enrollment_id = resp.course_enrollment_id;
        self.tree = resp.learning_item_enrollments;
        self.state = ReconcileState::Cloned;
        Ok(())
    }

    /// Mark the whole working tree as touched by `device_id` at `now`.
    ///
    /// Fills in device ids and timestamps the way a device would on
    /// first open: `started_at` only where unset, `updated_at` always.
    pub fn stamp(&mut self, device_id: &str, now: DateTime<Utc>) -> Result<(), WorkflowError> {
        self.require(
            "stamp",
            &[
                ReconcileState::Cloned,
                ReconcileState::Synced,
                ReconcileState::DuplicatesChecked,
            ],
        )?;

        for item in &mut self.tree {
            item.device_id = device_id.to_owned();
            if item.course_enrollment_id.is_empty() {
                item.course_enrollment_id = self.course_enrollment_id.clone();
            }
            item.started_at.get_or_insert(now);
            item.updated_at = Some(now);
            for card in &mut item.card_enrollments {
                card.device_id = device_id.to_owned();
                if card.learning_item_enrollment_id.is_empty() {
                    card.learning_item_enrollment_id = item.learning_item_enrollment_id.clone();
                }
                card.started_at.get_or_insert(now);
                card.updated_at = Some(now);
            }
        }
        Ok(())
    }

    /// Apply a scenario-specific mutation to every card in the working
    /// tree. Grading rules live with the caller, not here.
    pub fn mutate_cards(
        &mut self,
        mut f: impl FnMut(&mut CardEnrollment),
    ) -> Result<(), WorkflowError> {
        self.require(
            "mutate_cards",
            &[
                ReconcileState::Cloned,
                ReconcileState::Synced,
                ReconcileState::DuplicatesChecked,
            ],
        )?;

        for item in &mut self.tree {
            for card in &mut item.card_enrollments {
                f(card);
            }
        }
        Ok(())
    }

    // ── Reconciliation against the offline store ─────────────────────

    /// Push the working tree to the offline store in one batch.
    ///
    /// Returns one result per record; a failed record does not abort
    /// the rest of the batch. Legal again from `Synced` and
    /// `DuplicatesChecked` so a device can re-sync corrections.
    pub async fn sync(&mut self) -> Result<Vec<SyncResult>, WorkflowError> {
        self.require(
            "sync",
            &[
                ReconcileState::Cloned,
                ReconcileState::Synced,
                ReconcileState::DuplicatesChecked,
            ],
        )?;

        if self.tree.is_empty() {
            return Err(WorkflowError::BadRequest {
                message: "nothing to sync: enrollment tree is empty".to_owned(),
            });
        }

        let results = self
            .client
            .sync_enrollments(
                &SyncEnrollmentsRequest {
                    learning_item_enrollments: self.tree.clone(),
                },
                self.credentials,
            )
            .await?;

        let failed = results.iter().filter(|r| !r.success).count();
        debug!(records = results.len(), failed, "sync batch completed");

        self.last_sync = results.clone();
        self.state = ReconcileState::Synced;
        Ok(results)
    }

    /// Query the offline store for duplicate enrollments produced by
    /// other devices acting on the same invitation. Read-only.
    pub async fn check_duplicates(
        &mut self,
    ) -> Result<Vec<LearningItemEnrollment>, WorkflowError> {
        self.require(
            "check_duplicates",
            &[ReconcileState::Synced, ReconcileState::DuplicatesChecked],
        )?;

        let ids: Vec<String> = self
            .tree
            .iter()
            .map(|item| item.learning_item_enrollment_id.clone())
            .collect();

        let duplicates = self
            .client
            .duplicate_enrollments(
                &DuplicateEnrollmentsRequest {
                    learning_item_enrollment_ids: ids,
                },
                self.credentials,
            )
            .await?;

        debug!(count = duplicates.len(), "duplicate check completed");
        self.state = ReconcileState::DuplicatesChecked;
        Ok(duplicates)
    }

    /// Approve this device's record for every learning item in the
    /// tree, settling any duplicates in its favor.
    ///
    /// Refuses to build on a tree the offline store did not fully
    /// accept: a failed record in the last sync surfaces as
    /// [`WorkflowError::SyncRejected`] before any request is issued.
    pub async fn approve(&mut self, device_id: &str) -> Result<(), WorkflowError> {
        self.require("approve", &[ReconcileState::DuplicatesChecked])?;

        if let Some(rejected) = self.last_sync.iter().find(|r| !r.success) {
            return Err(WorkflowError::SyncRejected {
                id: rejected.learning_item_enrollment_id.clone(),
                message: rejected.message.clone(),
            });
        }

        for item in &self.tree {
            let success = self
                .client
                .approve_enrollment(
                    &ApproveEnrollmentRequest {
                        learning_item_enrollment_id: item.learning_item_enrollment_id.clone(),
                        device_id: device_id.to_owned(),
                    },
                    self.credentials,
                )
                .await?;

            if !success {
                return Err(WorkflowError::ApprovalRejected {
                    id: item.learning_item_enrollment_id.clone(),
                });
            }
        }

        info!(invitation_id = %self.invitation_id, device_id, "enrollments approved");
        self.state = ReconcileState::Approved;
        Ok(())
    }

    /// Submit the approved enrollments for final server-side merge.
    /// Returns the per-invitation outcome reported by the server.
    pub async fn submit(&mut self) -> Result<EnrollmentStatus, WorkflowError> {
        self.require("submit", &[ReconcileState::Approved])?;

        let statuses = self
            .client
            .submit_enrollments(
                &SubmitEnrollmentsRequest {
                    invitation_ids: vec![self.invitation_id.clone()],
                },
                self.credentials,
            )
            .await?;

        let status = statuses
            .into_iter()
            .find(|s| s.invitation_id == self.invitation_id)
            .ok_or_else(|| {
                WorkflowError::Internal(format!(
                    "submit response missing invitation {}",
                    self.invitation_id
                ))
            })?;

        info!(invitation_id = %self.invitation_id, message = %status.message, "submitted");
        self.state = ReconcileState::Submitted;
        Ok(status)
    }
}
