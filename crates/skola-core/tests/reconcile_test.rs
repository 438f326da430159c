#![allow(clippy::unwrap_used)]
// End-to-end reconciliation scenarios against wiremock: one device
// answering cards offline, re-syncing a correction, resolving
// duplicates from a second device, approving and submitting.

use chrono::Utc;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skola_api::{ApiClient, Credentials};
use skola_core::{ReconcileState, Reconciler, WorkflowError};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let identity_url = base_url.join("auth/").unwrap();
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        base_url,
        identity_url,
        "skola-test",
    );
    (server, client)
}

fn credentials() -> Credentials {
    Credentials {
        access_token: SecretString::from("access-token"),
        context_token: "context-token".to_owned(),
    }
}

/// Mounts the enroll + clone endpoints for invitation `inv-1` with a
/// three-card tree, the shape every scenario below starts from.
async fn mount_enroll_and_clone(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/invitation-enroll"))
        .and(body_json(json!({ "invitationId": "inv-1" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "ejob-1",
            "invitationId": "inv-1",
            "status": "ENROLLMENT_PENDING",
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/invitation-enroll/ejob-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ejob-1",
            "invitationId": "inv-1",
            "status": "ENROLLMENT_COMPLETED",
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/enrollments/clone"))
        .and(body_json(json!({ "invitationId": "inv-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "courseEnrollmentId": "ce-1",
            "courseId": "course-1",
            "invitationId": "inv-1",
            "userId": "user-1",
            "learningItemEnrollments": [{
                "learningItemEnrollmentId": "lie-1",
                "learningItemId": "li-1",
                "cardEnrollments": [
                    { "cardEnrollmentId": "carde-1", "cardId": "card-1" },
                    { "cardEnrollmentId": "carde-2", "cardId": "card-2" },
                    { "cardEnrollmentId": "carde-3", "cardId": "card-3" },
                ]
            }]
        })))
        .mount(server)
        .await;
}

fn all_ok_sync_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "results": [{ "learningItemEnrollmentId": "lie-1", "success": true }]
    }))
}

// ── Scenarios ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_device_answers_resyncs_approves_and_submits() {
    let (server, client) = setup().await;
    mount_enroll_and_clone(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/enrollments/sync"))
        .respond_with(all_ok_sync_response())
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/enrollments/duplicate"))
        .and(body_json(json!({ "learningItemEnrollmentIds": ["lie-1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "learningItemEnrollments": []
        })))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/v1/enrollment/approve"))
        .and(body_json(json!({
            "LearningItemEnrollmentId": "lie-1",
            "deviceId": "dev-a",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/v1/submit-enrollments"))
        .and(body_json(json!({ "invitationIds": ["inv-1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "enrollmentStatuses": [{
                "invitationId": "inv-1",
                "status": "SUBMITTED",
                "message": "Successfully updated enrollments for invitation inv-1",
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let creds = credentials();
    let mut r = Reconciler::new(&client, &creds, "inv-1");

    r.enroll().await.unwrap();
    r.wait_enrolled().await.unwrap();
    r.clone_for_device().await.unwrap();
    assert_eq!(r.tree()[0].card_enrollments.len(), 3);

    // Device A: one single-choice answer, one multi-choice answer with
    // a confidence flag, one card left unanswered.
    r.stamp("dev-a", Utc::now()).unwrap();
    r.mutate_cards(|card| match card.card_id.as_str() {
        "card-1" => {
            card.answer = vec!["option-2".into()];
            card.score = 10;
            card.progress = 100;
        }
        "card-2" => {
            card.answer = vec!["option-1".into(), "option-3".into()];
            card.confidence = 1;
            card.score = 10;
            card.progress = 100;
        }
        _ => {}
    })
    .unwrap();

    let results = r.sync().await.unwrap();
    assert!(results.iter().all(|s| s.success));
    assert_eq!(r.state(), ReconcileState::Synced);

    // Second thoughts: clear two of the three answers and re-sync.
    // Re-entering sync from Synced is the designed recovery path.
    r.mutate_cards(|card| {
        if card.card_id != "card-2" {
            card.answer.clear();
            card.score = 0;
        }
    })
    .unwrap();
    r.sync().await.unwrap();

    r.check_duplicates().await.unwrap();
    r.approve("dev-a").await.unwrap();

    let status = r.submit().await.unwrap();
    assert!(status.message.starts_with("Successfully updated"));
    assert_eq!(r.state(), ReconcileState::Submitted);

    // The re-sync actually cleared the answers on the wire; cleared
    // answers are omitted, the surviving one still rides along.
    let requests = server.received_requests().await.unwrap();
    let syncs: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/v1/enrollments/sync")
        .collect();
    assert_eq!(syncs.len(), 2);
    let first = std::str::from_utf8(&syncs[0].body).unwrap();
    let second = std::str::from_utf8(&syncs[1].body).unwrap();
    assert!(first.contains("option-2"));
    assert!(!second.contains("option-2"));
    assert!(second.contains("option-1"));
}

#[tokio::test]
async fn test_duplicates_from_a_second_device_are_reported() {
    let (server, client) = setup().await;
    mount_enroll_and_clone(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/enrollments/sync"))
        .respond_with(all_ok_sync_response())
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/enrollments/duplicate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "learningItemEnrollments": [
                { "learningItemEnrollmentId": "lie-1", "deviceId": "dev-a" },
                { "learningItemEnrollmentId": "lie-1-dup", "deviceId": "dev-b" },
            ]
        })))
        .mount(&server)
        .await;

    let creds = credentials();
    let device_id = skola_api::models::new_device_id();
    let mut r = Reconciler::new(&client, &creds, "inv-1");
    r.enroll().await.unwrap();
    r.wait_enrolled().await.unwrap();
    r.clone_for_device().await.unwrap();
    r.stamp(&device_id, Utc::now()).unwrap();
    r.sync().await.unwrap();

    let duplicates = r.check_duplicates().await.unwrap();
    assert_eq!(duplicates.len(), 2);
    assert_eq!(r.state(), ReconcileState::DuplicatesChecked);

    // A second check is legal; the query is read-only.
    let again = r.check_duplicates().await.unwrap();
    assert_eq!(again.len(), 2);
}

#[tokio::test]
async fn test_failed_sync_record_blocks_approval() {
    let (server, client) = setup().await;
    mount_enroll_and_clone(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/enrollments/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "learningItemEnrollmentId": "lie-1",
                "success": false,
                "message": "version conflict",
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/enrollments/duplicate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "learningItemEnrollments": []
        })))
        .mount(&server)
        .await;

    let creds = credentials();
    let mut r = Reconciler::new(&client, &creds, "inv-1");
    r.enroll().await.unwrap();
    r.wait_enrolled().await.unwrap();
    r.clone_for_device().await.unwrap();
    r.stamp("dev-a", Utc::now()).unwrap();

    let results = r.sync().await.unwrap();
    assert!(!results[0].success);

    r.check_duplicates().await.unwrap();
    let err = r.approve("dev-a").await.unwrap_err();
    assert!(matches!(err, WorkflowError::SyncRejected { ref id, .. } if id == "lie-1"));

    // Approval never reached the server.
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/v1/enrollment/approve"));
}

#[tokio::test]
async fn test_unknown_invitation_surfaces_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/invitation-enroll"))
        .and(body_string_contains("inv-missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("could not find invitation inv-missing"),
        )
        .mount(&server)
        .await;

    let creds = credentials();
    let mut r = Reconciler::new(&client, &creds, "inv-missing");

    let err = r.enroll().await.unwrap_err();
    assert!(
        matches!(err, WorkflowError::NotFound { ref message }
            if message == "could not find invitation inv-missing")
    );
    assert_eq!(r.state(), ReconcileState::Invited);
}

#[tokio::test]
async fn test_submit_before_approve_issues_no_request() {
    let (server, client) = setup().await;
    mount_enroll_and_clone(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/enrollments/sync"))
        .respond_with(all_ok_sync_response())
        .mount(&server)
        .await;

    let creds = credentials();
    let mut r = Reconciler::new(&client, &creds, "inv-1");
    r.enroll().await.unwrap();
    r.wait_enrolled().await.unwrap();
    r.clone_for_device().await.unwrap();
    r.stamp("dev-a", Utc::now()).unwrap();
    r.sync().await.unwrap();

    let err = r.submit().await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::OutOfOrder {
            step: "submit",
            state: ReconcileState::Synced,
        }
    ));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/v1/submit-enrollments"));
}
