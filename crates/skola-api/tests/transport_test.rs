#![allow(clippy::unwrap_used)]
// Integration tests for request construction and response classification
// using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skola_api::models::{AttributeOption, CreateCourseRequest, CreateOrgAttributeRequest};
use skola_api::{ApiClient, Credentials, Error};

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

// ── Status classification ───────────────────────────────────────────

#[tokio::test]
async fn test_success_response_is_decoded() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/courses"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "course-1",
        })))
        .mount(&server)
        .await;

    let course = client
        .create_course(
            &CreateCourseRequest {
                organization_id: "org-1".into(),
                title: "Safety 101".into(),
                version_name: "v1".into(),
            },
            &credentials(),
        )
        .await
        .unwrap();

    assert_eq!(course.id, "course-1");
}

#[tokio::test]
async fn test_no_content_success_is_accepted() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/attributes"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client
        .create_org_attribute(
            &CreateOrgAttributeRequest {
                attribute_options: vec![AttributeOption {
                    label: "North".into(),
                    sequence_order: 1,
                }],
                name: "Region".into(),
                organization: "/api/organizations/org-1".into(),
                attribute_type: "SINGLE_SELECT".into(),
            },
            &credentials(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_redirect_status_counts_as_success() {
    let (server, client) = setup().await;

    // Redirects are not followed; a bare 302 with a decodable body is
    // classified as success.
    Mock::given(method("GET"))
        .and(path("/v1/course-bundle-url/job-1"))
        .respond_with(ResponseTemplate::new(302).set_body_json(json!({
            "courseUrl": "https://cdn.example.com/bundle.zip",
            "bundleStatus": "BUNDLE_UPLOAD_COMPLETED",
        })))
        .mount(&server)
        .await;

    let resp = client
        .course_bundle_url("job-1", &credentials())
        .await
        .unwrap();
    assert_eq!(resp.bundle_status, "BUNDLE_UPLOAD_COMPLETED");
}

#[tokio::test]
async fn test_not_found_carries_status_and_raw_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/enrollments/clone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("could not find invitation inv-9"),
        )
        .mount(&server)
        .await;

    let err = client
        .clone_enrollment(
            &skola_api::models::CloneEnrollmentRequest {
                invitation_id: "inv-9".into(),
            },
            &credentials(),
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(
        matches!(err, Error::Api { status: 404, ref message }
            if message == "could not find invitation inv-9"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_server_error_carries_status_and_raw_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/attributes"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let err = client.org_attributes(&credentials()).await.unwrap_err();
    assert!(
        matches!(err, Error::Api { status: 500, ref message } if message == "internal error")
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_a_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/course-bundle-url/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client
        .course_bundle_url("job-1", &credentials())
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::Deserialization { ref body, .. }
            if body == "<html>gateway</html>"),
        "unexpected error: {err:?}"
    );
}

// ── Headers and options ─────────────────────────────────────────────

#[tokio::test]
async fn test_authenticated_call_sends_both_tokens() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/courses"))
        .and(header("authorization", "Bearer access-token"))
        .and(header("x-context-token", "context-token"))
        .and(header("content-type", "application/ld+json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "course-1" })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_course(
            &CreateCourseRequest {
                organization_id: "org-1".into(),
                title: "Safety 101".into(),
                version_name: "v1".into(),
            },
            &credentials(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_merge_patch_overrides_default_content_type() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/courses/course-1"))
        .and(header("content-type", "application/merge-patch+json"))
        .and(body_json(json!({ "state": "published" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "course-1" })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .activate_course("course-1", &credentials())
        .await
        .unwrap();
}
