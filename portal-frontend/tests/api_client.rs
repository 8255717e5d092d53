mod common;

use portal_frontend::models::{ApplicationStatus, JobFile};
use portal_frontend::services::ApiError;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::api_for;

#[tokio::test]
async fn job_offer_listings_accept_page_and_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/job-offers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"id": 1, "title": "Rust Dev", "isActive": true}],
            "totalElements": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/job-offers/offerer/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "offererId": 4}, {"id": 3, "offererId": 4}
        ])))
        .mount(&server)
        .await;

    let api = api_for(&server);

    let all = api.list_job_offers().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].display_title(), "Rust Dev");

    let own = api.job_offers_by_offerer(4).await.unwrap();
    assert_eq!(own.iter().map(|o| o.id).collect::<Vec<_>>(), vec![2, 3]);
}

#[tokio::test]
async fn error_statuses_carry_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/job-offers/9"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Job offer not found"))
        .mount(&server)
        .await;

    let err = api_for(&server).job_offer(9).await.unwrap_err();

    match &err {
        ApiError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "Job offer not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.is_client_error());
}

#[tokio::test]
async fn unexpected_shapes_are_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).admin_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn create_job_offer_posts_form_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/job-offers"))
        .and(body_string_contains("offererId=4"))
        .and(body_string_contains("company=Acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 30, "offererId": 4, "title": "Platform Engineer", "company": "Acme", "isActive": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let offer = api_for(&server)
        .create_job_offer(4, "Platform Engineer", "Acme", "Build and run the platform.")
        .await
        .unwrap();

    assert_eq!(offer.id, 30);
    assert!(offer.is_active());
}

#[tokio::test]
async fn status_updates_use_backend_contracts() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/job-offers/5/status"))
        .and(body_json(json!({"isActive": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "isActive": false})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/applications/8/status"))
        .and(query_param("status", "ACCEPTED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 8, "seekerId": 2, "jobOfferId": 5, "status": "ACCEPTED"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/auth/users/2/activate"))
        .and(query_param("active", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "name": "Jo", "email": "jo@x.com", "role": "SEEKER", "active": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);

    let offer = api.set_job_offer_active(5, false).await.unwrap();
    assert!(!offer.is_active());

    let application = api
        .set_application_status(8, ApplicationStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(application.status, ApplicationStatus::Accepted);

    let user = api.set_user_active(2, false).await.unwrap();
    assert!(!user.active);
}

#[tokio::test]
async fn apply_passes_ids_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/applications/apply"))
        .and(query_param("seekerId", "3"))
        .and(query_param("jobOfferId", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 40, "seekerId": 3, "jobOfferId": 11
        })))
        .expect(1)
        .mount(&server)
        .await;

    let application = api_for(&server).apply(3, 11).await.unwrap();
    assert_eq!(application.status, ApplicationStatus::Pending);
}

#[tokio::test]
async fn extraction_goes_to_extractor_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/extract"))
        .and(body_json(json!({"text": "Acme hires a Rust developer"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "company": {"value": "Acme"},
            "raw_text": "Acme hires a Rust developer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let extracted = api_for(&server)
        .extract_text("Acme hires a Rust developer")
        .await
        .unwrap();

    assert_eq!(extracted.company().as_deref(), Some("Acme"));
}

#[tokio::test]
async fn upload_sends_multipart_with_offerer_and_title() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/job-offers/upload"))
        .and(body_string_contains("name=\"offererId\"\r\n\r\n4"))
        .and(body_string_contains("name=\"title\"\r\n\r\nSite Reliability Engineer"))
        .and(body_string_contains("name=\"isActive\"\r\n\r\ntrue"))
        .and(body_string_contains("filename=\"sre.txt\""))
        .and(body_string_contains("On-call rotation, Rust tooling."))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 31, "offererId": 4, "title": "Site Reliability Engineer", "isActive": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let offer = api_for(&server)
        .upload_job_offer(
            4,
            JobFile {
                title: "Site Reliability Engineer".into(),
                file_name: "sre.txt".into(),
                content_type: Some("text/plain".into()),
                data: b"On-call rotation, Rust tooling.".to_vec(),
            },
        )
        .await
        .unwrap();

    assert_eq!(offer.id, 31);
    assert!(offer.is_active());
}

#[tokio::test]
async fn rejected_upload_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/job-offers/upload"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .upload_job_offer(
            4,
            JobFile {
                title: "Anything".into(),
                file_name: "offer.bin".into(),
                content_type: None,
                data: vec![0, 1, 2],
            },
        )
        .await
        .unwrap_err();

    assert!(err.is_client_error());
}
