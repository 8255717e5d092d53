mod common;

use portal_frontend::models::{LoginRequest, RegisterRequest, Role};
use portal_frontend::routing::{landing_after_auth, Route};
use portal_frontend::services::{AuthError, AuthOutcome, AuthService};
use portal_frontend::session::{FileStorage, SessionStore};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{api_for, memory_sessions, sessions_on, unreachable_api, user};

#[tokio::test]
async fn login_with_identity_sets_session_and_routes_admin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "ada@x.com", "password": "secret1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "name": "Ada", "email": "ada@x.com", "role": "ADMIN", "active": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sessions = memory_sessions();
    let auth = AuthService::new(api_for(&server), sessions.clone());

    let outcome = auth
        .login(&LoginRequest::new("ada@x.com", "secret1"))
        .await
        .unwrap();

    let AuthOutcome::Authenticated(identity) = outcome else {
        panic!("expected an identity, got {:?}", outcome);
    };
    assert_eq!(identity.id, 7);
    assert_eq!(identity.role, Role::Admin);
    assert_eq!(sessions.current(), Some(identity.clone()));
    assert_eq!(landing_after_auth(Some(&identity)), Route::AdminDashboard);
}

#[tokio::test]
async fn login_without_id_keeps_existing_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "no match"})))
        .mount(&server)
        .await;

    let sessions = memory_sessions();
    let existing = user(3, Role::Seeker);
    sessions.set_current(existing.clone());
    let auth = AuthService::new(api_for(&server), sessions.clone());

    let outcome = auth
        .login(&LoginRequest::new("jo@x.com", "wrong-password"))
        .await
        .unwrap();

    assert_eq!(outcome, AuthOutcome::NoIdentity);
    assert_eq!(sessions.current(), Some(existing));
}

#[tokio::test]
async fn unrecognized_role_signs_in_and_lands_on_root() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 21, "name": "Rae", "email": "rae@x.com", "role": "RECRUITER", "active": true
        })))
        .mount(&server)
        .await;

    let sessions = memory_sessions();
    let auth = AuthService::new(api_for(&server), sessions.clone());

    let outcome = auth
        .login(&LoginRequest::new("rae@x.com", "secret1"))
        .await
        .unwrap();

    assert!(matches!(outcome, AuthOutcome::Authenticated(ref u) if u.role == Role::Other));
    assert_eq!(sessions.current().map(|u| u.id), Some(21));
    assert_eq!(landing_after_auth(sessions.current().as_ref()), Route::Root);
}

#[tokio::test]
async fn zero_id_is_no_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 0, "name": "Jo", "email": "jo@x.com", "role": "SEEKER", "active": true
        })))
        .mount(&server)
        .await;

    let sessions = memory_sessions();
    let auth = AuthService::new(api_for(&server), sessions.clone());

    let outcome = auth
        .login(&LoginRequest::new("jo@x.com", "secret1"))
        .await
        .unwrap();

    assert_eq!(outcome, AuthOutcome::NoIdentity);
    assert!(!sessions.is_authenticated());
}

#[tokio::test]
async fn rejected_credentials_are_no_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid credentials"))
        .mount(&server)
        .await;

    let sessions = memory_sessions();
    let auth = AuthService::new(api_for(&server), sessions.clone());

    let outcome = auth
        .login(&LoginRequest::new("jo@x.com", "whatever"))
        .await
        .unwrap();

    assert_eq!(outcome, AuthOutcome::NoIdentity);
    assert!(!sessions.is_authenticated());
}

#[tokio::test]
async fn server_failure_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sessions = memory_sessions();
    let auth = AuthService::new(api_for(&server), sessions.clone());

    let err = auth
        .login(&LoginRequest::new("jo@x.com", "whatever"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Unavailable(_)));
    assert!(!sessions.is_authenticated());
}

#[tokio::test]
async fn unreachable_backend_is_unavailable() {
    let auth = AuthService::new(unreachable_api(), memory_sessions());

    let err = auth
        .login(&LoginRequest::new("jo@x.com", "whatever"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Unavailable(_)));
}

#[tokio::test]
async fn incomplete_identity_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "role": "CAPTAIN"})))
        .mount(&server)
        .await;

    let sessions = memory_sessions();
    let auth = AuthService::new(api_for(&server), sessions.clone());

    let err = auth
        .login(&LoginRequest::new("jo@x.com", "whatever"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::MalformedIdentity(_)));
    assert!(sessions.current().is_none());
}

#[tokio::test]
async fn invalid_email_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let auth = AuthService::new(api_for(&server), memory_sessions());

    let err = auth
        .login(&LoginRequest::new("not-an-email", "secret1"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Validation(_)));
}

#[tokio::test]
async fn password_mismatch_blocks_registration_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let auth = AuthService::new(api_for(&server), memory_sessions());
    let registration = RegisterRequest::new("Jo", "jo@x.com", "abc123", "abc999", Role::Seeker);

    let err = auth.register(&registration).await.unwrap_err();

    assert!(matches!(err, AuthError::PasswordMismatch));
}

#[tokio::test]
async fn registration_sends_role_without_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "name": "Jo", "email": "jo@x.com", "password": "abc123", "role": "OFFERER"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12, "name": "Jo", "email": "jo@x.com", "role": "OFFERER", "active": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sessions = memory_sessions();
    let auth = AuthService::new(api_for(&server), sessions.clone());
    let registration = RegisterRequest::new("Jo", "jo@x.com", "abc123", "abc123", Role::Offerer);

    let outcome = auth.register(&registration).await.unwrap();

    assert!(matches!(outcome, AuthOutcome::Authenticated(ref u) if u.id == 12));
    assert_eq!(
        landing_after_auth(sessions.current().as_ref()),
        Route::PosterDashboard
    );
}

#[tokio::test]
async fn authenticated_session_survives_restart_until_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "name": "Jo", "email": "jo@x.com", "role": "SEEKER", "active": true
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let sessions = sessions_on(Arc::new(FileStorage::new(dir.path())));
    let auth = AuthService::new(api_for(&server), sessions.clone());
    auth.login(&LoginRequest::new("jo@x.com", "secret1"))
        .await
        .unwrap();

    let restarted = SessionStore::initialize(Arc::new(FileStorage::new(dir.path())));
    assert_eq!(restarted.current().map(|u| u.id), Some(3));

    auth.logout();
    let restarted = SessionStore::initialize(Arc::new(FileStorage::new(dir.path())));
    assert!(restarted.current().is_none());
}
