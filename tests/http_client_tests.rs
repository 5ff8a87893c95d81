use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use exam_engine::{
    auth::{EnvSessionProvider, SessionProvider, StaticSessionProvider},
    config::Config,
    models::dto::{AnswerInput, SubmitAttemptRequest},
    repositories::{HttpSubmissionService, HttpTestRepository, SubmissionService, TestRepository},
};

fn session() -> Arc<dyn SessionProvider> {
    let _ = env_logger::builder().is_test(true).try_init();
    Arc::new(StaticSessionProvider::new("secret-token"))
}

fn test_repository(base_url: &str) -> HttpTestRepository {
    HttpTestRepository::new(reqwest::Client::new(), base_url, session())
}

fn submission_service(base_url: &str) -> HttpSubmissionService {
    HttpSubmissionService::new(reqwest::Client::new(), base_url, session())
}

fn test_body() -> serde_json::Value {
    json!({
        "id": "test-1",
        "course_id": "cs101",
        "title": "Midterm",
        "description": "Chapters 1-4",
        "duration_minutes": 30,
        "questions": [
            {
                "id": "q-1",
                "prompt": "Pick one",
                "options": [
                    { "id": "o-1", "text": "A", "correct": true },
                    { "id": "o-2", "text": "B", "correct": false }
                ]
            }
        ]
    })
}

fn request_body() -> SubmitAttemptRequest {
    SubmitAttemptRequest {
        test_id: "test-1".to_string(),
        answers: vec![AnswerInput {
            question_id: "q-1".to_string(),
            option_id: "o-1".to_string(),
        }],
    }
}

#[tokio::test]
async fn load_maps_wire_test_to_domain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses/cs101/test"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_body()))
        .expect(1)
        .mount(&server)
        .await;

    let repo = test_repository(&server.uri());
    let test = repo
        .find_by_course("cs101")
        .await
        .expect("load should succeed")
        .expect("test should be present");

    assert_eq!(test.id, "test-1");
    assert_eq!(test.duration, std::time::Duration::from_secs(30 * 60));
    assert_eq!(test.questions[0].options[0].id, "o-1");
    assert!(test.questions[0].options[0].correct);
}

#[tokio::test]
async fn load_404_means_no_test_scheduled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses/cs101/test"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let repo = test_repository(&server.uri());
    let found = repo.find_by_course("cs101").await.expect("404 is not an error");

    assert!(found.is_none());
}

#[tokio::test]
async fn load_backend_failure_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses/cs101/test"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let repo = test_repository(&server.uri());
    let err = repo
        .find_by_course("cs101")
        .await
        .expect_err("500 should fail");

    assert_eq!(err.error_code(), "TRANSIENT");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn load_unreachable_backend_is_transient() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    drop(server);

    let repo = test_repository(&base_url);
    let err = repo
        .find_by_course("cs101")
        .await
        .expect_err("dead backend should fail");

    assert!(err.is_retryable());
}

#[tokio::test]
async fn load_rejected_credential_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses/cs101/test"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let repo = test_repository(&server.uri());
    let err = repo
        .find_by_course("cs101")
        .await
        .expect_err("403 should fail");

    assert_eq!(err.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn load_malformed_test_is_validation_error() {
    let server = MockServer::start().await;
    let mut body = test_body();
    body["questions"] = json!([]);
    Mock::given(method("GET"))
        .and(path("/api/courses/cs101/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let repo = test_repository(&server.uri());
    let err = repo
        .find_by_course("cs101")
        .await
        .expect_err("empty question list should fail");

    assert_eq!(err.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_credential_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_body()))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        backend_base_url: server.uri(),
        request_timeout_secs: 5,
        session_token: None,
    };
    let repo = HttpTestRepository::new(
        reqwest::Client::new(),
        &config.backend_base_url,
        Arc::new(EnvSessionProvider::from_config(&config)),
    );

    let err = repo
        .find_by_course("cs101")
        .await
        .expect_err("missing token should fail");

    assert_eq!(err.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn submit_posts_payload_and_returns_ack() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tests/test-1/attempts"))
        .and(header("Authorization", "Bearer secret-token"))
        .and(body_partial_json(json!({
            "test_id": "test-1",
            "answers": [{ "question_id": "q-1", "option_id": "o-1" }]
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "attempt_id": "srv-attempt-9" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = submission_service(&server.uri());
    let ack = service
        .submit_attempt(&request_body())
        .await
        .expect("submission should succeed");

    assert_eq!(ack.attempt_id.as_deref(), Some("srv-attempt-9"));
}

#[tokio::test]
async fn submit_backend_failure_is_retryable_submission_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tests/test-1/attempts"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let service = submission_service(&server.uri());
    let err = service
        .submit_attempt(&request_body())
        .await
        .expect_err("502 should fail");

    assert_eq!(err.error_code(), "SUBMISSION_FAILED");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn submit_rejected_credential_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tests/test-1/attempts"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let service = submission_service(&server.uri());
    let err = service
        .submit_attempt(&request_body())
        .await
        .expect_err("401 should fail");

    assert_eq!(err.error_code(), "UNAUTHORIZED");
}
