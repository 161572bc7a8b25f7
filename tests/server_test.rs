mod common;

use reqwest::StatusCode;
use seminar_qa::auth::AdminSecret;
use seminar_qa::server::{self, routes::ADMIN_HEADER, AppState};
use seminar_qa::summary::{DEFAULT_MODEL, DEFAULT_TIMEOUT};
use seminar_qa::{QuestionStore, SummaryRequester};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

const SECRET: &str = "correct horse battery staple";

struct TestServer {
    base: String,
    store: QuestionStore,
    client: reqwest::Client,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

async fn spawn_server(admin: Option<&str>, completions_url: &str, default_key: Option<&str>) -> TestServer {
    let store = QuestionStore::open_in_memory().unwrap();
    let state = AppState {
        store: store.clone(),
        summarizer: SummaryRequester::new(completions_url, DEFAULT_MODEL, DEFAULT_TIMEOUT).unwrap(),
        admin: AdminSecret::new(admin),
        default_api_key: default_key.map(str::to_string),
    };

    let app = server::router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base: format!("http://{}", addr),
        store,
        client: reqwest::Client::new(),
    }
}

#[tokio::test]
async fn test_submit_and_list_recent() {
    let server = spawn_server(Some(SECRET), &common::unreachable_base_url(), None).await;

    for text in ["first?", "second?", "third?"] {
        let resp = server
            .client
            .post(server.url("/questions"))
            .json(&json!({ "text": text }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.unwrap();
        assert!(body["id"].as_i64().is_some());
    }

    let body: Value = server
        .client
        .get(server.url("/questions?limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["total"], 3);
    assert_eq!(body["questions"], json!(["third?", "second?"]));
}

#[tokio::test]
async fn test_blank_submission_is_rejected() {
    let server = spawn_server(Some(SECRET), &common::unreachable_base_url(), None).await;

    let resp = server
        .client
        .post(server.url("/questions"))
        .json(&json!({ "text": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "invalid_input");
    assert_eq!(server.store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_admin_routes_require_secret() {
    let server = spawn_server(Some(SECRET), &common::unreachable_base_url(), None).await;
    server.store.add_question("keep me").unwrap();

    let missing = server
        .client
        .delete(server.url("/admin/questions"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong = server
        .client
        .delete(server.url("/admin/questions"))
        .header(ADMIN_HEADER, "admin123")
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(server.store.count().unwrap(), 1);
}

#[tokio::test]
async fn test_admin_disabled_without_configured_secret() {
    let server = spawn_server(None, &common::unreachable_base_url(), None).await;

    let resp = server
        .client
        .get(server.url("/admin/questions"))
        .header(ADMIN_HEADER, "")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_list_and_clear() {
    let server = spawn_server(Some(SECRET), &common::unreachable_base_url(), None).await;
    server.store.add_question("older").unwrap();
    server.store.add_question("newer").unwrap();

    let records: Value = server
        .client
        .get(server.url("/admin/questions"))
        .header(ADMIN_HEADER, SECRET)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(records[0]["text"], "newer");
    assert_eq!(records[1]["text"], "older");

    for _ in 0..2 {
        let resp = server
            .client
            .delete(server.url("/admin/questions"))
            .header(ADMIN_HEADER, SECRET)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
    assert!(server.store.list_questions().unwrap().is_empty());
}

#[tokio::test]
async fn test_summary_uses_request_key() {
    let fake = common::spawn_ok("## Ethics\n- What is AI bias?").await;
    let server = spawn_server(Some(SECRET), &fake.base_url, None).await;
    server.store.add_question("What is AI bias?").unwrap();

    let resp = server
        .client
        .post(server.url("/admin/summary"))
        .header(ADMIN_HEADER, SECRET)
        .json(&json!({ "api_key": "sk-from-request" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["summary"], "## Ethics\n- What is AI bias?");
    assert_eq!(
        fake.requests()[0].authorization.as_deref(),
        Some("Bearer sk-from-request")
    );
}

#[tokio::test]
async fn test_summary_falls_back_to_default_key() {
    let fake = common::spawn_ok("summary").await;
    let server = spawn_server(Some(SECRET), &fake.base_url, Some("sk-default")).await;
    server.store.add_question("What is AI bias?").unwrap();

    let resp = server
        .client
        .post(server.url("/admin/summary"))
        .header(ADMIN_HEADER, SECRET)
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        fake.requests()[0].authorization.as_deref(),
        Some("Bearer sk-default")
    );
}

#[tokio::test]
async fn test_summary_without_any_key() {
    let fake = common::spawn_ok("unused").await;
    let server = spawn_server(Some(SECRET), &fake.base_url, None).await;
    server.store.add_question("What is AI bias?").unwrap();

    let resp = server
        .client
        .post(server.url("/admin/summary"))
        .header(ADMIN_HEADER, SECRET)
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "missing_credential");
    assert_eq!(fake.hits(), 0);
}

#[tokio::test]
async fn test_summary_failure_keeps_queue_usable() {
    let server = spawn_server(Some(SECRET), &common::unreachable_base_url(), Some("sk-default")).await;
    server.store.add_question("What is AI bias?").unwrap();

    let resp = server
        .client
        .post(server.url("/admin/summary"))
        .header(ADMIN_HEADER, SECRET)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "summary_request_failed");

    let resp = server
        .client
        .post(server.url("/questions"))
        .json(&json!({ "text": "Still accepting?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(server.store.count().unwrap(), 2);
}

#[tokio::test]
async fn test_malformed_submission_uses_error_shape() {
    let server = spawn_server(Some(SECRET), &common::unreachable_base_url(), None).await;

    let missing_field = server
        .client
        .post(server.url("/questions"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_field.status(), StatusCode::BAD_REQUEST);
    let body: Value = missing_field.json().await.unwrap();
    assert_eq!(body["kind"], "invalid_input");
    assert!(body["error"].as_str().unwrap().contains("text"));

    let not_json = server
        .client
        .post(server.url("/questions"))
        .body("What is AI bias?")
        .send()
        .await
        .unwrap();
    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);
    let body: Value = not_json.json().await.unwrap();
    assert_eq!(body["kind"], "invalid_input");

    assert_eq!(server.store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_summary_without_body_uses_default_key() {
    let fake = common::spawn_ok("summary").await;
    let server = spawn_server(Some(SECRET), &fake.base_url, Some("sk-default")).await;
    server.store.add_question("What is AI bias?").unwrap();

    let resp = server
        .client
        .post(server.url("/admin/summary"))
        .header(ADMIN_HEADER, SECRET)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        fake.requests()[0].authorization.as_deref(),
        Some("Bearer sk-default")
    );
}

#[tokio::test]
async fn test_malformed_summary_body_uses_error_shape() {
    let fake = common::spawn_ok("unused").await;
    let server = spawn_server(Some(SECRET), &fake.base_url, Some("sk-default")).await;
    server.store.add_question("What is AI bias?").unwrap();

    let resp = server
        .client
        .post(server.url("/admin/summary"))
        .header(ADMIN_HEADER, SECRET)
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "invalid_input");
    assert_eq!(fake.hits(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_queue_stays_responsive_during_slow_summary() {
    let fake = common::spawn_fake(
        reqwest::StatusCode::OK,
        common::completion_body("slow summary"),
        Duration::from_secs(3),
    )
    .await;
    let server = Arc::new(spawn_server(Some(SECRET), &fake.base_url, Some("sk-default")).await);
    server.store.add_question("What is AI bias?").unwrap();

    let pending = {
        let server = server.clone();
        tokio::spawn(async move {
            server
                .client
                .post(server.url("/admin/summary"))
                .header(ADMIN_HEADER, SECRET)
                .send()
                .await
                .unwrap()
                .status()
        })
    };

    // Wait until the summary request has reached the completion service.
    let deadline = Instant::now() + Duration::from_secs(2);
    while fake.hits() == 0 {
        assert!(Instant::now() < deadline, "summary request never arrived");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let started = Instant::now();
    let submit = server
        .client
        .post(server.url("/questions"))
        .json(&json!({ "text": "Submitted mid-summary?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(submit.status(), StatusCode::CREATED);

    let listed: Value = server
        .client
        .get(server.url("/questions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["questions"][0], "Submitted mid-summary?");
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(!pending.is_finished());

    assert_eq!(pending.await.unwrap(), StatusCode::OK);
}
