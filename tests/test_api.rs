//! End-to-end tests: real TCP listener, real contact log file.
//!
//! Run with:
//!   cargo test --test test_api

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use kerala_ai_backend::api::{self, ApiState, admin};
use kerala_ai_backend::error::AppError;
use kerala_ai_backend::store::{Store, contact_log::FileContactLog};

const TOKEN: &str = "integration-token";

// ── helpers ──────────────────────────────────────────────────────────────────

struct Server {
    addr: SocketAddr,
    log_path: PathBuf,
    shutdown: CancellationToken,
    handle: JoinHandle<Result<(), AppError>>,
    _tmp: TempDir,
}

impl Server {
    async fn start() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let log_path = tmp.path().join("data").join("contacts.log");
        let store = Store::seeded(Box::new(FileContactLog::new(&log_path)));
        let state = ApiState::new(store, admin::from_token(Some(TOKEN)));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(api::serve_on(listener, state, shutdown.clone()));

        Self { addr, log_path, shutdown, handle, _tmp: tmp }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn log_lines(&self) -> Vec<Value> {
        fs::read_to_string(&self.log_path)
            .unwrap_or_default()
            .lines()
            .map(|l| serde_json::from_str(l).expect("log line is JSON"))
            .collect()
    }

    async fn stop(self) {
        self.shutdown.cancel();
        self.handle.await.expect("server task").expect("clean shutdown");
    }
}

fn is_uuid_shaped(s: &str) -> bool {
    let parts: Vec<_> = s.split('-').collect();
    parts.iter().map(|p| p.len()).eq([8, 4, 4, 4, 12])
        && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_hexdigit()))
}

// ── scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn contact_submission_scenario() {
    let server = Server::start().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(server.url("/api/contact"))
        .json(&json!({ "name": "Jo", "email": "jo@x.com", "message": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Contact form submitted successfully");
    let contact_id = body["contactId"].as_str().unwrap().to_string();
    assert!(is_uuid_shaped(&contact_id), "not a uuid: {contact_id}");

    let list: Value = client
        .get(server.url("/api/admin/contacts"))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["total"], 1);
    let contacts = list["contacts"].as_array().unwrap();
    assert_eq!(contacts.iter().filter(|c| c["id"] == contact_id.as_str()).count(), 1);
    assert_eq!(contacts[0]["interest"], "general");
    assert!(contacts[0]["createdAt"].is_string());

    let lines = server.log_lines();
    assert_eq!(lines.iter().filter(|l| l["id"] == contact_id.as_str()).count(), 1);
    assert_eq!(lines[0], contacts[0]);

    server.stop().await;
}

#[tokio::test]
async fn rejected_contacts_never_reach_the_log() {
    let server = Server::start().await;
    let client = reqwest::Client::new();

    for body in [
        json!({ "name": "A", "email": "bad-email", "message": "hi" }),
        json!({ "email": "a@b.co", "message": "hi" }),
        json!({ "name": "A", "message": "hi" }),
        json!({ "name": "A", "email": "a@b.co" }),
    ] {
        let resp = client.post(server.url("/api/contact")).json(&body).send().await.unwrap();
        assert_eq!(resp.status(), 400, "body: {body}");
    }

    let stats: Value = client.get(server.url("/api/stats")).send().await.unwrap().json().await.unwrap();
    assert_eq!(stats["totalContacts"], 0);
    assert!(server.log_lines().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn delete_leaves_log_untouched() {
    let server = Server::start().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .post(server.url("/api/contact"))
        .json(&json!({ "name": "Jo", "email": "jo@x.com", "interest": "startup", "message": "hi" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = body["contactId"].as_str().unwrap();

    let resp = client
        .delete(server.url(&format!("/api/admin/contacts/{id}")))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .delete(server.url(&format!("/api/admin/contacts/{id}")))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // The log is append-only; deletes do not rewrite it.
    assert_eq!(server.log_lines().len(), 1);

    server.stop().await;
}

#[cfg(feature = "cors")]
#[tokio::test]
async fn cors_headers_present() {
    let server = Server::start().await;
    let resp = reqwest::Client::new()
        .get(server.url("/api/health"))
        .header("Origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some("*")
    );
    server.stop().await;
}
