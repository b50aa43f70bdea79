#![deny(clippy::all, clippy::pedantic)]

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write file");
    file
}

fn blogdesk(server: &MockServer, session: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("blogdesk"));
    cmd.env("BLOGDESK__API__BASE_URL", server.base_url())
        .env_remove("BLOGDESK_TOKEN")
        .env_remove("BLOGDESK_TOKEN_FILE")
        .arg("--session-file")
        .arg(session);
    cmd
}

fn mock_me<'a>(server: &'a MockServer, role: &str) -> httpmock::Mock<'a> {
    let body = format!(
        r#"{{"id":1,"username":"ana","email":"ana@example.com","role":"{role}"}}"#
    );
    server.mock(|when, then| {
        when.method("GET")
            .path("/api/auth/me")
            .header("authorization", "Bearer cli-token");
        then.status(200)
            .header("content-type", "application/json")
            .body(body);
    })
}

#[test]
fn login_then_whoami_works_end_to_end() {
    let server = MockServer::start();
    let me = mock_me(&server, "ADMIN");
    let dir = TempDir::new().expect("tempdir");
    let session = dir.path().join("session.json");
    let token = write_file("cli-token\n");

    blogdesk(&server, &session)
        .arg("login")
        .arg("--token-file")
        .arg(token.path())
        .assert()
        .success()
        .stdout(contains("Signed in as ana (ADMIN)"));

    let assert = blogdesk(&server, &session)
        .arg("--json")
        .arg("whoami")
        .assert()
        .success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("\"canViewAllDrafts\": true"));
    me.assert_calls(2);
}

#[test]
fn logout_forgets_token() {
    let server = MockServer::start();
    let dir = TempDir::new().expect("tempdir");
    let session = dir.path().join("session.json");
    std::fs::write(&session, r#"{"authToken":"cli-token"}"#).expect("seed session");

    blogdesk(&server, &session)
        .arg("logout")
        .assert()
        .success()
        .stdout(contains("Signed out"));

    blogdesk(&server, &session)
        .args(["posts", "list", "--partition", "drafts"])
        .assert()
        .failure()
        .stderr(contains("sign in required"))
        .stderr(contains("blogdesk login"));
}

#[test]
fn logout_resets_unreadable_session_file() {
    let server = MockServer::start();
    let dir = TempDir::new().expect("tempdir");
    let session = dir.path().join("session.json");
    std::fs::write(&session, "{not json").expect("seed session");

    blogdesk(&server, &session)
        .arg("logout")
        .assert()
        .success()
        .stdout(contains("Signed out"));

    blogdesk(&server, &session)
        .args(["posts", "list", "--partition", "drafts"])
        .assert()
        .failure()
        .stderr(contains("sign in required"));
}

#[test]
fn missing_token_fails_fast() {
    let server = MockServer::start();
    let dir = TempDir::new().expect("tempdir");

    blogdesk(&server, &dir.path().join("session.json"))
        .arg("login")
        .assert()
        .failure()
        .stderr(contains("token is required"));
}

#[test]
fn published_listing_prints_summary() {
    let server = MockServer::start();
    let listing = server.mock(|when, then| {
        when.method("GET")
            .path("/api/posts")
            .query_param("page", "0")
            .query_param("size", "5");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"{"content":[
                    {"id":1,"title":"Hello","content":"<p>hi</p>","author":{"id":1,"username":"ana","email":"a@x"},"createdAt":"2024-05-01T10:00:00","updatedAt":"2024-05-01T10:00:00"},
                    {"id":2,"title":"World","content":"<p>yo</p>","author":{"id":1,"username":"ana","email":"a@x"},"createdAt":"2024-05-02T10:00:00","updatedAt":"2024-05-02T10:00:00"}
                ],"totalPages":1,"totalElements":2,"size":5,"number":0,"first":true,"last":true}"#,
            );
    });
    let dir = TempDir::new().expect("tempdir");

    blogdesk(&server, &dir.path().join("session.json"))
        .args(["posts", "list"])
        .assert()
        .success()
        .stdout(contains("#1  Hello"))
        .stdout(contains("Showing 1 to 2 of 2"));
    listing.assert();
}

#[test]
fn create_with_publish_saves_then_publishes() {
    let server = MockServer::start();
    let _me = mock_me(&server, "USER");
    let create = server.mock(|when, then| {
        when.method("POST")
            .path("/api/posts")
            .json_body_includes(r#"{"title":"Fresh"}"#);
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"id":11,"title":"Fresh","content":"<p>news</p>","author":{"id":1,"username":"ana","email":"a@x"},"createdAt":"2024-05-01T10:00:00","updatedAt":"2024-05-01T10:00:00"}"#);
    });
    let publish = server.mock(|when, then| {
        when.method("PUT").path("/api/posts/11/published");
        then.status(200);
    });
    let dir = TempDir::new().expect("tempdir");
    let session = dir.path().join("session.json");
    std::fs::write(&session, r#"{"authToken":"cli-token"}"#).expect("seed session");
    let content = write_file("<p>news</p>");

    blogdesk(&server, &session)
        .args(["posts", "create", "--title", "Fresh", "--publish", "--content-file"])
        .arg(content.path())
        .assert()
        .success()
        .stdout(contains("Post published successfully!"));
    create.assert();
    publish.assert();
}

#[test]
fn empty_content_is_rejected_before_any_write() {
    let server = MockServer::start();
    let _me = mock_me(&server, "USER");
    let create = server.mock(|when, then| {
        when.method("POST").path("/api/posts");
        then.status(201);
    });
    let dir = TempDir::new().expect("tempdir");
    let session = dir.path().join("session.json");
    std::fs::write(&session, r#"{"authToken":"cli-token"}"#).expect("seed session");

    blogdesk(&server, &session)
        .args(["posts", "create", "--title", "Empty", "--content", "<p></p>"])
        .assert()
        .failure()
        .stderr(contains("content must not be empty"));
    create.assert_calls(0);
}

#[test]
fn json_publish_with_nothing_selected_stays_json() {
    let server = MockServer::start();
    let _me = mock_me(&server, "USER");
    server.mock(|when, then| {
        when.method("GET").path("/api/posts/drafts");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"content":[],"totalPages":0,"totalElements":0,"size":5,"number":0,"first":true,"last":true}"#);
    });
    let dir = TempDir::new().expect("tempdir");
    let session = dir.path().join("session.json");
    std::fs::write(&session, r#"{"authToken":"cli-token"}"#).expect("seed session");

    let assert = blogdesk(&server, &session)
        .args(["--json", "posts", "publish", "--all"])
        .assert()
        .success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    let value: serde_json::Value = serde_json::from_str(&output).expect("json output");
    assert_eq!(value["kind"], "skipped");
}
