use std::path::Path;
use std::process::{Command, Output};

use httpmock::prelude::*;
use serde_json::json;

const FEATURE_EVENT: &str = r#"{
    "action": "opened",
    "issue": {
        "number": 5,
        "title": "Add X",
        "body": "Please add X",
        "labels": [{"name": "Feature"}]
    },
    "repository": {"full_name": "org/bench"}
}"#;

fn warden(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_warden"));
    cmd.current_dir(dir);
    for var in [
        "GEMINI_API_KEY",
        "OPENAI_API_KEY",
        "GITHUB_TOKEN",
        "GH_TOKEN",
        "GITHUB_EVENT_NAME",
        "GITHUB_EVENT_PATH",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_event(dir: &Path, payload: &str) -> std::path::PathBuf {
    let path = dir.join("event.json");
    std::fs::write(&path, payload).unwrap();
    path
}

fn write_config(dir: &Path, server: &MockServer) {
    let config = format!(
        r#"
[llm]
api_key = "test-key"
base_url = "{base}"

[github]
token = "ghp_test"
api_base = "{base}"
"#,
        base = server.base_url()
    );
    std::fs::write(dir.join(".warden.toml"), config).unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn unsupported_event_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();

    let output = warden(dir.path())
        .args(["check", "--event-name", "push"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("Unsupported event type: push"));
}

#[test]
fn missing_event_path_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = warden(dir.path())
        .args(["check", "--event-name", "issues"])
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn dry_run_without_model_key_prints_error_comment() {
    let dir = tempfile::tempdir().unwrap();
    let event = write_event(dir.path(), FEATURE_EVENT);

    let output = warden(dir.path())
        .args(["check", "--event-name", "issues", "--dry-run", "--event-path"])
        .arg(&event)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let out = stdout(&output);
    assert!(out.contains("--- comment for org/bench#5 ---"));
    assert!(out.contains("问题内容检查失败"));
    assert!(out.contains("GEMINI_API_KEY"));
    assert!(out.contains("Issue content check failed"));
}

#[test]
fn posts_model_answer_to_issue() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    write_config(dir.path(), &server);
    let event = write_event(dir.path(), FEATURE_EVENT);

    let gemini = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.5-flash:generateContent")
            .body_contains("Feature Description");
        then.status(200).json_body(json!({
            "candidates": [{"content": {"parts": [{"text": "### 检查状态\nPASS"}]}}]
        }));
    });
    let comment = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/org/bench/issues/5/comments")
            .body_contains("PASS");
        then.status(201).json_body(json!({"id": 1, "html_url": "https://example.test/c/1"}));
    });

    let output = warden(dir.path())
        .args(["check", "--event-name", "issues", "--event-path"])
        .arg(&event)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("Issue content check completed and comment posted."));
    gemini.assert();
    comment.assert();
}

#[test]
fn model_failure_posts_error_comment_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    write_config(dir.path(), &server);
    let event = write_event(dir.path(), FEATURE_EVENT);

    server.mock(|when, then| {
        when.method(POST).path_contains("generateContent");
        then.status(429).body("RESOURCE_EXHAUSTED");
    });
    let error_comment = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/org/bench/issues/5/comments")
            .body_contains("RESOURCE_EXHAUSTED");
        then.status(201).json_body(json!({"id": 2, "html_url": "https://example.test/c/2"}));
    });

    let output = warden(dir.path())
        .args(["check", "--event-name", "issues", "--event-path"])
        .arg(&event)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("Issue content check failed"));
    error_comment.assert();
}

#[test]
fn failing_error_comment_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    write_config(dir.path(), &server);
    let event = write_event(dir.path(), FEATURE_EVENT);

    server.mock(|when, then| {
        when.method(POST).path_contains("generateContent");
        then.status(503).body("unavailable");
    });
    server.mock(|when, then| {
        when.method(POST).path("/repos/org/bench/issues/5/comments");
        then.status(403)
            .json_body(json!({"message": "Resource not accessible by integration"}));
    });

    let output = warden(dir.path())
        .args(["check", "--event-name", "issues", "--event-path"])
        .arg(&event)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!stdout(&output).contains("comment posted"));
}
