use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-3.5-turbo",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": text
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": 10,
            "completion_tokens": 20,
            "total_tokens": 30
        }
    })
}

/// Base command with env pinned away from the user's home and real API.
fn chat_cmd(home: &tempfile::TempDir, base_url: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("goatterm");
    cmd.env("GOATTERM_HOME", home.path())
        .env("GOATTERM_BLOCK_REAL_API", "1")
        .env("OPENAI_API_KEY", "test-api-key")
        .env("OPENAI_BASE_URL", base_url)
        .arg("chat");
    cmd
}

#[tokio::test]
async fn test_chat_responds_and_exits_on_quit() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_response("Hello there!")))
        .expect(1)
        .mount(&mock_server)
        .await;

    chat_cmd(&home, &mock_server.uri())
        .write_stdin("hi\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("GOAT: Hello there!"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[tokio::test]
async fn test_chat_sends_persona_then_full_history() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_response("I AM THE GOAT")))
        .expect(2)
        .mount(&mock_server)
        .await;

    chat_cmd(&home, &mock_server.uri())
        .write_stdin("who are you\nprove it\n:q\n")
        .assert()
        .success();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let first: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(first["model"], "gpt-3.5-turbo");
    assert_eq!(first["temperature"], 0.9);
    let messages = first["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert!(
        messages[0]["content"]
            .as_str()
            .unwrap()
            .contains("THE GOAT")
    );
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "who are you");

    // Second request carries the whole conversation so far.
    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    let messages = second["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[1]["content"], "who are you");
    assert_eq!(messages[2]["role"], "assistant");
    assert_eq!(messages[2]["content"], "I AM THE GOAT");
    assert_eq!(messages[3]["content"], "prove it");
}

#[tokio::test]
async fn test_persona_flag_overrides_instruction() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_response("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut cmd = cargo_bin_cmd!("goatterm");
    cmd.env("GOATTERM_HOME", home.path())
        .env("GOATTERM_BLOCK_REAL_API", "1")
        .env("OPENAI_API_KEY", "test-api-key")
        .env("OPENAI_BASE_URL", mock_server.uri())
        .args(["--persona", "You are a polite terminal.", "chat"])
        .write_stdin("hi\n:q\n")
        .assert()
        .success();

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"][0]["content"], "You are a polite terminal.");
}

#[tokio::test]
async fn test_chat_skips_empty_input() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_response("Got it!")))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Empty lines are skipped, only "test" triggers an API call
    chat_cmd(&home, &mock_server.uri())
        .write_stdin("\n\ntest\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("GOAT: Got it!"));
}

#[tokio::test]
async fn test_chat_shows_banner() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    chat_cmd(&home, &mock_server.uri())
        .write_stdin(":q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("GOAT TERMINAL v1.0"))
        .stdout(predicate::str::contains(":q to quit"));
}

#[tokio::test]
async fn test_chat_handles_api_error_gracefully() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    let error_body = serde_json::json!({
        "error": {
            "message": "Rate limit exceeded",
            "type": "rate_limit_error"
        }
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(error_body))
        .mount(&mock_server)
        .await;

    // Chat shows the error but continues (user can still quit)
    chat_cmd(&home, &mock_server.uri())
        .write_stdin("hello\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("WE GOT A PROBLEM: "))
        .stdout(predicate::str::contains("HTTP 429"))
        .stdout(predicate::str::contains("Rate limit exceeded"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[tokio::test]
async fn test_chat_failed_turn_is_not_replayed() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    // First call fails, second succeeds.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_response("better now")))
        .mount(&mock_server)
        .await;

    chat_cmd(&home, &mock_server.uri())
        .write_stdin("first\nsecond\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("GOAT: better now"));

    // The failed "first" turn is gone from the history of the retry.
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    let messages = second["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["content"], "second");
}

#[tokio::test]
async fn test_chat_without_key_seeds_error_and_still_routes_calls() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    let error_body = serde_json::json!({
        "error": {
            "message": "Incorrect API key provided",
            "type": "invalid_request_error"
        }
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Missing credential is non-fatal: the banner carries an error entry and
    // submissions still go out, surfacing the provider's own failure.
    chat_cmd(&home, &mock_server.uri())
        .env_remove("OPENAI_API_KEY")
        .write_stdin("hello\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("THE GOAT NEEDS AN API KEY"))
        .stdout(predicate::str::contains("HTTP 401"));
}

#[tokio::test]
async fn test_slash_command_skips_network() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_response("never")))
        .expect(0)
        .mount(&mock_server)
        .await;

    chat_cmd(&home, &mock_server.uri())
        .write_stdin("/goat\n/help\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("GREATEST OF ALL TIME"))
        .stdout(predicate::str::contains("COMMANDS:"));
}

#[tokio::test]
async fn test_clear_resets_history_and_reprints_banner() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_response("yo")))
        .expect(2)
        .mount(&mock_server)
        .await;

    chat_cmd(&home, &mock_server.uri())
        .write_stdin("hi\n/CLEAR\nyo again\n:q\n")
        .assert()
        .success()
        // Seed banner is rendered twice: once at startup, once after /clear.
        .stdout(predicate::str::contains("GOAT TERMINAL v1.0").count(2));

    // After the reset the next request starts a fresh conversation.
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    let messages = second["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["content"], "yo again");
}
