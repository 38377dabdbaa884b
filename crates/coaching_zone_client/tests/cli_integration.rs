//! Integration tests for the coaching-zone binary.
//! Uses assert_cmd to run the binary, a real temp config, and an in-process
//! HTTP listener. No mocks.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write as _;
use std::net::TcpListener as StdTcpListener;

/// Pick a free port by binding to :0 and extracting the assigned port.
fn free_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Write a minimal YAML config to a temp dir pointing at `port`. History is
/// stored next to it.
fn write_config(dir: &tempfile::TempDir, port: u16) -> std::path::PathBuf {
    let path = dir.path().join("config.yaml");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(
        f,
        "webhook_url: http://127.0.0.1:{}/webhook/chat\nrequest_timeout_ms: 5000",
        port
    )
    .unwrap();
    path
}

/// Spawn a minimal HTTP server that answers one request with `body`.
fn spawn_test_server(port: u16, body: &'static str) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};

            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
                .await
                .unwrap();
            let (mut tcp, _) = listener.accept().await.unwrap();

            // Read until the end of the request headers plus body.
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = tcp.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                    let len = headers
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .map(|v| v.trim().parse::<usize>().unwrap())
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + len {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            tcp.write_all(response.as_bytes()).await.unwrap();
            let _ = tcp.shutdown().await;

            // Small delay so the client can read before we drop.
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        });
    })
}

const ANSWER: &str = r#"{"answer":"**Warmup:** 10 min","sources":[{"url":"https://www.example.com/plan"}],"category":"taktik"}"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn ask_prints_answer_and_sources() {
    let port = free_port();
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, port);

    let _server = spawn_test_server(port, ANSWER);
    std::thread::sleep(std::time::Duration::from_millis(100));

    let mut cmd = Command::from(cargo_bin_cmd!("coaching-zone"));
    cmd.arg("--config")
        .arg(&config_path)
        .arg("ask")
        .write_stdin("Plane 60 Minuten Netzdrop\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("**Warmup:** 10 min"))
        .stdout(predicate::str::contains("[1] example.com <https://www.example.com/plan>"));

    assert!(dir.path().join("coaching-zone-history.json").exists());
}

#[test]
fn ask_html_with_config_env_var() {
    let port = free_port();
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, port);

    let _server = spawn_test_server(port, ANSWER);
    std::thread::sleep(std::time::Duration::from_millis(100));

    let mut cmd = Command::from(cargo_bin_cmd!("coaching-zone"));
    cmd.env("COACHING_ZONE_CONFIG", &config_path)
        .args(["ask", "--html", "Plane", "60", "Minuten", "Netzdrop"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"<div id="coaching-zone">"#))
        .stdout(predicate::str::contains("<strong>Warmup:</strong>"));
}

#[test]
fn answered_question_shows_up_in_history() {
    let port = free_port();
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, port);

    let _server = spawn_test_server(port, ANSWER);
    std::thread::sleep(std::time::Duration::from_millis(100));

    let mut ask = Command::from(cargo_bin_cmd!("coaching-zone"));
    ask.arg("--config")
        .arg(&config_path)
        .args(["ask", "Plane 60 Minuten Netzdrop"])
        .assert()
        .success();

    let mut history = Command::from(cargo_bin_cmd!("coaching-zone"));
    history
        .arg("--config")
        .arg(&config_path)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Taktik]"))
        .stdout(predicate::str::contains("Plane 60 Minuten Netzdrop"));

    let mut clear = Command::from(cargo_bin_cmd!("coaching-zone"));
    clear
        .arg("--config")
        .arg(&config_path)
        .args(["history", "--clear"])
        .assert()
        .success();

    let mut history = Command::from(cargo_bin_cmd!("coaching-zone"));
    history
        .arg("--config")
        .arg(&config_path)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Noch keine Anfragen."));
}

#[test]
fn short_question_is_refused() {
    let port = free_port();
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, port);

    let mut cmd = Command::from(cargo_bin_cmd!("coaching-zone"));
    cmd.arg("--config").arg(&config_path).args(["ask", "abc"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("longer than 3"));
}

#[test]
fn server_down_shows_retry_message() {
    // Point the config at a port where nothing is listening.
    let port = free_port();
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, port);

    let mut cmd = Command::from(cargo_bin_cmd!("coaching-zone"));
    cmd.arg("--config")
        .arg(&config_path)
        .arg("ask")
        .write_stdin("Hallo Trainer\n");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Netzwerkfehler oder Timeout"));
    assert!(!dir.path().join("coaching-zone-history.json").exists());
}

#[test]
fn examples_lists_starter_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, free_port());

    let mut cmd = Command::from(cargo_bin_cmd!("coaching-zone"));
    cmd.arg("--config").arg(&config_path).arg("examples");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Footwork: Einstieg Split-Step [Lauftechnik]"));
}

#[test]
fn show_replays_answer_from_history() {
    let port = free_port();
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, port);

    let _server = spawn_test_server(port, ANSWER);
    std::thread::sleep(std::time::Duration::from_millis(100));

    let mut ask = Command::from(cargo_bin_cmd!("coaching-zone"));
    ask.arg("--config")
        .arg(&config_path)
        .args(["ask", "Plane 60 Minuten Netzdrop"])
        .assert()
        .success();

    let mut history = Command::from(cargo_bin_cmd!("coaching-zone"));
    let listing = history
        .arg("--config")
        .arg(&config_path)
        .arg("history")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let listing = String::from_utf8(listing).unwrap();
    let timestamp = listing
        .split_whitespace()
        .next()
        .expect("history should list the exchange")
        .to_string();
    assert!(timestamp.parse::<i64>().is_ok(), "unexpected listing: {}", listing);

    // The test server is gone by now; replay must not need the network.
    let mut show = Command::from(cargo_bin_cmd!("coaching-zone"));
    show.arg("--config")
        .arg(&config_path)
        .args(["show", timestamp.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("> Plane 60 Minuten Netzdrop"))
        .stdout(predicate::str::contains("**Warmup:** 10 min"))
        .stdout(predicate::str::contains("[1] example.com"));

    let mut show_html = Command::from(cargo_bin_cmd!("coaching-zone"));
    show_html
        .arg("--config")
        .arg(&config_path)
        .args(["show", "--html", timestamp.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("<strong>Warmup:</strong>"));
}

#[test]
fn show_unknown_timestamp_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, free_port());

    let mut cmd = Command::from(cargo_bin_cmd!("coaching-zone"));
    cmd.arg("--config").arg(&config_path).args(["show", "42"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no history entry with timestamp 42"));
}

#[test]
fn glossary_lists_terms_in_configured_order() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, free_port());

    let mut cmd = Command::from(cargo_bin_cmd!("coaching-zone"));
    cmd.arg("--config").arg(&config_path).arg("glossary");

    let output = cmd
        .assert()
        .success()
        .stdout(predicate::str::contains("split-step: Kleiner beidbeiniger Absprung"))
        .get_output()
        .stdout
        .clone();
    let output = String::from_utf8(output).unwrap();
    let terms: Vec<&str> = output
        .lines()
        .filter_map(|l| l.split(':').next())
        .collect();
    assert_eq!(terms, ["clear", "lift", "longline", "drop", "split-step"]);
}
