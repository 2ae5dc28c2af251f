use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::Value;
use trubric_core::config::TelemetryConfig;
use trubric_core::errors::TelemetryError;
use trubric_telemetry::*;

/// A one-shot HTTP peer: accepts a single request, answers with `status`
/// and `body`, and hands back the raw request head and body.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<(String, Vec<u8>)>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = format!("http://{}", listener.local_addr().unwrap());
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

        let mut received = Vec::new();
        let mut chunk = [0u8; 4096];
        let (head, body_start) = loop {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "connection closed before headers");
            received.extend_from_slice(&chunk[..n]);
            if let Some(pos) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                break (String::from_utf8_lossy(&received[..pos]).to_string(), pos + 4);
            }
        };
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while received.len() < body_start + content_length {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "connection closed before body");
            received.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        (head, received[body_start..body_start + content_length].to_vec())
    });
    (host, handle)
}

fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().find_map(|line| {
        let (n, v) = line.split_once(':')?;
        n.trim().eq_ignore_ascii_case(name).then(|| v.trim())
    })
}

fn events() -> Vec<Event> {
    vec![Event {
        user_id: "u1".to_string(),
        event: "thumbs_up".to_string(),
        properties: None,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }]
}

// ─── Wire protocol ──────────────────────────────────────────────────────────

#[test]
fn publish_posts_a_json_array_with_the_api_key() {
    let (host, server) = serve_once("200 OK", "{}");
    let transport = HttpTransport::new(&host, "secret-key", Duration::from_secs(5)).unwrap();
    transport.publish(&events()).unwrap();

    let (head, body) = server.join().unwrap();
    assert!(head.starts_with("POST /publish_events HTTP/1.1"), "{head}");
    assert_eq!(header(&head, "x-api-key"), Some("secret-key"));
    assert_eq!(header(&head, "content-type"), Some("application/json"));

    let body: Value = serde_json::from_slice(&body).unwrap();
    let sent = body.as_array().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["user_id"], "u1");
    assert_eq!(sent[0]["event"], "thumbs_up");
    assert_eq!(sent[0]["properties"], Value::Null);
    assert_eq!(sent[0]["timestamp"], "2024-03-01T12:00:00Z");
}

#[test]
fn error_status_carries_the_detail() {
    let (host, server) = serve_once("401 Unauthorized", r#"{"detail": "Invalid API key"}"#);
    let transport = HttpTransport::new(&host, "wrong", Duration::from_secs(5)).unwrap();
    let err = transport.publish(&events()).unwrap_err();
    server.join().unwrap();

    match err {
        TelemetryError::HttpStatus { status, detail } => {
            assert_eq!(status, 401);
            assert_eq!(detail, "Invalid API key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unreachable_host_is_a_transport_error() {
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let transport =
        HttpTransport::new(&format!("http://127.0.0.1:{port}"), "key", Duration::from_secs(2)).unwrap();
    let err = transport.publish(&events()).unwrap_err();
    assert!(matches!(err, TelemetryError::Transport { .. }));
    assert!(!err.is_input_error());
}

#[test]
fn client_delivers_over_http_on_close() {
    let (host, server) = serve_once("200 OK", "{}");
    let config = TelemetryConfig {
        host: Some(host),
        api_key: Some("secret-key".to_string()),
        flush_interval_secs: Some(3600),
        tick_interval_ms: Some(10),
        ..TelemetryConfig::default()
    };
    let client = TelemetryClient::from_config(&config).unwrap();
    client
        .track(TrackRequest::new("u1", "thumbs_down").property("score", 0))
        .unwrap();

    let report = client.close();
    assert!(report.delivered);
    assert_eq!(report.attempts, 1);

    let (_, body) = server.join().unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body[0]["event"], "thumbs_down");
    assert_eq!(body[0]["properties"]["score"], 0);
}
