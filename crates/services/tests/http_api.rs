use lesson_core::model::{ExecutionOutcome, LessonId};
use services::api::SaveProgressRequest;
use services::{ApiConfig, ApiError, ExecutionRelay, HttpLessonApi, LessonApi};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serves exactly one request with a canned response and hands back the raw
/// request text.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (ApiConfig, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.expect("read");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        line.to_ascii_lowercase()
                            .strip_prefix("content-length:")
                            .map(|value| value.trim().parse::<usize>().unwrap_or(0))
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        let _ = tx.send(String::from_utf8_lossy(&buf).to_string());
    });

    let config = ApiConfig::new(&format!("http://{addr}"), "dart-basics").expect("config");
    (config, rx)
}

#[tokio::test]
async fn execute_posts_code_and_decodes_result() {
    let (config, request) = serve_once(
        "200 OK",
        r#"{"success": true, "output": "Hello, Dart!", "error": ""}"#,
    )
    .await;
    let api = HttpLessonApi::new(config);

    let result = api
        .execute_code("void main() { print('Hello, Dart!'); }")
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.output.as_deref(), Some("Hello, Dart!"));

    let raw = request.await.unwrap();
    assert!(raw.starts_with("POST /api/execute_dart"), "{raw}");
    assert!(
        raw.contains(r#""code":"void main() { print('Hello, Dart!'); }""#),
        "{raw}"
    );
}

#[tokio::test]
async fn save_progress_sends_course_and_lesson() {
    let (config, request) =
        serve_once("200 OK", r#"{"success": true, "message": "saved"}"#).await;
    let api = HttpLessonApi::new(config.clone());

    let response = api
        .save_progress(&SaveProgressRequest {
            course_id: config.course_id().clone(),
            lesson_id: LessonId::new("3").unwrap(),
            completed: true,
        })
        .await
        .unwrap();
    assert!(response.success);
    assert!(response.new_achievements.is_empty());

    let raw = request.await.unwrap();
    assert!(raw.starts_with("POST /api/save_progress"), "{raw}");
    assert!(raw.contains(r#""course_id":"dart-basics""#), "{raw}");
    assert!(raw.contains(r#""lesson_id":"3""#), "{raw}");
}

#[tokio::test]
async fn server_error_with_json_body_is_an_application_answer() {
    let (config, _request) = serve_once(
        "500 Internal Server Error",
        r#"{"success": false, "error": "database locked"}"#,
    )
    .await;
    let api = HttpLessonApi::new(config);

    let response = api.get_progress().await.unwrap();
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("database locked"));
}

#[tokio::test]
async fn failed_catalog_requests_are_status_errors() {
    let (config, _request) =
        serve_once("500 Internal Server Error", r#"{"error": "db exploded"}"#).await;
    let api = HttpLessonApi::new(config);
    let err = api.achievements().await.unwrap_err();
    assert!(matches!(err, ApiError::Status(500)), "{err:?}");

    let (config, _request) = serve_once("404 Not Found", "[]").await;
    let api = HttpLessonApi::new(config);
    let err = api.list_lessons().await.unwrap_err();
    assert!(matches!(err, ApiError::Status(404)), "{err:?}");
}

#[tokio::test]
async fn malformed_body_renders_as_connection_failure() {
    let (config, _request) = serve_once("200 OK", "<html>oops</html>").await;
    let relay = ExecutionRelay::new(Arc::new(HttpLessonApi::new(config)));

    let outcome = relay.run("void main() {}").await;
    assert!(
        matches!(outcome, ExecutionOutcome::ConnectionFailed { .. }),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpLessonApi::new(ApiConfig::new(&format!("http://{addr}"), "c").unwrap());
    let err = api.get_progress().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "{err:?}");
    assert!(err.is_network());
}
