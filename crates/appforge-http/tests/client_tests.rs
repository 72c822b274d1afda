//! Chat client against a canned local server

use appforge_core::{CollaboratorError, Intent, PromptAnalyzer, RawTextGenerator};
use appforge_http::{HttpPromptAnalyzer, HttpTextGenerator, LlmEndpoint};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serve one request with a fixed status and body; hands back the raw request
async fn serve_once(status: &'static str, body: String) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        let _ = tx.send(String::from_utf8_lossy(&raw).into_owned());
    });

    (format!("http://{addr}/v1"), rx)
}

fn completion(content: &str) -> String {
    serde_json::json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
}

#[tokio::test]
async fn generator_returns_reply_and_sends_auth() {
    let (url, request) = serve_once("200 OK", completion("// src/App.tsx\nexport default 1;")).await;
    let generator = HttpTextGenerator::new(LlmEndpoint::new(url).with_api_key("sk-test").with_model("tiny"));

    let text = generator.generate("build a counter").await.unwrap();
    assert_eq!(text, "// src/App.tsx\nexport default 1;");

    let request = request.await.unwrap();
    assert!(request.starts_with("POST /v1/chat/completions"));
    assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
    assert!(request.contains("\"model\":\"tiny\""));
    assert!(request.contains("build a counter"));
}

#[tokio::test]
async fn error_status_is_failure() {
    let (url, _request) = serve_once("500 Internal Server Error", "{\"error\":\"boom\"}".to_string()).await;
    let generator = HttpTextGenerator::new(LlmEndpoint::new(url));

    match generator.generate("anything").await {
        Err(CollaboratorError::Failed(message)) => {
            assert!(message.starts_with("HTTP 500"), "{message}");
            assert!(message.contains("boom"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let (url, _request) = serve_once("200 OK", "not json".to_string()).await;
    let generator = HttpTextGenerator::new(LlmEndpoint::new(url));

    assert!(matches!(
        generator.generate("anything").await,
        Err(CollaboratorError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn refused_connection_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let generator =
        HttpTextGenerator::new(LlmEndpoint::new(format!("http://{addr}/v1")).with_timeout(Duration::from_secs(5)));
    assert!(matches!(
        generator.generate("anything").await,
        Err(CollaboratorError::Unavailable(_))
    ));
}

#[tokio::test]
async fn analyzer_reads_json_reply() {
    let reply = "```json\n{\"intentType\":\"CREATE_FULLSTACK_APP\",\"confidence\":0.9,\"domain\":\"todo\"}\n```";
    let (url, _request) = serve_once("200 OK", completion(reply)).await;
    let analyzer = HttpPromptAnalyzer::new(LlmEndpoint::new(url));

    let analysis = analyzer.analyze("a todo app with an express backend").await.unwrap();
    assert_eq!(analysis.intent, Intent::CreateFullstackApp);
    assert_eq!(analysis.domain, "todo");
}
