//! GroqClient against a loopback HTTP server.

use modernizer_llm::{GroqClient, ModelConfig, ModelError, ModernizationModel};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve exactly one request with the given status line and JSON body.
/// Resolves to the raw request text (headers and body).
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/openai/v1", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request_complete(&request) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\
             connection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&request).to_string()
    });

    (base_url, handle)
}

fn request_complete(request: &[u8]) -> bool {
    let text = String::from_utf8_lossy(request);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    request.len() >= header_end + 4 + content_length
}

fn client_for(base_url: &str) -> GroqClient {
    let config = ModelConfig::new("gsk_test_key")
        .unwrap()
        .with_base_url(base_url)
        .with_timeout_secs(10);
    GroqClient::new(config).unwrap()
}

#[tokio::test]
async fn test_modernize_returns_first_choice_verbatim() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"choices":[
            {"index":0,"message":{"role":"assistant",
                "content":"package demo;\n\npublic record Point(int x, int y) {}\n"}},
            {"index":1,"message":{"role":"assistant","content":"ignored"}}
        ]}"#,
    )
    .await;

    let client = client_for(&base_url);
    let text = client
        .modernize("Point.java", "package demo;\n\npublic class Point {}\n", "21")
        .await
        .expect("completion failed");

    assert_eq!(text, "package demo;\n\npublic record Point(int x, int y) {}\n");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /openai/v1/chat/completions"));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer gsk_test_key"));
    assert!(request.contains("\"model\":\"llama-3.3-70b-versatile\""));
    assert!(request.contains("Point.java"));
    assert!(request.contains("JDK 21 features: Point.java"));
    assert!(request.contains("You are a Java 21 refactoring engine."));
}

#[tokio::test]
async fn test_api_error_is_remote_call_failure() {
    let (base_url, server) = serve_once(
        "429 Too Many Requests",
        r#"{"error":{"message":"Rate limit reached for model","type":"tokens"}}"#,
    )
    .await;

    let err = client_for(&base_url)
        .modernize("A.java", "class A {}", "25")
        .await
        .unwrap_err();

    match err {
        ModelError::RemoteCallFailed { cause } => {
            assert!(cause.contains("429"));
            assert!(cause.contains("Rate limit reached"));
        }
        other => panic!("expected remote call failure, got {other}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_no_choices_is_empty_response() {
    let (base_url, server) = serve_once("200 OK", r#"{"choices":[]}"#).await;

    let err = client_for(&base_url)
        .modernize("A.java", "class A {}", "25")
        .await
        .unwrap_err();

    assert!(matches!(err, ModelError::EmptyResponse));
    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_endpoint_is_remote_call_failure() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(&format!("http://{addr}/v1"))
        .modernize("A.java", "class A {}", "25")
        .await
        .unwrap_err();

    assert!(matches!(err, ModelError::RemoteCallFailed { .. }));
}
