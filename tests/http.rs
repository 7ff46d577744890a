//! Default `reqwest` transport against a canned local HTTP server.
//!
//! The stub answers every connection with one fixed response, then closes.

use pdf2img_client::{ConvertOptions, ErrorKind, Pdf2ImgClient};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Spawn a server that replies `status` / `body` and forwards each raw
/// request it received.
async fn stub_server(
    status: &'static str,
    content_type: &'static str,
    body: &'static [u8],
) -> (String, mpsc::UnboundedReceiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                return;
            };
            let tx = tx.clone();
            tokio::spawn(async move {
                let request = read_request(&mut sock).await;
                let _ = tx.send(request);
                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = sock.write_all(head.as_bytes()).await;
                let _ = sock.write_all(body).await;
                let _ = sock.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), rx)
}

/// Read headers, then `Content-Length` bytes of body.
async fn read_request(sock: &mut tokio::net::TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = sock.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return buf;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                return buf;
            }
        }
    }
}

fn client(base: &str) -> Pdf2ImgClient {
    Pdf2ImgClient::builder(base)
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

#[tokio::test]
async fn health_true_against_live_stub() {
    let (base, mut rx) = stub_server("200 OK", "application/json", br#"{"status":"up"}"#).await;
    assert!(client(&format!("{base}/")).check_service_health().await);

    let raw = String::from_utf8(rx.recv().await.unwrap()).unwrap();
    assert!(raw.starts_with("GET /health HTTP/1.1\r\n"), "got: {raw}");
}

#[tokio::test]
async fn health_false_on_404() {
    let (base, _rx) = stub_server("404 Not Found", "text/plain", b"nope").await;
    assert!(!client(&base).check_service_health().await);
}

#[tokio::test]
async fn health_false_on_non_json_200() {
    let (base, _rx) = stub_server("200 OK", "text/html", b"<h1>Welcome</h1>").await;
    assert!(!client(&base).check_service_health().await);
}

#[tokio::test]
async fn health_false_when_unreachable() {
    // Bind then drop to get a port nothing listens on.
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap().port()
    };
    assert!(!client(&format!("http://127.0.0.1:{port}")).check_service_health().await);
}

#[tokio::test]
async fn convert_over_http() {
    let (base, mut rx) = stub_server("200 OK", "image/webp", b"RIFF\x24\x00\x00\x00WEBPVP8 ").await;
    let image = client(&base)
        .convert(&b"%PDF-1.4 tiny"[..], &ConvertOptions::default())
        .await
        .unwrap();
    assert_eq!(&image.into_bytes().await.unwrap()[..], b"RIFF\x24\x00\x00\x00WEBPVP8 ");

    let raw = rx.recv().await.unwrap();
    let text = String::from_utf8_lossy(&raw);
    assert!(text.starts_with("POST /convert HTTP/1.1\r\n"), "got: {text}");
    assert!(
        text.to_ascii_lowercase()
            .contains("content-type: multipart/form-data; boundary="),
        "got: {text}"
    );
    assert!(text.contains("filename=\"file.pdf\""));
    assert!(text.contains("%PDF-1.4 tiny"));
}

#[tokio::test]
async fn convert_error_status_over_http() {
    let (base, _rx) = stub_server("422 Unprocessable Entity", "text/plain", b"page out of range").await;
    let err = client(&base)
        .convert(&b"%PDF-1.4"[..], &ConvertOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Response);
    assert_eq!(err.status(), Some(422));
    assert!(err.to_string().contains("page out of range"));
}

#[tokio::test]
async fn convert_unreachable_is_a_request_error() {
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap().port()
    };
    let err = client(&format!("http://127.0.0.1:{port}"))
        .convert(&b"%PDF-1.4"[..], &ConvertOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Request);
}
