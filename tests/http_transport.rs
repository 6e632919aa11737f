use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use slamp_rs::{ClientConfig, Error, WebClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request as it arrived on the wire.
#[derive(Debug, Clone, Default)]
struct RawRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl RawRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn form(&self) -> Vec<(String, String)> {
        self.body
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect()
    }
}

/// Minimal HTTP/1.1 server answering each connection with the next canned response.
struct DummyServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RawRequest>>>,
}

impl DummyServer {
    async fn start(responses: Vec<(u16, &'static str, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            for (status, reason, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let request = read_request(&mut stream).await;
                recorded.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\n\
                     content-type: application/json; charset=utf-8\r\n\
                     content-length: {}\r\n\
                     connection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
        });

        Self { addr, requests }
    }

    fn client(&self) -> WebClient {
        let config = ClientConfig::new("xoxb-test")
            .with_base_url(format!("http://{}/api/", self.addr))
            .with_timeout_secs(5);
        WebClient::from_config(config).unwrap()
    }

    fn requests(&self) -> Vec<RawRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> RawRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before the headers ended");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_owned();
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .collect::<Vec<_>>();

    let content_length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .map(|(_, value)| value.parse::<usize>().unwrap())
        .unwrap_or(0);

    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before the body ended");
        body.extend_from_slice(&chunk[..n]);
    }

    RawRequest { request_line, headers, body: String::from_utf8(body).unwrap() }
}

const USER_BODY: &str = r#"{"ok":true,"user":{"id":"U1","name":"alice","deleted":false}}"#;

#[tokio::test]
async fn test_posts_form_with_token() {
    let server = DummyServer::start(vec![(200, "OK", USER_BODY)]).await;

    let user = server.client().get_user("U1").await.unwrap();
    assert_eq!(user.id(), "U1");
    assert_eq!(user.name().unwrap(), "alice");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.request_line, "POST /api/users.info HTTP/1.1");
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded; charset=utf-8")
    );

    let form = request.form();
    assert!(form.contains(&("user".to_owned(), "U1".to_owned())));
    assert!(form.contains(&("token".to_owned(), "xoxb-test".to_owned())));
}

#[tokio::test]
async fn test_content_type_sent_once() {
    let server = DummyServer::start(vec![(200, "OK", r#"{"ok":true}"#)]).await;

    server.client().call("api.test", &[]).await.unwrap();

    let request = &server.requests()[0];
    let content_types = request
        .headers
        .iter()
        .filter(|(key, _)| key.eq_ignore_ascii_case("content-type"))
        .count();
    assert_eq!(content_types, 1);
    assert_eq!(request.body, "token=xoxb-test");
}

#[tokio::test]
async fn test_rate_limited_status_keeps_slack_code() {
    let server = DummyServer::start(vec![(
        429,
        "Too Many Requests",
        r#"{"ok":false,"error":"ratelimited"}"#,
    )])
    .await;

    let err = server.client().get_user("U1").await.unwrap_err();
    assert!(matches!(err, Error::Api(_)), "unexpected error: {err:?}");
    assert_eq!(err.slack_code(), Some("ratelimited"));
}

#[tokio::test]
async fn test_rate_limited_member_lookup_fails_members() {
    let server = DummyServer::start(vec![
        (200, "OK", r#"{"ok":true,"channel":{"id":"C1","name":"general","members":["U1"]}}"#),
        (429, "Too Many Requests", r#"{"ok":false,"error":"ratelimited"}"#),
    ])
    .await;

    let channel = server.client().get_channel("C1").await.unwrap();
    let err = channel.members().await.unwrap_err();
    assert_eq!(err.slack_code(), Some("ratelimited"));
}

#[tokio::test]
async fn test_error_status_without_envelope() {
    let server = DummyServer::start(vec![(502, "Bad Gateway", "upstream unavailable")]).await;

    let err = server.client().call("api.test", &[]).await.unwrap_err();
    match err {
        Error::InvalidPayload(message) => {
            assert!(message.starts_with("HTTP 502"), "unexpected message: {message}");
            assert!(message.contains("upstream unavailable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_success_status_with_invalid_body() {
    let server = DummyServer::start(vec![(200, "OK", "not json")]).await;

    let err = server.client().call("api.test", &[]).await.unwrap_err();
    assert_eq!(err.slack_code(), None);
    assert!(matches!(err, Error::Json(_) | Error::InvalidPayload(_)), "unexpected: {err:?}");
}

#[tokio::test]
async fn test_timeout_surfaces_as_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accepts the connection and never answers.
    let silent = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        drop(stream);
    });

    let config = ClientConfig::new("xoxb-test")
        .with_base_url(format!("http://{addr}/api"))
        .with_timeout_secs(1);
    let client = WebClient::from_config(config).unwrap();

    let err = client.call("api.test", &[]).await.unwrap_err();
    match err {
        Error::Http(e) => assert!(e.is_timeout(), "unexpected error: {e:?}"),
        other => panic!("unexpected error: {other:?}"),
    }
    silent.abort();
}
