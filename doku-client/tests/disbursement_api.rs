//! Disbursement client against a mock KirimDoku server.

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doku_client::{ClientError, DisbursementClient};
use doku_types::disbursement::{Account, Bank, Person};

const AGENT_KEY: &str = "AGENT01";
const ENC_KEY: &str = "1234567890123456";

async fn setup() -> (MockServer, DisbursementClient) {
    let server = MockServer::start().await;
    let client = DisbursementClient::new(AGENT_KEY, ENC_KEY, false).with_base_url(server.uri());
    (server, client)
}

fn account() -> Account {
    Account {
        bank: Bank {
            id: "CENAIDJA".into(),
            name: "BANK BCA".into(),
            code: "014".into(),
            country_code: "ID".into(),
        },
        number: "1234567890".into(),
        name: "Budi".into(),
        ..Default::default()
    }
}

fn invalid_signature() -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({"status": 400, "message": "invalid signature"}))
}

#[tokio::test]
async fn test_ping_sends_signed_headers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("agentKey", AGENT_KEY))
        .and(header("requestId", "REQ-0001"))
        .and(header("signature", "YOvXtArUP65XFWuouEkt2g=="))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": 0, "message": "pong"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.ping("REQ-0001").await.unwrap();
    assert_eq!(resp.status, 0);
    assert_eq!(resp.message, "pong");
}

/// Accepts one connection, answers `pong` and returns the raw request head.
async fn capture_request_head(listener: TcpListener) -> String {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "connection closed before the request head ended");
        raw.extend_from_slice(&buf[..n]);
    }

    let body = r#"{"status":0,"message":"pong"}"#;
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await.unwrap();

    String::from_utf8(raw).unwrap()
}

#[tokio::test]
async fn test_signing_headers_keep_exact_case_on_the_wire() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(capture_request_head(listener));

    let client = DisbursementClient::new(AGENT_KEY, ENC_KEY, false)
        .with_base_url(format!("http://{}", addr));
    let resp = client.ping("REQ-0001").await.unwrap();
    assert_eq!(resp.message, "pong");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("GET /ping HTTP/1.1\r\n"));
    assert!(raw.contains("\r\nagentKey: AGENT01\r\n"));
    assert!(raw.contains("\r\nrequestId: REQ-0001\r\n"));
    assert!(raw.contains("\r\nsignature: YOvXtArUP65XFWuouEkt2g==\r\n"));
    assert!(!raw.contains("agentkey:"));
    assert!(!raw.contains("requestid:"));
}

#[tokio::test]
async fn test_ping_error_surfaces_vendor_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(invalid_signature())
        .mount(&server)
        .await;

    let err = client.ping("REQ-0001").await.unwrap_err();
    assert_eq!(err.to_string(), "invalid signature");
    assert!(matches!(err, ClientError::Api { status: 400, .. }));
}

#[tokio::test]
async fn test_inquiry_posts_domestic_preset() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/cashin/inquiry"))
        .and(header("agentKey", AGENT_KEY))
        .and(body_partial_json(json!({
            "senderCountry": {"code": "ID"},
            "senderCurrency": {"code": "IDR"},
            "beneficiaryCountry": {"code": "ID"},
            "beneficiaryCurrency": {"code": "IDR"},
            "channel": {"code": "07"},
            "senderAmount": 150000,
            "beneficiaryAccount": {"number": "1234567890", "bank": {"code": "014"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "message": "Inquiry succeed",
            "inquiry": {"idToken": "tok-abc", "fund": {"fees": {"total": 6500}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .inquiry("REQ-0002", 150000.0, &account())
        .await
        .unwrap();

    assert_eq!(resp.token(), Some("tok-abc"));
    assert_eq!(resp.inquiry.unwrap().fee_total(), 6500.0);
}

#[tokio::test]
async fn test_inquiry_error_surfaces_vendor_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/cashin/inquiry"))
        .respond_with(invalid_signature())
        .mount(&server)
        .await;

    let err = client
        .inquiry("REQ-0002", 150000.0, &account())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid signature");
}

#[tokio::test]
async fn test_remit_threads_inquiry_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/cashin/remit"))
        .and(header("requestId", "REQ-0003"))
        .and(body_partial_json(json!({
            "inquiry": {"idToken": "tok-abc"},
            "senderNote": "invoice 42",
            "sender": {"firstName": "Siti"},
            "beneficiary": {"firstName": "Budi"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "message": "Remit succeed",
            "remit": {"transactionId": "KD-777"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sender = Person {
        first_name: "Siti".into(),
        ..Default::default()
    };
    let beneficiary = Person {
        first_name: "Budi".into(),
        ..Default::default()
    };

    let resp = client
        .remit(
            "REQ-0003",
            "tok-abc",
            150000.0,
            &account(),
            &sender,
            &beneficiary,
            "invoice 42",
        )
        .await
        .unwrap();

    assert_eq!(resp.transaction_id(), Some("KD-777"));
}

#[tokio::test]
async fn test_remit_error_surfaces_vendor_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/cashin/remit"))
        .respond_with(invalid_signature())
        .mount(&server)
        .await;

    let err = client
        .remit(
            "REQ-0003",
            "tok-abc",
            150000.0,
            &account(),
            &Person::default(),
            &Person::default(),
            "",
        )
        .await
        .unwrap_err();
    assert_eq!(err.vendor_message(), Some("invalid signature"));
}

#[tokio::test]
async fn test_malformed_error_body_is_json_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.ping("REQ-0001").await.unwrap_err();
    assert!(matches!(err, ClientError::Json(_)));
}

#[tokio::test]
async fn test_malformed_success_body_is_json_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    assert!(matches!(
        client.ping("REQ-0001").await,
        Err(ClientError::Json(_))
    ));
}

#[tokio::test]
async fn test_transport_error() {
    let client = DisbursementClient::new(AGENT_KEY, ENC_KEY, false)
        .with_base_url("http://127.0.0.1:9");

    assert!(matches!(
        client.ping("REQ-0001").await,
        Err(ClientError::Transport(_))
    ));
}
