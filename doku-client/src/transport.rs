//! HTTP/1.1 exchange that writes header names exactly as given.
//!
//! `http::HeaderName` lowercases every name on the way to the wire, while the
//! disbursement API matches `agentKey`, `requestId` and `signature`
//! case-sensitively. Requests that carry those headers are framed here and sent
//! over a plain or native-tls stream, one connection per request.

use std::time::Duration;

use reqwest::Url;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

const MAX_RESPONSE_HEADERS: usize = 64;
const READ_CHUNK: usize = 8 * 1024;

/// Failures below the HTTP semantics layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends requests whose header names reach the wire byte-for-byte.
#[derive(Debug, Clone, Default)]
pub struct ExactCaseTransport {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl ExactCaseTransport {
    pub fn new(timeout: Option<Duration>, connect_timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            connect_timeout,
        }
    }

    /// Performs one request. `headers` are written in order, after `Host`.
    pub async fn send(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, String)],
        body: Option<&[u8]>,
    ) -> Result<RawResponse, TransportError> {
        let url = Url::parse(url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let request = encode_request(method, &url, headers, body)?;

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(&url, &request))
                .await
                .map_err(|_| TransportError::Timeout)?,
            None => self.exchange(&url, &request).await,
        }
    }

    async fn exchange(&self, url: &Url, request: &[u8]) -> Result<RawResponse, TransportError> {
        let host = connect_host(url)?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| TransportError::InvalidUrl(url.to_string()))?;
        let tcp = self.connect(host, port).await?;

        match url.scheme() {
            "http" => round_trip(tcp, request).await,
            "https" => {
                let connector =
                    tokio_native_tls::TlsConnector::from(native_tls::TlsConnector::new()?);
                let tls = connector.connect(host, tcp).await?;
                round_trip(tls, request).await
            }
            other => Err(TransportError::InvalidUrl(format!(
                "unsupported scheme: {}",
                other
            ))),
        }
    }

    async fn connect(&self, host: &str, port: u16) -> Result<TcpStream, TransportError> {
        let connect = TcpStream::connect((host, port));
        let stream = match self.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connect)
                .await
                .map_err(|_| TransportError::Timeout)??,
            None => connect.await?,
        };
        Ok(stream)
    }
}

fn connect_host(url: &Url) -> Result<&str, TransportError> {
    let host = url
        .host_str()
        .ok_or_else(|| TransportError::InvalidUrl(url.to_string()))?;
    Ok(host.trim_start_matches('[').trim_end_matches(']'))
}

/// Serializes the request line, headers and body.
pub(crate) fn encode_request(
    method: &str,
    url: &Url,
    headers: &[(&str, String)],
    body: Option<&[u8]>,
) -> Result<Vec<u8>, TransportError> {
    let host = url
        .host_str()
        .ok_or_else(|| TransportError::InvalidUrl(url.to_string()))?;

    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut head = format!("{} {} HTTP/1.1\r\n", method, target);
    match url.port() {
        Some(port) => head.push_str(&format!("Host: {}:{}\r\n", host, port)),
        None => head.push_str(&format!("Host: {}\r\n", host)),
    }

    for (name, value) in headers {
        if !is_token(name) {
            return Err(TransportError::InvalidHeader(name.to_string()));
        }
        if value.bytes().any(|b| b == b'\r' || b == b'\n' || b == 0) {
            return Err(TransportError::InvalidHeader(format!(
                "{}: value contains a line break",
                name
            )));
        }
        head.push_str(&format!("{}: {}\r\n", name, value));
    }

    if let Some(body) = body {
        head.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    head.push_str("Connection: close\r\n\r\n");

    let mut bytes = head.into_bytes();
    if let Some(body) = body {
        bytes.extend_from_slice(body);
    }
    Ok(bytes)
}

fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

async fn round_trip<S>(mut stream: S, request: &[u8]) -> Result<RawResponse, TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(request).await?;
    stream.flush().await?;
    read_response(&mut stream).await
}

async fn read_response<S>(stream: &mut S) -> Result<RawResponse, TransportError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        if let Some(response) = parse_response(&buf, false)? {
            return Ok(response);
        }

        let n = match stream.read(&mut chunk).await {
            Ok(n) => n,
            // Servers often drop TLS without close_notify on `Connection: close`.
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => 0,
            Err(e) => return Err(e.into()),
        };

        if n == 0 {
            return parse_response(&buf, true)?.ok_or_else(|| {
                TransportError::MalformedResponse(
                    "connection closed before the response was complete".to_string(),
                )
            });
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

enum Framing {
    Length(usize),
    Chunked,
    UntilClose,
}

/// Parses a buffered response; `Ok(None)` means more bytes are needed.
pub(crate) fn parse_response(
    buf: &[u8],
    eof: bool,
) -> Result<Option<RawResponse>, TransportError> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_RESPONSE_HEADERS];
    let mut response = httparse::Response::new(&mut headers);

    let head_len = match response
        .parse(buf)
        .map_err(|e| TransportError::MalformedResponse(e.to_string()))?
    {
        httparse::Status::Complete(len) => len,
        httparse::Status::Partial if eof && !buf.is_empty() => {
            return Err(TransportError::MalformedResponse(
                "truncated response head".to_string(),
            ));
        }
        httparse::Status::Partial => return Ok(None),
    };

    let status = response
        .code
        .ok_or_else(|| TransportError::MalformedResponse("missing status code".to_string()))?;

    let framing = if status == 204 || status == 304 {
        Framing::Length(0)
    } else {
        framing(response.headers)?
    };

    let rest = &buf[head_len..];
    let body = match framing {
        Framing::Length(len) if rest.len() >= len => rest[..len].to_vec(),
        Framing::Length(_) if eof => {
            return Err(TransportError::MalformedResponse(
                "body shorter than Content-Length".to_string(),
            ));
        }
        Framing::Length(_) => return Ok(None),
        Framing::Chunked => match decode_chunked(rest)? {
            Some(body) => body,
            None if eof => {
                return Err(TransportError::MalformedResponse(
                    "truncated chunked body".to_string(),
                ));
            }
            None => return Ok(None),
        },
        Framing::UntilClose if eof => rest.to_vec(),
        Framing::UntilClose => return Ok(None),
    };

    Ok(Some(RawResponse { status, body }))
}

fn framing(headers: &[httparse::Header<'_>]) -> Result<Framing, TransportError> {
    let mut framing = Framing::UntilClose;
    for header in headers {
        let value = String::from_utf8_lossy(header.value);
        if header.name.eq_ignore_ascii_case("transfer-encoding")
            && value.to_ascii_lowercase().contains("chunked")
        {
            return Ok(Framing::Chunked);
        }
        if header.name.eq_ignore_ascii_case("content-length") {
            let len = value.trim().parse::<usize>().map_err(|_| {
                TransportError::MalformedResponse(format!("bad Content-Length: {}", value))
            })?;
            framing = Framing::Length(len);
        }
    }
    Ok(framing)
}

/// Decodes a chunked body; `Ok(None)` while the terminating chunk is missing.
pub(crate) fn decode_chunked(data: &[u8]) -> Result<Option<Vec<u8>>, TransportError> {
    let mut body = Vec::new();
    let mut pos = 0;

    loop {
        let Some(line_len) = find_crlf(&data[pos..]) else {
            return Ok(None);
        };
        let line = String::from_utf8_lossy(&data[pos..pos + line_len]);
        let size_field = line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_field, 16).map_err(|_| {
            TransportError::MalformedResponse(format!("bad chunk size: {}", size_field))
        })?;
        pos += line_len + 2;

        if size == 0 {
            // Optional trailers, then an empty line.
            loop {
                let Some(len) = find_crlf(&data[pos..]) else {
                    return Ok(None);
                };
                pos += len + 2;
                if len == 0 {
                    return Ok(Some(body));
                }
            }
        }

        if data.len() < pos + size + 2 {
            return Ok(None);
        }
        body.extend_from_slice(&data[pos..pos + size]);
        if &data[pos + size..pos + size + 2] != b"\r\n" {
            return Err(TransportError::MalformedResponse(
                "chunk not terminated by CRLF".to_string(),
            ));
        }
        pos += size + 2;
    }
}

fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(2).position(|w| w == b"\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_encode_keeps_header_case_and_order() {
        let headers = vec![
            ("agentKey", "AGENT01".to_string()),
            ("requestId", "REQ-0001".to_string()),
            ("signature", "YOvXtArUP65XFWuouEkt2g==".to_string()),
        ];
        let target = url("https://kirimdoku.com/v2/api/ping");
        let bytes = encode_request("GET", &target, &headers, None).unwrap();
        let head = String::from_utf8(bytes).unwrap();

        assert_eq!(
            head,
            "GET /v2/api/ping HTTP/1.1\r\n\
             Host: kirimdoku.com\r\n\
             agentKey: AGENT01\r\n\
             requestId: REQ-0001\r\n\
             signature: YOvXtArUP65XFWuouEkt2g==\r\n\
             Connection: close\r\n\r\n"
        );
    }

    #[test]
    fn test_encode_body_and_explicit_port() {
        let bytes = encode_request(
            "POST",
            &url("http://127.0.0.1:8080/cashin/inquiry?x=1"),
            &[("Content-Type", "application/json".to_string())],
            Some(b"{}"),
        )
        .unwrap();
        let raw = String::from_utf8(bytes).unwrap();

        assert!(raw.starts_with("POST /cashin/inquiry?x=1 HTTP/1.1\r\n"));
        assert!(raw.contains("Host: 127.0.0.1:8080\r\n"));
        assert!(raw.contains("Content-Length: 2\r\n"));
        assert!(raw.ends_with("\r\n\r\n{}"));
    }

    #[test]
    fn test_encode_rejects_header_injection() {
        let result = encode_request(
            "GET",
            &url("http://localhost/ping"),
            &[("requestId", "REQ\r\nX-Evil: 1".to_string())],
            None,
        );
        assert!(matches!(result, Err(TransportError::InvalidHeader(_))));

        let result = encode_request(
            "GET",
            &url("http://localhost/ping"),
            &[("bad name", "v".to_string())],
            None,
        );
        assert!(matches!(result, Err(TransportError::InvalidHeader(_))));
    }

    #[test]
    fn test_parse_content_length_response() {
        let raw = b"HTTP/1.1 400 Bad Request\r\nContent-Length: 5\r\n\r\nhello";

        assert!(parse_response(&raw[..20], false).unwrap().is_none());
        assert!(parse_response(&raw[..raw.len() - 1], false).unwrap().is_none());

        let resp = parse_response(raw, false).unwrap().unwrap();
        assert_eq!(resp.status, 400);
        assert_eq!(resp.text(), "hello");
    }

    #[test]
    fn test_parse_chunked_response() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n\
                    4\r\n{\"a\"\r\n3;ext=1\r\n:1}\r\n0\r\n\r\n";
        let resp = parse_response(raw, false).unwrap().unwrap();
        assert_eq!(resp.text(), "{\"a\":1}");
    }

    #[test]
    fn test_parse_until_close_response() {
        let raw = b"HTTP/1.1 200 OK\r\n\r\npong";
        assert!(parse_response(raw, false).unwrap().is_none());
        assert_eq!(parse_response(raw, true).unwrap().unwrap().text(), "pong");
    }

    #[test]
    fn test_truncated_body_at_eof_is_error() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabc";
        assert!(matches!(
            parse_response(raw, true),
            Err(TransportError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_decode_chunked_incomplete() {
        assert_eq!(decode_chunked(b"5\r\nhel").unwrap(), None);
        assert!(decode_chunked(b"zz\r\n").is_err());
    }

    #[tokio::test]
    async fn test_round_trip_over_duplex_stream() {
        let (client, mut server) = tokio::io::duplex(4096);

        let server_task = tokio::spawn(async move {
            let mut buf = vec![0u8; 1024];
            let n = server.read(&mut buf).await.unwrap();
            server
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok")
                .await
                .unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });

        let request = encode_request(
            "GET",
            &url("http://localhost/ping"),
            &[("agentKey", "AGENT01".to_string())],
            None,
        )
        .unwrap();
        let resp = round_trip(client, &request).await.unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.text(), "ok");
        assert!(server_task.await.unwrap().contains("agentKey: AGENT01\r\n"));
    }
}
