//! Signed transport: the single point of I/O in the client.
//!
//! [`Transport`] is the seam. [`HttpTransport`] signs with the caller's
//! [`V4Signer`] and sends over a blocking `reqwest` client; tests substitute
//! any closure with the same signature.
//!
//! No retries happen here. A failed exchange is reported once and the
//! caller decides what to do next.

use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::Method;
use thiserror::Error;
use tracing::debug;

use crate::signing::{SigningError, V4Signer};

pub const CONTENT_TYPE_JSON: &str = "application/json";

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Errors that can occur while exchanging one request with the gateway.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request or response failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-2xx HTTP status code.
    #[error("gateway returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be signed.
    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),

    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Sends one signed request and returns the raw response body.
pub trait Transport: Send + Sync {
    fn invoke(
        &self,
        payload: &[u8],
        method: &str,
        url: &str,
        region: &str,
        signer: &V4Signer,
    ) -> Result<Vec<u8>, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&[u8], &str, &str, &str, &V4Signer) -> Result<Vec<u8>, TransportError> + Send + Sync,
{
    fn invoke(
        &self,
        payload: &[u8],
        method: &str,
        url: &str,
        region: &str,
        signer: &V4Signer,
    ) -> Result<Vec<u8>, TransportError> {
        self(payload, method, url, region, signer)
    }
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// [`Transport`] over HTTPS with SigV4 headers.
///
/// Holds a cloneable [`reqwest::blocking::Client`], which pools connections
/// internally. Timeouts are whatever the client was built with.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Wrap a pre-configured client (e.g. with a proxy or custom TLS roots).
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client that gives up on any single exchange after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl Transport for HttpTransport {
    fn invoke(
        &self,
        payload: &[u8],
        method: &str,
        url: &str,
        region: &str,
        signer: &V4Signer,
    ) -> Result<Vec<u8>, TransportError> {
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| TransportError::InvalidMethod(method.to_string()))?;

        let signed = signer.sign(
            method.as_str(),
            url,
            &[("content-type", CONTENT_TYPE_JSON)],
            payload,
            region,
            Utc::now(),
        )?;

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(payload.to_vec());
        for (name, value) in signed {
            request = request.header(name, value);
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.bytes()?;
        debug!("transport: {method} {url} -> {status} ({} bytes)", body.len());

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::mpsc;

    use axum::{
        body::Bytes,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use crate::signing::Credentials;

    fn signer() -> V4Signer {
        V4Signer::new(Credentials::new("AKID", "SECRET").with_session_token("SESSION"))
    }

    /// Echoes back the headers and body it received.
    async fn echo(headers: HeaderMap, body: Bytes) -> Json<Value> {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        Json(json!({
            "authorization": get("authorization"),
            "x-amz-date": get("x-amz-date"),
            "x-amz-security-token": get("x-amz-security-token"),
            "content-type": get("content-type"),
            "body": String::from_utf8_lossy(&body),
        }))
    }

    async fn forbidden() -> (StatusCode, &'static str) {
        (StatusCode::FORBIDDEN, "signature expired")
    }

    /// Serve `router` on a loopback port from a dedicated runtime thread and
    /// return its base URL. The blocking client must not run inside a tokio
    /// runtime, so the tests themselves stay synchronous.
    fn spawn_mock_gateway(router: Router) -> String {
        let (tx, rx) = mpsc::channel::<SocketAddr>();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, router).await.unwrap();
            });
        });
        let addr = rx.recv().unwrap();
        format!("http://{addr}")
    }

    #[test]
    fn signed_request_reaches_gateway() {
        let app = Router::new().route("/v1/control-channel/{id}", post(echo));
        let base = spawn_mock_gateway(app);

        let bytes = HttpTransport::default()
            .invoke(
                br#"{"RequestId":"r"}"#,
                "POST",
                &format!("{base}/v1/control-channel/i-12345678"),
                "us-east-1",
                &signer(),
            )
            .unwrap();

        let seen: Value = serde_json::from_slice(&bytes).unwrap();
        let auth = seen["authorization"].as_str().unwrap();
        assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKID/"));
        assert!(auth.contains("/us-east-1/ssmmessages/aws4_request"));
        assert!(auth.contains("SignedHeaders=content-type;host;x-amz-date;x-amz-security-token"));
        assert_eq!(seen["x-amz-date"].as_str().unwrap().len(), 16);
        assert_eq!(seen["x-amz-security-token"], "SESSION");
        assert_eq!(seen["content-type"], CONTENT_TYPE_JSON);
        assert_eq!(seen["body"], r#"{"RequestId":"r"}"#);
    }

    #[test]
    fn delete_uses_delete_method() {
        let app = Router::new().route(
            "/v1/data-channel/{id}",
            axum::routing::delete(echo),
        );
        let base = spawn_mock_gateway(app);

        let result = HttpTransport::default().invoke(
            b"{}",
            "DELETE",
            &format!("{base}/v1/data-channel/s-12345678"),
            "us-east-1",
            &signer(),
        );
        assert!(result.is_ok(), "DELETE route should match: {result:?}");
    }

    #[test]
    fn non_success_status_is_an_error() {
        let app = Router::new().route("/v1/data-channel/{id}", post(forbidden));
        let base = spawn_mock_gateway(app);

        let err = HttpTransport::default()
            .invoke(
                b"{}",
                "POST",
                &format!("{base}/v1/data-channel/s-1"),
                "us-east-1",
                &signer(),
            )
            .unwrap_err();
        match err {
            TransportError::Status { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "signature expired");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn connection_failure_is_http_error() {
        let err = HttpTransport::with_timeout(Duration::from_secs(2))
            .unwrap()
            .invoke(
                b"{}",
                "POST",
                "http://127.0.0.1:1/v1/data-channel/s-1",
                "us-east-1",
                &signer(),
            )
            .unwrap_err();
        assert!(matches!(err, TransportError::Http(_)), "got {err:?}");
    }

    #[test]
    fn signing_failure_is_reported() {
        let err = HttpTransport::default()
            .invoke(
                b"{}",
                "POST",
                "http://127.0.0.1:1/v1/data-channel/s-1",
                "",
                &signer(),
            )
            .unwrap_err();
        assert!(matches!(err, TransportError::Signing(SigningError::EmptyRegion)));
    }

    #[test]
    fn invalid_method_is_rejected() {
        let err = HttpTransport::default()
            .invoke(b"", "NOT A METHOD", "http://127.0.0.1:1/", "us-east-1", &signer())
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidMethod(m) if m == "NOT A METHOD"));
    }
}
