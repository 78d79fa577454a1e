//! AWS Signature Version 4 request signing.
//!
//! The gateway authenticates every channel request with a region-scoped
//! SigV4 signature. [`V4Signer::sign`] computes it and returns the headers
//! the transport must attach:
//!
//! ```text
//! x-amz-date: 20150830T123600Z
//! x-amz-security-token: …            (only with temporary credentials)
//! authorization: AWS4-HMAC-SHA256 Credential={akid}/{date}/{region}/{service}/aws4_request,
//!                SignedHeaders=host;x-amz-date, Signature={hex}
//! ```

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::{Digest, Sha256};
use thiserror::Error;
use urlencoding::encode;

use crate::endpoint::GATEWAY_SERVICE;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNING_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Errors returned by [`V4Signer::sign`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("access key id and secret access key must not be empty")]
    MissingCredentials,

    #[error("region must not be empty")]
    EmptyRegion,

    #[error("cannot sign request for URL {0:?}")]
    InvalidUrl(String),
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// A static credential set.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Present for temporary (STS) credentials; sent as `x-amz-security-token`.
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

/// Never prints the secret or the session token.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// V4Signer
// ---------------------------------------------------------------------------

/// Signs requests with one credential set for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V4Signer {
    credentials: Credentials,
    service: String,
}

impl V4Signer {
    /// A signer for the gateway service (`ssmmessages`).
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            service: GATEWAY_SERVICE.to_string(),
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Sign a request and return the headers to add to it.
    ///
    /// `headers` are extra request headers to cover with the signature
    /// (e.g. `content-type`); `host` and `x-amz-date` are always signed.
    /// The returned list does not include `host`; HTTP clients set it from
    /// the URL.
    ///
    /// # Errors
    ///
    /// - [`SigningError::MissingCredentials`] — empty key id or secret.
    /// - [`SigningError::EmptyRegion`] — `region` is empty.
    /// - [`SigningError::InvalidUrl`] — `url` does not parse or has no host.
    pub fn sign(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, &str)],
        payload: &[u8],
        region: &str,
        time: DateTime<Utc>,
    ) -> Result<Vec<(String, String)>, SigningError> {
        if self.credentials.access_key_id.is_empty()
            || self.credentials.secret_access_key.is_empty()
        {
            return Err(SigningError::MissingCredentials);
        }
        if region.is_empty() {
            return Err(SigningError::EmptyRegion);
        }

        let parsed = Url::parse(url).map_err(|_| SigningError::InvalidUrl(url.to_string()))?;
        let host = match (parsed.host_str(), parsed.port()) {
            (Some(h), Some(port)) => format!("{h}:{port}"),
            (Some(h), None) => h.to_string(),
            (None, _) => return Err(SigningError::InvalidUrl(url.to_string())),
        };

        let amz_date = time.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = time.format("%Y%m%d").to_string();

        let mut signed: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in headers {
            add_header(&mut signed, name, value);
        }
        add_header(&mut signed, "host", &host);
        add_header(&mut signed, "x-amz-date", &amz_date);
        if let Some(token) = &self.credentials.session_token {
            add_header(&mut signed, "x-amz-security-token", token);
        }

        let (canonical, signed_headers) = canonical_request(method, &parsed, &signed, payload);
        let scope = format!("{date_stamp}/{region}/{}/aws4_request", self.service);
        let string_to_sign = format!(
            "{SIGNING_ALGORITHM}\n{amz_date}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical.as_bytes()))
        );

        let key = derive_signing_key(
            &self.credentials.secret_access_key,
            &date_stamp,
            region,
            &self.service,
        );
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

        let authorization = format!(
            "{SIGNING_ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.credentials.access_key_id
        );

        let mut out = vec![("x-amz-date".to_string(), amz_date)];
        if let Some(token) = &self.credentials.session_token {
            out.push(("x-amz-security-token".to_string(), token.clone()));
        }
        out.push(("authorization".to_string(), authorization));
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Lower-case the name, trim the value and collapse inner whitespace runs.
/// Repeated names are joined with `,`.
fn add_header(headers: &mut BTreeMap<String, String>, name: &str, value: &str) {
    let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
    headers
        .entry(name.trim().to_ascii_lowercase())
        .and_modify(|existing| {
            existing.push(',');
            existing.push_str(&value);
        })
        .or_insert(value);
}

/// Returns `(canonical request, signed header list)`.
fn canonical_request(
    method: &str,
    url: &Url,
    headers: &BTreeMap<String, String>,
    payload: &[u8],
) -> (String, String) {
    // `Url::path` is already percent-encoded once; non-S3 services expect
    // each segment encoded a second time.
    let path = url.path();
    let canonical_uri = if path.is_empty() {
        "/".to_string()
    } else {
        path.split('/')
            .map(|segment| encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    };

    let mut query: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (encode(&k).into_owned(), encode(&v).into_owned()))
        .collect();
    query.sort();
    let canonical_query = query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();
    let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");

    let canonical = format!(
        "{}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{}",
        method.to_ascii_uppercase(),
        hex::encode(Sha256::digest(payload))
    );
    (canonical, signed_headers)
}

fn derive_signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
