//! Request codec: typed channel messages ⇄ wire bytes.
//!
//! [`encode`] checks the outgoing request before serialising it; [`decode`]
//! parses a response and applies the schema-version policy:
//!
//! | Echoed version | Result |
//! |----------------|--------|
//! | same major, minor and patch | accepted |
//! | same major, other minor or patch | accepted, logged at `warn` |
//! | other major, or unparseable | [`DecodeError::SchemaMismatch`] |

use mgs_gateway_api::{
    CreateControlChannelInput, CreateControlChannelOutput, CreateDataChannelInput,
    CreateDataChannelOutput, DeleteChannelInput, DeleteChannelOutput, SchemaVersion,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Errors returned by [`encode`]. All of them mean the caller built a bad
/// request; none are worth retrying.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("request id must not be empty")]
    EmptyRequestId,

    #[error("request id must be a UUID, got: {0:?}")]
    InvalidRequestId(String),

    #[error("client id must be a UUID, got: {0:?}")]
    InvalidClientId(String),

    #[error("request schema version {found:?} does not match the client's version {expected:?}")]
    SchemaVersion { expected: String, found: String },

    #[error("serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors returned by [`decode`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed response body: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("response schema version {received:?} is not compatible with {supported}")]
    SchemaMismatch {
        supported: SchemaVersion,
        received: String,
    },
}

// ---------------------------------------------------------------------------
// Message traits
// ---------------------------------------------------------------------------

/// A request body the gateway client knows how to send.
pub trait ChannelRequest: Serialize {
    type Output: ChannelResponse;

    /// HTTP method for this request.
    const METHOD: &'static str;

    fn message_schema_version(&self) -> &str;

    fn request_id(&self) -> &str;

    /// Only data-channel creation carries a client id.
    fn client_id(&self) -> Option<&str> {
        None
    }
}

/// A response body returned by the gateway.
pub trait ChannelResponse: DeserializeOwned {
    fn message_schema_version(&self) -> &str;
}

impl ChannelRequest for CreateControlChannelInput {
    type Output = CreateControlChannelOutput;
    const METHOD: &'static str = "POST";

    fn message_schema_version(&self) -> &str {
        &self.message_schema_version
    }

    fn request_id(&self) -> &str {
        &self.request_id
    }
}

impl ChannelRequest for CreateDataChannelInput {
    type Output = CreateDataChannelOutput;
    const METHOD: &'static str = "POST";

    fn message_schema_version(&self) -> &str {
        &self.message_schema_version
    }

    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn client_id(&self) -> Option<&str> {
        Some(&self.client_id)
    }
}

impl ChannelRequest for DeleteChannelInput {
    type Output = DeleteChannelOutput;
    const METHOD: &'static str = "DELETE";

    fn message_schema_version(&self) -> &str {
        &self.message_schema_version
    }

    fn request_id(&self) -> &str {
        &self.request_id
    }
}

impl ChannelResponse for CreateControlChannelOutput {
    fn message_schema_version(&self) -> &str {
        &self.message_schema_version
    }
}

impl ChannelResponse for CreateDataChannelOutput {
    fn message_schema_version(&self) -> &str {
        &self.message_schema_version
    }
}

impl ChannelResponse for DeleteChannelOutput {
    fn message_schema_version(&self) -> &str {
        &self.message_schema_version
    }
}

// ---------------------------------------------------------------------------
// encode / decode
// ---------------------------------------------------------------------------

/// Validate and serialise a request.
///
/// # Errors
///
/// - [`EncodeError::EmptyRequestId`] / [`EncodeError::InvalidRequestId`] —
///   the request id is missing or not a UUID.
/// - [`EncodeError::InvalidClientId`] — the data-channel client id is not a UUID.
/// - [`EncodeError::SchemaVersion`] — the request names a version other
///   than `supported`.
/// - [`EncodeError::Serialize`] — serde could not serialise the body.
pub fn encode<R: ChannelRequest>(
    request: &R,
    supported: &SchemaVersion,
) -> Result<Vec<u8>, EncodeError> {
    let request_id = request.request_id();
    if request_id.is_empty() {
        return Err(EncodeError::EmptyRequestId);
    }
    if Uuid::parse_str(request_id).is_err() {
        return Err(EncodeError::InvalidRequestId(request_id.to_string()));
    }

    if let Some(client_id) = request.client_id() {
        if Uuid::parse_str(client_id).is_err() {
            return Err(EncodeError::InvalidClientId(client_id.to_string()));
        }
    }

    let expected = supported.to_string();
    if request.message_schema_version() != expected {
        return Err(EncodeError::SchemaVersion {
            expected,
            found: request.message_schema_version().to_string(),
        });
    }

    serde_json::to_vec(request).map_err(EncodeError::Serialize)
}

/// Parse a response body and check its echoed schema version.
pub fn decode<T: ChannelResponse>(bytes: &[u8], supported: &SchemaVersion) -> Result<T, DecodeError> {
    let output: T = serde_json::from_slice(bytes).map_err(DecodeError::Malformed)?;

    let echoed = output.message_schema_version();
    let mismatch = || DecodeError::SchemaMismatch {
        supported: *supported,
        received: echoed.to_string(),
    };
    let received: SchemaVersion = echoed.parse().map_err(|_| mismatch())?;
    if !supported.is_compatible_with(&received) {
        return Err(mismatch());
    }
    if received != *supported {
        warn!("codec: gateway answered with schema version {received}, client speaks {supported}");
    }

    Ok(output)
}
