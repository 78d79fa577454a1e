//! Channel request and response bodies.
//!
//! Field names on the wire are PascalCase (`MessageSchemaVersion`,
//! `RequestId`, …). Every response field is required: a body without its
//! token or channel id is rejected at parse time rather than surfacing as an
//! empty value.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Control channel
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/control-channel/{instance_id}`.
///
/// ```json
/// { "MessageSchemaVersion": "1.0", "RequestId": "9e0b8bfa-3c8d-4b0e-9a43-5f0f0c6f3d11" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CreateControlChannelInput {
    pub message_schema_version: String,
    /// UUID, fresh for every call.
    pub request_id: String,
}

impl CreateControlChannelInput {
    pub fn new(message_schema_version: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            message_schema_version: message_schema_version.into(),
            request_id: request_id.into(),
        }
    }
}

/// Response body for `POST /v1/control-channel/{instance_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CreateControlChannelOutput {
    pub message_schema_version: String,
    /// Bearer token the session layer presents when it opens the channel.
    pub token_value: String,
}

// ---------------------------------------------------------------------------
// Data channel
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/data-channel/{session_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDataChannelInput {
    pub message_schema_version: String,
    pub request_id: String,
    /// UUID identifying the client end of the data channel.
    pub client_id: String,
}

impl CreateDataChannelInput {
    pub fn new(
        message_schema_version: impl Into<String>,
        request_id: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            message_schema_version: message_schema_version.into(),
            request_id: request_id.into(),
            client_id: client_id.into(),
        }
    }
}

/// Response body for `POST /v1/data-channel/{session_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDataChannelOutput {
    pub message_schema_version: String,
    pub token_value: String,
}

// ---------------------------------------------------------------------------
// Delete (either kind)
// ---------------------------------------------------------------------------

/// Request body for `DELETE /v1/{control-channel|data-channel}/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteChannelInput {
    pub message_schema_version: String,
    pub request_id: String,
}

impl DeleteChannelInput {
    pub fn new(message_schema_version: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            message_schema_version: message_schema_version.into(),
            request_id: request_id.into(),
        }
    }
}

/// Response body for a channel delete.
///
/// `ChannelId` is whatever the gateway echoes back; it is not compared with
/// the id in the request path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteChannelOutput {
    pub message_schema_version: String,
    pub channel_id: String,
}
