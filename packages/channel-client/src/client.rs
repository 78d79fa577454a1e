//! The channel gateway client.
//!
//! Every operation has the same shape:
//!
//! ```text
//! typed input → resolve URL → encode → signed invoke → decode → typed output
//! ```
//!
//! The client holds only immutable configuration plus shared, stateless
//! collaborators, so one instance can serve concurrent callers without
//! locking. Each call performs at most one network exchange.

use std::sync::Arc;

use mgs_gateway_api::{
    ChannelKind, CreateControlChannelInput, CreateControlChannelOutput, CreateDataChannelInput,
    CreateDataChannelOutput, DeleteChannelInput, DeleteChannelOutput, SchemaVersion,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::codec::{self, ChannelRequest};
use crate::endpoint::{resolve_url, HostResolver, RegionalHostResolver};
use crate::error::GatewayError;
use crate::signing::V4Signer;
use crate::transport::Transport;

// ---------------------------------------------------------------------------
// Request ids
// ---------------------------------------------------------------------------

/// Source of fresh request ids. Every call must get a new one.
pub trait RequestIdSource: Send + Sync {
    fn next_request_id(&self) -> String;
}

/// Random UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestIds;

impl RequestIdSource for UuidRequestIds {
    fn next_request_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Immutable configuration of a [`ChannelGatewayClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    region: String,
    signer: Arc<V4Signer>,
    schema_version: SchemaVersion,
}

impl ClientConfig {
    /// Configuration speaking [`SchemaVersion::current`].
    pub fn new(region: impl Into<String>, signer: Arc<V4Signer>) -> Self {
        Self {
            region: region.into(),
            signer,
            schema_version: SchemaVersion::current(),
        }
    }

    pub fn with_schema_version(mut self, schema_version: SchemaVersion) -> Self {
        self.schema_version = schema_version;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn signer(&self) -> &Arc<V4Signer> {
        &self.signer
    }

    pub fn schema_version(&self) -> SchemaVersion {
        self.schema_version
    }
}

// ---------------------------------------------------------------------------
// ChannelGatewayClient
// ---------------------------------------------------------------------------

/// Creates and deletes control and data channels on the message gateway.
pub struct ChannelGatewayClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    hosts: Arc<dyn HostResolver>,
    request_ids: Arc<dyn RequestIdSource>,
}

impl ChannelGatewayClient {
    /// Create a client that resolves hosts with [`RegionalHostResolver`] and
    /// generates UUID v4 request ids.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            hosts: Arc::new(RegionalHostResolver::new()),
            request_ids: Arc::new(UuidRequestIds),
        }
    }

    pub fn with_host_resolver(mut self, hosts: Arc<dyn HostResolver>) -> Self {
        self.hosts = hosts;
        self
    }

    pub fn with_request_ids(mut self, request_ids: Arc<dyn RequestIdSource>) -> Self {
        self.request_ids = request_ids;
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The region given at construction.
    pub fn region(&self) -> &str {
        self.config.region()
    }

    /// The signer given at construction (the same `Arc`, not a copy), for
    /// callers that sign their own auxiliary requests.
    pub fn v4_signer(&self) -> &Arc<V4Signer> {
        self.config.signer()
    }

    pub fn schema_version(&self) -> SchemaVersion {
        self.config.schema_version()
    }

    // -----------------------------------------------------------------------
    // Input builders
    // -----------------------------------------------------------------------

    /// A control-channel request stamped with this client's schema version
    /// and a fresh request id.
    pub fn control_channel_input(&self) -> CreateControlChannelInput {
        CreateControlChannelInput::new(self.version_string(), self.request_ids.next_request_id())
    }

    pub fn data_channel_input(&self, client_id: impl Into<String>) -> CreateDataChannelInput {
        CreateDataChannelInput::new(
            self.version_string(),
            self.request_ids.next_request_id(),
            client_id,
        )
    }

    pub fn delete_channel_input(&self) -> DeleteChannelInput {
        DeleteChannelInput::new(self.version_string(), self.request_ids.next_request_id())
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// `POST /v1/control-channel/{instance_id}` — returns the control
    /// channel token.
    pub fn create_control_channel(
        &self,
        input: &CreateControlChannelInput,
        instance_id: &str,
    ) -> Result<CreateControlChannelOutput, GatewayError> {
        self.call(ChannelKind::Control, instance_id, input)
    }

    /// `POST /v1/data-channel/{session_id}` — returns the data channel token.
    pub fn create_data_channel(
        &self,
        input: &CreateDataChannelInput,
        session_id: &str,
    ) -> Result<CreateDataChannelOutput, GatewayError> {
        self.call(ChannelKind::Data, session_id, input)
    }

    /// `DELETE /v1/control-channel/{instance_id}`.
    pub fn delete_control_channel(
        &self,
        input: &DeleteChannelInput,
        instance_id: &str,
    ) -> Result<DeleteChannelOutput, GatewayError> {
        self.call(ChannelKind::Control, instance_id, input)
    }

    /// `DELETE /v1/data-channel/{session_id}`.
    pub fn delete_data_channel(
        &self,
        input: &DeleteChannelInput,
        session_id: &str,
    ) -> Result<DeleteChannelOutput, GatewayError> {
        self.call(ChannelKind::Data, session_id, input)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn version_string(&self) -> String {
        self.config.schema_version.to_string()
    }

    fn call<R: ChannelRequest>(
        &self,
        kind: ChannelKind,
        identifier: &str,
        request: &R,
    ) -> Result<R::Output, GatewayError> {
        self.exchange(kind, identifier, request).inspect_err(|e| {
            warn!(
                request_id = request.request_id(),
                "gateway: {} {kind} channel {identifier} failed: {e}",
                R::METHOD
            );
        })
    }

    fn exchange<R: ChannelRequest>(
        &self,
        kind: ChannelKind,
        identifier: &str,
        request: &R,
    ) -> Result<R::Output, GatewayError> {
        let region = self.config.region();
        let url = resolve_url(self.hosts.as_ref(), kind, identifier, region)?;
        let payload = codec::encode(request, &self.config.schema_version)?;

        debug!(
            request_id = request.request_id(),
            "gateway: {} {url}",
            R::METHOD
        );
        let body = self
            .transport
            .invoke(&payload, R::METHOD, &url, region, &self.config.signer)?;

        Ok(codec::decode(&body, &self.config.schema_version)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
