//! Signed client for the message gateway's channel API.
//!
//! Opens and tears down the two channels a managed instance uses to talk to
//! the gateway: the per-instance **control channel** and the per-session
//! **data channel**. Each call returns a token (create) or the echoed
//! channel id (delete); when to open a channel, and what to do with its
//! token, is up to the session layer above.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`endpoint`] | Region → host → `https://{host}/v1/{kind}/{id}` |
//! | [`codec`] | Request validation, serialisation, schema-version policy |
//! | [`signing`] | AWS Signature Version 4 |
//! | [`transport`] | The I/O seam: [`Transport`] and the `reqwest` [`HttpTransport`] |
//! | [`client`] | [`ChannelGatewayClient`], tying the above together |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mgs_channel_client::{
//!     ChannelGatewayClient, ClientConfig, Credentials, HttpTransport, V4Signer,
//! };
//!
//! let signer = Arc::new(V4Signer::new(Credentials::new("AKID", "SECRET")));
//! let client = ChannelGatewayClient::new(
//!     ClientConfig::new("us-east-1", signer),
//!     Arc::new(HttpTransport::default()),
//! );
//!
//! let input = client.control_channel_input();
//! let output = client.create_control_channel(&input, "i-12345678")?;
//! println!("control channel token: {}", output.token_value);
//! ```

pub mod client;
pub mod codec;
pub mod endpoint;
pub mod error;
pub mod signing;
pub mod transport;

pub use client::{ChannelGatewayClient, ClientConfig, RequestIdSource, UuidRequestIds};
pub use codec::{ChannelRequest, ChannelResponse, DecodeError, EncodeError};
pub use endpoint::{resolve_url, HostResolver, RegionalHostResolver, ResolutionError};
pub use error::GatewayError;
pub use signing::{Credentials, SigningError, V4Signer};
pub use transport::{HttpTransport, Transport, TransportError};

pub use mgs_gateway_api as api;
