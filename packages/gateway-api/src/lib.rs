//! Request and response types for the message gateway channel API.
//!
//! This crate encodes the wire contract of the gateway's channel endpoints
//! as Rust types. It performs no I/O; `mgs-channel-client` builds URLs,
//! signs requests and talks to the network.
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | POST | `/v1/control-channel/{instance_id}` | [`CreateControlChannelInput`] → [`CreateControlChannelOutput`] |
//! | POST | `/v1/data-channel/{session_id}` | [`CreateDataChannelInput`] → [`CreateDataChannelOutput`] |
//! | DELETE | `/v1/control-channel/{instance_id}` | [`DeleteChannelInput`] → [`DeleteChannelOutput`] |
//! | DELETE | `/v1/data-channel/{session_id}` | [`DeleteChannelInput`] → [`DeleteChannelOutput`] |

pub mod channel;
pub mod message;
pub mod version;

pub use channel::{ChannelKind, ParseChannelKindError};
pub use message::{
    CreateControlChannelInput, CreateControlChannelOutput, CreateDataChannelInput,
    CreateDataChannelOutput, DeleteChannelInput, DeleteChannelOutput,
};
pub use version::{SchemaVersion, SchemaVersionError, MESSAGE_SCHEMA_VERSION};
