//! Client-level error type returned by every gateway operation.

use thiserror::Error;

use crate::codec::{DecodeError, EncodeError};
use crate::endpoint::ResolutionError;
use crate::transport::TransportError;

/// An error from one channel operation. No operation returns a partial
/// result alongside an error.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No endpoint could be built for the region or identifier.
    #[error("endpoint resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// The outgoing request was rejected before it was sent.
    #[error("request encoding failed: {0}")]
    Encoding(#[from] EncodeError),

    /// The network exchange or its signature failed.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The gateway's answer could not be understood.
    #[error("response decoding failed: {0}")]
    Decoding(#[from] DecodeError),
}

impl GatewayError {
    /// True for failures a caller may reasonably retry later: transport
    /// failures and unreadable responses. Resolution and encoding errors are
    /// caller bugs and will fail the same way again.
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Transport(_) | GatewayError::Decoding(_))
    }
}
