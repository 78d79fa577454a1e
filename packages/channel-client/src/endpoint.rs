//! Endpoint resolution: region → gateway host → channel URL.
//!
//! ```text
//! https://ssmmessages.us-east-1.amazonaws.com/v1/control-channel/i-12345678
//!         └──────────── host ──────────────┘    └─ segment ──┘ └ identifier ┘
//! ```
//!
//! The host lookup is a [`HostResolver`]; [`RegionalHostResolver`] is the
//! default and derives the host from the region's partition. Everything here
//! is pure computation.

use std::collections::HashMap;
use std::sync::LazyLock;

use mgs_gateway_api::ChannelKind;
use regex::Regex;
use thiserror::Error;
use urlencoding::encode;

/// Service prefix of the gateway host name.
pub const GATEWAY_SERVICE: &str = "ssmmessages";

/// Errors that can occur while building a channel URL.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("no gateway endpoint is known for region {0:?}")]
    UnknownRegion(String),

    #[error("{0} channel identifier must not be empty")]
    EmptyIdentifier(ChannelKind),
}

/// Maps a region to the gateway host serving it.
pub trait HostResolver: Send + Sync {
    fn resolve_host(&self, region: &str) -> Result<String, ResolutionError>;
}

impl<F> HostResolver for F
where
    F: Fn(&str) -> Result<String, ResolutionError> + Send + Sync,
{
    fn resolve_host(&self, region: &str) -> Result<String, ResolutionError> {
        self(region)
    }
}

/// Default resolver: `ssmmessages.{region}.{partition domain}`.
///
/// | Region prefix | Domain |
/// |---------------|--------|
/// | `cn-` | `amazonaws.com.cn` |
/// | `us-isob-` | `sc2s.sgov.gov` |
/// | `us-iso-` | `c2s.ic.gov` |
/// | anything else | `amazonaws.com` |
///
/// Explicit overrides registered with [`with_override`](Self::with_override)
/// win over the derived host.
#[derive(Debug, Clone, Default)]
pub struct RegionalHostResolver {
    overrides: HashMap<String, String>,
}

impl RegionalHostResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `region` from `host` instead of the derived name.
    pub fn with_override(mut self, region: impl Into<String>, host: impl Into<String>) -> Self {
        self.overrides.insert(region.into(), host.into());
        self
    }
}

impl HostResolver for RegionalHostResolver {
    fn resolve_host(&self, region: &str) -> Result<String, ResolutionError> {
        if let Some(host) = self.overrides.get(region) {
            return Ok(host.clone());
        }
        if !REGION_RE.is_match(region) {
            return Err(ResolutionError::UnknownRegion(region.to_string()));
        }
        Ok(format!("{GATEWAY_SERVICE}.{region}.{}", partition_domain(region)))
    }
}

/// Build `https://{host}/v1/{segment}/{identifier}` for a channel.
///
/// The identifier is percent-encoded; unreserved characters (letters,
/// digits, `-`, `_`, `.`, `~`) pass through, so instance and session ids
/// appear verbatim.
pub fn resolve_url(
    resolver: &dyn HostResolver,
    kind: ChannelKind,
    identifier: &str,
    region: &str,
) -> Result<String, ResolutionError> {
    if identifier.is_empty() {
        return Err(ResolutionError::EmptyIdentifier(kind));
    }
    let host = resolver.resolve_host(region)?;
    Ok(format!(
        "https://{host}/v1/{}/{}",
        kind.path_segment(),
        encode(identifier)
    ))
}

// --- helpers -----------------------------------------------------------------

fn partition_domain(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "amazonaws.com.cn"
    } else if region.starts_with("us-isob-") {
        "sc2s.sgov.gov"
    } else if region.starts_with("us-iso-") {
        "c2s.ic.gov"
    } else {
        "amazonaws.com"
    }
}

/// `^[a-z]{2}(-[a-z]+)+-\d+$`, e.g. `us-east-1`, `us-gov-west-1`.
static REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d+$").expect("invalid region regex")
});

// ── Tests ─────────────────────────────────────────────────────────────────────
