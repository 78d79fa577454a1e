//! Client configuration assembled from CLI flags and environment variables.
//!
//! | Flag | Variable | Default | Description |
//! |------|----------|---------|-------------|
//! | `--region` | `AWS_REGION` | (required) | Region whose gateway is called |
//! | `--access-key-id` | `AWS_ACCESS_KEY_ID` | (required) | Signing key id |
//! | `--secret-access-key` | `AWS_SECRET_ACCESS_KEY` | (required) | Signing secret |
//! | `--session-token` | `AWS_SESSION_TOKEN` | (absent) | Token for temporary credentials |
//! | `--timeout-secs` | `MGS_TIMEOUT_SECS` | `30` | Per-request HTTP timeout |
//! | `--endpoint-host` | `MGS_ENDPOINT_HOST` | (derived) | Gateway host override for the region |

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use mgs_channel_client::{
    ChannelGatewayClient, ClientConfig, Credentials, HttpTransport, RegionalHostResolver,
    TransportError, V4Signer,
};
use thiserror::Error;

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct CliConfig {
    /// Region whose message gateway is called, e.g. us-east-1.
    #[arg(long, env = "AWS_REGION", global = true)]
    pub region: Option<String>,

    #[arg(long, env = "AWS_ACCESS_KEY_ID", global = true, hide_env_values = true)]
    pub access_key_id: Option<String>,

    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", global = true, hide_env_values = true)]
    pub secret_access_key: Option<String>,

    #[arg(long, env = "AWS_SESSION_TOKEN", global = true, hide_env_values = true)]
    pub session_token: Option<String>,

    /// Seconds before a single gateway request is abandoned.
    #[arg(long, env = "MGS_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Use this gateway host instead of the one derived from the region.
    #[arg(long, env = "MGS_ENDPOINT_HOST", global = true)]
    pub endpoint_host: Option<String>,
}

/// Why a client could not be built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("failed to build HTTP client: {0}")]
    Transport(#[from] TransportError),
}

impl CliConfig {
    /// The region, or an error naming the flag to set.
    pub fn region(&self) -> Result<&str, ConfigError> {
        self.region
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or(ConfigError::Missing("--region (or AWS_REGION)"))
    }

    /// Host resolver honouring `--endpoint-host`.
    pub fn host_resolver(&self) -> Result<RegionalHostResolver, ConfigError> {
        let resolver = RegionalHostResolver::new();
        Ok(match &self.endpoint_host {
            Some(host) => resolver.with_override(self.region()?, host.clone()),
            None => resolver,
        })
    }

    fn credentials(&self) -> Result<Credentials, ConfigError> {
        let access_key_id = self
            .access_key_id
            .clone()
            .ok_or(ConfigError::Missing("--access-key-id (or AWS_ACCESS_KEY_ID)"))?;
        let secret_access_key = self
            .secret_access_key
            .clone()
            .ok_or(ConfigError::Missing("--secret-access-key (or AWS_SECRET_ACCESS_KEY)"))?;

        let credentials = Credentials::new(access_key_id, secret_access_key);
        Ok(match &self.session_token {
            Some(token) => credentials.with_session_token(token.clone()),
            None => credentials,
        })
    }

    /// Build a client backed by the real HTTP transport.
    pub fn build_client(&self) -> Result<ChannelGatewayClient, ConfigError> {
        let region = self.region()?;
        let signer = Arc::new(V4Signer::new(self.credentials()?));
        let transport = HttpTransport::with_timeout(Duration::from_secs(self.timeout_secs))?;

        tracing::debug!(
            "config: region={region}, timeout={}s, endpoint_host={:?}",
            self.timeout_secs,
            self.endpoint_host
        );

        Ok(
            ChannelGatewayClient::new(ClientConfig::new(region, signer), Arc::new(transport))
                .with_host_resolver(Arc::new(self.host_resolver()?)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgs_channel_client::HostResolver;

    fn config() -> CliConfig {
        CliConfig {
            region: Some("us-east-1".into()),
            access_key_id: Some("AKID".into()),
            secret_access_key: Some("SECRET".into()),
            session_token: None,
            timeout_secs: 30,
            endpoint_host: None,
        }
    }

    #[test]
    fn builds_client_for_region() {
        let client = config().build_client().unwrap();
        assert_eq!(client.region(), "us-east-1");
        assert!(client.v4_signer().credentials().session_token.is_none());
    }

    #[test]
    fn session_token_reaches_signer() {
        let mut cfg = config();
        cfg.session_token = Some("SESSION".into());
        let client = cfg.build_client().unwrap();
        assert_eq!(
            client.v4_signer().credentials().session_token.as_deref(),
            Some("SESSION")
        );
    }

    #[test]
    fn missing_region_is_reported() {
        let mut cfg = config();
        cfg.region = None;
        assert!(matches!(cfg.build_client(), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn missing_secret_is_reported() {
        let mut cfg = config();
        cfg.secret_access_key = None;
        let err = cfg.build_client().err().unwrap();
        assert!(err.to_string().contains("--secret-access-key"));
    }

    #[test]
    fn endpoint_host_overrides_region_host() {
        let mut cfg = config();
        cfg.endpoint_host = Some("gateway.internal.test".into());
        let resolver = cfg.host_resolver().unwrap();
        assert_eq!(
            resolver.resolve_host("us-east-1").unwrap(),
            "gateway.internal.test"
        );
    }
}
