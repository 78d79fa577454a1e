//! Channel kinds and their URL path segments.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Which gateway channel a request addresses.
///
/// A control channel is keyed by the managed instance id; a data channel is
/// keyed by the session id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Control,
    Data,
}

impl ChannelKind {
    /// The path segment under `/v1/` for this kind.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ChannelKind::Control => "control-channel",
            ChannelKind::Data => "data-channel",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Control => write!(f, "control"),
            ChannelKind::Data => write!(f, "data"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown channel kind {0:?}; expected one of: control, data")]
pub struct ParseChannelKindError(pub String);

/// Accepts `control` / `data` as well as the path-segment spellings.
impl FromStr for ChannelKind {
    type Err = ParseChannelKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "control" | "control-channel" => Ok(ChannelKind::Control),
            "data" | "data-channel" => Ok(ChannelKind::Data),
            other => Err(ParseChannelKindError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments() {
        assert_eq!(ChannelKind::Control.path_segment(), "control-channel");
        assert_eq!(ChannelKind::Data.path_segment(), "data-channel");
    }

    #[test]
    fn parse_both_spellings() {
        assert_eq!("control".parse(), Ok(ChannelKind::Control));
        assert_eq!("data-channel".parse(), Ok(ChannelKind::Data));
        assert_eq!(
            "stream".parse::<ChannelKind>(),
            Err(ParseChannelKindError("stream".into()))
        );
    }

    #[test]
    fn display_parses_back() {
        for kind in [ChannelKind::Control, ChannelKind::Data] {
            assert_eq!(kind.to_string().parse::<ChannelKind>(), Ok(kind));
        }
    }
}
