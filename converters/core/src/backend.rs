//! Output format backend types.
//!
//! Defines the available converter backends (APT, events).

use std::str::FromStr;

/// Output format backend type.
///
/// Used by converters to identify themselves and by the CLI for backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Canonical APT, re-serialized from the event stream.
    #[default]
    Apt,
    /// The event stream itself, as JSON.
    Events,
}

impl Backend {
    /// Extension of the files this backend writes.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Events => "json",
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apt" => Ok(Self::Apt),
            "events" | "json" => Ok(Self::Events),
            _ => Err(format!("invalid backend: '{s}', expected: apt, events")),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Apt => write!(f, "apt"),
            Self::Events => write!(f, "events"),
        }
    }
}
