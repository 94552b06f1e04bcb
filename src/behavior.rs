//! Category behavior definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Behavior selects how a category's source lines are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    /// Domain rules: canonicalized, suffix-deduplicated, emitted as `+.domain`
    Domain,
    /// IP/CIDR rules: passed through verbatim after classification
    #[serde(alias = "ip-cidr")]
    IpCidr,
}

impl Behavior {
    /// Parse a behavior from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "domain" => Some(Behavior::Domain),
            "ipcidr" | "ip-cidr" => Some(Behavior::IpCidr),
            _ => None,
        }
    }

    /// Get the canonical string representation, as used by Clash providers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Domain => "domain",
            Behavior::IpCidr => "ipcidr",
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Behavior {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Behavior::parse(s).ok_or_else(|| Error::InvalidBehavior(s.to_string()))
    }
}
