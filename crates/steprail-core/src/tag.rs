use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownTag;

/// The side of an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Success,
    Failure,
}

/// Tag of a two-element `(tag, value)` tuple.
///
/// `Error` and `Failure` are interchangeable spellings of a failure; an
/// outcome always converts back to a tuple tagged `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Ok,
    Error,
    Failure,
}

impl Tag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Failure => "failure",
        }
    }

    #[must_use]
    pub const fn kind(self) -> Kind {
        match self {
            Self::Ok => Kind::Success,
            Self::Error | Self::Failure => Kind::Failure,
        }
    }

    /// Parses a tag string, returning `None` for anything unrecognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ok" => Some(Self::Ok),
            "error" => Some(Self::Error),
            "failure" => Some(Self::Failure),
            _ => None,
        }
    }
}

impl FromStr for Tag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownTag(s.to_string()))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Kind> for Tag {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Success => Self::Ok,
            Kind::Failure => Self::Error,
        }
    }
}
