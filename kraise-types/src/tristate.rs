use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The ordered tristate domain: `n < m < y`.
///
/// The derived `Ord` follows declaration order, so comparisons and
/// `min`/`max` behave like Kconfig's `&&`/`||` on tristate values.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Tristate {
    #[default]
    #[serde(rename = "n")]
    N,
    #[serde(rename = "m")]
    M,
    #[serde(rename = "y")]
    Y,
}

impl Tristate {
    pub const ALL: [Tristate; 3] = [Tristate::N, Tristate::M, Tristate::Y];

    pub fn as_str(self) -> &'static str {
        match self {
            Tristate::N => "n",
            Tristate::M => "m",
            Tristate::Y => "y",
        }
    }

    /// Conjunction (`&&`).
    pub fn and(self, other: Tristate) -> Tristate {
        self.min(other)
    }

    /// Disjunction (`||`).
    pub fn or(self, other: Tristate) -> Tristate {
        self.max(other)
    }

    /// Boolean entities cannot hold `m`; it is promoted to `y`.
    pub fn promote_bool(self) -> Tristate {
        match self {
            Tristate::M => Tristate::Y,
            other => other,
        }
    }

    pub fn is_set(self) -> bool {
        self != Tristate::N
    }
}

impl fmt::Display for Tristate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tristate value '{0}' (expected n, m or y)")]
pub struct ParseTristateError(pub String);

impl FromStr for Tristate {
    type Err = ParseTristateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "n" => Ok(Tristate::N),
            "m" => Ok(Tristate::M),
            "y" => Ok(Tristate::Y),
            other => Err(ParseTristateError(other.to_string())),
        }
    }
}
