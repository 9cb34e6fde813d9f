use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque handle for a configuration symbol, issued by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(pub usize);

/// Opaque handle for a choice group, issued by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChoiceId(pub usize);

/// Declared type of a symbol.
///
/// Only `bool` and `tristate` symbols live in the ordered `n < m < y` domain;
/// the others hold free-form text and never have a legal-value sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    #[default]
    Bool,
    Tristate,
    String,
    Int,
    Hex,
}

impl SymbolKind {
    pub fn is_tristate_like(self) -> bool {
        matches!(self, SymbolKind::Bool | SymbolKind::Tristate)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Bool => "bool",
            SymbolKind::Tristate => "tristate",
            SymbolKind::String => "string",
            SymbolKind::Int => "int",
            SymbolKind::Hex => "hex",
        }
    }
}

/// Which end of each legal-value sequence a run drives entities towards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Raise everything to its highest assignable value.
    #[default]
    AllYes,
    /// Lower everything to its lowest assignable value.
    AllNo,
}

impl Policy {
    pub fn as_str(self) -> &'static str {
        match self {
            Policy::AllYes => "allyes",
            Policy::AllNo => "allno",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allyes" | "yes" => Ok(Policy::AllYes),
            "allno" | "no" => Ok(Policy::AllNo),
            other => Err(format!("unknown policy '{other}' (expected allyes or allno)")),
        }
    }
}
