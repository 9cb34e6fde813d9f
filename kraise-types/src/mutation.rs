use crate::tristate::Tristate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The entity a mutation was applied to, identified by display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    Symbol { name: String },
    Choice { name: String },
}

impl Target {
    pub fn symbol(name: impl Into<String>) -> Self {
        Target::Symbol { name: name.into() }
    }

    pub fn choice(name: impl Into<String>) -> Self {
        Target::Choice { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            Target::Symbol { name } | Target::Choice { name } => name,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, Target::Choice { .. })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Symbol { name } => write!(f, "symbol {name}"),
            Target::Choice { name } => write!(f, "choice {name}"),
        }
    }
}

/// One value change performed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    /// 1-based pass number.
    pub pass: u64,
    pub target: Target,
    pub from: Tristate,
    pub to: Tristate,

    /// Set for members raised explicitly because their choice sits in `m` mode.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub member_raise: bool,
}
