//! Shared DTOs for the kraise workspace.
//!
//! # Design constraints
//! - Value types here are used by the core loop and by every model implementation.
//! - Report types are serialized to disk; prefer adding optional fields over changing semantics.

pub mod mutation;
pub mod report;
pub mod symbol;
pub mod tristate;

pub use mutation::{Mutation, Target};
pub use symbol::{ChoiceId, Policy, SymbolId, SymbolKind};
pub use tristate::{ParseTristateError, Tristate};

/// Schema identifiers.
pub mod schema {
    pub const KRAISE_REPORT_V1: &str = "kraise.report.v1";
}
