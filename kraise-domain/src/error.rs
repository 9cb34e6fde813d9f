//! Error types for kraise-domain.
//!
//! Model failures are surfaced unchanged; the raiser adds only the pass-limit failure.

use kraise_types::{Mutation, Target, Tristate};
use thiserror::Error;

/// Failures signalled by a configuration model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A setter was called with a value outside the current legal-value sequence.
    #[error("cannot assign {value} to {target}: legal values are [{}]", format_values(.assignable))]
    InvalidAssignment {
        target: Target,
        value: Tristate,
        assignable: Vec<Tristate>,
    },

    /// Legal values or current values could not be recomputed.
    #[error("configuration model is inconsistent: {message}")]
    Consistency { message: String },
}

impl ModelError {
    pub fn consistency(message: impl Into<String>) -> Self {
        ModelError::Consistency {
            message: message.into(),
        }
    }
}

/// Failures of a raise run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaiseError {
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The pass limit was hit while passes were still changing values.
    ///
    /// `mutations` holds every change made before the limit tripped; the model keeps them.
    #[error("no fixed point after {passes} passes; the model keeps changing values")]
    NoFixedPoint { passes: u64, mutations: Vec<Mutation> },
}

fn format_values(values: &[Tristate]) -> String {
    values
        .iter()
        .map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
