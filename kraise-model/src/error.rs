//! Error types for kraise-model.
//!
//! Everything here is raised while building or persisting a database. Failures while the raiser
//! queries or mutates a loaded database are `kraise_domain::ModelError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid database TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("'{name}' is defined more than once")]
    DuplicateName { name: String },

    #[error("'{referenced_by}' references unknown symbol '{name}'")]
    UnknownSymbol { name: String, referenced_by: String },

    #[error("invalid value '{value}' for '{name}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("dependency loop through '{name}'")]
    DependencyLoop { name: String },

    #[error("choice '{choice}' cannot own '{member}': {reason}")]
    BadChoiceMember {
        choice: String,
        member: String,
        reason: String,
    },
}

impl DbError {
    pub(crate) fn invalid_value(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DbError::InvalidValue {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
