//! Domain logic: drive every symbol and choice of a configuration model to a fixed point.
//!
//! This crate owns *how far* each entity is pushed and *when* to stop. It does not own how legal
//! values are computed or how results are persisted; that's the model behind [`ConfigModel`].

mod error;
mod ports;
mod raiser;

pub use error::{ModelError, RaiseError};
pub use ports::ConfigModel;
pub use raiser::{unsettled, RaiseOutcome, Raiser, RaiserConfig, DEFAULT_MAX_PASSES};
