//! Embeddable core library for kraise.
//!
//! Provides a clap-free entry point suitable for linking into other tools.
//!
//! # Port traits
//!
//! Output goes through [`WritePort`](ports::WritePort). The [`adapters`] module provides a
//! filesystem-backed implementation and an in-memory one for embedding and tests.
//!
//! # Entry points
//!
//! - [`run_policy`](pipeline::run_policy) - load, raise (or lower) and write a `.config`
//! - [`check_fixed_point`](pipeline::check_fixed_point) - verify an existing `.config`

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export so embedders don't need kraise-domain directly.
pub use kraise_domain::{RaiseOutcome, DEFAULT_MAX_PASSES};
