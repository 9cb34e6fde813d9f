//! Concrete configuration model for kraise.
//!
//! A database is described in TOML (see [`schema`]), compiled into a [`ConfigDb`] and evaluated
//! with Kconfig semantics: dependencies cap visibility, `select` raises the floor, bool entities
//! never hold `m`, and choices either pick one member (`y` mode) or let each member be `m`.
//!
//! [`ConfigDb`] implements [`kraise_domain::ConfigModel`], so the raiser can drive it directly.
//! `.config` files are read as user assignments and written back in declaration order.

mod db;
mod dotconfig;
mod error;
mod graph;
pub mod schema;

pub use db::{ConfigDb, DEFAULT_PREFIX};
pub use error::{DbError, DbResult};
pub use schema::{ChoiceDef, DatabaseFile, SymbolDef};
