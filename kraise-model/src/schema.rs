//! On-disk database description (TOML).
//!
//! ```toml
//! [[symbol]]
//! name = "FOO"
//! type = "tristate"
//! prompt = "Enable foo"
//! depends_on = ["BAR", "m"]
//! select = ["BAZ"]
//! default = "y"
//!
//! [[choice]]
//! name = "COMPRESSION"
//! type = "bool"
//! members = ["GZIP", "XZ"]
//! default = "XZ"
//! ```

use kraise_types::SymbolKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseFile {
    #[serde(rename = "symbol")]
    pub symbols: Vec<SymbolDef>,

    #[serde(rename = "choice")]
    pub choices: Vec<ChoiceDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SymbolDef {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: SymbolKind,

    /// Symbols without a prompt are never user-assignable.
    pub prompt: Option<String>,

    /// Conjunction of symbol names and `n`/`m`/`y` literals.
    pub depends_on: Vec<String>,

    /// Symbols forced to at least this symbol's value.
    pub select: Vec<String>,

    /// Tristate literal or symbol name for bool/tristate; raw text otherwise.
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChoiceDef {
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub kind: SymbolKind,

    pub prompt: Option<String>,

    /// Optional choices may be switched off entirely.
    pub optional: bool,

    pub depends_on: Vec<String>,

    /// Member selected in `y` mode when the user made no selection.
    pub default: Option<String>,

    pub members: Vec<String>,
}

impl Default for ChoiceDef {
    fn default() -> Self {
        Self {
            name: None,
            kind: SymbolKind::Bool,
            prompt: None,
            optional: false,
            depends_on: Vec::new(),
            default: None,
            members: Vec::new(),
        }
    }
}

impl DatabaseFile {
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}
