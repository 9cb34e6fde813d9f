use crate::error::ModelError;
use kraise_types::{ChoiceId, SymbolId, Tristate};

/// Query/mutate access to a configuration model.
///
/// The model owns the dependency graph; the raiser only holds handles issued by it and routes
/// every change through the setters. Implementations are expected to:
/// - return legal-value sequences in ascending order, reflecting all mutations made so far;
/// - reject assignments of values outside the current legal-value sequence;
/// - auto-select a default member when a choice is set to `y`.
pub trait ConfigModel {
    /// All symbols, in a stable order.
    fn symbols(&self) -> Vec<SymbolId>;

    /// All choice groups, in a stable order.
    fn choices(&self) -> Vec<ChoiceId>;

    fn symbol_name(&self, sym: SymbolId) -> &str;

    /// The choice group owning `sym`, if any.
    fn symbol_choice(&self, sym: SymbolId) -> Option<ChoiceId>;

    fn symbol_value(&self, sym: SymbolId) -> Tristate;

    fn symbol_assignable(&self, sym: SymbolId) -> Result<Vec<Tristate>, ModelError>;

    fn set_symbol_value(&mut self, sym: SymbolId, value: Tristate) -> Result<(), ModelError>;

    /// Display name; unnamed choices get a model-chosen label.
    fn choice_name(&self, choice: ChoiceId) -> &str;

    fn choice_value(&self, choice: ChoiceId) -> Tristate;

    fn choice_assignable(&self, choice: ChoiceId) -> Result<Vec<Tristate>, ModelError>;

    fn set_choice_value(&mut self, choice: ChoiceId, value: Tristate) -> Result<(), ModelError>;

    fn choice_members(&self, choice: ChoiceId) -> Vec<SymbolId>;
}
