//! Scripted in-memory `ConfigModel` for exercising the raiser without a real database.

#![allow(dead_code)]

use kraise_domain::{ConfigModel, ModelError};
use kraise_types::{ChoiceId, SymbolId, Target, Tristate};

/// How a fake symbol's legal-value sequence is derived.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Always the given sequence.
    Free(Vec<Tristate>),
    /// `domain` once `dep` holds at least `at_least`, otherwise nothing.
    Requires {
        dep: usize,
        at_least: Tristate,
        domain: Vec<Tristate>,
    },
    /// Never assignable.
    Locked,
}

#[derive(Debug, Clone)]
pub struct FakeSymbol {
    pub name: String,
    pub value: Tristate,
    pub rule: Rule,
    pub choice: Option<usize>,
    /// Setting this symbol resets the indexed symbol to `n`.
    pub resets: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct FakeChoice {
    pub name: String,
    pub value: Tristate,
    pub rule: Rule,
    pub members: Vec<usize>,
    pub default_member: usize,
}

#[derive(Debug, Default)]
pub struct FakeModel {
    pub symbols: Vec<FakeSymbol>,
    pub choices: Vec<FakeChoice>,
    /// Every setter call in order.
    pub log: Vec<(Target, Tristate)>,
    /// Symbols whose legal-value query fails.
    pub broken: Vec<usize>,
}

pub fn bool_domain() -> Vec<Tristate> {
    vec![Tristate::N, Tristate::Y]
}

pub fn tristate_domain() -> Vec<Tristate> {
    vec![Tristate::N, Tristate::M, Tristate::Y]
}

impl FakeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_symbol(&mut self, name: &str, rule: Rule) -> usize {
        self.symbols.push(FakeSymbol {
            name: name.to_string(),
            value: Tristate::N,
            rule,
            choice: None,
            resets: None,
        });
        self.symbols.len() - 1
    }

    pub fn add_choice(&mut self, name: &str, rule: Rule, members: &[&str]) -> usize {
        let idx = self.choices.len();
        let mut member_ids = Vec::new();
        for m in members {
            let id = self.add_symbol(m, Rule::Locked);
            self.symbols[id].choice = Some(idx);
            member_ids.push(id);
        }
        self.choices.push(FakeChoice {
            name: name.to_string(),
            value: Tristate::N,
            rule,
            default_member: member_ids[0],
            members: member_ids,
        });
        idx
    }

    pub fn value_of(&self, name: &str) -> Tristate {
        self.symbols
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.value)
            .or_else(|| self.choices.iter().find(|c| c.name == name).map(|c| c.value))
            .unwrap_or_else(|| panic!("unknown entity {name}"))
    }

    fn eval(&self, rule: &Rule) -> Vec<Tristate> {
        match rule {
            Rule::Free(seq) => seq.clone(),
            Rule::Requires {
                dep,
                at_least,
                domain,
            } => {
                if self.symbols[*dep].value >= *at_least {
                    domain.clone()
                } else {
                    vec![]
                }
            }
            Rule::Locked => vec![],
        }
    }

    fn member_assignable(&self, choice: usize) -> Vec<Tristate> {
        match self.choices[choice].value {
            Tristate::N => vec![],
            Tristate::M => vec![Tristate::N, Tristate::M],
            Tristate::Y => vec![Tristate::Y],
        }
    }
}

impl ConfigModel for FakeModel {
    fn symbols(&self) -> Vec<SymbolId> {
        (0..self.symbols.len()).map(SymbolId).collect()
    }

    fn choices(&self) -> Vec<ChoiceId> {
        (0..self.choices.len()).map(ChoiceId).collect()
    }

    fn symbol_name(&self, sym: SymbolId) -> &str {
        &self.symbols[sym.0].name
    }

    fn symbol_choice(&self, sym: SymbolId) -> Option<ChoiceId> {
        self.symbols[sym.0].choice.map(ChoiceId)
    }

    fn symbol_value(&self, sym: SymbolId) -> Tristate {
        self.symbols[sym.0].value
    }

    fn symbol_assignable(&self, sym: SymbolId) -> Result<Vec<Tristate>, ModelError> {
        if self.broken.contains(&sym.0) {
            return Err(ModelError::consistency(format!(
                "cannot evaluate dependencies of {}",
                self.symbols[sym.0].name
            )));
        }
        let s = &self.symbols[sym.0];
        Ok(match s.choice {
            Some(c) => self.member_assignable(c),
            None => self.eval(&s.rule),
        })
    }

    fn set_symbol_value(&mut self, sym: SymbolId, value: Tristate) -> Result<(), ModelError> {
        let assignable = self.symbol_assignable(sym)?;
        let target = Target::symbol(self.symbols[sym.0].name.clone());
        if !assignable.contains(&value) {
            return Err(ModelError::InvalidAssignment {
                target,
                value,
                assignable,
            });
        }
        self.log.push((target, value));
        self.symbols[sym.0].value = value;
        if let Some(other) = self.symbols[sym.0].resets {
            self.symbols[other].value = Tristate::N;
        }
        Ok(())
    }

    fn choice_name(&self, choice: ChoiceId) -> &str {
        &self.choices[choice.0].name
    }

    fn choice_value(&self, choice: ChoiceId) -> Tristate {
        self.choices[choice.0].value
    }

    fn choice_assignable(&self, choice: ChoiceId) -> Result<Vec<Tristate>, ModelError> {
        Ok(self.eval(&self.choices[choice.0].rule))
    }

    fn set_choice_value(&mut self, choice: ChoiceId, value: Tristate) -> Result<(), ModelError> {
        let assignable = self.choice_assignable(choice)?;
        let target = Target::choice(self.choices[choice.0].name.clone());
        if !assignable.contains(&value) {
            return Err(ModelError::InvalidAssignment {
                target,
                value,
                assignable,
            });
        }
        self.log.push((target, value));
        self.choices[choice.0].value = value;

        // Single-select auto-selection.
        if value == Tristate::Y {
            let chosen = self.choices[choice.0].default_member;
            for &m in &self.choices[choice.0].members {
                self.symbols[m].value = if m == chosen { Tristate::Y } else { Tristate::N };
            }
        }
        Ok(())
    }

    fn choice_members(&self, choice: ChoiceId) -> Vec<SymbolId> {
        self.choices[choice.0]
            .members
            .iter()
            .copied()
            .map(SymbolId)
            .collect()
    }
}
