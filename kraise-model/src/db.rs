//! Compiled database and Kconfig-style evaluation.

use crate::error::{DbError, DbResult};
use crate::graph::{DependencyGraph, Node};
use crate::schema::{ChoiceDef, DatabaseFile, SymbolDef};
use camino::Utf8Path;
use fs_err as fs;
use kraise_domain::{ConfigModel, ModelError};
use kraise_types::{ChoiceId, SymbolId, SymbolKind, Target, Tristate};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_PREFIX: &str = "CONFIG_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    Const(Tristate),
    Symbol(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DefaultValue {
    Operand(Operand),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Symbol {
    pub(crate) name: String,
    pub(crate) kind: SymbolKind,
    has_prompt: bool,
    depends: Vec<Operand>,
    selected_by: Vec<usize>,
    default: Option<DefaultValue>,
    pub(crate) choice: Option<usize>,
    pub(crate) user: Option<Tristate>,
    pub(crate) user_text: Option<String>,

    // Derived by `recompute`.
    vis: Tristate,
    rev_dep: Tristate,
    pub(crate) value: Tristate,
    pub(crate) text: Option<String>,
    pub(crate) write: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Choice {
    label: String,
    kind: SymbolKind,
    optional: bool,
    depends: Vec<Operand>,
    default: Option<usize>,
    members: Vec<usize>,
    pub(crate) user: Option<Tristate>,
    pub(crate) user_selection: Option<usize>,

    // Derived by `recompute`.
    vis: Tristate,
    value: Tristate,
    selection: Option<usize>,
}

/// In-memory configuration model.
///
/// All derived state (visibility, reverse dependencies, values, choice selections) is recomputed
/// eagerly in dependency order after every mutation, so queries always reflect the latest
/// assignments.
#[derive(Debug, Clone)]
pub struct ConfigDb {
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) choices: Vec<Choice>,
    pub(crate) by_name: HashMap<String, usize>,
    order: Vec<Node>,
    pub(crate) prefix: String,
}

impl ConfigDb {
    pub fn load(path: &Utf8Path) -> DbResult<Self> {
        let contents = fs::read_to_string(path)?;
        let db = Self::from_toml_str(&contents)?;
        debug!(
            path = %path,
            symbols = db.symbols.len(),
            choices = db.choices.len(),
            "loaded database"
        );
        Ok(db)
    }

    pub fn from_toml_str(contents: &str) -> DbResult<Self> {
        Self::from_file(DatabaseFile::from_toml_str(contents)?)
    }

    pub fn from_file(file: DatabaseFile) -> DbResult<Self> {
        let by_name = index_names(&file)?;

        let mut symbols = file
            .symbols
            .iter()
            .map(|def| compile_symbol(def, &file.symbols, &by_name))
            .collect::<DbResult<Vec<_>>>()?;

        for (i, def) in file.symbols.iter().enumerate() {
            for target in &def.select {
                let j = lookup(&by_name, target, &def.name)?;
                if !def.kind.is_tristate_like() || !symbols[j].kind.is_tristate_like() {
                    return Err(DbError::invalid_value(
                        &def.name,
                        target,
                        "select is only valid between bool/tristate symbols",
                    ));
                }
                symbols[j].selected_by.push(i);
            }
        }

        let mut choices = Vec::with_capacity(file.choices.len());
        for (j, def) in file.choices.iter().enumerate() {
            choices.push(compile_choice(j, def, &mut symbols, &file.symbols, &by_name)?);
        }

        let order = evaluation_order(&symbols, &choices)?;
        let mut db = ConfigDb {
            symbols,
            choices,
            by_name,
            order,
            prefix: DEFAULT_PREFIX.to_string(),
        };
        db.recompute();
        Ok(db)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    pub fn symbol(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied().map(SymbolId)
    }

    pub fn choice(&self, name: &str) -> Option<ChoiceId> {
        self.choices
            .iter()
            .position(|c| c.label == name)
            .map(ChoiceId)
    }

    /// Current tristate value of a symbol or choice, by name.
    pub fn value_of(&self, name: &str) -> Option<Tristate> {
        if let Some(sym) = self.symbol(name) {
            return Some(self.symbols[sym.0].value);
        }
        self.choice(name).map(|c| self.choices[c.0].value)
    }

    /// Current text of a string/int/hex symbol.
    pub fn text_of(&self, name: &str) -> Option<&str> {
        let sym = self.symbol(name)?;
        self.symbols[sym.0].text.as_deref()
    }

    /// The member holding `y` in a `y`-mode choice.
    pub fn selection(&self, choice: ChoiceId) -> Option<SymbolId> {
        self.choices[choice.0].selection.map(SymbolId)
    }

    pub(crate) fn recompute(&mut self) {
        for k in 0..self.order.len() {
            match self.order[k] {
                Node::Symbol(i) => self.eval_symbol(i),
                Node::Choice(j) => self.eval_choice(j),
            }
        }
    }

    fn operand_value(&self, op: Operand) -> Tristate {
        match op {
            Operand::Const(v) => v,
            Operand::Symbol(i) => self.symbols[i].value,
        }
    }

    fn conjunction(&self, ops: &[Operand]) -> Tristate {
        ops.iter()
            .fold(Tristate::Y, |acc, &op| acc.and(self.operand_value(op)))
    }

    /// Visibility of a choice member, given the value its choice has (or would have).
    fn member_visibility(&self, i: usize, choice_value: Tristate) -> Tristate {
        let s = &self.symbols[i];
        let Some(c) = s.choice else {
            return Tristate::N;
        };
        let choice = &self.choices[c];

        let vis = self.conjunction(&s.depends).and(choice_value);
        // Non-tristate members only exist in y mode.
        if choice.kind == SymbolKind::Tristate
            && s.kind != SymbolKind::Tristate
            && choice_value != Tristate::Y
        {
            return Tristate::N;
        }
        // Members limited to m cannot take part in a y-mode selection.
        if s.kind == SymbolKind::Tristate && vis == Tristate::M && choice_value == Tristate::Y {
            return Tristate::N;
        }
        if s.kind != SymbolKind::Tristate {
            return vis.promote_bool();
        }
        vis
    }

    fn eval_symbol(&mut self, i: usize) {
        let s = &self.symbols[i];
        let dep = self.conjunction(&s.depends);

        if !s.kind.is_tristate_like() {
            let vis = if s.has_prompt { dep } else { Tristate::N };
            let text = if vis.is_set() && s.user_text.is_some() {
                s.user_text.clone()
            } else if dep.is_set() {
                match &s.default {
                    Some(DefaultValue::Text(t)) => Some(t.clone()),
                    _ => None,
                }
            } else {
                None
            };
            let s = &mut self.symbols[i];
            s.vis = vis;
            s.rev_dep = Tristate::N;
            s.value = Tristate::N;
            s.text = text;
            s.write = dep.is_set();
            return;
        }

        let (vis, rev_dep, value, write) = match s.choice {
            Some(c) => {
                let choice = &self.choices[c];
                let vis = self.member_visibility(i, choice.value);
                let value = match choice.value {
                    Tristate::Y if choice.selection == Some(i) => Tristate::Y,
                    Tristate::M if vis.is_set() => s.user.unwrap_or(Tristate::N).and(vis),
                    _ => Tristate::N,
                };
                (vis, Tristate::N, value, vis.is_set())
            }
            None => {
                let mut vis = if s.has_prompt { dep } else { Tristate::N };
                if s.kind == SymbolKind::Bool {
                    vis = vis.promote_bool();
                }
                let rev_dep = s
                    .selected_by
                    .iter()
                    .fold(Tristate::N, |acc, &j| acc.or(self.symbols[j].value));

                let mut write = vis.is_set();
                let mut value = Tristate::N;
                if let (true, Some(user)) = (vis.is_set(), s.user) {
                    value = user.and(vis);
                } else if let Some(DefaultValue::Operand(op)) = &s.default
                    && dep.is_set()
                {
                    value = self.operand_value(*op).and(dep);
                    write = true;
                }
                if rev_dep.is_set() {
                    value = value.or(rev_dep);
                    write = true;
                }
                if s.kind == SymbolKind::Bool {
                    value = value.promote_bool();
                }
                (vis, rev_dep, value, write)
            }
        };

        let s = &mut self.symbols[i];
        s.vis = vis;
        s.rev_dep = rev_dep;
        s.value = value;
        s.text = None;
        s.write = write;
    }

    fn eval_choice(&mut self, j: usize) {
        let choice = &self.choices[j];
        let mut vis = self.conjunction(&choice.depends);
        if choice.kind == SymbolKind::Bool {
            vis = vis.promote_bool();
        }

        let mut value = if choice.optional {
            Tristate::N
        } else {
            Tristate::M
        };
        if let Some(user) = choice.user {
            value = value.or(user);
        }
        value = value.and(vis);
        if choice.kind == SymbolKind::Bool {
            value = value.promote_bool();
        }

        let selection = if value == Tristate::Y {
            let visible = |m: usize| self.member_visibility(m, Tristate::Y).is_set();
            choice
                .user_selection
                .filter(|&m| visible(m))
                .or_else(|| choice.default.filter(|&m| visible(m)))
                .or_else(|| choice.members.iter().copied().find(|&m| visible(m)))
        } else {
            None
        };

        let choice = &mut self.choices[j];
        choice.vis = vis;
        choice.value = value;
        choice.selection = selection;
    }

    fn symbol_legal(&self, i: usize) -> Vec<Tristate> {
        use Tristate::{M, N, Y};

        let s = &self.symbols[i];
        if !s.kind.is_tristate_like() {
            return vec![];
        }
        let is_bool = s.kind == SymbolKind::Bool;
        match (s.vis, s.rev_dep) {
            (N, _) => vec![],
            (Y, _) if s.choice.is_some() => vec![Y],
            (Y, N) if is_bool => vec![N, Y],
            (Y, N) => vec![N, M, Y],
            (Y, M) if is_bool => vec![Y],
            (Y, M) => vec![M, Y],
            (Y, Y) => vec![Y],
            (M, N) => vec![N, M],
            (M, M) => vec![M],
            (M, Y) => vec![Y],
        }
    }

    fn choice_legal(&self, j: usize) -> Vec<Tristate> {
        use Tristate::{M, N, Y};

        let c = &self.choices[j];
        let is_bool = c.kind == SymbolKind::Bool;
        match (c.vis, c.optional) {
            (N, _) => vec![],
            (Y, false) if is_bool => vec![Y],
            (Y, false) => vec![M, Y],
            (Y, true) if is_bool => vec![N, Y],
            (Y, true) => vec![N, M, Y],
            (M, false) => vec![M],
            (M, true) => vec![N, M],
        }
    }
}

impl ConfigModel for ConfigDb {
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
        self.symbols
            .get(sym.0)
            .map(|_| self.symbol_legal(sym.0))
            .ok_or_else(|| ModelError::consistency(format!("no symbol with index {}", sym.0)))
    }

    fn set_symbol_value(&mut self, sym: SymbolId, value: Tristate) -> Result<(), ModelError> {
        let assignable = self.symbol_assignable(sym)?;
        if !assignable.contains(&value) {
            return Err(ModelError::InvalidAssignment {
                target: Target::symbol(self.symbols[sym.0].name.clone()),
                value,
                assignable,
            });
        }

        match self.symbols[sym.0].choice {
            Some(c) if value == Tristate::Y => self.choices[c].user_selection = Some(sym.0),
            _ => self.symbols[sym.0].user = Some(value),
        }
        self.recompute();
        Ok(())
    }

    fn choice_name(&self, choice: ChoiceId) -> &str {
        &self.choices[choice.0].label
    }

    fn choice_value(&self, choice: ChoiceId) -> Tristate {
        self.choices[choice.0].value
    }

    fn choice_assignable(&self, choice: ChoiceId) -> Result<Vec<Tristate>, ModelError> {
        self.choices
            .get(choice.0)
            .map(|_| self.choice_legal(choice.0))
            .ok_or_else(|| ModelError::consistency(format!("no choice with index {}", choice.0)))
    }

    fn set_choice_value(&mut self, choice: ChoiceId, value: Tristate) -> Result<(), ModelError> {
        let assignable = self.choice_assignable(choice)?;
        if !assignable.contains(&value) {
            return Err(ModelError::InvalidAssignment {
                target: Target::choice(self.choices[choice.0].label.clone()),
                value,
                assignable,
            });
        }

        self.choices[choice.0].user = Some(value);
        self.recompute();
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

fn index_names(file: &DatabaseFile) -> DbResult<HashMap<String, usize>> {
    let mut by_name = HashMap::with_capacity(file.symbols.len());
    for (i, def) in file.symbols.iter().enumerate() {
        if def.name.trim().is_empty() {
            return Err(DbError::invalid_value("<symbol>", &def.name, "name is empty"));
        }
        if matches!(def.name.as_str(), "n" | "m" | "y") {
            return Err(DbError::invalid_value(
                &def.name,
                &def.name,
                "n, m and y are reserved constants",
            ));
        }
        if by_name.insert(def.name.clone(), i).is_some() {
            return Err(DbError::DuplicateName {
                name: def.name.clone(),
            });
        }
    }

    let mut labels = Vec::new();
    for c in &file.choices {
        if let Some(name) = &c.name {
            if by_name.contains_key(name) || labels.contains(&name) {
                return Err(DbError::DuplicateName { name: name.clone() });
            }
            labels.push(name);
        }
    }
    Ok(by_name)
}

fn lookup(by_name: &HashMap<String, usize>, name: &str, referenced_by: &str) -> DbResult<usize> {
    by_name
        .get(name)
        .copied()
        .ok_or_else(|| DbError::UnknownSymbol {
            name: name.to_string(),
            referenced_by: referenced_by.to_string(),
        })
}

fn operand(
    text: &str,
    defs: &[SymbolDef],
    by_name: &HashMap<String, usize>,
    referenced_by: &str,
) -> DbResult<Operand> {
    if let Ok(v) = text.parse::<Tristate>() {
        return Ok(Operand::Const(v));
    }
    let i = lookup(by_name, text.trim(), referenced_by)?;
    if !defs[i].kind.is_tristate_like() {
        return Err(DbError::invalid_value(
            referenced_by,
            text,
            "only bool/tristate symbols can appear in dependencies",
        ));
    }
    Ok(Operand::Symbol(i))
}

fn operands(
    texts: &[String],
    defs: &[SymbolDef],
    by_name: &HashMap<String, usize>,
    referenced_by: &str,
) -> DbResult<Vec<Operand>> {
    texts
        .iter()
        .map(|t| operand(t, defs, by_name, referenced_by))
        .collect()
}

fn compile_default(
    def: &SymbolDef,
    defs: &[SymbolDef],
    by_name: &HashMap<String, usize>,
) -> DbResult<Option<DefaultValue>> {
    let Some(raw) = &def.default else {
        return Ok(None);
    };
    let value = match def.kind {
        SymbolKind::Bool | SymbolKind::Tristate => {
            DefaultValue::Operand(operand(raw, defs, by_name, &def.name)?)
        }
        SymbolKind::Int => {
            if raw.trim().parse::<i64>().is_err() {
                return Err(DbError::invalid_value(&def.name, raw, "not a decimal integer"));
            }
            DefaultValue::Text(raw.trim().to_string())
        }
        SymbolKind::Hex => {
            if !is_hex(raw.trim()) {
                return Err(DbError::invalid_value(&def.name, raw, "not a 0x-prefixed hex number"));
            }
            DefaultValue::Text(raw.trim().to_string())
        }
        SymbolKind::String => DefaultValue::Text(raw.clone()),
    };
    Ok(Some(value))
}

pub(crate) fn is_hex(s: &str) -> bool {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or("");
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn compile_symbol(
    def: &SymbolDef,
    defs: &[SymbolDef],
    by_name: &HashMap<String, usize>,
) -> DbResult<Symbol> {
    Ok(Symbol {
        name: def.name.clone(),
        kind: def.kind,
        has_prompt: def.prompt.is_some(),
        depends: operands(&def.depends_on, defs, by_name, &def.name)?,
        selected_by: Vec::new(),
        default: compile_default(def, defs, by_name)?,
        choice: None,
        user: None,
        user_text: None,
        vis: Tristate::N,
        rev_dep: Tristate::N,
        value: Tristate::N,
        text: None,
        write: false,
    })
}

fn compile_choice(
    j: usize,
    def: &ChoiceDef,
    symbols: &mut [Symbol],
    defs: &[SymbolDef],
    by_name: &HashMap<String, usize>,
) -> DbResult<Choice> {
    let label = def
        .name
        .clone()
        .unwrap_or_else(|| format!("<choice {}>", j + 1));
    if !def.kind.is_tristate_like() {
        return Err(DbError::invalid_value(
            &label,
            def.kind.as_str(),
            "choices must be bool or tristate",
        ));
    }

    let mut members = Vec::with_capacity(def.members.len());
    for name in &def.members {
        let i = lookup(by_name, name, &label)?;
        let bad = |reason: &str| DbError::BadChoiceMember {
            choice: label.clone(),
            member: name.clone(),
            reason: reason.to_string(),
        };
        let sym = &mut symbols[i];
        if !sym.kind.is_tristate_like() {
            return Err(bad("members must be bool or tristate"));
        }
        if sym.choice.is_some() {
            return Err(bad("already a member of another choice"));
        }
        if !sym.selected_by.is_empty() {
            return Err(bad("choice members cannot be selected"));
        }
        sym.choice = Some(j);
        members.push(i);
    }

    let default = match &def.default {
        Some(name) => {
            let i = lookup(by_name, name, &label)?;
            if !members.contains(&i) {
                return Err(DbError::BadChoiceMember {
                    choice: label,
                    member: name.clone(),
                    reason: "default is not a member".to_string(),
                });
            }
            Some(i)
        }
        None => None,
    };

    Ok(Choice {
        depends: operands(&def.depends_on, defs, by_name, &label)?,
        label,
        kind: def.kind,
        optional: def.optional,
        default,
        members,
        user: None,
        user_selection: None,
        vis: Tristate::N,
        value: Tristate::N,
        selection: None,
    })
}

fn evaluation_order(symbols: &[Symbol], choices: &[Choice]) -> DbResult<Vec<Node>> {
    let mut graph = DependencyGraph::new(symbols.len(), choices.len());
    let sym_operands = |ops: &[Operand]| {
        ops.iter()
            .filter_map(|op| match op {
                Operand::Symbol(d) => Some(*d),
                Operand::Const(_) => None,
            })
            .collect::<Vec<_>>()
    };

    for (i, s) in symbols.iter().enumerate() {
        for d in sym_operands(&s.depends) {
            graph.add_edge(Node::Symbol(d), Node::Symbol(i));
        }
        if let Some(DefaultValue::Operand(Operand::Symbol(d))) = &s.default {
            graph.add_edge(Node::Symbol(*d), Node::Symbol(i));
        }
        for &selector in &s.selected_by {
            graph.add_edge(Node::Symbol(selector), Node::Symbol(i));
        }
    }

    for (j, c) in choices.iter().enumerate() {
        for d in sym_operands(&c.depends) {
            graph.add_edge(Node::Symbol(d), Node::Choice(j));
        }
        for &m in &c.members {
            graph.add_edge(Node::Choice(j), Node::Symbol(m));
            // Selection needs each member's own dependencies settled first.
            for d in sym_operands(&symbols[m].depends) {
                graph.add_edge(Node::Symbol(d), Node::Choice(j));
            }
        }
    }

    graph.evaluation_order().map_err(|node| DbError::DependencyLoop {
        name: match node {
            Node::Symbol(i) => symbols[i].name.clone(),
            Node::Choice(j) => choices[j].label.clone(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use Tristate::{M, N, Y};

    fn db(toml: &str) -> ConfigDb {
        ConfigDb::from_toml_str(toml).unwrap()
    }

    fn legal(db: &ConfigDb, name: &str) -> Vec<Tristate> {
        db.symbol_assignable(db.symbol(name).unwrap()).unwrap()
    }

    #[test]
    fn prompted_tristate_without_dependencies_is_fully_assignable() {
        let db = db(r#"
[[symbol]]
name = "A"
type = "tristate"
prompt = "A"
"#);
        assert_eq!(legal(&db, "A"), vec![N, M, Y]);
        assert_eq!(db.value_of("A"), Some(N));
    }

    #[test]
    fn bool_depending_on_m_is_promoted() {
        let db = db(r#"
[[symbol]]
name = "A"
prompt = "A"
depends_on = ["m"]
"#);
        assert_eq!(legal(&db, "A"), vec![N, Y]);
    }

    #[test]
    fn tristate_depending_on_m_is_capped() {
        let db = db(r#"
[[symbol]]
name = "A"
type = "tristate"
prompt = "A"
depends_on = ["m"]
"#);
        assert_eq!(legal(&db, "A"), vec![N, M]);
    }

    #[test]
    fn unprompted_symbol_takes_its_default() {
        let db = db(r#"
[[symbol]]
name = "GATE"
prompt = "gate"

[[symbol]]
name = "HIDDEN"
type = "tristate"
default = "y"
depends_on = ["GATE"]
"#);
        assert!(legal(&db, "HIDDEN").is_empty());
        assert_eq!(db.value_of("HIDDEN"), Some(N));
    }

    #[test]
    fn select_raises_the_floor() {
        let mut db = db(r#"
[[symbol]]
name = "DRV"
type = "tristate"
prompt = "driver"
select = ["LIB"]

[[symbol]]
name = "LIB"
type = "tristate"
prompt = "library"
"#);
        let drv = db.symbol("DRV").unwrap();
        db.set_symbol_value(drv, M).unwrap();
        assert_eq!(db.value_of("LIB"), Some(M));
        assert_eq!(legal(&db, "LIB"), vec![M, Y]);

        db.set_symbol_value(drv, Y).unwrap();
        assert_eq!(legal(&db, "LIB"), vec![Y]);
        assert_eq!(db.value_of("LIB"), Some(Y));
    }

    #[test]
    fn rejects_values_outside_the_legal_sequence() {
        let mut db = db(r#"
[[symbol]]
name = "A"
prompt = "A"
"#);
        let a = db.symbol("A").unwrap();
        let err = db.set_symbol_value(a, M).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidAssignment {
                target: Target::symbol("A"),
                value: M,
                assignable: vec![N, Y],
            }
        );
        assert_eq!(db.value_of("A"), Some(N));
    }

    #[test]
    fn bool_choice_auto_selects_its_default() {
        let mut db = db(r#"
[[symbol]]
name = "GZIP"

[[symbol]]
name = "XZ"

[[choice]]
name = "COMP"
optional = true
default = "XZ"
members = ["GZIP", "XZ"]
"#);
        let comp = db.choice("COMP").unwrap();
        assert_eq!(db.choice_assignable(comp).unwrap(), vec![N, Y]);
        assert_eq!(db.value_of("XZ"), Some(N));

        db.set_choice_value(comp, Y).unwrap();
        assert_eq!(db.value_of("XZ"), Some(Y));
        assert_eq!(db.value_of("GZIP"), Some(N));
        assert_eq!(db.selection(comp), db.symbol("XZ"));
    }

    #[test]
    fn selection_falls_back_to_first_visible_member() {
        let db = db(r#"
[[symbol]]
name = "OFF"
prompt = "off"

[[symbol]]
name = "A"
depends_on = ["OFF"]

[[symbol]]
name = "B"

[[choice]]
name = "C"
default = "A"
members = ["A", "B"]
"#);
        // Non-optional bool choice: visible, so it sits at y from the start.
        assert_eq!(db.value_of("C"), Some(Y));
        assert_eq!(db.value_of("A"), Some(N));
        assert_eq!(db.value_of("B"), Some(Y));
    }

    #[test]
    fn user_selection_is_respected() {
        let mut db = db(r#"
[[symbol]]
name = "A"

[[symbol]]
name = "B"

[[choice]]
name = "C"
members = ["A", "B"]
"#);
        let b = db.symbol("B").unwrap();
        assert_eq!(legal(&db, "B"), vec![Y]);
        db.set_symbol_value(b, Y).unwrap();
        assert_eq!(db.value_of("A"), Some(N));
        assert_eq!(db.value_of("B"), Some(Y));
    }

    #[test]
    fn tristate_choice_limited_to_m_allows_member_m() {
        let mut db = db(r#"
[[symbol]]
name = "C1"
type = "tristate"

[[symbol]]
name = "C2"
type = "tristate"

[[choice]]
name = "WEIRD"
type = "tristate"
depends_on = ["m"]
members = ["C1", "C2"]
"#);
        let weird = db.choice("WEIRD").unwrap();
        // Non-optional tristate choices start in m mode.
        assert_eq!(db.choice_value(weird), M);
        assert_eq!(db.choice_assignable(weird).unwrap(), vec![M]);
        assert_eq!(legal(&db, "C1"), vec![N, M]);

        let c1 = db.symbol("C1").unwrap();
        db.set_symbol_value(c1, M).unwrap();
        assert_eq!(db.value_of("C1"), Some(M));
        assert_eq!(db.value_of("C2"), Some(N));
    }

    #[test]
    fn load_errors_are_specific() {
        let dup = ConfigDb::from_toml_str(
            "[[symbol]]\nname = \"A\"\n[[symbol]]\nname = \"A\"\n",
        )
        .unwrap_err();
        assert!(matches!(dup, DbError::DuplicateName { .. }));

        let unknown = ConfigDb::from_toml_str(
            "[[symbol]]\nname = \"A\"\ndepends_on = [\"B\"]\n",
        )
        .unwrap_err();
        assert!(matches!(unknown, DbError::UnknownSymbol { ref name, .. } if name == "B"));

        let looped = ConfigDb::from_toml_str(
            "[[symbol]]\nname = \"A\"\ndepends_on = [\"B\"]\n[[symbol]]\nname = \"B\"\ndepends_on = [\"A\"]\n",
        )
        .unwrap_err();
        assert!(matches!(looped, DbError::DependencyLoop { .. }));

        let bad_int = ConfigDb::from_toml_str(
            "[[symbol]]\nname = \"N_CPUS\"\ntype = \"int\"\ndefault = \"many\"\n",
        )
        .unwrap_err();
        assert!(matches!(bad_int, DbError::InvalidValue { .. }));

        let shared = ConfigDb::from_toml_str(
            "[[symbol]]\nname = \"A\"\n[[choice]]\nmembers = [\"A\"]\n[[choice]]\nmembers = [\"A\"]\n",
        )
        .unwrap_err();
        assert!(matches!(shared, DbError::BadChoiceMember { .. }));
    }

    #[test]
    fn text_symbols_follow_their_dependencies() {
        let mut db = db(r#"
[[symbol]]
name = "NET"
prompt = "net"

[[symbol]]
name = "HOSTNAME"
type = "string"
prompt = "hostname"
default = "box"
depends_on = ["NET"]
"#);
        assert_eq!(db.text_of("HOSTNAME"), None);
        assert!(legal(&db, "HOSTNAME").is_empty());

        let net = db.symbol("NET").unwrap();
        db.set_symbol_value(net, Y).unwrap();
        assert_eq!(db.text_of("HOSTNAME"), Some("box"));
    }

    #[test]
    fn hex_literals_are_checked() {
        assert!(is_hex("0x1f"));
        assert!(is_hex("0XFF"));
        assert!(!is_hex("1f"));
        assert!(!is_hex("0x"));
        assert!(!is_hex("0xzz"));
    }
}
