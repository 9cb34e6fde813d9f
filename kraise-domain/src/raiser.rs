use crate::error::{ModelError, RaiseError};
use crate::ports::ConfigModel;
use kraise_types::{ChoiceId, Mutation, Policy, SymbolId, Target, Tristate};
use tracing::{debug, info, trace, warn};

/// Pass limit applied unless the caller opts out.
pub const DEFAULT_MAX_PASSES: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaiserConfig {
    pub policy: Policy,
    /// `None` runs until a quiet pass, however long that takes.
    pub max_passes: Option<u64>,
}

impl Default for RaiserConfig {
    fn default() -> Self {
        Self {
            policy: Policy::AllYes,
            max_passes: Some(DEFAULT_MAX_PASSES),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaiseOutcome {
    /// Full passes performed, including the final pass that changed nothing.
    pub passes: u64,
    pub mutations: Vec<Mutation>,
}

impl RaiseOutcome {
    pub fn changed(&self) -> bool {
        !self.mutations.is_empty()
    }
}

/// Repeated-pass fixed-point driver.
///
/// Each pass visits every symbol outside a choice, then every choice, and moves it to the end of
/// its legal-value sequence chosen by the policy. Passes repeat until one makes no change.
#[derive(Debug, Clone, Default)]
pub struct Raiser {
    config: RaiserConfig,
}

impl Raiser {
    pub fn new(config: RaiserConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, model: &mut dyn ConfigModel) -> Result<RaiseOutcome, RaiseError> {
        let symbols = model.symbols();
        let choices = model.choices();
        let policy = self.config.policy;

        let mut outcome = RaiseOutcome::default();
        loop {
            if let Some(limit) = self.config.max_passes
                && outcome.passes >= limit
            {
                warn!(
                    passes = outcome.passes,
                    mutations = outcome.mutations.len(),
                    "pass limit reached before a fixed point"
                );
                return Err(RaiseError::NoFixedPoint {
                    passes: outcome.passes,
                    mutations: outcome.mutations,
                });
            }
            outcome.passes += 1;
            let pass = outcome.passes;
            let before = outcome.mutations.len();

            for &sym in &symbols {
                // Choice members move with their choice.
                if model.symbol_choice(sym).is_some() {
                    continue;
                }
                if let Some(m) = step_symbol(model, policy, sym, pass, false)? {
                    outcome.mutations.push(m);
                }
            }

            for &choice in &choices {
                if let Some(m) = step_choice(model, policy, choice, pass)? {
                    outcome.mutations.push(m);
                }

                // y mode relies on the model selecting a default member. m mode has no default, so
                // every member that can hold m is raised explicitly. A choice can also start out
                // pinned at m, so this does not wait for the choice itself to move.
                if policy == Policy::AllYes && model.choice_value(choice) == Tristate::M {
                    raise_members_to_m(model, choice, pass, &mut outcome.mutations)?;
                }
            }

            let changed = outcome.mutations.len() - before;
            debug!(pass, changed, "pass complete");
            if changed == 0 {
                break;
            }
        }

        info!(
            policy = %policy,
            passes = outcome.passes,
            mutations = outcome.mutations.len(),
            "fixed point reached"
        );
        Ok(outcome)
    }
}

/// Every symbol or choice the policy would still change.
///
/// An empty result means `model` is at a fixed point for `policy`.
pub fn unsettled(model: &dyn ConfigModel, policy: Policy) -> Result<Vec<Target>, ModelError> {
    let mut out = Vec::new();
    for sym in model.symbols() {
        if model.symbol_choice(sym).is_some() {
            continue;
        }
        let assignable = model.symbol_assignable(sym)?;
        if next_value(policy, model.symbol_value(sym), &assignable).is_some() {
            out.push(Target::symbol(model.symbol_name(sym)));
        }
    }

    for choice in model.choices() {
        let value = model.choice_value(choice);
        let assignable = model.choice_assignable(choice)?;
        if next_value(policy, value, &assignable).is_some() {
            out.push(Target::choice(model.choice_name(choice)));
            continue;
        }

        if policy == Policy::AllYes && value == Tristate::M {
            for member in model.choice_members(choice) {
                if member_needs_m(model, member)? {
                    out.push(Target::symbol(model.symbol_name(member)));
                }
            }
        }
    }
    Ok(out)
}

fn next_value(policy: Policy, current: Tristate, assignable: &[Tristate]) -> Option<Tristate> {
    match policy {
        Policy::AllYes => assignable.last().copied().filter(|&top| top > current),
        Policy::AllNo => assignable.first().copied().filter(|&bottom| bottom < current),
    }
}

fn step_symbol(
    model: &mut dyn ConfigModel,
    policy: Policy,
    sym: SymbolId,
    pass: u64,
    member_raise: bool,
) -> Result<Option<Mutation>, ModelError> {
    let from = model.symbol_value(sym);
    let assignable = model.symbol_assignable(sym)?;
    let Some(to) = next_value(policy, from, &assignable) else {
        return Ok(None);
    };

    model.set_symbol_value(sym, to)?;
    let target = Target::symbol(model.symbol_name(sym));
    trace!(%target, %from, %to, pass, "assigned");
    Ok(Some(Mutation {
        pass,
        target,
        from,
        to,
        member_raise,
    }))
}

fn step_choice(
    model: &mut dyn ConfigModel,
    policy: Policy,
    choice: ChoiceId,
    pass: u64,
) -> Result<Option<Mutation>, ModelError> {
    let from = model.choice_value(choice);
    let assignable = model.choice_assignable(choice)?;
    let Some(to) = next_value(policy, from, &assignable) else {
        return Ok(None);
    };

    model.set_choice_value(choice, to)?;
    let target = Target::choice(model.choice_name(choice));
    trace!(%target, %from, %to, pass, "assigned");
    Ok(Some(Mutation {
        pass,
        target,
        from,
        to,
        member_raise: false,
    }))
}

fn member_needs_m(model: &dyn ConfigModel, member: SymbolId) -> Result<bool, ModelError> {
    Ok(model.symbol_value(member) < Tristate::M
        && model.symbol_assignable(member)?.contains(&Tristate::M))
}

fn raise_members_to_m(
    model: &mut dyn ConfigModel,
    choice: ChoiceId,
    pass: u64,
    mutations: &mut Vec<Mutation>,
) -> Result<(), ModelError> {
    for member in model.choice_members(choice) {
        if !member_needs_m(model, member)? {
            continue;
        }
        let from = model.symbol_value(member);
        model.set_symbol_value(member, Tristate::M)?;
        let target = Target::symbol(model.symbol_name(member));
        trace!(%target, %from, pass, "raised choice member to m");
        mutations.push(Mutation {
            pass,
            target,
            from,
            to: Tristate::M,
            member_raise: true,
        });
    }
    Ok(())
}
