#![no_main]

//! Fuzz target for the raise loop over structured arbitrary databases.
//!
//! Dependencies only point at earlier symbols and selects only at later ones, so every
//! generated database loads. The loop must then reach a fixed point within a small bound,
//! and its output must pass the fixed-point check.

use kraise_domain::{Raiser, RaiserConfig, unsettled};
use kraise_model::{ChoiceDef, ConfigDb, DatabaseFile, SymbolDef};
use kraise_types::{Policy, SymbolKind};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, arbitrary::Arbitrary)]
struct RaiseInput {
    allno: bool,
    symbols: Vec<SymbolSpec>,
    choice: Option<ChoiceSpec>,
}

#[derive(Debug, arbitrary::Arbitrary)]
struct SymbolSpec {
    tristate: bool,
    prompt: bool,
    depends: Vec<u8>,
    selects: Vec<u8>,
    default: DefaultSpec,
}

#[derive(Debug, arbitrary::Arbitrary)]
enum DefaultSpec {
    None,
    N,
    M,
    Y,
}

#[derive(Debug, arbitrary::Arbitrary)]
struct ChoiceSpec {
    tristate: bool,
    optional: bool,
    members: u8,
    default: u8,
}

const MAX_SYMBOLS: usize = 24;

fn build(input: &RaiseInput) -> DatabaseFile {
    let count = input.symbols.len().min(MAX_SYMBOLS);
    let name = |i: usize| format!("S{i}");
    let mut symbols = Vec::with_capacity(count);

    for (i, spec) in input.symbols.iter().take(count).enumerate() {
        let depends_on = if i == 0 {
            Vec::new()
        } else {
            spec.depends.iter().take(3).map(|d| name(*d as usize % i)).collect()
        };
        let remaining = count - i - 1;
        let select = if remaining == 0 {
            Vec::new()
        } else {
            spec.selects
                .iter()
                .take(2)
                .map(|s| name(i + 1 + *s as usize % remaining))
                .collect()
        };
        let default = match spec.default {
            DefaultSpec::None => None,
            DefaultSpec::N => Some("n".to_string()),
            DefaultSpec::M => Some("m".to_string()),
            DefaultSpec::Y => Some("y".to_string()),
        };
        symbols.push(SymbolDef {
            name: name(i),
            kind: if spec.tristate { SymbolKind::Tristate } else { SymbolKind::Bool },
            prompt: spec.prompt.then(|| name(i)),
            depends_on,
            select,
            default,
        });
    }

    let mut choices = Vec::new();
    if let Some(spec) = &input.choice {
        let kind = if spec.tristate { SymbolKind::Tristate } else { SymbolKind::Bool };
        let members: Vec<String> = (0..(spec.members % 4 + 1))
            .map(|i| format!("C{i}"))
            .collect();
        for member in &members {
            symbols.push(SymbolDef {
                name: member.clone(),
                kind,
                prompt: Some(member.clone()),
                ..SymbolDef::default()
            });
        }
        let default = members.get(spec.default as usize % members.len()).cloned();
        choices.push(ChoiceDef {
            name: Some("CH".to_string()),
            kind,
            prompt: Some("CH".to_string()),
            optional: spec.optional,
            default,
            members,
            ..ChoiceDef::default()
        });
    }

    DatabaseFile { symbols, choices }
}

fuzz_target!(|input: RaiseInput| {
    let Ok(mut db) = ConfigDb::from_file(build(&input)) else {
        return;
    };
    let policy = if input.allno { Policy::AllNo } else { Policy::AllYes };
    let raiser = Raiser::new(RaiserConfig {
        policy,
        max_passes: Some(64),
    });

    let outcome = raiser.run(&mut db).expect("acyclic database reaches a fixed point");
    assert!(outcome.passes >= 1);
    assert!(unsettled(&db, policy).expect("query model").is_empty());

    let again = raiser.run(&mut db).expect("second run");
    assert!(again.mutations.is_empty());
    assert_eq!(again.passes, 1);
});
