//! End-to-end raising scenarios against real TOML databases.

use kraise_domain::{unsettled, ConfigModel, RaiseError, Raiser, RaiserConfig};
use kraise_model::ConfigDb;
use kraise_types::{Mutation, Policy, Target, Tristate};
use pretty_assertions::assert_eq;

fn db(toml: &str) -> ConfigDb {
    ConfigDb::from_toml_str(toml).expect("valid database")
}

fn allyes(db: &mut ConfigDb) -> kraise_domain::RaiseOutcome {
    Raiser::new(RaiserConfig::default())
        .run(db)
        .expect("fixed point")
}

#[test]
fn y_mode_choice_selects_the_default_member() {
    let mut db = db(r#"
[[symbol]]
name = "GZIP"
prompt = "gzip"

[[symbol]]
name = "XZ"
prompt = "xz"

[[choice]]
name = "COMPRESSION"
type = "tristate"
default = "XZ"
members = ["GZIP", "XZ"]
"#);

    let outcome = allyes(&mut db);

    assert_eq!(db.value_of("COMPRESSION"), Some(Tristate::Y));
    assert_eq!(db.value_of("XZ"), Some(Tristate::Y));
    assert_eq!(db.value_of("GZIP"), Some(Tristate::N));

    let targets: Vec<&Target> = outcome.mutations.iter().map(|m| &m.target).collect();
    assert_eq!(targets, vec![&Target::choice("COMPRESSION")]);
}

#[test]
fn choice_pinned_at_m_gets_every_member_raised() {
    let mut db = db(r#"
[[symbol]]
name = "C1"
type = "tristate"
prompt = "one"

[[symbol]]
name = "C2"
type = "tristate"
prompt = "two"

[[choice]]
name = "WEIRD"
type = "tristate"
depends_on = ["m"]
members = ["C1", "C2"]
"#);

    let outcome = allyes(&mut db);

    assert_eq!(db.value_of("WEIRD"), Some(Tristate::M));
    assert_eq!(db.value_of("C1"), Some(Tristate::M));
    assert_eq!(db.value_of("C2"), Some(Tristate::M));
    assert!(outcome.mutations.iter().all(|m| m.member_raise));
    assert_eq!(outcome.passes, 2);
}

#[test]
fn optional_choice_raised_to_m_raises_members_in_the_same_pass() {
    let mut db = db(r#"
[[symbol]]
name = "C1"
type = "tristate"

[[symbol]]
name = "C2"
type = "tristate"

[[choice]]
name = "PICK"
type = "tristate"
optional = true
depends_on = ["m"]
members = ["C1", "C2"]
"#);

    let outcome = allyes(&mut db);

    let summary: Vec<(String, Tristate, bool)> = outcome
        .mutations
        .iter()
        .map(|m| (m.target.to_string(), m.to, m.member_raise))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("choice PICK".to_string(), Tristate::M, false),
            ("symbol C1".to_string(), Tristate::M, true),
            ("symbol C2".to_string(), Tristate::M, true),
        ]
    );
    assert!(outcome.mutations.iter().all(|m| m.pass == 1));
}

#[test]
fn dependency_declared_later_takes_an_extra_pass() {
    let mut db = db(r#"
[[symbol]]
name = "D"
prompt = "D"
depends_on = ["E"]

[[symbol]]
name = "E"
prompt = "E"
"#);

    let outcome = allyes(&mut db);

    assert_eq!(db.value_of("D"), Some(Tristate::Y));
    assert_eq!(db.value_of("E"), Some(Tristate::Y));
    assert_eq!(outcome.passes, 3);
}

#[test]
fn selected_symbols_follow_their_selector() {
    let mut db = db(r#"
[[symbol]]
name = "DRV"
type = "tristate"
prompt = "driver"
select = ["CRC"]

[[symbol]]
name = "CRC"
type = "tristate"
"#);

    allyes(&mut db);

    assert_eq!(db.value_of("DRV"), Some(Tristate::Y));
    assert_eq!(db.value_of("CRC"), Some(Tristate::Y));
}

#[test]
fn bool_limited_to_m_ends_at_y() {
    let mut db = db(r#"
[[symbol]]
name = "A"
prompt = "A"
depends_on = ["m"]
"#);

    allyes(&mut db);
    assert_eq!(db.value_of("A"), Some(Tristate::Y));
}

#[test]
fn base_config_selection_survives_the_raise() {
    let mut db = db(r#"
[[symbol]]
name = "GZIP"

[[symbol]]
name = "XZ"

[[choice]]
name = "COMPRESSION"
default = "XZ"
members = ["GZIP", "XZ"]

[[symbol]]
name = "EXTRA"
prompt = "extra"
"#);
    let applied = db.load_config_str("CONFIG_GZIP=y\n# CONFIG_EXTRA is not set\nCONFIG_NOPE=y\n");
    assert_eq!(applied, 2);

    allyes(&mut db);

    assert_eq!(db.value_of("GZIP"), Some(Tristate::Y));
    assert_eq!(db.value_of("XZ"), Some(Tristate::N));
    assert_eq!(db.value_of("EXTRA"), Some(Tristate::Y));
}

#[test]
fn rendered_output_reloads_to_a_fixed_point() {
    let toml = r#"
[[symbol]]
name = "NET"
prompt = "net"

[[symbol]]
name = "DRV"
type = "tristate"
prompt = "driver"
depends_on = ["NET"]
select = ["CRC"]

[[symbol]]
name = "CRC"
type = "tristate"

[[symbol]]
name = "NAME"
type = "string"
prompt = "name"
default = "a \"quoted\" name"
"#;
    let mut raised = db(toml);
    allyes(&mut raised);
    let rendered = raised.render_config(None);

    let mut reloaded = db(toml);
    reloaded.load_config_str(&rendered);

    assert_eq!(reloaded.render_config(None), rendered);
    assert!(unsettled(&reloaded, Policy::AllYes).unwrap().is_empty());
    let again = allyes(&mut reloaded);
    assert!(!again.changed());
}

#[test]
fn allno_lowers_defaults() {
    let mut db = db(r#"
[[symbol]]
name = "A"
prompt = "A"
default = "y"

[[symbol]]
name = "B"
type = "tristate"
prompt = "B"
select = ["C"]
default = "y"

[[symbol]]
name = "C"
type = "tristate"
prompt = "C"
"#);
    assert_eq!(db.value_of("A"), Some(Tristate::Y));

    let outcome = Raiser::new(RaiserConfig {
        policy: Policy::AllNo,
        ..RaiserConfig::default()
    })
    .run(&mut db)
    .unwrap();

    assert_eq!(db.value_of("A"), Some(Tristate::N));
    assert_eq!(db.value_of("B"), Some(Tristate::N));
    assert_eq!(db.value_of("C"), Some(Tristate::N));
    assert!(outcome.mutations.iter().all(|m| m.to < m.from));
    assert!(unsettled(&db, Policy::AllNo).unwrap().is_empty());
}

#[test]
fn pass_limit_stops_a_long_chain() {
    let mut db = db(r#"
[[symbol]]
name = "D"
prompt = "D"
depends_on = ["E"]

[[symbol]]
name = "E"
prompt = "E"
"#);

    let err = Raiser::new(RaiserConfig {
        max_passes: Some(1),
        ..RaiserConfig::default()
    })
    .run(&mut db)
    .unwrap_err();

    assert_eq!(
        err,
        RaiseError::NoFixedPoint {
            passes: 1,
            mutations: vec![Mutation {
                pass: 1,
                target: Target::symbol("E"),
                from: Tristate::N,
                to: Tristate::Y,
                member_raise: false,
            }],
        }
    );
    // The first pass still happened.
    assert_eq!(db.value_of("E"), Some(Tristate::Y));
}

#[test]
fn model_queries_name_entities() {
    let db = db(r#"
[[symbol]]
name = "A"

[[choice]]
members = ["A"]
"#);
    let a = db.symbol("A").unwrap();
    assert_eq!(db.symbol_name(a), "A");
    let choice = db.symbol_choice(a).unwrap();
    assert_eq!(db.choice_name(choice), "<choice 1>");
    assert_eq!(db.choice_members(choice), vec![a]);
}
