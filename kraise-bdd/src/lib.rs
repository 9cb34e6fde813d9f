//! BDD harness (cucumber-rs).
//!
//! This crate exists to keep scenario tests isolated from the production crates. The helpers
//! here read back what a run wrote.

use kraise_types::Tristate;

/// Value of `name` in rendered `.config` text.
///
/// `# PREFIXNAME is not set` and an absent line both read as `n`. Returns `None` for lines whose
/// value is not a tristate (strings, numbers).
pub fn config_value(contents: &str, prefix: &str, name: &str) -> Option<Tristate> {
    let key = format!("{prefix}{name}");
    let not_set = format!("# {key} is not set");
    for line in contents.lines().map(str::trim) {
        if line == not_set {
            return Some(Tristate::N);
        }
        if let Some((lhs, rhs)) = line.split_once('=')
            && lhs == key
        {
            return rhs.parse().ok();
        }
    }
    Some(Tristate::N)
}
