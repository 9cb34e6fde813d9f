//! `.config` loading and rendering.
//!
//! Lines look like `CONFIG_FOO=y`, `CONFIG_NAME="text"` or `# CONFIG_FOO is not set`. Anything
//! else is a comment and ignored.

use crate::db::{ConfigDb, is_hex};
use crate::error::DbResult;
use camino::Utf8Path;
use fs_err as fs;
use kraise_types::{SymbolKind, Tristate};
use std::fmt::Write as _;
use tracing::{debug, warn};

impl ConfigDb {
    /// Load a `.config` file as user assignments. Returns the number of assignments applied.
    pub fn load_config(&mut self, path: &Utf8Path) -> DbResult<usize> {
        let contents = fs::read_to_string(path)?;
        let applied = self.load_config_str(&contents);
        debug!(path = %path, applied, "loaded base configuration");
        Ok(applied)
    }

    /// Apply `.config` text as user assignments. Unknown symbols and malformed values are
    /// skipped with a warning.
    pub fn load_config_str(&mut self, contents: &str) -> usize {
        let mut applied = 0;
        for (lineno, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            let Some((name, value)) = self.parse_line(line) else {
                continue;
            };
            let Some(&i) = self.by_name.get(name) else {
                warn!(line = lineno + 1, symbol = name, "ignoring assignment to unknown symbol");
                continue;
            };
            match self.assign(i, value) {
                Ok(()) => applied += 1,
                Err(reason) => {
                    warn!(line = lineno + 1, symbol = name, value, reason, "ignoring assignment");
                }
            }
        }
        self.recompute();
        applied
    }

    fn parse_line<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        if let Some(rest) = line.strip_prefix("# ") {
            let name = rest.strip_suffix(" is not set")?.strip_prefix(self.prefix.as_str())?;
            return Some((name, "n"));
        }
        if line.starts_with('#') {
            return None;
        }
        let (lhs, rhs) = line.split_once('=')?;
        let name = lhs.trim().strip_prefix(self.prefix.as_str())?;
        Some((name, rhs.trim()))
    }

    fn assign(&mut self, i: usize, value: &str) -> Result<(), &'static str> {
        let kind = self.symbols[i].kind;
        match kind {
            SymbolKind::Bool | SymbolKind::Tristate => {
                let mut v: Tristate = value.parse().map_err(|_| "expected n, m or y")?;
                if kind == SymbolKind::Bool {
                    v = v.promote_bool();
                }
                match self.symbols[i].choice {
                    Some(c) if v == Tristate::Y => {
                        let choice = &mut self.choices[c];
                        choice.user = Some(Tristate::Y);
                        choice.user_selection = Some(i);
                    }
                    Some(c) => {
                        self.symbols[i].user = Some(v);
                        if v == Tristate::M {
                            let choice = &mut self.choices[c];
                            choice.user = Some(choice.user.unwrap_or(Tristate::N).or(Tristate::M));
                        }
                    }
                    None => self.symbols[i].user = Some(v),
                }
            }
            SymbolKind::String => {
                self.symbols[i].user_text = Some(unquote(value).ok_or("malformed string")?);
            }
            SymbolKind::Int => {
                value.parse::<i64>().map_err(|_| "expected a decimal integer")?;
                self.symbols[i].user_text = Some(value.to_string());
            }
            SymbolKind::Hex => {
                if !is_hex(value) {
                    return Err("expected a 0x-prefixed hex number");
                }
                self.symbols[i].user_text = Some(value.to_string());
            }
        }
        Ok(())
    }

    /// Render the current configuration in declaration order.
    pub fn render_config(&self, header: Option<&str>) -> String {
        let mut out = String::from("#\n# Automatically generated file; DO NOT EDIT.\n");
        if let Some(header) = header {
            for line in header.lines() {
                let _ = writeln!(out, "# {line}");
            }
        }
        out.push_str("#\n");

        for s in self.symbols.iter().filter(|s| s.write) {
            let name = &s.name;
            let prefix = &self.prefix;
            match s.kind {
                SymbolKind::Bool | SymbolKind::Tristate => match s.value {
                    Tristate::N => {
                        let _ = writeln!(out, "# {prefix}{name} is not set");
                    }
                    v => {
                        let _ = writeln!(out, "{prefix}{name}={v}");
                    }
                },
                SymbolKind::String => {
                    if let Some(text) = &s.text {
                        let _ = writeln!(out, "{prefix}{name}=\"{}\"", escape(text));
                    }
                }
                SymbolKind::Int | SymbolKind::Hex => {
                    if let Some(text) = &s.text {
                        let _ = writeln!(out, "{prefix}{name}={text}");
                    }
                }
            }
        }
        out
    }

    pub fn write_config(&self, path: &Utf8Path, header: Option<&str>) -> DbResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render_config(header))?;
        debug!(path = %path, "wrote configuration");
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unquote(value: &str) -> Option<String> {
    let inner = value.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '"' => return None,
            c => out.push(c),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::{escape, unquote};

    #[test]
    fn strings_survive_escaping() {
        let text = r#"say "hi" \o/"#;
        let quoted = format!("\"{}\"", escape(text));
        assert_eq!(unquote(&quoted).as_deref(), Some(text));
    }

    #[test]
    fn unquote_rejects_malformed_strings() {
        assert_eq!(unquote("bare"), None);
        assert_eq!(unquote("\"open"), None);
        assert_eq!(unquote("\"a\"b\""), None);
        assert_eq!(unquote("\"trailing\\\""), None);
    }
}
