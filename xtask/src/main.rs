use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use fs_err as fs;
use kraise_model::{ChoiceDef, ConfigDb, DatabaseFile, SymbolDef};
use kraise_types::SymbolKind;
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by kraise.
    PrintSchemas,
    /// Write a small sample database exercising selects, defaults and both choice modes.
    SampleDb {
        #[arg(long, default_value = "kconfig.toml")]
        out: Utf8PathBuf,
    },
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", kraise_types::schema::KRAISE_REPORT_V1);
        }
        Command::SampleDb { out } => {
            let text = sample_database_toml()?;
            // Refuse to write something the loader would reject.
            ConfigDb::from_toml_str(&text).context("sample database does not load")?;
            fs::write(&out, text).with_context(|| format!("write {out}"))?;
            println!("wrote {out}");
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "kraise-model", "--test", "golden_fixtures"])
                .env("KRAISE_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
    }
    Ok(())
}

fn symbol(name: &str, kind: SymbolKind, prompt: Option<&str>) -> SymbolDef {
    SymbolDef {
        name: name.to_string(),
        kind,
        prompt: prompt.map(str::to_string),
        ..SymbolDef::default()
    }
}

fn sample_database() -> DatabaseFile {
    let mut modules = symbol("MODULES", SymbolKind::Bool, Some("Enable loadable module support"));
    modules.default = Some("y".to_string());

    let mut net = symbol("NET", SymbolKind::Bool, Some("Networking support"));
    net.select = vec!["CRC32".to_string()];

    let mut e1000 = symbol("E1000", SymbolKind::Tristate, Some("Intel PRO/1000 support"));
    e1000.depends_on = vec!["NET".to_string()];

    let crc32 = symbol("CRC32", SymbolKind::Tristate, None);

    let mut hostname = symbol("DEFAULT_HOSTNAME", SymbolKind::String, Some("Default hostname"));
    hostname.default = Some("(none)".to_string());

    let mut log_buf = symbol("LOG_BUF_SHIFT", SymbolKind::Int, Some("Kernel log buffer size"));
    log_buf.default = Some("17".to_string());

    let gzip = symbol("KERNEL_GZIP", SymbolKind::Bool, Some("Gzip"));
    let xz = symbol("KERNEL_XZ", SymbolKind::Bool, Some("XZ"));

    let iosched_a = symbol("IOSCHED_A", SymbolKind::Tristate, Some("Scheduler A"));
    let iosched_b = symbol("IOSCHED_B", SymbolKind::Tristate, Some("Scheduler B"));

    DatabaseFile {
        symbols: vec![
            modules, net, e1000, crc32, hostname, log_buf, gzip, xz, iosched_a, iosched_b,
        ],
        choices: vec![
            ChoiceDef {
                name: Some("KERNEL_COMPRESSION".to_string()),
                prompt: Some("Kernel compression mode".to_string()),
                default: Some("KERNEL_XZ".to_string()),
                members: vec!["KERNEL_GZIP".to_string(), "KERNEL_XZ".to_string()],
                ..ChoiceDef::default()
            },
            ChoiceDef {
                name: Some("IOSCHED".to_string()),
                kind: SymbolKind::Tristate,
                prompt: Some("I/O schedulers built as modules".to_string()),
                depends_on: vec!["m".to_string()],
                members: vec!["IOSCHED_A".to_string(), "IOSCHED_B".to_string()],
                ..ChoiceDef::default()
            },
        ],
    }
}

fn sample_database_toml() -> anyhow::Result<String> {
    toml::to_string_pretty(&sample_database()).context("serialize sample database")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_database_loads() {
        let text = sample_database_toml().unwrap();
        let db = ConfigDb::from_toml_str(&text).unwrap();
        assert_eq!(db.symbol_count(), 10);
        assert_eq!(db.choice_count(), 2);
    }

    #[test]
    fn sample_database_is_written() {
        let temp = tempfile::tempdir().unwrap();
        let out = Utf8PathBuf::from_path_buf(temp.path().join("kconfig.toml")).unwrap();
        fs::write(&out, sample_database_toml().unwrap()).unwrap();
        assert!(ConfigDb::load(&out).is_ok());
    }
}
