//! Core run and check pipelines, extracted from the CLI.
//!
//! Output goes through the [`WritePort`] so embedders decide where files land.

use crate::ports::WritePort;
use crate::settings::{CheckSettings, RunSettings};
use anyhow::Context;
use chrono::{DateTime, Utc};
use kraise_domain::{unsettled, RaiseError, RaiseOutcome, Raiser, RaiserConfig};
use kraise_model::ConfigDb;
use kraise_types::report::{
    RaiseReport, ReportInput, ReportStatus, ReportSummary, ReportVerdict, RunInfo, ToolInfo,
};
use kraise_types::{Mutation, Policy, Target};
use tracing::{debug, info};

/// Error type for pipeline results. Exit code 2 = no fixed point, 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("no fixed point reached after {passes} passes")]
    NoFixedPoint { passes: u64 },

    #[error("{count} entries are not at a fixed point")]
    Unsettled { count: usize },

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ToolError::NoFixedPoint { .. } | ToolError::Unsettled { .. } => 2,
            ToolError::Internal(_) => 1,
        }
    }
}

/// Outcome of `run_policy`.
#[derive(Debug)]
pub struct RunOutcome {
    pub raise: RaiseOutcome,
    /// The rendered `.config` that was written.
    pub config: String,
    pub report: RaiseReport,
}

/// Load the database, apply the policy until a fixed point and write the result.
///
/// The `.config` is written only after the run terminates cleanly. The report, when requested,
/// is written either way so a failed run still leaves a verdict behind.
pub fn run_policy(
    settings: &RunSettings,
    writer: &dyn WritePort,
    tool: ToolInfo,
) -> Result<RunOutcome, ToolError> {
    let started_at = Utc::now();

    let mut db = load_database(&settings.db_path, &settings.prefix)?;
    if let Some(base) = &settings.base_config {
        let applied = db
            .load_config(base)
            .with_context(|| format!("load base config {}", base))?;
        debug!(path = %base, applied, "applied base configuration");
    }

    let raiser = Raiser::new(RaiserConfig {
        policy: settings.policy,
        max_passes: settings.max_passes,
    });

    match raiser.run(&mut db) {
        Ok(raise) => {
            let config = db.render_config(settings.header.as_deref());
            writer
                .write_file(&settings.out_path, config.as_bytes())
                .context("write configuration")?;

            let report = build_report(settings, tool, started_at, &raise, Vec::new());
            write_report(settings, writer, &report)?;
            info!(out = %settings.out_path, passes = raise.passes, "configuration written");

            Ok(RunOutcome {
                raise,
                config,
                report,
            })
        }
        Err(RaiseError::NoFixedPoint { passes, mutations }) => {
            let partial = RaiseOutcome { passes, mutations };
            let reasons = vec![format!("no fixed point after {passes} passes")];
            let report = build_report(settings, tool, started_at, &partial, reasons);
            write_report(settings, writer, &report)?;
            Err(ToolError::NoFixedPoint { passes })
        }
        Err(RaiseError::Model(e)) => Err(anyhow::Error::new(e)
            .context(format!("raise {}", settings.db_path))
            .into()),
    }
}

/// Outcome of `check_fixed_point`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub policy: Policy,
    pub unsettled: Vec<Target>,
}

impl CheckOutcome {
    pub fn is_settled(&self) -> bool {
        self.unsettled.is_empty()
    }

    /// `Ok` when settled, [`ToolError::Unsettled`] otherwise.
    pub fn into_result(self) -> Result<Self, ToolError> {
        if self.is_settled() {
            Ok(self)
        } else {
            Err(ToolError::Unsettled {
                count: self.unsettled.len(),
            })
        }
    }
}

/// Load the database plus an existing `.config` and list what the policy would still change.
pub fn check_fixed_point(settings: &CheckSettings) -> Result<CheckOutcome, ToolError> {
    let mut db = load_database(&settings.db_path, &settings.prefix)?;
    db.load_config(&settings.config_path)
        .with_context(|| format!("load config {}", settings.config_path))?;

    let unsettled = unsettled(&db, settings.policy)
        .map_err(anyhow::Error::new)
        .context("evaluate model")?;
    debug!(
        policy = %settings.policy,
        unsettled = unsettled.len(),
        "checked fixed point"
    );

    Ok(CheckOutcome {
        policy: settings.policy,
        unsettled,
    })
}

fn load_database(path: &camino::Utf8Path, prefix: &str) -> anyhow::Result<ConfigDb> {
    let mut db = ConfigDb::load(path).with_context(|| format!("load database {}", path))?;
    db.set_prefix(prefix);
    Ok(db)
}

fn write_report(
    settings: &RunSettings,
    writer: &dyn WritePort,
    report: &RaiseReport,
) -> anyhow::Result<()> {
    let Some(path) = &settings.report_path else {
        return Ok(());
    };
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    writer.write_file(path, json.as_bytes())
}

pub(crate) fn build_report(
    settings: &RunSettings,
    tool: ToolInfo,
    started_at: DateTime<Utc>,
    outcome: &RaiseOutcome,
    reasons: Vec<String>,
) -> RaiseReport {
    let ended_at = Utc::now();
    let duration_ms = (ended_at - started_at).num_milliseconds().max(0) as u64;
    let status = if reasons.is_empty() {
        ReportStatus::Pass
    } else {
        ReportStatus::Fail
    };

    let mutations: Vec<Mutation> = outcome.mutations.clone();
    RaiseReport {
        schema: kraise_types::schema::KRAISE_REPORT_V1.to_string(),
        tool,
        run: RunInfo {
            started_at,
            ended_at: Some(ended_at),
            duration_ms: Some(duration_ms),
        },
        policy: settings.policy,
        input: ReportInput {
            database: settings.db_path.to_string(),
            base_config: settings.base_config.as_ref().map(|p| p.to_string()),
            output: Some(settings.out_path.to_string()),
            max_passes: settings.max_passes,
        },
        summary: ReportSummary::from_mutations(outcome.passes, &mutations),
        verdict: ReportVerdict { status, reasons },
        mutations,
    }
}
