use crate::mutation::Mutation;
use crate::symbol::Policy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaiseReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub policy: Policy,
    pub input: ReportInput,
    pub summary: ReportSummary,
    pub verdict: ReportVerdict,

    #[serde(default)]
    pub mutations: Vec<Mutation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInput {
    pub database: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_config: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub passes: u64,
    pub mutations_total: u64,
    pub symbols_changed: u64,
    pub choices_changed: u64,
    pub member_raises: u64,
}

impl ReportSummary {
    pub fn from_mutations(passes: u64, mutations: &[Mutation]) -> Self {
        let mut summary = ReportSummary {
            passes,
            mutations_total: mutations.len() as u64,
            ..Default::default()
        };
        for m in mutations {
            if m.target.is_choice() {
                summary.choices_changed += 1;
            } else if m.member_raise {
                summary.member_raises += 1;
            } else {
                summary.symbols_changed += 1;
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportVerdict {
    pub status: ReportStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pass,
    Fail,
}
