use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Display name used when no better run name can be resolved.
pub const FALLBACK_RUN_NAME: &str = "Production CI/CD Pipeline";

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HeadCommit {
    pub message: String,
    pub author: CommitAuthor,
}

/// A workflow run as returned by the upstream actions API.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub status: String,
    pub conclusion: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub head_branch: Option<String>,
    pub head_sha: String,
    pub actor: Actor,
    pub event: String,
    pub workflow_id: u64,
    pub run_number: u64,
    pub html_url: String,
    pub jobs_url: String,
    #[serde(default)]
    pub head_commit: Option<HeadCommit>,
}

/// One page of the upstream run listing.
///
/// Entries stay raw until the page is cut down to the runs that are shown, so
/// an odd entry past the cut never fails the whole page.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RunsPage {
    pub workflow_runs: Vec<serde_json::Value>,
    pub total_count: u64,
}

impl RunsPage {
    pub fn from_records(records: &[RunRecord], total_count: u64) -> serde_json::Result<Self> {
        let workflow_runs =
            records.iter().map(serde_json::to_value).collect::<serde_json::Result<_>>()?;
        Ok(Self { workflow_runs, total_count })
    }
}

/// A workflow run in the shape served to the presentation layer.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DisplayRun {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub head_branch: String,
    pub head_sha: String,
    pub actor: Actor,
    pub event: String,
    pub workflow_id: u64,
    pub run_number: u64,
    pub html_url: String,
    pub jobs_url: String,
    /// Seconds between creation and last update, only for concluded runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    pub workflow_name: String,
}

impl DisplayRun {
    pub fn state(&self) -> RunState {
        RunState::from_parts(&self.status, self.conclusion.as_deref())
    }
}

/// Status used for filtering and badges, derived from upstream status and conclusion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Success,
    Failure,
    InProgress,
    Queued,
    Cancelled,
}

impl RunState {
    pub fn from_parts(status: &str, conclusion: Option<&str>) -> Self {
        match (conclusion, status) {
            (Some("success"), _) => Self::Success,
            (Some("failure"), _) => Self::Failure,
            (_, "in_progress") => Self::InProgress,
            (_, "queued") => Self::Queued,
            _ => Self::Cancelled,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::InProgress => "in_progress",
            Self::Queued => "queued",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
            Self::InProgress => "In Progress",
            Self::Queued => "Queued",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for RunState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "in_progress" => Ok(Self::InProgress),
            "queued" => Ok(Self::Queued),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(()),
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// Filters offered on the workflow run page.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RunFilter {
    #[default]
    All,
    Success,
    Failure,
}

pub const ALL_FILTERS: &[RunFilter] = &[RunFilter::All, RunFilter::Success, RunFilter::Failure];

impl RunFilter {
    pub fn key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All workflows",
            Self::Success => "Success",
            Self::Failure => "Failure",
        }
    }

    pub fn matches(self, run: &DisplayRun) -> bool {
        match self {
            Self::All => true,
            Self::Success => run.state() == RunState::Success,
            Self::Failure => run.state() == RunState::Failure,
        }
    }

    pub fn count(self, runs: &[DisplayRun]) -> usize {
        runs.iter().filter(|run| self.matches(run)).count()
    }
}

impl FromStr for RunFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            _ => Err(()),
        }
    }
}

/// Where a run list came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    GitHub,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRunsResponse {
    pub workflow_runs: Vec<DisplayRun>,
    pub total_count: u64,
    pub source: Source,
}
