use anyhow::{Context, Result};
use futures_util::{StreamExt, stream};
use resume_site_core::{
    config::GitHubConfig,
    models::{DisplayRun, FALLBACK_RUN_NAME, RunRecord, Source, WorkflowRunsResponse},
};

use crate::{
    RunSource,
    fallback::{FALLBACK_TOTAL_COUNT, fallback_runs},
    normalize::{commit_title, normalize},
};

/// Outcome of one retrieval: live runs, or the fixed fallback set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieval {
    Live { runs: Vec<DisplayRun>, total_count: u64 },
    Fallback { runs: Vec<DisplayRun>, total_count: u64 },
}

impl Retrieval {
    pub fn fallback() -> Self {
        Self::Fallback { runs: fallback_runs(), total_count: FALLBACK_TOTAL_COUNT }
    }

    pub fn source(&self) -> Source {
        match self {
            Self::Live { .. } => Source::GitHub,
            Self::Fallback { .. } => Source::Fallback,
        }
    }

    pub fn runs(&self) -> &[DisplayRun] {
        match self {
            Self::Live { runs, .. } | Self::Fallback { runs, .. } => runs,
        }
    }

    pub fn total_count(&self) -> u64 {
        match self {
            Self::Live { total_count, .. } | Self::Fallback { total_count, .. } => *total_count,
        }
    }
}

impl From<Retrieval> for WorkflowRunsResponse {
    fn from(value: Retrieval) -> Self {
        let source = value.source();
        let (workflow_runs, total_count) = match value {
            Retrieval::Live { runs, total_count } | Retrieval::Fallback { runs, total_count } => {
                (runs, total_count)
            }
        };
        Self { workflow_runs, total_count, source }
    }
}

/// Upper bound on the runs served, whatever `max_runs` is set to.
pub const MAX_RUNS: usize = 10;

#[derive(Debug, Clone)]
pub struct RetrieveOptions {
    pub max_runs: usize,
    pub concurrency: usize,
    pub resolve_commit_titles: bool,
}

impl Default for RetrieveOptions {
    fn default() -> Self {
        Self { max_runs: MAX_RUNS, concurrency: 10, resolve_commit_titles: true }
    }
}

impl From<&GitHubConfig> for RetrieveOptions {
    fn from(config: &GitHubConfig) -> Self {
        Self {
            max_runs: config.max_run_count,
            concurrency: config.commit_lookup_concurrency,
            resolve_commit_titles: config.resolve_commit_titles,
        }
    }
}

/// Fetch, enrich and normalize the most recent workflow runs.
///
/// Never fails: any error while listing runs yields [`Retrieval::fallback`].
/// A failed commit lookup only affects the name of its own run.
pub async fn retrieve<S>(source: &S, options: &RetrieveOptions) -> Retrieval
where S: RunSource + Sync
{
    match fetch_live(source, options).await {
        Ok((runs, total_count)) => Retrieval::Live { runs, total_count },
        Err(e) => {
            tracing::warn!("Serving fallback workflow runs: {e:#}");
            Retrieval::fallback()
        }
    }
}

async fn fetch_live<S>(source: &S, options: &RetrieveOptions) -> Result<(Vec<DisplayRun>, u64)>
where S: RunSource + Sync
{
    let page = source.list_runs().await?;
    let records = page
        .workflow_runs
        .into_iter()
        .take(options.max_runs.min(MAX_RUNS))
        .enumerate()
        .map(|(idx, entry)| {
            serde_json::from_value::<RunRecord>(entry)
                .with_context(|| format!("Failed to parse workflow run {idx}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let titles = if options.resolve_commit_titles {
        let shas = records.iter().map(|record| record.head_sha.clone()).collect::<Vec<_>>();
        // Buffered keeps upstream order while lookups run concurrently
        stream::iter(shas)
            .map(|sha| async move { resolve_title(source, &sha).await })
            .buffered(options.concurrency.max(1))
            .map(Some)
            .collect::<Vec<_>>()
            .await
    } else {
        vec![None; records.len()]
    };
    let runs = records
        .into_iter()
        .zip(titles)
        .map(|(record, title)| normalize(record, title))
        .collect::<Vec<_>>();
    tracing::debug!("Retrieved {} of {} workflow runs", runs.len(), page.total_count);
    Ok((runs, page.total_count))
}

async fn resolve_title<S>(source: &S, sha: &str) -> String
where S: RunSource + Sync
{
    match source.commit_message(sha).await {
        Ok(message) => match commit_title(&message) {
            Some(title) => title.to_string(),
            None => FALLBACK_RUN_NAME.to_string(),
        },
        Err(e) => {
            tracing::warn!(sha, "Failed to fetch commit message: {e:#}");
            FALLBACK_RUN_NAME.to_string()
        }
    }
}
