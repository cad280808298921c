pub mod fallback;
pub mod normalize;
pub mod retrieve;

use std::{future::Future, sync::Arc, time::Duration};

use anyhow::{Context, Result, anyhow, bail};
use bytes::Bytes;
use moka::future::Cache;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use resume_site_core::{config::GitHubConfig, models::RunsPage};
use url::Url;

pub use crate::retrieve::{Retrieval, RetrieveOptions, retrieve};

pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Read access to the workflow runs of one repository.
pub trait RunSource {
    /// Fetch the most recent page of workflow runs, newest first.
    fn list_runs(&self) -> impl Future<Output = Result<RunsPage>> + Send;

    /// Fetch the full message of the commit with the given hash.
    fn commit_message(&self, sha: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Unauthenticated client for the GitHub REST API.
///
/// Successful response bodies are kept for `revalidate_secs`, so repeated
/// requests inside that window are answered without reaching GitHub.
#[derive(Clone)]
pub struct GitHub {
    client: reqwest::Client,
    config: GitHubConfig,
    responses: Cache<String, Bytes>,
}

#[derive(serde::Deserialize)]
struct CommitDetail {
    commit: CommitData,
}

#[derive(serde::Deserialize)]
struct CommitData {
    message: String,
}

impl GitHub {
    pub fn new(config: &GitHubConfig) -> Result<Arc<Self>> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .context("Failed to create GitHub client")?;
        let responses = Cache::<String, Bytes>::builder()
            .max_capacity(256)
            .time_to_live(Duration::from_secs(config.revalidate_secs))
            .build();
        tracing::info!(
            "GitHub client for {}/{} (revalidate after {}s)",
            config.owner,
            config.repo,
            config.revalidate_secs
        );
        Ok(Arc::new(Self { client, config: config.clone(), responses }))
    }

    pub fn config(&self) -> &GitHubConfig { &self.config }

    fn repo_endpoint(&self, path: &str) -> Result<Url> {
        let url = format!(
            "{}/repos/{}/{}/{}",
            self.config.api_url.as_str().trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            path
        );
        Url::parse(&url).with_context(|| format!("Invalid endpoint URL {url}"))
    }

    async fn fetch(&self, url: &Url) -> Result<Bytes> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;
        let status = response.status();
        if !status.is_success() {
            bail!("GitHub API returned {status} for {url}");
        }
        response.bytes().await.context("Failed to read response body")
    }

    /// GET a URL, reusing a cached body if one is still fresh.
    /// Concurrent misses for the same URL share one request. Failures are not cached.
    async fn get_cached(&self, url: Url) -> Result<Bytes> {
        self.responses
            .try_get_with(url.to_string(), self.fetch(&url))
            .await
            .map_err(|e| anyhow!("{e:#}"))
    }

    pub async fn fetch_runs(&self) -> Result<RunsPage> {
        let url = self.repo_endpoint("actions/runs")?;
        let body = self.get_cached(url).await.inspect_err(|e| {
            tracing::error!("GitHub API error: {e:#}");
        })?;
        serde_json::from_slice(&body).context("Failed to parse workflow runs")
    }

    pub async fn fetch_commit_message(&self, sha: &str) -> Result<String> {
        let url = self.repo_endpoint(&format!("commits/{sha}"))?;
        let body = self.get_cached(url).await?;
        let detail: CommitDetail =
            serde_json::from_slice(&body).with_context(|| format!("Failed to parse commit {sha}"))?;
        Ok(detail.commit.message)
    }
}

impl RunSource for GitHub {
    async fn list_runs(&self) -> Result<RunsPage> { self.fetch_runs().await }

    async fn commit_message(&self, sha: &str) -> Result<String> {
        self.fetch_commit_message(sha).await
    }
}
