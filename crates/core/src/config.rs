use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub github: GitHubConfig,
    pub site: SiteConfig,
}

impl Config {
    /// Load the configuration from a YAML file.
    /// A missing file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let file = BufReader::new(
            File::open(path)
                .with_context(|| format!("Failed to open config file {}", path.display()))?,
        );
        serde_yaml::from_reader(file)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self { Self { port: 3000, request_timeout_secs: 30 } }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_url: Url,
    pub owner: String,
    pub repo: String,
    pub user_agent: String,
    /// How long upstream responses are reused before being fetched again.
    pub revalidate_secs: u64,
    /// Runs shown per retrieval, never more than 10.
    pub max_run_count: usize,
    pub commit_lookup_concurrency: usize,
    /// Use the head commit's title as the run name instead of the workflow name.
    pub resolve_commit_titles: bool,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse("https://api.github.com").expect("valid default URL"),
            owner: "bmarcuche".to_string(),
            repo: "resume-cloudrun".to_string(),
            user_agent: "resume-cloudrun-app".to_string(),
            revalidate_secs: 300,
            max_run_count: 10,
            commit_lookup_concurrency: 10,
            resolve_commit_titles: true,
        }
    }
}

impl GitHubConfig {
    pub fn repo_url(&self) -> String { format!("https://github.com/{}/{}", self.owner, self.repo) }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub static_dir: String,
    pub resume_path: String,
    pub owner_name: String,
    pub tagline: String,
    pub location: Option<String>,
    pub email: Option<String>,
    pub about: Vec<String>,
    pub skills: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            static_dir: "public".to_string(),
            resume_path: "public/resume.pdf".to_string(),
            owner_name: "Bruno Marcuche".to_string(),
            tagline: "DevOps Engineer & Cloud Architect".to_string(),
            location: Some("Remote / Global".to_string()),
            email: None,
            about: vec![
                "I've been fortunate to work with companies around the world, from lean startups \
                 in Costa Rica to enterprises in Brazil and the U.S. Along the way, I've built \
                 reliable systems, led teams, and scaled infrastructure."
                    .to_string(),
            ],
            skills: [
                "GCP",
                "Terraform",
                "Ansible",
                "Puppet",
                "Docker",
                "Kubernetes",
                "Prometheus",
                "OpenTelemetry",
                "RHEL",
                "Ubuntu",
                "Python",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}
