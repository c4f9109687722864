use crate::ports::ReleasePublisher;
use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use sdkbuilder_types::release::{ReleaseOptions, ReleaseRecord, RepoCoordinates};
use tracing::{debug, info};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Creates releases through the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubReleasePublisher {
    token: Option<String>,
    api_base: String,
    client: Client,
}

impl GithubReleasePublisher {
    pub fn new(token: Option<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Publisher against a GitHub Enterprise (or test) endpoint.
    pub fn with_api_base(token: Option<String>, api_base: impl Into<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn releases_url(&self, repo: &RepoCoordinates) -> String {
        format!("{}/repos/{}/{}/releases", self.api_base, repo.owner, repo.name)
    }
}

impl ReleasePublisher for GithubReleasePublisher {
    fn create_release(
        &self,
        repo: &RepoCoordinates,
        options: &ReleaseOptions,
    ) -> anyhow::Result<ReleaseRecord> {
        let url = self.releases_url(repo);
        info!("Creating release {} on {}/{}", options.tag_name, repo.owner, repo.name);
        debug!(url = %url, target = %options.target_commitish, "release request");

        let mut request = self
            .client
            .post(&url)
            .header(USER_AGENT, concat!("sdkbuilder/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/vnd.github+json")
            .json(options);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .with_context(|| format!("create release {}", options.tag_name))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            anyhow::bail!(
                "create release {} failed with HTTP {}: {}",
                options.tag_name,
                status,
                body
            );
        }
        response.json().context("parse release response")
    }
}
