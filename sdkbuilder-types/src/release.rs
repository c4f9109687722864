use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoCoordinates {
    pub owner: String,
    pub name: String,
}

impl RepoCoordinates {
    /// Parse the last two path segments of a repository URL
    /// (`https://github.com/owner/name[.git]`). A trailing `.git` is dropped.
    pub fn from_url(url: &str) -> Option<Self> {
        let mut parts = url
            .trim()
            .trim_end_matches('/')
            .rsplit(['/', ':'])
            .filter(|s| !s.is_empty());
        let name = parts.next()?;
        let owner = parts.next()?;
        let name = name.strip_suffix(".git").unwrap_or(name);
        if name.is_empty() {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

/// Request body for creating a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseOptions {
    pub tag_name: String,
    pub target_commitish: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

/// A release as reported back by the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    pub tag_name: String,

    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub html_url: Option<String>,
}
