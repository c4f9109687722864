use crate::ports::{RepositoryHandle, VersionControl};
use anyhow::Context;
use camino::Utf8Path;
use std::process::Command;
use tracing::{debug, info};

/// Git operations through the `git` executable.
///
/// When a token is configured it is embedded in `https://` remotes so clones
/// and pushes authenticate without a credential helper.
#[derive(Debug, Clone, Default)]
pub struct ShellVersionControl {
    token: Option<String>,
}

impl ShellVersionControl {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// `repo` with the token inserted after the scheme, for `https://` URLs only.
    pub fn authenticated_url(&self, repo: &str) -> String {
        match (&self.token, repo.strip_prefix("https://")) {
            (Some(token), Some(rest)) if !rest.contains('@') => {
                format!("https://{token}@{rest}")
            }
            _ => repo.to_string(),
        }
    }

    fn git(&self, dir: Option<&Utf8Path>, args: &[&str]) -> anyhow::Result<()> {
        let mut cmd = Command::new("git");
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        debug!(args = ?redact(args, self.token.as_deref()), "git");
        let status = cmd
            .args(args)
            .status()
            .with_context(|| format!("run git {}", args.first().copied().unwrap_or_default()))?;
        if !status.success() {
            anyhow::bail!(
                "git {} failed with {}",
                args.first().copied().unwrap_or_default(),
                status
            );
        }
        Ok(())
    }
}

fn redact(args: &[&str], token: Option<&str>) -> Vec<String> {
    args.iter()
        .map(|a| match token {
            Some(t) => a.replace(t, "***"),
            None => a.to_string(),
        })
        .collect()
}

impl VersionControl for ShellVersionControl {
    fn clone_repo(
        &self,
        repo: &str,
        branch: Option<&str>,
        dest: &Utf8Path,
    ) -> anyhow::Result<RepositoryHandle> {
        info!("Cloning {} ({}) to {}", repo, branch.unwrap_or("default branch"), dest);
        let url = self.authenticated_url(repo);
        let mut args = vec!["clone"];
        if let Some(branch) = branch {
            args.extend(["--branch", branch]);
        }
        args.extend([url.as_str(), dest.as_str()]);
        self.git(None, &args)
            .with_context(|| format!("clone {} into {}", repo, dest))?;

        Ok(RepositoryHandle {
            url: repo.to_string(),
            branch: branch.map(str::to_string),
            dir: dest.to_path_buf(),
        })
    }

    fn save_changes(&self, repo: &str, dir: &Utf8Path, tag: &str) -> anyhow::Result<()> {
        info!("Committing and tagging {} as {}", dir, tag);
        self.git(Some(dir), &["add", "-A"])
            .with_context(|| format!("stage changes in {}", dir))?;
        self.git(Some(dir), &["commit", "--allow-empty", "-m", tag])
            .with_context(|| format!("commit changes in {}", dir))?;
        self.git(Some(dir), &["tag", tag])
            .with_context(|| format!("tag {} in {}", tag, dir))?;

        let url = self.authenticated_url(repo);
        self.git(Some(dir), &["push", &url, "HEAD"])
            .with_context(|| format!("push to {}", repo))?;
        self.git(Some(dir), &["push", &url, tag])
            .with_context(|| format!("push tag {} to {}", tag, repo))?;
        Ok(())
    }
}
