//! Git clone/restore port (spec §6 "Service Contracts").
//!
//! The `git_repository` entity's strategies depend only on this trait; the
//! actual subprocess invocation is kept out of the orchestration core the
//! same way the teacher keeps `get_token_from_git_config` a small, isolated
//! `std::process::Command` call in `github/client.rs` rather than threading
//! a git library through the rest of the crate.

use std::process::Command;

use crate::errors::GithubDataError;

/// Full-repository mirroring via the local `git` binary, not the GitHub
/// REST/GraphQL surface `GithubClient` wraps.
pub trait GitService: Send + Sync {
    fn clone(&self, url: &str, target_path: &str) -> Result<(), GithubDataError>;

    fn restore(&self, source_path: &str, target_url: &str) -> Result<(), GithubDataError>;
}

pub struct ProcessGitService;

impl ProcessGitService {
    fn run(args: &[&str]) -> Result<(), GithubDataError> {
        let output = Command::new("git")
            .args(args)
            .output()
            .map_err(|e| GithubDataError::Fatal(format!("failed to execute git: {e}")))?;
        if !output.status.success() {
            return Err(GithubDataError::Fatal(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }
}

impl GitService for ProcessGitService {
    fn clone(&self, url: &str, target_path: &str) -> Result<(), GithubDataError> {
        Self::run(&["clone", "--mirror", url, target_path])
    }

    fn restore(&self, source_path: &str, target_url: &str) -> Result<(), GithubDataError> {
        Self::run(&["-C", source_path, "push", "--mirror", target_url])
    }
}
