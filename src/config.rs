//! Process-level configuration (spec §6): the handful of environment
//! variables that are not per-entity enablement toggles.
//!
//! Parsing these values is an ambient concern, not part of the core engine,
//! but the core's entrypoint (`main.rs`) needs somewhere to collect them.
//! Grounded in the teacher's `github::client::default_token_from_env`
//! (env-var fallback chain) and `config.rs` (typed config struct).

use std::env;

use anyhow::{Context, bail};
use secrecy::SecretString;

use crate::context::ConflictStrategy;
use crate::errors::GithubDataError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Save,
    Restore,
}

impl std::str::FromStr for Operation {
    type Err = GithubDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "save" => Ok(Operation::Save),
            "restore" => Ok(Operation::Restore),
            other => Err(GithubDataError::Config(format!(
                "OPERATION must be 'save' or 'restore', got '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepositoryVisibility {
    Public,
    Private,
}

impl std::str::FromStr for RepositoryVisibility {
    type Err = GithubDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(RepositoryVisibility::Public),
            "private" => Ok(RepositoryVisibility::Private),
            other => Err(GithubDataError::Config(format!(
                "REPOSITORY_VISIBILITY must be 'public' or 'private', got '{other}'"
            ))),
        }
    }
}

/// A `owner/name` repository reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for RepoRef {
    type Err = GithubDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s.split_once('/').ok_or_else(|| {
            GithubDataError::Config(format!("GITHUB_REPO must be 'owner/name', got '{s}'"))
        })?;
        if owner.is_empty() || name.is_empty() {
            return Err(GithubDataError::Config(format!(
                "GITHUB_REPO must be 'owner/name', got '{s}'"
            )));
        }
        Ok(RepoRef {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

#[derive(Clone)]
pub struct RunConfig {
    pub operation: Operation,
    pub token: SecretString,
    pub repo: RepoRef,
    pub data_path: std::path::PathBuf,
    pub create_repository_if_missing: bool,
    pub repository_visibility: RepositoryVisibility,
    pub label_conflict_strategy: ConflictStrategy,
    pub include_original_metadata: bool,
}

impl RunConfig {
    /// Loads configuration from the process environment, per spec §6.
    /// Command-line overrides (see `cli.rs`) take precedence when present.
    pub fn from_env() -> anyhow::Result<RunConfig> {
        let operation = env_required("OPERATION")?
            .parse()
            .map_err(|e: GithubDataError| anyhow::anyhow!(e))?;
        let token = default_token_from_env()?;
        let repo = env_required("GITHUB_REPO")?
            .parse()
            .map_err(|e: GithubDataError| anyhow::anyhow!(e))?;
        let data_path = env::var("DATA_PATH")
            .unwrap_or_else(|_| "/data".to_string())
            .into();
        let create_repository_if_missing = match env::var("CREATE_REPOSITORY_IF_MISSING") {
            Ok(v) => number_spec::parse_boolean(&v)
                .map_err(|e| anyhow::anyhow!("CREATE_REPOSITORY_IF_MISSING: {e}"))?,
            Err(_) => false,
        };
        let repository_visibility = match env::var("REPOSITORY_VISIBILITY") {
            Ok(v) => v.parse().map_err(|e: GithubDataError| anyhow::anyhow!(e))?,
            Err(_) => RepositoryVisibility::Private,
        };
        let label_conflict_strategy = match env::var("LABEL_CONFLICT_STRATEGY") {
            Ok(v) => v.parse().map_err(|e: GithubDataError| anyhow::anyhow!(e))?,
            Err(_) => ConflictStrategy::default(),
        };
        let include_original_metadata = match env::var("INCLUDE_ORIGINAL_METADATA") {
            Ok(v) => number_spec::parse_boolean(&v)
                .map_err(|e| anyhow::anyhow!("INCLUDE_ORIGINAL_METADATA: {e}"))?,
            Err(_) => true,
        };

        Ok(RunConfig {
            operation,
            token,
            repo,
            data_path,
            create_repository_if_missing,
            repository_visibility,
            label_conflict_strategy,
            include_original_metadata,
        })
    }
}

fn env_required(name: &str) -> anyhow::Result<String> {
    env::var(name).with_context(|| format!("missing required environment variable {name}"))
}

/// Finds the GitHub token in the environment, mirroring the teacher's
/// fallback chain (`GITHUB_TOKEN` then `GITHUB_API_TOKEN`) minus the
/// `git config` fallback, which doesn't apply outside an interactive clone.
fn default_token_from_env() -> anyhow::Result<SecretString> {
    if let Ok(t) = env::var("GITHUB_TOKEN") {
        return Ok(t.into());
    }
    if let Ok(t) = env::var("GITHUB_API_TOKEN") {
        return Ok(t.into());
    }
    bail!("could not find token in GITHUB_TOKEN or GITHUB_API_TOKEN")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repo_ref() {
        let r: RepoRef = "octocat/Hello-World".parse().unwrap();
        assert_eq!(r.owner, "octocat");
        assert_eq!(r.name, "Hello-World");
        assert_eq!(r.full_name(), "octocat/Hello-World");
    }

    #[test]
    fn rejects_malformed_repo_ref() {
        assert!("octocat".parse::<RepoRef>().is_err());
    }

    #[test]
    fn operation_parsing_is_case_insensitive() {
        assert_eq!("Save".parse::<Operation>().unwrap(), Operation::Save);
        assert_eq!("RESTORE".parse::<Operation>().unwrap(), Operation::Restore);
        assert!("sync".parse::<Operation>().is_err());
    }
}
