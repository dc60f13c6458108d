//! Target-repository existence/creation gate (spec §4.1 "Eventual-
//! consistency probe", §4.5 step 2, §6 `RepoLifecycle` contract).
//!
//! Restore refuses to run against a repository that doesn't exist unless
//! `CREATE_REPOSITORY_IF_MISSING` is set, and after creating one, GitHub's
//! API can briefly 404 the repo it just created; this polls with the same
//! backoff shape the teacher's `github/client.rs` already uses for rate
//! limits rather than inventing a second retry scheme.

use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;

use crate::config::RepositoryVisibility;
use crate::errors::GithubDataError;
use crate::github::GithubClient;

const PROBE_ATTEMPTS: u32 = 5;
const PROBE_DELAY: Duration = Duration::from_millis(500);

/// Bound to a single owner for the run, matching the `owner/name` shape
/// `RunConfig` already resolves once at startup.
pub struct RepoLifecycle<'a> {
    api: &'a GithubClient,
    owner: &'a str,
}

impl<'a> RepoLifecycle<'a> {
    pub fn new(api: &'a GithubClient, owner: &'a str) -> Self {
        RepoLifecycle { api, owner }
    }

    pub async fn repository_exists(&self, name: &str) -> Result<bool, GithubDataError> {
        match self.api.get_repository(self.owner, name).await {
            Ok(_) => Ok(true),
            Err(GithubDataError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn get_repository_metadata(&self, name: &str) -> Result<Value, GithubDataError> {
        self.api.get_repository(self.owner, name).await
    }

    /// Creates the repository and polls until the API reflects it (GitHub's
    /// repository creation is not immediately read-consistent).
    pub async fn create_repository(
        &self,
        name: &str,
        visibility: RepositoryVisibility,
    ) -> Result<(), GithubDataError> {
        self.api
            .create_repository(self.owner, name, visibility == RepositoryVisibility::Private)
            .await?;

        for attempt in 0..PROBE_ATTEMPTS {
            if self.repository_exists(name).await? {
                return Ok(());
            }
            sleep(PROBE_DELAY * (attempt + 1)).await;
        }
        tracing::warn!(
            owner = self.owner,
            name,
            "repository still not visible after {PROBE_ATTEMPTS} probe attempts, continuing anyway"
        );
        Ok(())
    }
}
