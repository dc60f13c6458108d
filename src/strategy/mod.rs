//! Strategy Layer (spec §4.4): per-entity save/restore pipelines.
//!
//! Grounded in the abstract base classes under
//! `github_data_tools/operations/{save,restore}` — `entity_name`,
//! `dependencies`, `read`/`transform`/`write` steps — reshaped as Rust
//! traits over `async_trait` since every step but `transform` makes network
//! or disk calls.

pub mod coupling;
pub mod impls;
pub mod registry;
pub mod selective;

use async_trait::async_trait;
use number_spec::Enablement;

use crate::context::Context;
use crate::converters::ConverterRegistry;
use crate::errors::GithubDataError;
use crate::git::GitService;
use crate::github::GithubClient;
use crate::storage::StorageService;

/// Services a strategy may depend on, filtered per entity by its declared
/// `required_services_save`/`required_services_restore` (spec §4.5 step 4).
/// Every entity needs the API client, storage, and converters; only
/// `git_repository` uses `git`, which is `None` when no `GitService` was
/// configured (the mirror simply isn't attempted).
pub struct ServiceBag<'a> {
    pub api: &'a GithubClient,
    pub storage: &'a dyn StorageService,
    pub converters: &'a ConverterRegistry,
    pub git: Option<&'a dyn GitService>,
    pub data_path: &'a std::path::Path,
}

#[async_trait]
pub trait SaveStrategy: Send + Sync {
    fn entity_name(&self) -> &'static str;

    /// Reads raw entities from the API, normalizes/filters/enriches them,
    /// and persists the result, returning the count written. `enablement`
    /// carries this entity's resolved selection set, if any (spec §4.4
    /// "Selective filtering").
    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        enablement: &Enablement,
        context: &mut Context,
    ) -> Result<usize, GithubDataError>;
}

#[async_trait]
pub trait RestoreStrategy: Send + Sync {
    fn entity_name(&self) -> &'static str;

    /// Reads persisted entities, maps referenced IDs through `context`,
    /// creates each on the target repository, and records new-id mappings.
    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        context: &mut Context,
    ) -> Result<usize, GithubDataError>;
}
