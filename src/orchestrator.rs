//! The Orchestrator (spec §4.5): drives a full save or restore run across
//! every enabled entity, in dependency order, producing one `EntityResult`
//! per entity.

use tracing::{error, info, warn};

use crate::config::{Operation, RepositoryVisibility};
use crate::context::{ConflictStrategy, Context};
use crate::converters::ConverterRegistry;
use crate::entities::EntityRegistry;
use crate::errors::{EntityResult, GithubDataError};
use crate::git::GitService;
use crate::github::GithubClient;
use crate::operations::{OperationRegistry, declared_operations};
use crate::repo_lifecycle::RepoLifecycle;
use crate::storage::StorageService;
use crate::strategy::registry::{restore_strategy, save_strategy};
use crate::strategy::ServiceBag;

pub struct Orchestrator<'a> {
    pub registry: EntityRegistry,
    pub api: &'a GithubClient,
    pub storage: &'a dyn StorageService,
    pub git: Option<&'a dyn GitService>,
    pub data_path: &'a std::path::Path,
    pub create_repository_if_missing: bool,
    pub repository_visibility: RepositoryVisibility,
    pub conflict_strategy: ConflictStrategy,
    pub include_original_metadata: bool,
}

impl<'a> Orchestrator<'a> {
    /// Runs every enabled entity's strategy for `operation` against
    /// `owner/repo`, in topological order, collecting one result per entity
    /// (spec §4.5 steps 1-5).
    pub async fn execute(&self, operation: Operation, owner: &str, repo: &str) -> Result<Vec<EntityResult>, GithubDataError> {
        let enabled = self.registry.get_enabled_entities();
        info!(
            owner,
            repo,
            entities = ?enabled.iter().map(|e| e.declaration.name).collect::<Vec<_>>(),
            "starting run"
        );

        if operation == Operation::Restore {
            self.ensure_target_repository(owner, repo).await?;
        }

        let converters = ConverterRegistry::new()?;
        OperationRegistry::new(declared_operations(), &converters)?;
        let services = ServiceBag {
            api: self.api,
            storage: self.storage,
            converters: &converters,
            git: self.git,
            data_path: self.data_path,
        };
        let mut context = Context::new(self.include_original_metadata, self.conflict_strategy);

        let mut results = Vec::with_capacity(enabled.len());
        for entity in enabled {
            let name = entity.declaration.name;
            info!(entity = name, "processing");
            let outcome = match operation {
                Operation::Save => {
                    save_strategy(name)?
                        .run(&services, owner, repo, &entity.enablement, &mut context)
                        .await
                }
                Operation::Restore => {
                    restore_strategy(name)?.run(&services, owner, repo, &mut context).await
                }
            };
            match outcome {
                Ok(count) => {
                    info!(entity = name, count, "done");
                    results.push(EntityResult::ok(name, count));
                }
                Err(e) => {
                    error!(entity = name, error = %e, "entity failed");
                    results.push(EntityResult::failed(name, e));
                }
            }
        }

        Self::print_summary(&results);
        Ok(results)
    }

    async fn ensure_target_repository(&self, owner: &str, repo: &str) -> Result<(), GithubDataError> {
        let lifecycle = RepoLifecycle::new(self.api, owner);
        if lifecycle.repository_exists(repo).await? {
            return Ok(());
        }
        if !self.create_repository_if_missing {
            return Err(GithubDataError::Fatal(format!(
                "repository {owner}/{repo} does not exist and CREATE_REPOSITORY_IF_MISSING is not set"
            )));
        }
        warn!(owner, repo, "target repository missing, creating");
        lifecycle.create_repository(repo, self.repository_visibility).await
    }

    fn print_summary(results: &[EntityResult]) {
        let failures: Vec<&EntityResult> = results.iter().filter(|r| !r.success).collect();
        if failures.is_empty() {
            let total: usize = results.iter().map(|r| r.count).sum();
            info!(total, "completed successfully");
        } else {
            error!("completed with errors:");
            for failure in &failures {
                error!("  {}: {}", failure.entity_name, failure.error.as_deref().unwrap_or("unknown error"));
            }
        }
    }
}
